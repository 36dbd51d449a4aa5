//! Change history service
//!
//! Read access to the audit log, plus the helper every other service uses to
//! append entries.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{ChangeHistory, EntityType, NewChangeHistory};
use crate::domain::ports::ChangeHistoryRepository;
use crate::error::AppError;

/// Append entries to the change history.
///
/// The audited change is already persisted when this runs, so a failure here
/// is logged rather than turned into an error response.
pub(crate) async fn record_history<H>(history: &H, entries: Vec<NewChangeHistory>)
where
    H: ChangeHistoryRepository + ?Sized,
{
    if entries.is_empty() {
        return;
    }
    if let Err(e) = history.record(&entries).await {
        tracing::error!(
            error = %e,
            entity_type = %entries[0].entity_type,
            entity_id = %entries[0].entity_id,
            count = entries.len(),
            "Failed to record change history"
        );
    }
}

/// Service for reading the change history
pub struct HistoryService<H>
where
    H: ChangeHistoryRepository,
{
    history: Arc<H>,
}

impl<H> HistoryService<H>
where
    H: ChangeHistoryRepository,
{
    pub fn new(history: Arc<H>) -> Self {
        Self { history }
    }

    /// Full history of one entity, newest first
    pub async fn for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &Uuid,
    ) -> Result<Vec<ChangeHistory>, AppError> {
        Ok(self.history.list_by_entity(entity_type, entity_id).await?)
    }

    /// Latest changes across the back office
    pub async fn recent(
        &self,
        entity_type: Option<EntityType>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ChangeHistory>, AppError> {
        Ok(self
            .history
            .list_recent(entity_type, limit, offset)
            .await?)
    }
}
