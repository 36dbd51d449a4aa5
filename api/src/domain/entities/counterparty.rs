//! Counterparty domain entity
//!
//! Clients and suppliers the company trades with.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::change_history::{Auditable, EntityType};
use crate::error::DomainError;

/// Unique identifier for a counterparty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterpartyId(pub Uuid);

impl CounterpartyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CounterpartyId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CounterpartyId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CounterpartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role a counterparty plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterpartyKind {
    Client,
    Supplier,
    Both,
}

impl std::fmt::Display for CounterpartyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterpartyKind::Client => write!(f, "client"),
            CounterpartyKind::Supplier => write!(f, "supplier"),
            CounterpartyKind::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for CounterpartyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(CounterpartyKind::Client),
            "supplier" => Ok(CounterpartyKind::Supplier),
            "both" => Ok(CounterpartyKind::Both),
            _ => Err(format!("Unknown counterparty kind: {}", s)),
        }
    }
}

/// A client or supplier associated with orders
#[derive(Debug, Clone, Serialize)]
pub struct Counterparty {
    pub id: CounterpartyId,
    pub name: String,
    pub kind: CounterpartyKind,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Tax registration number (INN / USCC)
    pub tax_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Auditable for Counterparty {
    const ENTITY_TYPE: EntityType = EntityType::Counterparty;

    fn entity_id(&self) -> Uuid {
        self.id.0
    }

    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(self.name.clone())),
            ("kind", Some(self.kind.to_string())),
            ("contact_person", self.contact_person.clone()),
            ("phone", self.phone.clone()),
            ("email", self.email.clone()),
            ("address", self.address.clone()),
            ("tax_id", self.tax_id.clone()),
            ("notes", self.notes.clone()),
        ]
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
    })
}

/// Check an optional email address
pub fn validate_email(email: Option<&str>) -> Result<(), DomainError> {
    match email {
        Some(email) if !email_regex().is_match(email) => Err(DomainError::Validation(format!(
            "Invalid email address: {}",
            email
        ))),
        _ => Ok(()),
    }
}

/// Data needed to create a counterparty
#[derive(Debug, Clone)]
pub struct NewCounterparty {
    pub name: String,
    pub kind: CounterpartyKind,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub notes: Option<String>,
}

/// Editable fields of a counterparty
#[derive(Debug, Clone, Default)]
pub struct CounterpartyChanges {
    pub name: Option<String>,
    pub kind: Option<CounterpartyKind>,
    pub contact_person: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub tax_id: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl CounterpartyChanges {
    pub fn apply(&self, counterparty: &mut Counterparty) {
        if let Some(name) = &self.name {
            counterparty.name = name.clone();
        }
        if let Some(kind) = self.kind {
            counterparty.kind = kind;
        }
        if let Some(contact_person) = &self.contact_person {
            counterparty.contact_person = contact_person.clone();
        }
        if let Some(phone) = &self.phone {
            counterparty.phone = phone.clone();
        }
        if let Some(email) = &self.email {
            counterparty.email = email.clone();
        }
        if let Some(address) = &self.address {
            counterparty.address = address.clone();
        }
        if let Some(tax_id) = &self.tax_id {
            counterparty.tax_id = tax_id.clone();
        }
        if let Some(notes) = &self.notes {
            counterparty.notes = notes.clone();
        }
    }
}

/// Filters for listing counterparties
#[derive(Debug, Clone, Default)]
pub struct CounterpartyFilter {
    pub kind: Option<CounterpartyKind>,
    pub search: Option<String>,
    pub limit: u64,
    pub offset: u64,
}
