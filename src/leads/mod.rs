//! Lead capture: validation and the storage interface.
//!
//! Storage is best-effort from the caller's point of view; see
//! [`crate::api::leads`] for how failures are surfaced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

pub mod sqlite;

pub use sqlite::SqliteLeadStore;

const PHONE_PREFIX: &str = "+49";
const MIN_PHONE_DIGITS: usize = 6;

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("invalid lead: {0}")]
    Invalid(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for LeadError {
    fn from(err: sqlx::Error) -> Self {
        LeadError::Storage(err.to_string())
    }
}

/// Self-reported trading experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceTier {
    /// Under 10k portfolio.
    Retail,
    /// Over 50k portfolio.
    Pro,
    Institutional,
}

impl ExperienceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceTier::Retail => "retail",
            ExperienceTier::Pro => "pro",
            ExperienceTier::Institutional => "institutional",
        }
    }
}

impl FromStr for ExperienceTier {
    type Err = LeadError;

    /// Accepts the tier name or the longer form labels ("Pro Trader (> 50k Portfolio)").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower.starts_with("retail") {
            Ok(ExperienceTier::Retail)
        } else if lower.starts_with("pro") {
            Ok(ExperienceTier::Pro)
        } else if lower.starts_with("institutional") || lower.contains("quant") {
            Ok(ExperienceTier::Institutional)
        } else {
            Err(LeadError::Invalid(format!("unknown experience level: {}", s)))
        }
    }
}

/// A captured lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    pub level: ExperienceTier,
}

impl Lead {
    /// Build a lead from form input, trimming and validating it.
    pub fn new(name: &str, phone: &str, level: ExperienceTier) -> Result<Self, LeadError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeadError::Invalid("name is required".to_string()));
        }
        let phone = normalize_phone(phone)?;
        Ok(Lead {
            name: name.to_string(),
            phone,
            level,
        })
    }
}

/// Require a `+49` number and strip spaces, dashes and slashes.
fn normalize_phone(phone: &str) -> Result<String, LeadError> {
    let compact: String = phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '/'))
        .collect();
    let Some(rest) = compact.strip_prefix(PHONE_PREFIX) else {
        return Err(LeadError::Invalid(format!(
            "phone number must start with {}",
            PHONE_PREFIX
        )));
    };
    if rest.len() < MIN_PHONE_DIGITS || !rest.chars().all(|c| c.is_ascii_digit()) {
        return Err(LeadError::Invalid(format!(
            "phone number needs at least {} digits after {}",
            MIN_PHONE_DIGITS, PHONE_PREFIX
        )));
    }
    Ok(compact)
}

/// A lead as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLead {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub lead: Lead,
}

impl StoredLead {
    pub fn new(lead: Lead) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            lead,
        }
    }
}

/// Lead store: persists a record or reports failure.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn insert(&self, lead: &Lead) -> Result<StoredLead, LeadError>;

    /// Stored leads, oldest first.
    async fn list(&self) -> Result<Vec<StoredLead>, LeadError>;
}

/// In-memory store, optionally failing every insert.
#[derive(Debug, Default)]
pub struct MemoryLeadStore {
    leads: Mutex<Vec<StoredLead>>,
    fail: bool,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose inserts always fail.
    pub fn failing() -> Self {
        Self {
            leads: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn leads(&self) -> Vec<StoredLead> {
        self.leads
            .lock()
            .map(|leads| leads.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn insert(&self, lead: &Lead) -> Result<StoredLead, LeadError> {
        if self.fail {
            return Err(LeadError::Storage("store unavailable".to_string()));
        }
        let stored = StoredLead::new(lead.clone());
        self.leads
            .lock()
            .map_err(|_| LeadError::Storage("lock poisoned".to_string()))?
            .push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<StoredLead>, LeadError> {
        if self.fail {
            return Err(LeadError::Storage("store unavailable".to_string()));
        }
        Ok(self.leads())
    }
}
