//! SQLite-backed lead store.

use super::{ExperienceTier, Lead, LeadError, LeadStore, StoredLead};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

pub struct SqliteLeadStore {
    pool: SqlitePool,
}

impl SqliteLeadStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteLeadStore { pool }
    }
}

#[async_trait]
impl LeadStore for SqliteLeadStore {
    async fn insert(&self, lead: &Lead) -> Result<StoredLead, LeadError> {
        let stored = StoredLead::new(lead.clone());
        sqlx::query(
            r#"
            INSERT INTO leads (id, name, phonenumber, level, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(stored.id.to_string())
        .bind(lead.name.as_str())
        .bind(lead.phone.as_str())
        .bind(lead.level.as_str())
        .bind(stored.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        info!("Stored lead {} ({})", stored.id, lead.level.as_str());
        Ok(stored)
    }

    /// Rows that fail to decode are reported as storage errors.
    async fn list(&self) -> Result<Vec<StoredLead>, LeadError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, phonenumber, level, created_at
            FROM leads
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.get("id");
                let created_ms: i64 = row.get("created_at");
                let level: String = row.get("level");
                Ok(StoredLead {
                    id: Uuid::parse_str(&id)
                        .map_err(|e| LeadError::Storage(format!("invalid id {}: {}", id, e)))?,
                    created_at: Utc
                        .timestamp_millis_opt(created_ms)
                        .single()
                        .ok_or_else(|| {
                            LeadError::Storage(format!("invalid created_at {}", created_ms))
                        })?,
                    lead: Lead {
                        name: row.get("name"),
                        phone: row.get("phonenumber"),
                        level: ExperienceTier::from_str(&level)?,
                    },
                })
            })
            .collect()
    }
}
