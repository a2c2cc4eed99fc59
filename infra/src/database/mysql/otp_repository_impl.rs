//! MySQL implementation of the OtpRepository trait.
//!
//! One row per (transport, target) in table `otps`; the unique key enforces
//! the single live record per key. Targets are stored normalized per transport.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySql, MySqlPool, QueryBuilder, Row};

use otp_core::domain::entities::otp_record::{OtpRecord, OtpRecordPatch, OtpTransport};
use otp_core::errors::DomainError;
use otp_core::repositories::OtpRepository;
use otp_shared::utils::mask_target;

use crate::InfrastructureError;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS otps (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        transport VARCHAR(16) NOT NULL,
        target VARCHAR(320) NOT NULL,
        code VARCHAR(64) NOT NULL,
        last_sent_at DATETIME(3) NOT NULL,
        attempt INT UNSIGNED NOT NULL DEFAULT 0,
        retries INT UNSIGNED NOT NULL DEFAULT 0,
        blocked BOOLEAN NOT NULL DEFAULT FALSE,
        last_code_verified BOOLEAN NOT NULL DEFAULT FALSE,
        created_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
        updated_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3) ON UPDATE CURRENT_TIMESTAMP(3),
        UNIQUE KEY uq_otps_transport_target (transport, target)
    )
"#;

/// MySQL implementation of OtpRepository
#[derive(Clone)]
pub struct MySqlOtpRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpRepository {
    /// Create a new MySQL OTP repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the `otps` table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), InfrastructureError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        tracing::info!("OTP table schema ensured");
        Ok(())
    }

    /// Convert database row to OtpRecord entity
    fn row_to_record(row: &MySqlRow) -> Result<OtpRecord, DomainError> {
        let transport: String = row.try_get("transport").map_err(column_error("transport"))?;

        Ok(OtpRecord {
            transport: transport
                .parse::<OtpTransport>()
                .map_err(|message| DomainError::Internal { message })?,
            target: row.try_get("target").map_err(column_error("target"))?,
            code: row.try_get("code").map_err(column_error("code"))?,
            last_sent_at: row
                .try_get::<DateTime<Utc>, _>("last_sent_at")
                .map_err(column_error("last_sent_at"))?,
            attempt: row.try_get("attempt").map_err(column_error("attempt"))?,
            retries: row.try_get("retries").map_err(column_error("retries"))?,
            blocked: row.try_get("blocked").map_err(column_error("blocked"))?,
            last_code_verified: row
                .try_get("last_code_verified")
                .map_err(column_error("last_code_verified"))?,
        })
    }
}

fn column_error(column: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Internal {
        message: format!("Failed to get {}: {}", column, e),
    }
}

fn query_error<'a>(
    action: &'static str,
    target: &'a str,
) -> impl FnOnce(sqlx::Error) -> DomainError + 'a {
    move |e| {
        tracing::error!(
            recipient = %mask_target(target),
            error = %e,
            "Failed to {} OTP record",
            action
        );
        DomainError::Internal {
            message: format!("Failed to {} OTP record: {}", action, e),
        }
    }
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn find(
        &self,
        transport: OtpTransport,
        target: &str,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let target = OtpRecord::normalize_target(transport, target);
        let query = r#"
            SELECT transport, target, code, last_sent_at, attempt, retries,
                   blocked, last_code_verified
            FROM otps
            WHERE transport = ? AND target = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(transport.as_str())
            .bind(&target)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("find", &target))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn create(&self, mut record: OtpRecord) -> Result<OtpRecord, DomainError> {
        record.target = OtpRecord::normalize_target(record.transport, &record.target);
        let query = r#"
            INSERT INTO otps (
                transport, target, code, last_sent_at, attempt, retries,
                blocked, last_code_verified
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(record.transport.as_str())
            .bind(&record.target)
            .bind(&record.code)
            .bind(record.last_sent_at)
            .bind(record.attempt)
            .bind(record.retries)
            .bind(record.blocked)
            .bind(record.last_code_verified)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(record),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DomainError::BusinessRule {
                    message: format!(
                        "OTP record for {} {} already exists",
                        record.transport, record.target
                    ),
                })
            }
            Err(e) => Err(query_error("create", &record.target)(e)),
        }
    }

    async fn update(
        &self,
        transport: OtpTransport,
        target: &str,
        patch: OtpRecordPatch,
    ) -> Result<OtpRecord, DomainError> {
        let target = OtpRecord::normalize_target(transport, target);

        if !patch.is_empty() {
            let mut builder = QueryBuilder::<MySql>::new("UPDATE otps SET ");
            let mut fields = builder.separated(", ");
            if let Some(code) = patch.code {
                fields.push("code = ");
                fields.push_bind_unseparated(code);
            }
            if let Some(last_sent_at) = patch.last_sent_at {
                fields.push("last_sent_at = ");
                fields.push_bind_unseparated(last_sent_at);
            }
            if let Some(attempt) = patch.attempt {
                fields.push("attempt = ");
                fields.push_bind_unseparated(attempt);
            }
            if let Some(retries) = patch.retries {
                fields.push("retries = ");
                fields.push_bind_unseparated(retries);
            }
            if let Some(blocked) = patch.blocked {
                fields.push("blocked = ");
                fields.push_bind_unseparated(blocked);
            }
            if let Some(last_code_verified) = patch.last_code_verified {
                fields.push("last_code_verified = ");
                fields.push_bind_unseparated(last_code_verified);
            }
            builder
                .push(" WHERE transport = ")
                .push_bind(transport.as_str())
                .push(" AND target = ")
                .push_bind(target.as_str());

            // MySQL reports unchanged rows as unaffected, so existence is
            // checked by the re-read below
            builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(query_error("update", &target))?;
        }

        self.find(transport, &target)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "OtpRecord".to_string(),
            })
    }
}
