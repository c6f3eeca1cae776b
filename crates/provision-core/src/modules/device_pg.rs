//! PostgreSQL implementation of the device repository.

use async_trait::async_trait;
use provision_types::{DeviceRecord, DeviceRules, SipAccount};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;

use crate::modules::repository::{validate_device, DeviceRepository, RepoResult, RepositoryError};

const DEVICE_COLUMNS: &str = r#"id, status, "key", token, mac, vendor, model, timezone,
    ntp_server, accounts, rules, created_at, updated_at"#;

/// PostgreSQL-backed device repository.
pub struct PostgresDeviceRepository {
    pool: PgPool,
}

impl PostgresDeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Connect to database and create repository.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(300))
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn run_migrations(&self) -> RepoResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| RepositoryError::Database(err.to_string()))
    }
}

#[async_trait]
impl DeviceRepository for PostgresDeviceRepository {
    async fn find_by_key(&self, key: &str) -> RepoResult<Option<DeviceRecord>> {
        let sql = format!(r#"SELECT {} FROM devices WHERE "key" = $1 LIMIT 1"#, DEVICE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        row.as_ref().map(row_to_device).transpose()
    }

    async fn find_by_token(&self, token: &str, mac: &str) -> RepoResult<Option<DeviceRecord>> {
        let sql = format!(
            "SELECT {} FROM devices WHERE token = $1 AND mac = $2 LIMIT 1",
            DEVICE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(token)
            .bind(mac)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        row.as_ref().map(row_to_device).transpose()
    }

    async fn upsert_device(&self, device: DeviceRecord) -> RepoResult<DeviceRecord> {
        validate_device(&device)?;
        let accounts = serde_json::to_value(&device.accounts)
            .map_err(|err| RepositoryError::Serialization(err.to_string()))?;
        let rules = device
            .rules
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|err| RepositoryError::Serialization(err.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO devices (id, status, "key", token, mac, vendor, model, timezone,
                                 ntp_server, accounts, rules, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, COALESCE($12, NOW()), $13)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                "key" = EXCLUDED."key",
                token = EXCLUDED.token,
                mac = EXCLUDED.mac,
                vendor = EXCLUDED.vendor,
                model = EXCLUDED.model,
                timezone = EXCLUDED.timezone,
                ntp_server = EXCLUDED.ntp_server,
                accounts = EXCLUDED.accounts,
                rules = EXCLUDED.rules,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&device.id)
        .bind(device.status)
        .bind(&device.key)
        .bind(&device.token)
        .bind(&device.mac)
        .bind(&device.vendor)
        .bind(&device.model)
        .bind(&device.timezone)
        .bind(&device.ntp_server)
        .bind(accounts)
        .bind(rules)
        .bind(device.created_at)
        .bind(device.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(device)
    }

    async fn list_devices(&self) -> RepoResult<Vec<DeviceRecord>> {
        let sql = format!("SELECT {} FROM devices ORDER BY id", DEVICE_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await.map_err(map_sqlx_err)?;
        rows.iter().map(row_to_device).collect()
    }
}

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(err.to_string())
}

fn row_to_device(row: &PgRow) -> RepoResult<DeviceRecord> {
    let accounts_json: serde_json::Value = row.get("accounts");
    let accounts: Vec<SipAccount> = serde_json::from_value(accounts_json)
        .map_err(|err| RepositoryError::Serialization(err.to_string()))?;

    let rules_json: Option<serde_json::Value> = row.get("rules");
    let rules: Option<DeviceRules> = rules_json
        .filter(|v| !v.is_null())
        .map(serde_json::from_value)
        .transpose()
        .map_err(|err| RepositoryError::Serialization(err.to_string()))?;

    Ok(DeviceRecord {
        id: row.get("id"),
        status: row.get("status"),
        key: row.get("key"),
        token: row.get("token"),
        mac: row.get("mac"),
        vendor: row.get("vendor"),
        model: row.get("model"),
        timezone: row.get("timezone"),
        ntp_server: row.get("ntp_server"),
        accounts,
        rules,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
