//! Repository for the `settings` key/value table.

use std::collections::HashMap;

use sqlx::PgPool;

/// Provides reads and upserts of application settings.
pub struct SettingRepo;

impl SettingRepo {
    /// Load only the given keys. Missing keys are absent from the map.
    pub async fn load_keys(
        pool: &PgPool,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, sqlx::Error> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, value FROM settings WHERE key = ANY($1)")
                .bind(&keys)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().collect())
    }

    /// Insert or update several settings in one transaction.
    pub async fn upsert_many(pool: &PgPool, pairs: &[(&str, String)]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (key, value) in pairs {
            sqlx::query(
                "INSERT INTO settings (key, value) VALUES ($1, $2) \
                 ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        tracing::debug!(count = pairs.len(), "Settings upserted");
        Ok(())
    }
}
