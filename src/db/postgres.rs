use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::models::{NewPreferences, NewReading, Preferences, SensorReading};

#[derive(FromRow)]
struct UpsertedPreferences {
    #[sqlx(flatten)]
    preferences: Preferences,
    inserted: bool,
}

/// Postgres storage backend. Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn latest_reading(&self) -> sqlx::Result<Option<SensorReading>> {
        sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT id, temperature, presence, recorded_at
            FROM sensor_readings
            ORDER BY seq DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn append_reading(&self, reading: NewReading) -> sqlx::Result<SensorReading> {
        sqlx::query_as::<_, SensorReading>(
            r#"
            INSERT INTO sensor_readings (id, temperature, presence, recorded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, temperature, presence, recorded_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reading.temperature)
        .bind(reading.presence)
        .bind(reading.recorded_at)
        .fetch_one(&self.pool)
        .await
    }

    /// Up to `limit` of the newest readings, oldest first. `None` = all.
    pub async fn recent_readings(&self, limit: Option<u32>) -> sqlx::Result<Vec<SensorReading>> {
        sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT id, temperature, presence, recorded_at
            FROM (
                SELECT seq, id, temperature, presence, recorded_at
                FROM sensor_readings
                ORDER BY seq DESC
                LIMIT $1
            ) newest
            ORDER BY seq ASC
            "#,
        )
        .bind(limit.map(i64::from))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn preferences(&self) -> sqlx::Result<Option<Preferences>> {
        sqlx::query_as::<_, Preferences>(
            r#"
            SELECT target_temperature, light_start, light_end, updated_at
            FROM preferences
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }

    /// Single-statement upsert on the fixed key. `xmax = 0` only holds for a
    /// freshly inserted tuple, which tells creation apart from update.
    pub async fn upsert_preferences(
        &self,
        prefs: NewPreferences,
    ) -> sqlx::Result<(Preferences, bool)> {
        let row = sqlx::query_as::<_, UpsertedPreferences>(
            r#"
            INSERT INTO preferences (id, target_temperature, light_start, light_end, updated_at)
            VALUES (1, $1, $2, $3, now())
            ON CONFLICT (id) DO UPDATE
               SET target_temperature = EXCLUDED.target_temperature,
                   light_start        = EXCLUDED.light_start,
                   light_end          = EXCLUDED.light_end,
                   updated_at         = EXCLUDED.updated_at
            RETURNING target_temperature, light_start, light_end, updated_at,
                      (xmax = 0) AS inserted
            "#,
        )
        .bind(prefs.target_temperature)
        .bind(prefs.light_start)
        .bind(prefs.light_end)
        .fetch_one(&self.pool)
        .await?;

        Ok((row.preferences, row.inserted))
    }
}
