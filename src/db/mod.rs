pub mod memory;
pub mod models;
pub mod postgres;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use self::{
    memory::MemoryStore,
    models::{NewPreferences, NewReading, Preferences, SensorReading},
    postgres::PgStore,
};
use crate::error::ControlResult;

pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Storage for the reading log and the preference singleton.
///
/// Constructed once at startup and handed to the services that need it.
#[derive(Clone)]
pub enum Store {
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Self::Postgres(PgStore::new(pool))
    }

    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub async fn latest_reading(&self) -> ControlResult<Option<SensorReading>> {
        match self {
            Self::Postgres(pg) => Ok(pg.latest_reading().await?),
            Self::Memory(mem) => Ok(mem.latest_reading().await),
        }
    }

    pub async fn append_reading(&self, reading: NewReading) -> ControlResult<SensorReading> {
        match self {
            Self::Postgres(pg) => Ok(pg.append_reading(reading).await?),
            Self::Memory(mem) => Ok(mem.append_reading(reading).await),
        }
    }

    pub async fn recent_readings(&self, limit: Option<u32>) -> ControlResult<Vec<SensorReading>> {
        match self {
            Self::Postgres(pg) => Ok(pg.recent_readings(limit).await?),
            Self::Memory(mem) => Ok(mem.recent_readings(limit).await),
        }
    }

    pub async fn preferences(&self) -> ControlResult<Option<Preferences>> {
        match self {
            Self::Postgres(pg) => Ok(pg.preferences().await?),
            Self::Memory(mem) => Ok(mem.preferences().await),
        }
    }

    /// Update the singleton if present, otherwise create it. Returns the
    /// stored record and whether it was created.
    pub async fn upsert_preferences(
        &self,
        prefs: NewPreferences,
    ) -> ControlResult<(Preferences, bool)> {
        match self {
            Self::Postgres(pg) => Ok(pg.upsert_preferences(prefs).await?),
            Self::Memory(mem) => Ok(mem.upsert_preferences(prefs).await),
        }
    }
}
