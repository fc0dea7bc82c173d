use snowline_core::config::{AppConfig, ConfigError, LoadOptions};
use snowline_db::{connect_with_settings, migrations, DbPool, DemoSeason, FactStoreError};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("demo fixture seeding failed: {0}")]
    Seed(#[source] FactStoreError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(event_name = "system.bootstrap.database_connected", "database connection established");

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    if config.fixtures.seed_demo_data {
        if DemoSeason::fact_tables_empty(&db_pool).await.map_err(BootstrapError::Seed)? {
            let summary = DemoSeason::load(&db_pool).await.map_err(BootstrapError::Seed)?;
            info!(
                event_name = "system.bootstrap.fixtures_seeded",
                charge_lines = summary.charge_lines,
                occupancy_rows = summary.occupancy_rows,
                marketing_rows = summary.marketing_rows,
                guest_profiles = summary.guest_profiles,
                "demo season fixtures seeded"
            );
        } else {
            info!(
                event_name = "system.bootstrap.fixtures_skipped",
                "fact tables already populated, skipping demo seed"
            );
        }
    }

    Ok(Application { config, db_pool })
}

#[cfg(test)]
mod tests {
    use snowline_core::config::{ConfigOverrides, LoadOptions};

    use super::bootstrap;

    fn memory_options(seed: bool) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                seed_demo_data: Some(seed),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_creates_fact_tables() {
        let app = bootstrap(memory_options(false)).await.expect("bootstrap should succeed");

        let table_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
             ('booking_charges', 'daily_occupancy', 'marketing_performance', 'guest_profiles')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("fact tables should exist after bootstrap");
        assert_eq!(table_count, 4);

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn bootstrap_seeds_demo_data_once_when_enabled() {
        let app = bootstrap(memory_options(true)).await.expect("bootstrap should succeed");

        let charges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM booking_charges")
            .fetch_one(&app.db_pool)
            .await
            .expect("count");
        assert!(charges > 0, "seed should populate the charge table");

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn bootstrap_rejects_invalid_configuration() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("postgres://localhost/facts".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("database.url"));
    }
}
