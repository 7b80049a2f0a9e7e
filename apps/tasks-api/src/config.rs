use core_config::{AppInfo, FromEnv, app_info, env_parse, env_parse_optional, server::ServerConfig};
use database::common::RetryConfig;
use database::postgres::PostgresConfig;
use domain_tasks::TaskSettings;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `core_config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub retry: RetryConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub tasks: TaskSettings,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let retry = RetryConfig::from_env()?;
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=3000
        let tasks = TaskSettings {
            max_per_page: env_parse_optional("TASKS_MAX_PER_PAGE")?,
        };
        let run_migrations = env_parse("RUN_MIGRATIONS", "true")?;

        Ok(Self {
            app: app_info!(),
            database,
            retry,
            server,
            environment,
            tasks,
            run_migrations,
        })
    }
}
