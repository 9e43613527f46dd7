/// Server configuration for the shop service
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/petcare | working directory (database files, logs) |
/// | DB_NAMESPACE | petcare | SurrealDB namespace |
/// | DB_NAME | shop | SurrealDB database name |
/// | ENVIRONMENT | development | runtime environment |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database files and logs
    pub work_dir: String,
    /// SurrealDB namespace
    pub db_namespace: String,
    /// SurrealDB database name
    pub db_name: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/petcare".into()),
            db_namespace: std::env::var("DB_NAMESPACE").unwrap_or_else(|_| "petcare".into()),
            db_name: std::env::var("DB_NAME").unwrap_or_else(|_| "shop".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the working directory; the usual entry point for tests.
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
