use anyhow::Context;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    pub uri: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Postgres `synchronous_commit` level applied to every write.
    #[serde(default = "default_synchronous_commit")]
    pub synchronous_commit: String,
}

impl DatabaseSection {
    fn from_uri(uri: String) -> Self {
        Self {
            uri,
            max_connections: default_max_connections(),
            synchronous_commit: default_synchronous_commit(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_synchronous_commit() -> String {
    "on".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    /// Without a database the service keeps readings in memory.
    pub database: Option<DatabaseSection>,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("READINGS_CONFIG").unwrap_or_else(|_| "readings-config.toml".to_string());
        let contents = fs::read_to_string(&path).with_context(|| format!("reading config file {path}"))?;
        let cfg = Self::from_toml_str(&contents)?;
        Ok(cfg.with_database_url(env::var("DATABASE_URL").ok()))
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// `DATABASE_URL` wins over the configured uri, and enables the database if none is configured.
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if let Some(uri) = database_url {
            match self.database.as_mut() {
                Some(db) => db.uri = uri,
                None => self.database = Some(DatabaseSection::from_uri(uri)),
            }
        }
        self
    }
}
