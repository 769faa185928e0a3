use serde::Deserialize;

/// Deployment environment, selects the log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

const fn default_max_connections() -> u32 {
    10
}

/// Settings read from the process environment (and `.env` if present).
///
/// | variable                   | default       |
/// |----------------------------|---------------|
/// | `DATABASE_URL`             | required      |
/// | `DATABASE_MAX_CONNECTIONS` | `10`          |
/// | `ENV`                      | `development` |
#[derive(Debug, Clone, Deserialize)]
pub struct LingoConfig {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    #[serde(default)]
    pub env: Environment,
}

impl LingoConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
