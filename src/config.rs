use serde::{Deserialize, Serialize};

/// Connection settings for the bundled Bolt executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnectionSettings {
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            database: "neo4j".to_string(),
        }
    }

    #[must_use]
    pub fn with_database(
        mut self,
        database: impl Into<String>,
    ) -> Self {
        self.database = database.into();
        self
    }

    /// Reads settings from the environment (`NEO4J_URI`, `NEO4J_USER`,
    /// `NEO4J_PASSWORD`, `NEO4J_DATABASE`), falling back to local defaults
    /// for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            uri: std::env::var("NEO4J_URI").unwrap_or_else(|_| "127.0.0.1:7687".to_string()),
            user: std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
            password: std::env::var("NEO4J_PASSWORD").unwrap_or_default(),
            database: std::env::var("NEO4J_DATABASE").unwrap_or_else(|_| "neo4j".to_string()),
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::new("127.0.0.1:7687", "neo4j", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_database() {
        let settings = ConnectionSettings::new("10.0.0.5:7687", "neo4j", "secret");
        assert_eq!(settings.database, "neo4j");
        assert_eq!(settings.uri, "10.0.0.5:7687");
    }

    #[test]
    fn test_settings_with_database() {
        let settings = ConnectionSettings::new("127.0.0.1:7687", "neo4j", "").with_database("reports");
        assert_eq!(settings.database, "reports");
    }

    #[test]
    fn test_settings_round_trip_json() {
        let settings = ConnectionSettings::new("127.0.0.1:7687", "neo4j", "pw");
        let json = serde_json::to_string(&settings).unwrap();
        let back: ConnectionSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.uri, settings.uri);
        assert_eq!(back.password, "pw");
    }
}
