use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{StashError, StashResult};

pub const DEFAULT_CONFIG_PATH: &str = "~/.query-stash.toml";

/// The `~/.query-stash.toml` config file: one `[connections.NAME]` table per
/// configured database connection.
#[derive(Debug, Clone, Deserialize)]
pub struct StashConfig {
    pub connections: IndexMap<String, ConnectionConfig>,
}

/// One configured connection, tagged by its `type` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectionConfig {
    Postgres {
        host: String,
        port: u16,
        user: String,
        password: String,
        dbname: String,
    },
    Mysql {
        host: String,
        port: u16,
        user: String,
        password: String,
        dbname: String,
    },
    Sqlite {
        path: PathBuf,
    },
}

impl ConnectionConfig {
    pub fn type_name(&self) -> &'static str {
        match self {
            ConnectionConfig::Postgres { .. } => "postgres",
            ConnectionConfig::Mysql { .. } => "mysql",
            ConnectionConfig::Sqlite { .. } => "sqlite",
        }
    }
}

impl StashConfig {
    /// Load the config file, falling back to `~/.query-stash.toml` when no
    /// explicit path was given.
    pub fn load(path: Option<&Path>) -> StashResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => expand_home(DEFAULT_CONFIG_PATH),
        };
        let content = std::fs::read_to_string(&path)
            .map_err(|e| StashError::file_io(path.display().to_string(), e))?;
        toml::from_str(&content)
            .map_err(|e| StashError::config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Pick the connection to use: an explicitly named one wins, a sole
    /// configured connection is used implicitly, anything else is ambiguous.
    pub fn connection(&self, name: Option<&str>) -> StashResult<(&str, &ConnectionConfig)> {
        match name {
            Some(name) => self
                .connections
                .get_key_value(name)
                .map(|(key, conn)| (key.as_str(), conn))
                .ok_or_else(|| StashError::UnknownConnection {
                    name: name.to_string(),
                }),
            None if self.connections.len() == 1 => {
                let (key, conn) = self
                    .connections
                    .first()
                    .ok_or_else(|| StashError::config("no connections configured"))?;
                Ok((key.as_str(), conn))
            }
            None => Err(StashError::AmbiguousConnection),
        }
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SINGLE_CONNECTION: &str = r#"
[connections.dbt-postgres]
type = "postgres"
host = "localhost"
port = 5432
user = "postgres"
password = "postgres"
dbname = "jaffle_shop"
"#;

    const TWO_CONNECTIONS: &str = r#"
[connections.dbt-postgres]
type = "postgres"
host = "localhost"
port = 5432
user = "postgres"
password = "postgres"
dbname = "jaffle_shop"

[connections.local-analytics]
type = "sqlite"
path = "/tmp/analytics.db"
"#;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("query-stash.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_takes_an_explicit_config_path() {
        let (_dir, path) = write_config(SINGLE_CONNECTION);
        let config = StashConfig::load(Some(&path)).unwrap();
        assert_eq!(1, config.connections.len());
        let conn = &config.connections["dbt-postgres"];
        assert_eq!("postgres", conn.type_name());
        match conn {
            ConnectionConfig::Postgres {
                host, port, dbname, ..
            } => {
                assert_eq!("localhost", host);
                assert_eq!(5432, *port);
                assert_eq!("jaffle_shop", dbname);
            }
            other => panic!("unexpected connection: {other:?}"),
        }
    }

    #[test]
    fn test_connection_by_name() {
        let (_dir, path) = write_config(TWO_CONNECTIONS);
        let config = StashConfig::load(Some(&path)).unwrap();
        let (name, conn) = config.connection(Some("local-analytics")).unwrap();
        assert_eq!("local-analytics", name);
        assert_eq!("sqlite", conn.type_name());
    }

    #[test]
    fn test_sole_connection_is_used_when_none_named() {
        let (_dir, path) = write_config(SINGLE_CONNECTION);
        let config = StashConfig::load(Some(&path)).unwrap();
        let (name, _) = config.connection(None).unwrap();
        assert_eq!("dbt-postgres", name);
    }

    #[test]
    fn test_multiple_connections_and_none_named_is_ambiguous() {
        let (_dir, path) = write_config(TWO_CONNECTIONS);
        let config = StashConfig::load(Some(&path)).unwrap();
        assert!(matches!(
            config.connection(None),
            Err(StashError::AmbiguousConnection)
        ));
    }

    #[test]
    fn test_unknown_connection_name_is_an_error() {
        let (_dir, path) = write_config(SINGLE_CONNECTION);
        let config = StashConfig::load(Some(&path)).unwrap();
        assert!(matches!(
            config.connection(Some("nope")),
            Err(StashError::UnknownConnection { .. })
        ));
    }

    #[test]
    fn test_missing_config_file_is_a_file_error() {
        let missing = Path::new("/definitely/not/here/query-stash.toml");
        assert!(matches!(
            StashConfig::load(Some(missing)),
            Err(StashError::FileIo { .. })
        ));
    }
}
