use thiserror::Error;

/// Main error type for query-stash
#[derive(Error, Debug)]
pub enum StashError {
    #[error("query returned no results")]
    EmptyResult,

    #[error("you need to specify a connection")]
    AmbiguousConnection,

    #[error("unknown connection: {name}")]
    UnknownConnection { name: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("file I/O error: {path}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StashError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a database error
    pub fn database(operation: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Database {
            operation: operation.into(),
            source,
        }
    }

    /// Create a file I/O error
    pub fn file_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            StashError::EmptyResult => "Query returned no results".to_string(),
            StashError::AmbiguousConnection => {
                "You need to specify a connection with --connection".to_string()
            }
            StashError::UnknownConnection { name } => {
                format!("No connection named '{name}' in the config file")
            }
            StashError::Config { message } => format!("Config problem: {message}"),
            StashError::Database { operation, .. } => {
                format!("Database error during {operation}. Check the logs for details.")
            }
            StashError::FileIo { path, .. } => {
                format!("File access error for {path}. Check file permissions.")
            }
        }
    }
}

/// Result type alias for convenience
pub type StashResult<T> = Result<T, StashError>;
