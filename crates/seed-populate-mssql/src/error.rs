//! Error types for the SQL Server sink.

use seed_populate::SinkError;
use thiserror::Error;

/// SQL Server error code for "Invalid object name".
pub const INVALID_OBJECT_NAME: u32 = 208;

/// Errors raised while talking to SQL Server.
#[derive(Error, Debug)]
pub enum MssqlSinkError {
    /// Driver or server error.
    #[error("SQL Server error: {0}")]
    Tiberius(#[from] tiberius::error::Error),

    /// Socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was already closed.
    #[error("Connection is closed")]
    Closed,

    /// A result column has a type the seeded tables never use.
    #[error("Unsupported column type: {0}")]
    UnsupportedColumn(String),
}

impl MssqlSinkError {
    /// Server error code, if the server rejected the statement.
    pub fn server_code(&self) -> Option<u32> {
        match self {
            Self::Tiberius(tiberius::error::Error::Server(token)) => Some(token.code()),
            _ => None,
        }
    }

    /// Whether the connection itself is unusable.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::Closed
                | Self::Tiberius(tiberius::error::Error::Io { .. })
                | Self::Tiberius(tiberius::error::Error::Routing { .. })
        )
    }
}

impl From<MssqlSinkError> for SinkError {
    fn from(e: MssqlSinkError) -> Self {
        if e.is_connection() {
            SinkError::Connection(e.to_string())
        } else {
            SinkError::Statement(e.to_string())
        }
    }
}
