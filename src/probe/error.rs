use thiserror::Error;

use crate::mx;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("address has no domain part")]
    MissingDomain,
    #[error(transparent)]
    Mx(#[from] mx::Error),
    #[error("no mail exchange hosts for the domain")]
    NoMailHosts,
    #[error("connection to {host}:{port} failed: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("probe exceeded the {budget_ms} ms session deadline")]
    Timeout { budget_ms: u64 },
}

impl ProbeError {
    pub(crate) fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
