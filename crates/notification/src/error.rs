use std::io;

use lettre::transport::smtp;
use thiserror::Error;

/// Why a relay delivery did not complete
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Timed out talking to relay: {0}")]
    ConnectTimeout(#[source] smtp::Error),

    #[error("Failed to connect to relay: {0}")]
    Connect(#[source] smtp::Error),

    #[error("TLS negotiation with relay failed: {0}")]
    Tls(#[source] smtp::Error),

    #[error("Relay rejected credentials: {0}")]
    AuthRejected(#[source] smtp::Error),

    #[error("Relay rejected message: {0}")]
    Protocol(#[source] smtp::Error),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
}

impl DeliveryError {
    /// Classify a failure that happened while opening the session
    pub(crate) fn connect(err: smtp::Error) -> Self {
        if is_timeout(&err) {
            Self::ConnectTimeout(err)
        } else {
            Self::Connect(err)
        }
    }

    /// Short machine-readable label, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectTimeout(_) => "connect_timeout",
            Self::Connect(_) => "connect",
            Self::Tls(_) => "tls",
            Self::AuthRejected(_) => "auth_rejected",
            Self::Protocol(_) => "protocol",
            Self::Message(_) => "message",
        }
    }
}

// Socket read timeouts surface as WouldBlock on unix and TimedOut elsewhere.
fn is_timeout(err: &smtp::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io_err) = inner.downcast_ref::<io::Error>() {
            return matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            );
        }
        source = inner.source();
    }

    false
}
