use std::fmt::{Display, Formatter};

/// errors raised by a [`crate::remote::RemoteStore`].
///
/// the first three are transient and get retried by [`crate::remote::Pacing`], the rest are permanent
/// and cause the walker to skip the folder or file they came from
#[derive(PartialEq, Debug, Clone)]
pub enum RemoteError {
    /// the remote store asked us to slow down
    RateLimited,
    /// the call did not complete in time
    Timeout,
    /// any other failure that is expected to go away on its own (dropped connection, 5xx, etc)
    Transient(String),
    /// the folder or file no longer exists
    NotFound(String),
    /// the configured credentials cannot see the folder or file
    PermissionDenied(String),
    /// anything else that will not go away by retrying
    Other(String),
}

impl RemoteError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Timeout | Self::Transient(_))
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate limited"),
            Self::Timeout => write!(f, "timed out"),
            Self::Transient(message) => write!(f, "transient failure: {message}"),
            Self::NotFound(id) => write!(f, "{id} not found"),
            Self::PermissionDenied(id) => write!(f, "permission denied for {id}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}
