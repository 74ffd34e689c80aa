use thiserror::Error;

/// The single error surfaced by every API module. Only two kinds come from
/// the wire: a transport failure with no response, and an application error
/// carried by a non-2xx response. `Decode` and `Storage` cover the client's
/// own failure points under the same one-message contract.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Server unreachable: {0}")]
    Network(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response from server: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// HTTP status of an application error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend rejected the credentials or token.
    pub fn is_auth(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}
