use thiserror::Error;

/// A connection field that must be filled in before talking to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigMissing {
    #[error("Introduce la URL de la API")]
    EndpointUrl,
    #[error("Introduce la API key")]
    ApiKey,
}

/// Failure of a single request against the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection, ...).
    #[error("{0}")]
    Transport(String),
    /// Non-2xx response. `message` is the server's detail string when the body
    /// carried one, otherwise a generic status message.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// 2xx response whose body was not what the contract promises.
    #[error("Respuesta inválida: {0}")]
    Decode(String),
    #[error("URL inválida: {0}")]
    InvalidUrl(String),
    #[error("El ID de la nota está vacío")]
    EmptyId,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    ConfigMissing(#[from] ConfigMissing),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("cancelado por el usuario")]
    UserDeclined,
}
