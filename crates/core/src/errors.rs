use thiserror::Error;

/// Validation failures detected before any fact store query is issued.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown dimension `{dimension}` for domain `{domain}`")]
    InvalidDimension { domain: String, dimension: String },
    #[error("invalid date range: {0}")]
    InvalidRange(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("fact store failure: {0}")]
    FactStore(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String },
}

impl InterfaceError {
    /// Message safe to return to the caller. Validation errors echo the
    /// specific problem; infrastructure failures stay generic.
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message } => message.clone(),
            Self::ServiceUnavailable { .. } => {
                "the analytics service is temporarily unavailable".to_string()
            }
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Query(error) => Self::BadRequest { message: error.to_string() },
            ApplicationError::FactStore(message) => Self::ServiceUnavailable { message },
        }
    }
}
