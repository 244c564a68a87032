use actix_web::{
    error::ResponseError,
    http::StatusCode,
    HttpResponse,
};
use drinks_engine::CatalogError;
use log::error;
use thiserror::Error;

use crate::data_objects::ErrorResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Bad request. {0}")]
    InvalidRequestBody(String),
    #[error("Bad request. {0}")]
    InvalidDrink(String),
    #[error("Resource not found. {0}")]
    NoRecordFound(String),
    #[error("Unprocessable. {0}")]
    Unprocessable(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("{0}")]
    AuthenticationError(#[from] AuthError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidDrink(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AuthenticationError(e) => e.status_code(),
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        let body = ErrorResponse::new(status.as_u16(), self.to_string());
        HttpResponse::build(status).json(body)
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingAuthHeader,
    #[error("Invalid Authorization header. {0}")]
    MalformedAuthHeader(String),
    #[error("Bearer token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Tokens signed with {0} are not accepted. Use RS256.")]
    UnsupportedAlgorithm(String),
    #[error("Token was signed with an unknown key ({0}).")]
    UnknownSigningKey(String),
    #[error("Token could not be validated. {0}")]
    ValidationError(String),
    #[error("Incorrect claims. {0}")]
    InvalidClaims(String),
    #[error("Permissions not included in token.")]
    MissingPermissions,
    #[error("Forbidden. {0}")]
    InsufficientPermissions(String),
    #[error("Could not fetch the signing key set. {0}")]
    KeySetUnavailable(String),
    #[error("No verified claims are attached to this request.")]
    ClaimsNotFound,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAuthHeader => StatusCode::UNAUTHORIZED,
            Self::MalformedAuthHeader(_) => StatusCode::UNAUTHORIZED,
            Self::PoorlyFormattedToken(_) => StatusCode::UNAUTHORIZED,
            Self::UnsupportedAlgorithm(_) => StatusCode::UNAUTHORIZED,
            Self::UnknownSigningKey(_) => StatusCode::UNAUTHORIZED,
            Self::ValidationError(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
            Self::MissingPermissions => StatusCode::UNAUTHORIZED,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::KeySetUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ClaimsNotFound => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogError> for ServerError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::InvalidDrink(msg) => Self::InvalidDrink(msg),
            CatalogError::DrinkNotFound(_) => Self::NoRecordFound(e.to_string()),
            CatalogError::DuplicateTitle(_) => Self::Unprocessable(e.to_string()),
            CatalogError::DatabaseError(_) | CatalogError::RecipeEncoding(_) => Self::BackendError(e.to_string()),
        }
    }
}
