use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use safetynet_database::database::{
    request_manager::RequestManagerError, table::table::ErrorKind,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] RequestManagerError),

    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("Blocking pool could not run the request")]
    Blocking,
}

impl ApiError {
    /// Machine readable error name, sent alongside the message
    pub fn kind(&self) -> String {
        match self {
            ApiError::Database(RequestManagerError::Apply(error)) => error.kind().to_string(),
            ApiError::Database(RequestManagerError::DatabaseTimeout) => "timeout".to_string(),
            ApiError::Database(RequestManagerError::DatabaseUnavailable) => {
                "unavailable".to_string()
            }
            ApiError::Database(RequestManagerError::UnexpectedResult(_)) | ApiError::Blocking => {
                "internal".to_string()
            }
            ApiError::InvalidParameter { .. } => ErrorKind::InvalidArgument.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Database(RequestManagerError::Apply(error)) => match error.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict | ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
                ErrorKind::MissingData => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Database(
                RequestManagerError::DatabaseTimeout | RequestManagerError::DatabaseUnavailable,
            ) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            ApiError::Database(RequestManagerError::UnexpectedResult(_)) | ApiError::Blocking => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }

        HttpResponse::build(status).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use safetynet_database::{
        consts::consts::FullName, database::table::table::ApplyErrors,
    };

    use super::*;

    fn apply(error: ApplyErrors) -> ApiError {
        ApiError::Database(RequestManagerError::Apply(error))
    }

    #[rstest]
    #[case(
        apply(ApplyErrors::CannotDeleteDoesNotExist { entity: "person", key: "a@b.c".to_string() }),
        StatusCode::NOT_FOUND,
        "not_found"
    )]
    #[case(
        apply(ApplyErrors::CannotCreateWhenAlreadyExists { entity: "person", key: "a@b.c".to_string() }),
        StatusCode::BAD_REQUEST,
        "conflict"
    )]
    #[case(
        apply(ApplyErrors::NotNullConstraintViolation("email".to_string())),
        StatusCode::BAD_REQUEST,
        "invalid_argument"
    )]
    #[case(
        apply(ApplyErrors::MissingMedicalRecord(FullName::new("John", "Boyd"))),
        StatusCode::INTERNAL_SERVER_ERROR,
        "missing_data"
    )]
    #[case(
        ApiError::Database(RequestManagerError::DatabaseTimeout),
        StatusCode::SERVICE_UNAVAILABLE,
        "timeout"
    )]
    #[case(
        ApiError::InvalidParameter { name: "stations", message: "x".to_string() },
        StatusCode::BAD_REQUEST,
        "invalid_argument"
    )]
    fn status_and_kind(#[case] error: ApiError, #[case] status: StatusCode, #[case] kind: &str) {
        assert_eq!(error.status_code(), status);
        assert_eq!(error.kind(), kind);
    }
}
