use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use card_core::CardError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error(transparent)]
    Card(#[from] CardError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(uuid::Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(uuid::Uuid),

    #[error("No stored card matches the presented card")]
    NoMatchingCard,

    #[error("Customer {0} does not exist for this card")]
    MissingCardOwner(uuid::Uuid),

    #[error("Request id {body_id} does not match path id {path_id}")]
    IdMismatch {
        path_id: uuid::Uuid,
        body_id: uuid::Uuid,
    },

    #[error("Card ownership cannot be transferred to another customer")]
    CardReassignment,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Internal(format!("JSON serialization error: {}", err))
    }
}

impl ResponseError for VaultError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(json!({
            "error": {
                "code": status_code.as_u16(),
                "message": error_message,
                "type": self.error_type()
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            VaultError::Card(_) => StatusCode::BAD_REQUEST,
            VaultError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VaultError::Validation(_) => StatusCode::BAD_REQUEST,
            VaultError::CustomerNotFound(_) => StatusCode::NOT_FOUND,
            VaultError::CardNotFound(_) => StatusCode::NOT_FOUND,
            VaultError::NoMatchingCard => StatusCode::NOT_FOUND,
            VaultError::MissingCardOwner(_) => StatusCode::BAD_REQUEST,
            VaultError::IdMismatch { .. } => StatusCode::BAD_REQUEST,
            VaultError::CardReassignment => StatusCode::BAD_REQUEST,
            VaultError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl VaultError {
    fn error_type(&self) -> &str {
        match self {
            VaultError::Card(CardError::UnknownNetwork) => "unknown_network",
            VaultError::Card(CardError::InvalidNumberFormat { .. }) => "invalid_number_format",
            VaultError::Card(CardError::InvalidCvvFormat { .. }) => "invalid_cvv_format",
            VaultError::Card(CardError::InvalidExpiryFormat { .. }) => "invalid_expiry_format",
            VaultError::Database(_) => "database_error",
            VaultError::Validation(_) => "validation_error",
            VaultError::CustomerNotFound(_) => "not_found",
            VaultError::CardNotFound(_) => "not_found",
            VaultError::NoMatchingCard => "no_matching_card",
            VaultError::MissingCardOwner(_) => "missing_card_owner",
            VaultError::IdMismatch { .. } => "id_mismatch",
            VaultError::CardReassignment => "card_reassignment",
            VaultError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_core::Network;

    #[test]
    fn test_format_errors_are_bad_request() {
        let errors = [
            CardError::UnknownNetwork,
            CardError::InvalidNumberFormat {
                network: Network::Visa,
            },
            CardError::InvalidCvvFormat {
                network: Network::Amex,
            },
            CardError::InvalidExpiryFormat {
                network: Network::MasterCard,
            },
        ];
        for err in errors {
            assert_eq!(VaultError::from(err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_missing_resources_are_not_found() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(
            VaultError::CustomerNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            VaultError::CardNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(VaultError::NoMatchingCard.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_request_shape_conflicts_are_bad_request() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(
            VaultError::MissingCardOwner(id).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VaultError::IdMismatch {
                path_id: id,
                body_id: uuid::Uuid::new_v4(),
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VaultError::CardReassignment.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_card_error_message_passes_through() {
        let err = VaultError::from(CardError::InvalidCvvFormat {
            network: Network::Amex,
        });
        assert_eq!(err.to_string(), "Invalid CVV format for network Amex");
    }
}
