use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { message: String, kind: &'static str },

    #[error("{message}")]
    NotFound { message: String, kind: &'static str },

    #[error("{message}")]
    Conflict { message: String, kind: &'static str },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Admin access only")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Malformed request input caught before it reaches a service.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            kind: "ValidationError",
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest { kind, .. }
            | AppError::NotFound { kind, .. }
            | AppError::Conflict { kind, .. } => kind,
            AppError::Unauthorized => "Unauthorized",
            AppError::Forbidden => "Forbidden",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        let kind = e.kind();
        match e {
            DomainError::NotFound(_)
            | DomainError::ShippingNotFound
            | DomainError::PaymentMethodNotFound => AppError::NotFound {
                message: e.to_string(),
                kind,
            },
            DomainError::InvalidQuantity(_)
            | DomainError::OutOfStock { .. }
            | DomainError::InsufficientStock { .. }
            | DomainError::MissingContactInfo(_)
            | DomainError::EmptyCart
            | DomainError::InvalidStatus(_)
            | DomainError::InvalidInput(_) => AppError::BadRequest {
                message: e.to_string(),
                kind,
            },
            DomainError::InsufficientStockAtCheckout { .. }
            | DomainError::CartChanged
            | DomainError::Conflict(_) => AppError::Conflict {
                message: e.to_string(),
                kind,
            },
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(detail) => {
                log::error!("request failed: {detail}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ApiResponse::failure(message, self.kind()))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn not_found_returns_404() {
        let err: AppError = DomainError::NotFound("Cart item").into();
        assert_eq!(err.error_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Cart item not found");
    }

    #[test]
    fn lookup_failures_at_checkout_return_404() {
        let shipping: AppError = DomainError::ShippingNotFound.into();
        let payment: AppError = DomainError::PaymentMethodNotFound.into();
        assert_eq!(shipping.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(payment.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn user_input_errors_return_400() {
        let errors = [
            DomainError::InvalidQuantity(0),
            DomainError::OutOfStock { product_id: 1 },
            DomainError::InsufficientStock {
                product_id: 1,
                requested: 2,
                available: 1,
            },
            DomainError::MissingContactInfo(vec!["phone"]),
            DomainError::EmptyCart,
            DomainError::InvalidStatus(9),
            DomainError::InvalidInput("bad value".to_string()),
        ];
        for err in errors {
            assert_eq!(AppError::from(err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn races_return_409() {
        let errors = [
            DomainError::InsufficientStockAtCheckout { product_id: 1 },
            DomainError::CartChanged,
            DomainError::Conflict("duplicate invoice".to_string()),
        ];
        for err in errors {
            assert_eq!(AppError::from(err).status_code(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn internal_error_hides_details() {
        let err: AppError = DomainError::Internal("connection reset".to_string()).into();
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Internal server error");
        assert_eq!(json["error"], "Internal");
    }

    #[actix_web::test]
    async fn envelope_carries_the_domain_kind() {
        let err: AppError = DomainError::EmptyCart.into();
        let body = to_bytes(err.error_response().into_body()).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["message"], "Cart is empty");
        assert_eq!(json["error"], "EmptyCart");
    }
}
