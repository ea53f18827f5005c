use actix_web::HttpResponse;
use thiserror::Error;

use crate::engine::time_window::WindowError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Requested time window has already passed")]
    ExpiredWindow,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<WindowError> for AppError {
    fn from(e: WindowError) -> Self {
        match e {
            WindowError::InvalidRequest => AppError::InvalidRequest(e.to_string()),
            WindowError::ExpiredWindow => AppError::ExpiredWindow,
        }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => AppError::NotFound,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::InvalidRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            // The order form redisplays with the user's selections intact and
            // asks for a later slot.
            AppError::ExpiredWindow => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": "expired_time"
                }))
            }
            AppError::Unauthorized => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Forbidden => HttpResponse::Forbidden().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_request_returns_400() {
        let resp = AppError::InvalidRequest("bad value".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn expired_window_returns_422() {
        let resp = AppError::ExpiredWindow.error_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unauthorized_returns_401() {
        let resp = AppError::Unauthorized.error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn forbidden_returns_403() {
        let resp = AppError::Forbidden.error_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn expired_window_error_maps_from_resolver() {
        let app_err: AppError = WindowError::ExpiredWindow.into();
        assert!(matches!(app_err, AppError::ExpiredWindow));
    }

    #[test]
    fn invalid_selection_maps_from_resolver() {
        let app_err: AppError = WindowError::InvalidRequest.into();
        assert!(matches!(app_err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        let app_err: AppError = diesel::result::Error::NotFound.into();
        assert!(matches!(app_err, AppError::NotFound));
    }

    #[test]
    fn other_diesel_errors_map_to_internal() {
        let app_err: AppError = diesel::result::Error::RollbackTransaction.into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
