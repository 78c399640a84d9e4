pub mod items;

use crate::error::AppError;

/// Fallback for any path outside the item routes.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Fallback for unsupported methods on a known route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
