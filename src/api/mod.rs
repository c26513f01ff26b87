//! API handlers for BroRent REST endpoints

pub mod auth;
pub mod health;
pub mod items;
pub mod notifications;
pub mod openapi;
pub mod rentals;
pub mod reports;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::Multipart;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::user::UserClaims,
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication("Invalid authorization header format".to_string()));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Store the first file field of a multipart upload under the media root.
/// Returns the path relative to the media root (the value stored on the row).
pub(crate) async fn save_uploaded_image(
    state: &AppState,
    subdir: &str,
    multipart: &mut Multipart,
) -> AppResult<String> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        .ok_or_else(|| AppError::BadRequest("Missing image field".to_string()))?;

    let extension = match field.content_type() {
        Some("image/jpeg") => "jpg",
        Some("image/png") => "png",
        Some("image/webp") => "webp",
        other => {
            return Err(AppError::Validation(format!(
                "Unsupported image type: {}",
                other.unwrap_or("unknown")
            )))
        }
    };

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

    if data.is_empty() {
        return Err(AppError::Validation("Uploaded image is empty".to_string()));
    }

    let relative = format!("{}/{}.{}", subdir, Uuid::new_v4(), extension);
    let root = std::path::Path::new(&state.config.media.root);
    let target = root.join(&relative);

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create media directory: {}", e)))?;
    }
    tokio::fs::write(&target, &data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

    Ok(relative)
}
