//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub email: Option<String>,
    pub hostel_name: String,
    pub room_number: String,
    pub phone_number: String,
    /// Avatar path relative to the media root
    pub image: Option<String>,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

/// Short user representation embedded in item and rental payloads
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub username: String,
    pub hostel_name: String,
    pub room_number: String,
}

impl From<&User> for UserShort {
    fn from(user: &User) -> Self {
        UserShort {
            id: user.id,
            username: user.username.clone(),
            hostel_name: user.hostel_name.clone(),
            room_number: user.room_number.clone(),
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Hostel name must be 1-100 characters"))]
    pub hostel_name: String,
    #[validate(length(min = 1, max = 20, message = "Room number must be 1-20 characters"))]
    pub room_number: String,
    #[validate(length(min = 3, max = 15, message = "Phone number must be 3-15 characters"))]
    pub phone_number: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Update own profile request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Hostel name must be 1-100 characters"))]
    pub hostel_name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Room number must be 1-20 characters"))]
    pub room_number: Option<String>,
    #[validate(length(min = 3, max = 15, message = "Phone number must be 3-15 characters"))]
    pub phone_number: Option<String>,
}

/// Change password request (requires the current password)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePassword {
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub is_staff: bool,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Require staff privileges (reports, reminder sweep)
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(AppError::Authorization("Staff privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_preserves_claims() {
        let claims = UserClaims {
            sub: "amir".to_string(),
            user_id: 7,
            is_staff: false,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        };
        let token = claims.create_token("test-secret").unwrap();
        let parsed = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.sub, "amir");
        assert!(!parsed.is_staff);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let claims = UserClaims {
            sub: "amir".to_string(),
            user_id: 7,
            is_staff: false,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        };
        let token = claims.create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn require_staff_blocks_members() {
        let claims = UserClaims {
            sub: "amir".to_string(),
            user_id: 7,
            is_staff: false,
            exp: 0,
            iat: 0,
        };
        assert!(claims.require_staff().is_err());
    }
}
