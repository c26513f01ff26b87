//! Notification model and kinds

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

/// Notification kind (string code stored in the database)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RentalRequest,
    RequestApproved,
    RequestRejected,
    ItemBorrowed,
    ItemReturned,
    Reminder,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::RentalRequest => "rental_request",
            NotificationKind::RequestApproved => "request_approved",
            NotificationKind::RequestRejected => "request_rejected",
            NotificationKind::ItemBorrowed => "item_borrowed",
            NotificationKind::ItemReturned => "item_returned",
            NotificationKind::Reminder => "reminder",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rental_request" => Ok(NotificationKind::RentalRequest),
            "request_approved" => Ok(NotificationKind::RequestApproved),
            "request_rejected" => Ok(NotificationKind::RequestRejected),
            "item_borrowed" => Ok(NotificationKind::ItemBorrowed),
            "item_returned" => Ok(NotificationKind::ItemReturned),
            "reminder" => Ok(NotificationKind::Reminder),
            _ => Err(format!("Invalid notification kind: {}", s)),
        }
    }
}

// SQLx conversion for NotificationKind
impl sqlx::Type<Postgres> for NotificationKind {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for NotificationKind {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for NotificationKind {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Notification model from database; only the read flag is ever updated
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub rental_id: i32,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_round_trip() {
        for k in [
            NotificationKind::RentalRequest,
            NotificationKind::RequestApproved,
            NotificationKind::RequestRejected,
            NotificationKind::ItemBorrowed,
            NotificationKind::ItemReturned,
            NotificationKind::Reminder,
        ] {
            assert_eq!(k.as_str().parse::<NotificationKind>().unwrap(), k);
        }
    }
}
