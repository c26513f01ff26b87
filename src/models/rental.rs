//! Rental model, status state machine, and pricing

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use super::item::ItemShort;
use super::user::UserShort;

/// Rental lifecycle status (string code stored in the database)
///
/// ```text
/// pending -> approved -> borrowed -> returned
/// pending -> rejected
/// pending | approved -> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Pending,
    Approved,
    Borrowed,
    Returned,
    Rejected,
    Cancelled,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Pending => "pending",
            RentalStatus::Approved => "approved",
            RentalStatus::Borrowed => "borrowed",
            RentalStatus::Returned => "returned",
            RentalStatus::Rejected => "rejected",
            RentalStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses that block a new rental of the same item by the same user
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            RentalStatus::Pending | RentalStatus::Approved | RentalStatus::Borrowed
        )
    }

    /// Statuses that occupy the item's date window
    pub fn occupies_dates(&self) -> bool {
        matches!(self, RentalStatus::Approved | RentalStatus::Borrowed)
    }

    /// Whether the borrower may still cancel
    pub fn cancellable(&self) -> bool {
        matches!(self, RentalStatus::Pending | RentalStatus::Approved)
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RentalStatus::Pending),
            "approved" => Ok(RentalStatus::Approved),
            "borrowed" => Ok(RentalStatus::Borrowed),
            "returned" => Ok(RentalStatus::Returned),
            "rejected" => Ok(RentalStatus::Rejected),
            "cancelled" => Ok(RentalStatus::Cancelled),
            _ => Err(format!("Invalid rental status: {}", s)),
        }
    }
}

// SQLx conversion for RentalStatus
impl sqlx::Type<Postgres> for RentalStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for RentalStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for RentalStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Rental model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rental {
    pub id: i32,
    pub item_id: i32,
    pub borrower_id: i32,
    /// Owner of the item at request time
    pub lender_id: i32,
    pub status: RentalStatus,
    pub request_date: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub approved_date: Option<DateTime<Utc>>,
    pub borrowed_date: Option<DateTime<Utc>>,
    pub returned_date: Option<DateTime<Utc>>,
    /// Agreed price, frozen at request time
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub notes: String,
}

/// Rental with item and both parties for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RentalDetails {
    pub id: i32,
    pub item: ItemShort,
    pub borrower: UserShort,
    pub lender: UserShort,
    pub status: RentalStatus,
    pub request_date: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub approved_date: Option<DateTime<Utc>>,
    pub borrowed_date: Option<DateTime<Utc>>,
    pub returned_date: Option<DateTime<Utc>>,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub notes: String,
}

/// Create rental request (borrower supplies the borrow window)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRental {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

/// Number of chargeable days, inclusive of both endpoints
pub fn rental_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days() + 1
}

/// Agreed price for a rental window: flat price, or price x days when
/// the item is priced per day
pub fn compute_total_price(
    price: Decimal,
    per_day: bool,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Decimal {
    if per_day {
        price * Decimal::from(rental_days(start_date, end_date))
    } else {
        price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_count_is_inclusive_of_both_endpoints() {
        assert_eq!(rental_days(date(2025, 10, 10), date(2025, 10, 12)), 3);
        assert_eq!(rental_days(date(2025, 10, 10), date(2025, 10, 10)), 1);
    }

    #[test]
    fn per_day_price_multiplies_by_inclusive_days() {
        // $10/day for 2025-10-10 -> 2025-10-12 is $30
        let total =
            compute_total_price(dec!(10.00), true, date(2025, 10, 10), date(2025, 10, 12));
        assert_eq!(total, dec!(30.00));
    }

    #[test]
    fn flat_price_ignores_the_window() {
        let total =
            compute_total_price(dec!(25.50), false, date(2025, 10, 10), date(2025, 10, 20));
        assert_eq!(total, dec!(25.50));
    }

    #[test]
    fn status_codes_round_trip() {
        for s in [
            RentalStatus::Pending,
            RentalStatus::Approved,
            RentalStatus::Borrowed,
            RentalStatus::Returned,
            RentalStatus::Rejected,
            RentalStatus::Cancelled,
        ] {
            assert_eq!(s.as_str().parse::<RentalStatus>().unwrap(), s);
        }
    }

    #[test]
    fn active_statuses_block_duplicate_requests() {
        assert!(RentalStatus::Pending.is_active());
        assert!(RentalStatus::Approved.is_active());
        assert!(RentalStatus::Borrowed.is_active());
        assert!(!RentalStatus::Returned.is_active());
        assert!(!RentalStatus::Rejected.is_active());
        assert!(!RentalStatus::Cancelled.is_active());
    }

    #[test]
    fn only_approved_and_borrowed_occupy_dates() {
        assert!(!RentalStatus::Pending.occupies_dates());
        assert!(RentalStatus::Approved.occupies_dates());
        assert!(RentalStatus::Borrowed.occupies_dates());
        assert!(!RentalStatus::Returned.occupies_dates());
    }

    #[test]
    fn cancellation_stops_at_pickup() {
        assert!(RentalStatus::Pending.cancellable());
        assert!(RentalStatus::Approved.cancellable());
        assert!(!RentalStatus::Borrowed.cancellable());
    }
}
