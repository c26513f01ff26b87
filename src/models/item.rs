//! Item (listing) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::user::UserShort;

/// Item category (string code stored in the database)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothes,
    Accessories,
    Gadgets,
    Books,
    Sports,
    Others,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothes => "clothes",
            Category::Accessories => "accessories",
            Category::Gadgets => "gadgets",
            Category::Books => "books",
            Category::Sports => "sports",
            Category::Others => "others",
        }
    }

    /// Human label used in report documents
    pub fn label(&self) -> &'static str {
        match self {
            Category::Clothes => "Clothes",
            Category::Accessories => "Accessories",
            Category::Gadgets => "Gadgets",
            Category::Books => "Books",
            Category::Sports => "Sports Equipment",
            Category::Others => "Others",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Others
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clothes" => Ok(Category::Clothes),
            "accessories" => Ok(Category::Accessories),
            "gadgets" => Ok(Category::Gadgets),
            "books" => Ok(Category::Books),
            "sports" => Ok(Category::Sports),
            "others" => Ok(Category::Others),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(Category::Others)
    }
}

// SQLx conversion for Category
impl sqlx::Type<Postgres> for Category {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Category {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Category {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Item model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub owner_id: i32,
    /// Image path relative to the media root
    pub image: Option<String>,
    /// Owner-controlled listing flag; real availability also depends on
    /// active rentals (see ItemDetails::available_now)
    pub is_available: bool,
    /// When true, price is charged per day of the rental window
    pub per_day: bool,
    pub date_posted: DateTime<Utc>,
    pub category: Category,
}

/// Short item representation embedded in rental payloads
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ItemShort {
    pub id: i32,
    pub name: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub per_day: bool,
    pub image: Option<String>,
    pub category: Category,
}

/// Item with owner and computed availability for detail views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: Item,
    pub owner: UserShort,
    /// True when an approved or borrowed rental overlaps today
    pub currently_rented: bool,
    /// is_available AND not currently rented
    pub available_now: bool,
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[serde(default)]
    pub per_day: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub category: Category,
}

fn default_true() -> bool {
    true
}

/// Update item request (owner only, all fields optional)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price: Option<Decimal>,
    pub per_day: Option<bool>,
    pub is_available: Option<bool>,
    pub category: Option<Category>,
}

/// Item query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ItemQuery {
    /// Filter by category code
    pub category: Option<Category>,
    /// Substring search on name
    pub search: Option<String>,
    /// Restrict to one owner's listings
    pub owner_id: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes_round_trip() {
        for c in [
            Category::Clothes,
            Category::Accessories,
            Category::Gadgets,
            Category::Books,
            Category::Sports,
            Category::Others,
        ] {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn unknown_category_string_falls_back_to_others() {
        assert_eq!(Category::from("furniture".to_string()), Category::Others);
    }

    #[test]
    fn sports_label_matches_listing_wording() {
        assert_eq!(Category::Sports.label(), "Sports Equipment");
    }
}
