//! Rentals repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{Item, ItemShort},
        rental::{compute_total_price, CreateRental, Rental, RentalDetails, RentalStatus},
        user::UserShort,
    },
};

#[derive(Clone)]
pub struct RentalsRepository {
    pool: Pool<Postgres>,
}

impl RentalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get rental by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    /// Create a rental request.
    ///
    /// The availability and duplicate checks run in the same transaction as
    /// the insert, with the item row locked, so two concurrent requests
    /// cannot both pass the checks. The agreed price is computed from the
    /// item's price at request time and never recomputed.
    pub async fn create(
        &self,
        item_id: i32,
        borrower_id: i32,
        request: &CreateRental,
    ) -> AppResult<Rental> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1 FOR UPDATE")
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item_id)))?;

        if item.owner_id == borrower_id {
            return Err(AppError::BusinessRule(
                "You cannot rent your own item".to_string(),
            ));
        }

        if !item.is_available {
            return Err(AppError::BusinessRule(
                "This item is not available for rent".to_string(),
            ));
        }

        let duplicate: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM rentals
                WHERE item_id = $1 AND borrower_id = $2
                  AND status IN ('pending', 'approved', 'borrowed')
            )
            "#,
        )
        .bind(item_id)
        .bind(borrower_id)
        .fetch_one(&mut *tx)
        .await?;

        if duplicate {
            return Err(AppError::BusinessRule(
                "You already have an active request for this item".to_string(),
            ));
        }

        let booked: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM rentals
                WHERE item_id = $1
                  AND status IN ('approved', 'borrowed')
                  AND start_date <= $3
                  AND end_date >= $2
            )
            "#,
        )
        .bind(item_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_one(&mut *tx)
        .await?;

        if booked {
            return Err(AppError::BusinessRule(
                "This item is already booked for the requested dates".to_string(),
            ));
        }

        let total_price = compute_total_price(
            item.price,
            item.per_day,
            request.start_date,
            request.end_date,
        );

        let rental = sqlx::query_as::<_, Rental>(
            r#"
            INSERT INTO rentals (item_id, borrower_id, lender_id, start_date, end_date, total_price, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(borrower_id)
        .bind(item.owner_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(total_price)
        .bind(&request.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(rental)
    }

    /// Mark an approved request, stamping the approval time
    pub async fn approve(&self, id: i32) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>(
            "UPDATE rentals SET status = 'approved', approved_date = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    /// Mark a rejected request
    pub async fn reject(&self, id: i32) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>(
            "UPDATE rentals SET status = 'rejected' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    /// Mark the item handed over, stamping the pickup time
    pub async fn mark_borrowed(&self, id: i32) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>(
            "UPDATE rentals SET status = 'borrowed', borrowed_date = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    /// Mark the item returned, stamping the return time
    pub async fn mark_returned(&self, id: i32) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>(
            "UPDATE rentals SET status = 'returned', returned_date = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    /// Mark a cancelled request
    pub async fn cancel(&self, id: i32) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>(
            "UPDATE rentals SET status = 'cancelled' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    /// Rentals where the user is the borrower (my rented items)
    pub async fn list_for_borrower(&self, user_id: i32) -> AppResult<Vec<RentalDetails>> {
        self.list_details("r.borrower_id = $1", user_id).await
    }

    /// Rentals where the user is the lender (my lended items)
    pub async fn list_for_lender(&self, user_id: i32) -> AppResult<Vec<RentalDetails>> {
        self.list_details("r.lender_id = $1", user_id).await
    }

    async fn list_details(&self, condition: &str, user_id: i32) -> AppResult<Vec<RentalDetails>> {
        let query = format!(
            r#"
            SELECT r.*,
                   i.name as item_name, i.price as item_price, i.per_day as item_per_day,
                   i.image as item_image, i.category as item_category,
                   b.username as borrower_username, b.hostel_name as borrower_hostel,
                   b.room_number as borrower_room,
                   l.username as lender_username, l.hostel_name as lender_hostel,
                   l.room_number as lender_room
            FROM rentals r
            JOIN items i ON r.item_id = i.id
            JOIN users b ON r.borrower_id = b.id
            JOIN users l ON r.lender_id = l.id
            WHERE {}
            ORDER BY r.request_date DESC
            "#,
            condition
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Self::row_to_details).collect())
    }

    /// Get rental with item and both parties
    pub async fn get_details(&self, id: i32) -> AppResult<RentalDetails> {
        let row = sqlx::query(
            r#"
            SELECT r.*,
                   i.name as item_name, i.price as item_price, i.per_day as item_per_day,
                   i.image as item_image, i.category as item_category,
                   b.username as borrower_username, b.hostel_name as borrower_hostel,
                   b.room_number as borrower_room,
                   l.username as lender_username, l.hostel_name as lender_hostel,
                   l.room_number as lender_room
            FROM rentals r
            JOIN items i ON r.item_id = i.id
            JOIN users b ON r.borrower_id = b.id
            JOIN users l ON r.lender_id = l.id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))?;

        Ok(Self::row_to_details(row))
    }

    fn row_to_details(row: sqlx::postgres::PgRow) -> RentalDetails {
        RentalDetails {
            id: row.get("id"),
            item: ItemShort {
                id: row.get("item_id"),
                name: row.get("item_name"),
                price: row.get("item_price"),
                per_day: row.get("item_per_day"),
                image: row.get("item_image"),
                category: row.get("item_category"),
            },
            borrower: UserShort {
                id: row.get("borrower_id"),
                username: row.get("borrower_username"),
                hostel_name: row.get("borrower_hostel"),
                room_number: row.get("borrower_room"),
            },
            lender: UserShort {
                id: row.get("lender_id"),
                username: row.get("lender_username"),
                hostel_name: row.get("lender_hostel"),
                room_number: row.get("lender_room"),
            },
            status: row.get("status"),
            request_date: row.get("request_date"),
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            approved_date: row.get("approved_date"),
            borrowed_date: row.get("borrowed_date"),
            returned_date: row.get("returned_date"),
            total_price: row.get("total_price"),
            notes: row.get("notes"),
        }
    }

    /// Borrowed rentals due back today or overdue (reminder sweep)
    pub async fn due_for_reminder(&self) -> AppResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT * FROM rentals
            WHERE status = 'borrowed' AND end_date <= CURRENT_DATE
            ORDER BY end_date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    /// Whether a user already received a reminder for a rental today
    pub async fn reminded_today(&self, rental_id: i32) -> AppResult<bool> {
        let reminded: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM notifications
                WHERE rental_id = $1 AND kind = 'reminder'
                  AND created_at >= DATE_TRUNC('day', NOW())
            )
            "#,
        )
        .bind(rental_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(reminded)
    }

    /// Count all rentals
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rentals")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count rentals by status
    pub async fn count_by_status(&self, status: RentalStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rentals WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
