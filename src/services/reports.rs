//! Staff reporting service: dashboard aggregates and export tables

use rust_decimal::Decimal;
use sqlx::Row;

use crate::{
    api::reports::{DashboardReport, MostBorrowedItem, StatEntry},
    error::AppResult,
    models::{item::Category, rental::RentalStatus},
    reports::ReportTable,
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Admin dashboard summary: totals, status breakdown, most-borrowed items
    pub async fn dashboard(&self) -> AppResult<DashboardReport> {
        let pool = &self.repository.pool;

        let total_users = self.repository.users.count().await?;
        let total_items = self.repository.items.count().await?;
        let total_rentals = self.repository.rentals.count().await?;
        let active_rentals = self
            .repository
            .rentals
            .count_by_status(RentalStatus::Borrowed)
            .await?;
        let pending_requests = self
            .repository
            .rentals
            .count_by_status(RentalStatus::Pending)
            .await?;

        let rentals_by_status = sqlx::query(
            "SELECT status as label, COUNT(*) as value FROM rentals GROUP BY status ORDER BY value DESC",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| StatEntry {
            label: row.get("label"),
            value: row.get("value"),
        })
        .collect();

        let most_borrowed = sqlx::query(
            r#"
            SELECT i.id as item_id, i.name, COUNT(r.id) as rental_count
            FROM items i
            JOIN rentals r ON r.item_id = i.id
            GROUP BY i.id, i.name
            ORDER BY rental_count DESC, i.id
            LIMIT 5
            "#,
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| MostBorrowedItem {
            item_id: row.get("item_id"),
            name: row.get("name"),
            rental_count: row.get("rental_count"),
        })
        .collect();

        Ok(DashboardReport {
            total_users,
            total_items,
            total_rentals,
            active_rentals,
            pending_requests,
            rentals_by_status,
            most_borrowed,
        })
    }

    /// Items report: ID, Name, Owner, Category, Price, Status
    pub async fn items_table(&self) -> AppResult<ReportTable> {
        let rows = sqlx::query(
            r#"
            SELECT i.id, i.name, u.username as owner, i.category, i.price, i.is_available
            FROM items i
            JOIN users u ON i.owner_id = u.id
            ORDER BY i.id
            "#,
        )
        .fetch_all(&self.repository.pool)
        .await?;

        let mut table = ReportTable::new(
            "Items Report",
            vec!["ID", "Name", "Owner", "Category", "Price", "Status"],
            vec![1.0, 3.0, 2.0, 2.0, 1.5, 1.5],
        );
        for row in rows {
            let category: Category = row.get("category");
            let price: Decimal = row.get("price");
            let is_available: bool = row.get("is_available");
            table.push_row(vec![
                row.get::<i32, _>("id").to_string(),
                row.get("name"),
                row.get("owner"),
                category.label().to_string(),
                price.to_string(),
                if is_available { "Available" } else { "Unavailable" }.to_string(),
            ]);
        }

        Ok(table)
    }

    /// Rentals report: ID, Item, Borrower, Lender, Status, Start Date,
    /// End Date, Total Price
    pub async fn rentals_table(&self) -> AppResult<ReportTable> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, i.name as item, b.username as borrower, l.username as lender,
                   r.status, r.start_date, r.end_date, r.total_price
            FROM rentals r
            JOIN items i ON r.item_id = i.id
            JOIN users b ON r.borrower_id = b.id
            JOIN users l ON r.lender_id = l.id
            ORDER BY r.id
            "#,
        )
        .fetch_all(&self.repository.pool)
        .await?;

        let mut table = ReportTable::new(
            "Rentals Report",
            vec![
                "ID",
                "Item",
                "Borrower",
                "Lender",
                "Status",
                "Start Date",
                "End Date",
                "Total Price",
            ],
            vec![0.8, 2.5, 1.8, 1.8, 1.4, 1.6, 1.6, 1.5],
        );
        for row in rows {
            let status: RentalStatus = row.get("status");
            let start: chrono::NaiveDate = row.get("start_date");
            let end: chrono::NaiveDate = row.get("end_date");
            let total: Decimal = row.get("total_price");
            table.push_row(vec![
                row.get::<i32, _>("id").to_string(),
                row.get("item"),
                row.get("borrower"),
                row.get("lender"),
                status.to_string(),
                start.to_string(),
                end.to_string(),
                total.to_string(),
            ]);
        }

        Ok(table)
    }

    /// Users report: ID, Username, Hostel, Room, Phone, Items Listed, Rentals
    pub async fn users_table(&self) -> AppResult<ReportTable> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.hostel_name, u.room_number, u.phone_number,
                   (SELECT COUNT(*) FROM items i WHERE i.owner_id = u.id) as items_listed,
                   (SELECT COUNT(*) FROM rentals r WHERE r.borrower_id = u.id) as rentals
            FROM users u
            ORDER BY u.id
            "#,
        )
        .fetch_all(&self.repository.pool)
        .await?;

        let mut table = ReportTable::new(
            "Users Report",
            vec!["ID", "Username", "Hostel", "Room", "Phone", "Items Listed", "Rentals"],
            vec![0.8, 2.2, 2.0, 1.0, 1.8, 1.6, 1.3],
        );
        for row in rows {
            table.push_row(vec![
                row.get::<i32, _>("id").to_string(),
                row.get("username"),
                row.get("hostel_name"),
                row.get("room_number"),
                row.get("phone_number"),
                row.get::<i64, _>("items_listed").to_string(),
                row.get::<i64, _>("rentals").to_string(),
            ]);
        }

        Ok(table)
    }
}
