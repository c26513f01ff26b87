//! Items repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{CreateItem, Item, ItemDetails, ItemQuery, UpdateItem},
        user::UserShort,
    },
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Get item with owner and computed availability
    pub async fn get_details(&self, id: i32) -> AppResult<ItemDetails> {
        let row = sqlx::query(
            r#"
            SELECT i.*, u.username, u.hostel_name, u.room_number,
                   EXISTS(
                       SELECT 1 FROM rentals r
                       WHERE r.item_id = i.id
                         AND r.status IN ('approved', 'borrowed')
                         AND r.start_date <= CURRENT_DATE
                         AND r.end_date >= CURRENT_DATE
                   ) as currently_rented
            FROM items i
            JOIN users u ON i.owner_id = u.id
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))?;

        let item = Item {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            price: row.get("price"),
            owner_id: row.get("owner_id"),
            image: row.get("image"),
            is_available: row.get("is_available"),
            per_day: row.get("per_day"),
            date_posted: row.get("date_posted"),
            category: row.get("category"),
        };
        let currently_rented: bool = row.get("currently_rented");
        let available_now = item.is_available && !currently_rented;

        Ok(ItemDetails {
            owner: UserShort {
                id: item.owner_id,
                username: row.get("username"),
                hostel_name: row.get("hostel_name"),
                room_number: row.get("room_number"),
            },
            item,
            currently_rented,
            available_now,
        })
    }

    /// Search items with filters and pagination
    pub async fn search(&self, query: &ItemQuery) -> AppResult<(Vec<Item>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(category) = query.category {
            params.push(category.as_str().to_string());
            conditions.push(format!("category = ${}", params.len()));
        }

        if let Some(ref search) = query.search {
            params.push(format!("%{}%", search.to_lowercase()));
            conditions.push(format!("LOWER(name) LIKE ${}", params.len()));
        }

        if let Some(owner_id) = query.owner_id {
            params.push(owner_id.to_string());
            conditions.push(format!("owner_id = ${}::int", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM items {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT * FROM items {} ORDER BY date_posted DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut select_builder = sqlx::query_as::<_, Item>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let items = select_builder.fetch_all(&self.pool).await?;

        Ok((items, total))
    }

    /// Create a new item listing
    pub async fn create(&self, owner_id: i32, item: &CreateItem) -> AppResult<Item> {
        let created = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, description, price, owner_id, is_available, per_day, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(owner_id)
        .bind(item.is_available)
        .bind(item.per_day)
        .bind(item.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an item listing (only fields provided)
    pub async fn update(&self, id: i32, item: &UpdateItem) -> AppResult<Item> {
        let updated = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                per_day = COALESCE($5, per_day),
                is_available = COALESCE($6, is_available),
                category = COALESCE($7, category)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.per_day)
        .bind(item.is_available)
        .bind(item.category)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))?;

        Ok(updated)
    }

    /// Attach an image path
    pub async fn set_image(&self, id: i32, path: &str) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("UPDATE items SET image = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(path)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Delete an item listing (rentals and notifications cascade)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item with id {} not found", id)));
        }
        Ok(())
    }

    /// Count all items
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
