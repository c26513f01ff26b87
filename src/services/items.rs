//! Item listing service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, Item, ItemDetails, ItemQuery, UpdateItem},
    repository::Repository,
};

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search item listings
    pub async fn search(&self, query: &ItemQuery) -> AppResult<(Vec<Item>, i64)> {
        self.repository.items.search(query).await
    }

    /// Get item with owner and computed availability
    pub async fn get_details(&self, id: i32) -> AppResult<ItemDetails> {
        self.repository.items.get_details(id).await
    }

    /// Create a listing owned by the acting user
    pub async fn create(&self, owner_id: i32, item: CreateItem) -> AppResult<Item> {
        item.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if item.price.is_sign_negative() {
            return Err(AppError::Validation("Price must not be negative".to_string()));
        }

        self.repository.items.create(owner_id, &item).await
    }

    /// Update a listing; only the owner may edit
    pub async fn update(&self, id: i32, actor_id: i32, item: UpdateItem) -> AppResult<Item> {
        item.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(price) = item.price {
            if price.is_sign_negative() {
                return Err(AppError::Validation("Price must not be negative".to_string()));
            }
        }

        let existing = self.repository.items.get_by_id(id).await?;
        if existing.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can edit this item".to_string(),
            ));
        }

        self.repository.items.update(id, &item).await
    }

    /// Delete a listing; only the owner may delete
    pub async fn delete(&self, id: i32, actor_id: i32) -> AppResult<()> {
        let existing = self.repository.items.get_by_id(id).await?;
        if existing.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can delete this item".to_string(),
            ));
        }

        self.repository.items.delete(id).await
    }

    /// Attach an uploaded image path; only the owner may change it
    pub async fn set_image(&self, id: i32, actor_id: i32, path: &str) -> AppResult<Item> {
        let existing = self.repository.items.get_by_id(id).await?;
        if existing.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can change this item's image".to_string(),
            ));
        }

        self.repository.items.set_image(id, path).await
    }
}
