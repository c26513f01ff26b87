//! Notification listing service

use crate::{
    error::AppResult,
    models::notification::Notification,
    repository::Repository,
};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
}

impl NotificationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All notifications for a user, newest first
    pub async fn list(&self, user_id: i32) -> AppResult<Vec<Notification>> {
        self.repository.notifications.list_for_user(user_id).await
    }

    /// Unread count, shown in every page header
    pub async fn unread_count(&self, user_id: i32) -> AppResult<i64> {
        self.repository.notifications.unread_count(user_id).await
    }

    /// Mark one of the user's notifications as read
    pub async fn mark_read(&self, id: i32, user_id: i32) -> AppResult<Notification> {
        self.repository.notifications.mark_read(id, user_id).await
    }
}
