//! Business logic services

pub mod auth;
pub mod email;
pub mod items;
pub mod notifications;
pub mod rentals;
pub mod reports;

use crate::config::{AuthConfig, EmailConfig};
use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub items: items::ItemsService,
    pub rentals: rentals::RentalsService,
    pub notifications: notifications::NotificationsService,
    pub reports: reports::ReportsService,
    pub email: email::EmailService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, email_config: EmailConfig) -> Self {
        let email = email::EmailService::new(email_config);
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            items: items::ItemsService::new(repository.clone()),
            rentals: rentals::RentalsService::new(repository.clone(), email.clone()),
            notifications: notifications::NotificationsService::new(repository.clone()),
            reports: reports::ReportsService::new(repository),
            email,
        }
    }
}
