//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, health, items, notifications, rentals, reports};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BroRent API",
        version = "1.0.0",
        description = "Peer-to-peer item rental REST API for hostel communities",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "BroRent Team")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::update_profile,
        auth::change_password,
        auth::upload_avatar,
        // Items
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        items::upload_item_image,
        // Rentals
        rentals::request_rental,
        rentals::accept_rental,
        rentals::reject_rental,
        rentals::pickup_rental,
        rentals::return_rental,
        rentals::cancel_rental,
        rentals::my_borrowed,
        rentals::my_lent,
        // Notifications
        notifications::list_notifications,
        notifications::mark_read,
        // Reports
        reports::dashboard,
        reports::items_pdf,
        reports::items_excel,
        reports::rentals_pdf,
        reports::rentals_excel,
        reports::users_pdf,
        reports::users_excel,
        reports::send_reminders,
    ),
    components(
        schemas(
            // Auth
            auth::TokenResponse,
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            crate::models::user::UpdateProfile,
            crate::models::user::ChangePassword,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemShort,
            crate::models::item::ItemDetails,
            crate::models::item::Category,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            // Rentals
            crate::models::rental::Rental,
            crate::models::rental::RentalDetails,
            crate::models::rental::RentalStatus,
            crate::models::rental::CreateRental,
            rentals::RentalResponse,
            // Notifications
            crate::models::notification::Notification,
            crate::models::notification::NotificationKind,
            notifications::NotificationsResponse,
            // Reports
            reports::DashboardReport,
            reports::StatEntry,
            reports::MostBorrowedItem,
            reports::ReminderSweepResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and account endpoints"),
        (name = "items", description = "Item listing management"),
        (name = "rentals", description = "Rental lifecycle"),
        (name = "notifications", description = "In-app notifications"),
        (name = "reports", description = "Staff reports and exports")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
