//! Staff report endpoints: dashboard, document exports, reminder sweep

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, reports};

use super::AuthenticatedUser;

const PDF_MIME: &str = "application/pdf";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Label/value aggregate entry
#[derive(Serialize, ToSchema)]
pub struct StatEntry {
    pub label: String,
    pub value: i64,
}

/// Most-borrowed item entry
#[derive(Serialize, ToSchema)]
pub struct MostBorrowedItem {
    pub item_id: i32,
    pub name: String,
    pub rental_count: i64,
}

/// Admin dashboard summary
#[derive(Serialize, ToSchema)]
pub struct DashboardReport {
    pub total_users: i64,
    pub total_items: i64,
    pub total_rentals: i64,
    pub active_rentals: i64,
    pub pending_requests: i64,
    pub rentals_by_status: Vec<StatEntry>,
    pub most_borrowed: Vec<MostBorrowedItem>,
}

/// Reminder sweep result
#[derive(Serialize, ToSchema)]
pub struct ReminderSweepResponse {
    pub sent: u32,
}

/// Admin dashboard summary (staff only)
#[utoipa::path(
    get,
    path = "/reports/dashboard",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardReport),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DashboardReport>> {
    claims.require_staff()?;

    let report = state.services.reports.dashboard().await?;
    Ok(Json(report))
}

/// Items report as PDF (staff only)
#[utoipa::path(
    get,
    path = "/reports/items/pdf",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn items_pdf(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Response> {
    claims.require_staff()?;

    let table = state.services.reports.items_table().await?;
    let bytes = reports::pdf::render(&table)?;
    Ok(document_response("items_report.pdf", PDF_MIME, bytes))
}

/// Items report as Excel (staff only)
#[utoipa::path(
    get,
    path = "/reports/items/excel",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Excel workbook"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn items_excel(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Response> {
    claims.require_staff()?;

    let table = state.services.reports.items_table().await?;
    let bytes = reports::excel::render(&table)?;
    Ok(document_response("items_report.xlsx", XLSX_MIME, bytes))
}

/// Rentals report as PDF (staff only)
#[utoipa::path(
    get,
    path = "/reports/rentals/pdf",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn rentals_pdf(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Response> {
    claims.require_staff()?;

    let table = state.services.reports.rentals_table().await?;
    let bytes = reports::pdf::render(&table)?;
    Ok(document_response("rentals_report.pdf", PDF_MIME, bytes))
}

/// Rentals report as Excel (staff only)
#[utoipa::path(
    get,
    path = "/reports/rentals/excel",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Excel workbook"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn rentals_excel(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Response> {
    claims.require_staff()?;

    let table = state.services.reports.rentals_table().await?;
    let bytes = reports::excel::render(&table)?;
    Ok(document_response("rentals_report.xlsx", XLSX_MIME, bytes))
}

/// Users report as PDF (staff only)
#[utoipa::path(
    get,
    path = "/reports/users/pdf",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn users_pdf(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Response> {
    claims.require_staff()?;

    let table = state.services.reports.users_table().await?;
    let bytes = reports::pdf::render(&table)?;
    Ok(document_response("users_report.pdf", PDF_MIME, bytes))
}

/// Users report as Excel (staff only)
#[utoipa::path(
    get,
    path = "/reports/users/excel",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Excel workbook"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn users_excel(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Response> {
    claims.require_staff()?;

    let table = state.services.reports.users_table().await?;
    let bytes = reports::excel::render(&table)?;
    Ok(document_response("users_report.xlsx", XLSX_MIME, bytes))
}

/// Trigger the return-reminder sweep (staff only)
#[utoipa::path(
    post,
    path = "/reports/reminders",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reminders sent", body = ReminderSweepResponse),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn send_reminders(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ReminderSweepResponse>> {
    claims.require_staff()?;

    let sent = state.services.rentals.send_return_reminders().await?;
    Ok(Json(ReminderSweepResponse { sent }))
}

fn document_response(filename: &str, content_type: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}
