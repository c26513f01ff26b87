//! Rental lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::rental::{CreateRental, RentalDetails},
};

use super::AuthenticatedUser;

/// Rental response with a status message
#[derive(Serialize, ToSchema)]
pub struct RentalResponse {
    pub message: String,
    pub rental: RentalDetails,
}

/// Request to borrow an item
#[utoipa::path(
    post,
    path = "/items/{id}/rent",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    request_body = CreateRental,
    responses(
        (status = 201, description = "Rental requested", body = RentalResponse),
        (status = 400, description = "Invalid dates"),
        (status = 404, description = "Item not found"),
        (status = 422, description = "Own item, unavailable, or duplicate request")
    )
)]
pub async fn request_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(item_id): Path<i32>,
    Json(request): Json<CreateRental>,
) -> AppResult<(StatusCode, Json<RentalResponse>)> {
    let rental = state
        .services
        .rentals
        .request(item_id, claims.user_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RentalResponse {
            message: "Rental request sent to the owner".to_string(),
            rental,
        }),
    ))
}

/// Accept a pending request (lender only)
#[utoipa::path(
    post,
    path = "/rentals/{id}/accept",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Request accepted", body = RentalResponse),
        (status = 403, description = "Not the lender"),
        (status = 404, description = "Rental not found"),
        (status = 422, description = "Not pending")
    )
)]
pub async fn accept_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RentalResponse>> {
    let rental = state.services.rentals.accept(id, claims.user_id).await?;
    Ok(Json(RentalResponse {
        message: "Rental request accepted".to_string(),
        rental,
    }))
}

/// Reject a pending request (lender only)
#[utoipa::path(
    post,
    path = "/rentals/{id}/reject",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Request rejected", body = RentalResponse),
        (status = 403, description = "Not the lender"),
        (status = 404, description = "Rental not found"),
        (status = 422, description = "Not pending")
    )
)]
pub async fn reject_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RentalResponse>> {
    let rental = state.services.rentals.reject(id, claims.user_id).await?;
    Ok(Json(RentalResponse {
        message: "Rental request rejected".to_string(),
        rental,
    }))
}

/// Record the hand-over of an approved rental (lender only)
#[utoipa::path(
    post,
    path = "/rentals/{id}/pickup",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Item handed over", body = RentalResponse),
        (status = 403, description = "Not the lender"),
        (status = 404, description = "Rental not found"),
        (status = 422, description = "Not approved")
    )
)]
pub async fn pickup_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RentalResponse>> {
    let rental = state.services.rentals.pickup(id, claims.user_id).await?;
    Ok(Json(RentalResponse {
        message: "Item marked as borrowed".to_string(),
        rental,
    }))
}

/// Record the return of a borrowed rental (lender only)
#[utoipa::path(
    post,
    path = "/rentals/{id}/return",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Item returned", body = RentalResponse),
        (status = 403, description = "Not the lender"),
        (status = 404, description = "Rental not found"),
        (status = 422, description = "Not borrowed")
    )
)]
pub async fn return_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RentalResponse>> {
    let rental = state.services.rentals.give_back(id, claims.user_id).await?;
    Ok(Json(RentalResponse {
        message: "Item marked as returned".to_string(),
        rental,
    }))
}

/// Cancel an own request before pickup (borrower only)
#[utoipa::path(
    post,
    path = "/rentals/{id}/cancel",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Request cancelled", body = RentalResponse),
        (status = 403, description = "Not the borrower"),
        (status = 404, description = "Rental not found"),
        (status = 422, description = "Already picked up or settled")
    )
)]
pub async fn cancel_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RentalResponse>> {
    let rental = state.services.rentals.cancel(id, claims.user_id).await?;
    Ok(Json(RentalResponse {
        message: "Rental request cancelled".to_string(),
        rental,
    }))
}

/// Rentals where the authenticated user is the borrower
#[utoipa::path(
    get,
    path = "/rentals/borrowed",
    tag = "rentals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "My rented items", body = Vec<RentalDetails>)
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RentalDetails>>> {
    let rentals = state.services.rentals.borrowed_items(claims.user_id).await?;
    Ok(Json(rentals))
}

/// Rentals where the authenticated user is the lender
#[utoipa::path(
    get,
    path = "/rentals/lent",
    tag = "rentals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "My lended items", body = Vec<RentalDetails>)
    )
)]
pub async fn my_lent(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RentalDetails>>> {
    let rentals = state.services.rentals.lended_items(claims.user_id).await?;
    Ok(Json(rentals))
}
