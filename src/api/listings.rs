//! Listing JSON endpoints.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::{ApiResponse, ApiResult};
use crate::errors::AppError;
use crate::inventory::filter_by_name;
use crate::models::Listing;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct ContactLink {
    pub id: i64,
    pub url: String,
}

/// GET /api/listings - Listings newest first, optionally filtered by name.
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> ApiResult<Vec<Listing>> {
    let listings = state
        .storefront
        .remote()
        .table
        .list_newest_first()
        .await?;

    let filtered = filter_by_name(&listings, &query.q)
        .into_iter()
        .cloned()
        .collect();
    Ok(ApiResponse::new(filtered))
}

/// GET /api/listings/{id}/contact - Messaging deep link for one listing.
pub async fn contact_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ContactLink> {
    let listings = state
        .storefront
        .remote()
        .table
        .list_newest_first()
        .await?;

    let listing = listings
        .iter()
        .find(|l| l.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Listing {} not found", id)))?;

    Ok(ApiResponse::new(ContactLink {
        id,
        url: state.storefront.contact_link(listing),
    }))
}
