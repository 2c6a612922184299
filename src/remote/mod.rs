//! Remote data service seams.
//!
//! The storefront owns no durable state. Listings live in a hosted table and
//! photos in a hosted bucket; both are reached through these traits.

mod supabase;

pub use supabase::SupabaseClient;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::errors::AppError;
use crate::models::{Listing, NewListing};

/// The listing table.
#[async_trait]
pub trait ListingTable: Send + Sync {
    /// All rows, newest (highest id) first.
    async fn list_newest_first(&self) -> Result<Vec<Listing>, AppError>;

    /// Insert one row. The service assigns the id.
    async fn insert(&self, listing: &NewListing) -> Result<(), AppError>;

    /// Delete the row with the given id. Deleting an id that no longer
    /// exists succeeds, matching the hosted table's filter-delete.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

/// The photo bucket.
#[async_trait]
pub trait ObjectBucket: Send + Sync {
    /// Store `bytes` under `key`.
    async fn upload(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError>;

    /// Stable public URL for a previously uploaded key.
    fn public_url(&self, key: &str) -> String;
}

/// Handles to both halves of the remote service.
#[derive(Clone)]
pub struct RemoteDataService {
    pub table: Arc<dyn ListingTable>,
    pub bucket: Arc<dyn ObjectBucket>,
}

impl RemoteDataService {
    pub fn new(table: Arc<dyn ListingTable>, bucket: Arc<dyn ObjectBucket>) -> Self {
        Self { table, bucket }
    }

    /// Use a single client for both the table and the bucket.
    pub fn hosted(client: SupabaseClient) -> Self {
        let client = Arc::new(client);
        Self {
            table: client.clone(),
            bucket: client,
        }
    }
}
