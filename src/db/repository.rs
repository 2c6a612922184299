//! SQLite implementation of the listing table.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Condition, Listing, NewListing};
use crate::remote::ListingTable;

/// Database repository for listing rows.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingTable for Repository {
    async fn list_newest_first(&self) -> Result<Vec<Listing>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, price, year, condition, image_url FROM cars ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| listing_from_row(&row)).collect())
    }

    async fn insert(&self, listing: &NewListing) -> Result<(), AppError> {
        // year is bound as typed; column affinity turns digits into an integer
        sqlx::query(
            "INSERT INTO cars (name, price, year, condition, image_url) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&listing.name)
        .bind(&listing.price)
        .bind(&listing.year)
        .bind(listing.condition.as_str())
        .bind(&listing.image_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(id, "Delete matched no listing");
        }

        Ok(())
    }
}

fn listing_from_row(row: &sqlx::sqlite::SqliteRow) -> Listing {
    let year: Option<i64> = row.get("year");
    let condition: String = row.get("condition");

    Listing {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        year: year.and_then(|y| i32::try_from(y).ok()),
        condition: Condition::parse(&condition),
        image_url: row.get("image_url"),
    }
}
