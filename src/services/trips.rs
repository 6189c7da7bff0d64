use chrono::Utc;
use tracing::info;

use crate::{
    db::DbPool,
    error::AppError,
    models::{Trip, TripDraft},
};

#[derive(Clone)]
pub struct TripStore {
    db: DbPool,
}

impl TripStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, owner_id: i64, draft: &TripDraft) -> Result<Trip, AppError> {
        let now = Utc::now();
        let trip = sqlx::query_as::<_, Trip>(
            r#"INSERT INTO trips (owner_id, title, start_date, end_date, image_uri, notes, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(owner_id)
        .bind(&draft.title)
        .bind(draft.dates.start())
        .bind(draft.dates.end())
        .bind(&draft.image_uri)
        .bind(&draft.notes)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        info!(trip_id = trip.id, owner_id, "trip created");
        Ok(trip)
    }

    pub async fn get(&self, trip_id: i64) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = ?")
            .bind(trip_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(trip)
    }

    /// Most recent trips first.
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(
            "SELECT * FROM trips WHERE owner_id = ? ORDER BY start_date DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(trips)
    }

    pub async fn update(&self, trip_id: i64, draft: &TripDraft) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"UPDATE trips
               SET title = ?, start_date = ?, end_date = ?, image_uri = ?, notes = ?, updated_at = ?
               WHERE id = ?
               RETURNING *"#,
        )
        .bind(&draft.title)
        .bind(draft.dates.start())
        .bind(draft.dates.end())
        .bind(&draft.image_uri)
        .bind(&draft.notes)
        .bind(Utc::now())
        .bind(trip_id)
        .fetch_optional(&self.db)
        .await?;
        if trip.is_some() {
            info!(trip_id, "trip updated");
        }
        Ok(trip)
    }

    /// Deletes the trip and, through the foreign key, all of its stops.
    pub async fn delete(&self, trip_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ?")
            .bind(trip_id)
            .execute(&self.db)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(trip_id, "trip deleted");
        }
        Ok(deleted)
    }
}
