use chrono::Utc;
use tracing::info;

use crate::{
    db::DbPool,
    error::AppError,
    models::{Stop, StopDraft},
};

#[derive(Clone)]
pub struct StopStore {
    db: DbPool,
}

impl StopStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Stops in display order.
    pub async fn list_by_trip(&self, trip_id: i64) -> Result<Vec<Stop>, AppError> {
        let stops = sqlx::query_as::<_, Stop>(
            "SELECT * FROM stops WHERE trip_id = ? ORDER BY order_index ASC, start_date ASC",
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(stops)
    }

    pub async fn get(&self, stop_id: i64) -> Result<Option<Stop>, AppError> {
        let stop = sqlx::query_as::<_, Stop>("SELECT * FROM stops WHERE id = ?")
            .bind(stop_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(stop)
    }

    /// Appends a stop. Its `order_index` is the number of stops the trip
    /// had before the insert; deleted stops leave gaps that are never
    /// filled.
    pub async fn create(&self, trip_id: i64, draft: &StopDraft) -> Result<Stop, AppError> {
        let now = Utc::now();
        let stop = sqlx::query_as::<_, Stop>(
            r#"INSERT INTO stops (trip_id, name, latitude, longitude, start_date, end_date,
                                  description, image_uri, notes, order_index, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?,
                       (SELECT COUNT(*) FROM stops WHERE trip_id = ?), ?, ?)
               RETURNING *"#,
        )
        .bind(trip_id)
        .bind(&draft.name)
        .bind(draft.latitude)
        .bind(draft.longitude)
        .bind(draft.dates.start())
        .bind(draft.dates.end())
        .bind(&draft.description)
        .bind(&draft.image_uri)
        .bind(&draft.notes)
        .bind(trip_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        info!(stop_id = stop.id, trip_id, order_index = stop.order_index, "stop created");
        Ok(stop)
    }

    /// Rewrites the stop's fields. Its trip and `order_index` never change.
    pub async fn update(&self, stop_id: i64, draft: &StopDraft) -> Result<Option<Stop>, AppError> {
        let stop = sqlx::query_as::<_, Stop>(
            r#"UPDATE stops
               SET name = ?, latitude = ?, longitude = ?, start_date = ?, end_date = ?,
                   description = ?, image_uri = ?, notes = ?, updated_at = ?
               WHERE id = ?
               RETURNING *"#,
        )
        .bind(&draft.name)
        .bind(draft.latitude)
        .bind(draft.longitude)
        .bind(draft.dates.start())
        .bind(draft.dates.end())
        .bind(&draft.description)
        .bind(&draft.image_uri)
        .bind(&draft.notes)
        .bind(Utc::now())
        .bind(stop_id)
        .fetch_optional(&self.db)
        .await?;
        if stop.is_some() {
            info!(stop_id, "stop updated");
        }
        Ok(stop)
    }

    pub async fn delete(&self, stop_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM stops WHERE id = ?")
            .bind(stop_id)
            .execute(&self.db)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(stop_id, "stop deleted");
        }
        Ok(deleted)
    }
}
