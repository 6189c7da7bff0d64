use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    db::DbPool,
    error::AppError,
    models::{Stop, StopInput, Trip, TripInput},
    schedule::{validate_trip, DateSpan, Dated, StopFieldErrors, StopScheduleValidator},
};

use super::{stops::StopStore, trips::TripStore};

/// Load, validate, then persist.
///
/// Every write that depends on a trip's current stop list runs under one
/// lock, so two saves can never both validate against the same stale list.
#[derive(Clone)]
pub struct Itinerary {
    trips: TripStore,
    stops: StopStore,
    write_lock: Arc<Mutex<()>>,
}

impl Itinerary {
    pub fn new(db: DbPool) -> Self {
        Self {
            trips: TripStore::new(db.clone()),
            stops: StopStore::new(db),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn trips(&self) -> &TripStore {
        &self.trips
    }

    pub fn stops(&self) -> &StopStore {
        &self.stops
    }

    /// The owner's trip, or `NotFound` if it is missing or belongs to
    /// someone else.
    pub async fn trip(&self, owner_id: i64, trip_id: i64) -> Result<Trip, AppError> {
        self.trips
            .get(trip_id)
            .await?
            .filter(|trip| trip.owner_id == owner_id)
            .ok_or(AppError::NotFound)
    }

    pub async fn trip_with_stops(
        &self,
        owner_id: i64,
        trip_id: i64,
    ) -> Result<(Trip, Vec<Stop>), AppError> {
        let trip = self.trip(owner_id, trip_id).await?;
        let stops = self.stops.list_by_trip(trip.id).await?;
        Ok((trip, stops))
    }

    pub async fn create_trip(&self, owner_id: i64, input: TripInput) -> Result<Trip, AppError> {
        let dates = validate_trip(&input.title, input.start, input.end)
            .map_err(AppError::InvalidTrip)?;
        self.trips.create(owner_id, &input.into_draft(dates)).await
    }

    /// Updates a trip's fields. Existing stops are not re-checked against
    /// the new dates.
    pub async fn update_trip(
        &self,
        owner_id: i64,
        trip_id: i64,
        input: TripInput,
    ) -> Result<Trip, AppError> {
        let dates = validate_trip(&input.title, input.start, input.end)
            .map_err(AppError::InvalidTrip)?;
        let _guard = self.write_lock.lock().await;
        self.trip(owner_id, trip_id).await?;
        self.trips
            .update(trip_id, &input.into_draft(dates))
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn remove_trip(&self, owner_id: i64, trip_id: i64) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.trip(owner_id, trip_id).await?;
        if self.trips.delete(trip_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    /// Validates a stop form without writing anything.
    pub async fn check_stop(
        &self,
        owner_id: i64,
        trip_id: i64,
        input: &StopInput,
        editing: Option<i64>,
    ) -> Result<StopFieldErrors, AppError> {
        let (trip, siblings) = self.trip_with_stops(owner_id, trip_id).await?;
        Ok(match schedule(&trip, &siblings, input, editing) {
            Ok(_) => StopFieldErrors::default(),
            Err(errors) => errors,
        })
    }

    pub async fn add_stop(
        &self,
        owner_id: i64,
        trip_id: i64,
        input: StopInput,
    ) -> Result<Stop, AppError> {
        let _guard = self.write_lock.lock().await;
        let (trip, siblings) = self.trip_with_stops(owner_id, trip_id).await?;
        let dates = schedule(&trip, &siblings, &input, None).map_err(AppError::InvalidStop)?;
        self.stops.create(trip.id, &input.into_draft(dates)).await
    }

    pub async fn edit_stop(
        &self,
        owner_id: i64,
        stop_id: i64,
        input: StopInput,
    ) -> Result<Stop, AppError> {
        let _guard = self.write_lock.lock().await;
        let stop = self.stops.get(stop_id).await?.ok_or(AppError::NotFound)?;
        let (trip, siblings) = self.trip_with_stops(owner_id, stop.trip_id).await?;
        let dates =
            schedule(&trip, &siblings, &input, Some(stop.id)).map_err(AppError::InvalidStop)?;
        self.stops
            .update(stop.id, &input.into_draft(dates))
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Removing a stop can only free up dates, so nothing is re-checked.
    pub async fn remove_stop(&self, owner_id: i64, stop_id: i64) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let stop = self.stops.get(stop_id).await?.ok_or(AppError::NotFound)?;
        self.trip(owner_id, stop.trip_id).await?;
        if self.stops.delete(stop.id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }
}

/// Runs the stop validator for `trip` and returns the accepted span.
fn schedule(
    trip: &Trip,
    siblings: &[Stop],
    input: &StopInput,
    editing: Option<i64>,
) -> Result<DateSpan, StopFieldErrors> {
    let mut validator = StopScheduleValidator::new(Some(trip.dates()), siblings);
    if let Some(stop_id) = editing {
        validator = validator.editing(stop_id);
    }
    let candidate = input.candidate();
    let errors = validator.validate(&candidate);
    debug!(
        trip_id = trip.id,
        ?editing,
        siblings = siblings.len(),
        admissible = errors.is_admissible(),
        "validated stop schedule"
    );
    errors.into_result()?;
    // An admissible candidate always has both dates in order.
    candidate.span().ok_or(errors)
}
