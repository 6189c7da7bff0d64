use crate::{config::AppConfig, db::DbPool, services::itinerary::Itinerary};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub itinerary: Itinerary,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        let itinerary = Itinerary::new(db.clone());
        Self {
            config,
            db,
            itinerary,
        }
    }
}
