pub mod itinerary;
pub mod stops;
pub mod trips;
