pub mod stop;
pub mod trip;

pub use stop::{Stop, StopDraft, StopInput};
pub use trip::{Trip, TripDraft, TripInput};
