//! Trip planning backend.
//!
//! Trips own an ordered list of stops. The interesting part lives in
//! [`schedule`]: the rules deciding whether a stop fits into its trip.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod owner;
pub mod routes;
pub mod schedule;
pub mod services;
pub mod state;
