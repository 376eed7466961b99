//! API handlers for Vantage REST endpoints

pub mod dashboard;
pub mod health;
pub mod openapi;
