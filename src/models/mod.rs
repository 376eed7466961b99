//! Data models for Vantage

pub mod chart;
pub mod unique_visitors;

// Re-export commonly used types
pub use chart::{ChartData, ChartTick, LineMarker};
pub use unique_visitors::{DateRange, UniqueVisitorsParams, UniqueVisitorsRow};
