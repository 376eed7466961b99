//! Unique visitors data model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Validated parameters for the unique-visitors aggregation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UniqueVisitorsParams {
    /// Number of top countries considered
    #[validate(range(min = 1, message = "Limit must be at least 1"))]
    pub limit: i64,
    /// Start of the time window (inclusive)
    pub from: DateTime<Utc>,
    /// End of the time window (inclusive)
    pub until: DateTime<Utc>,
}

/// One aggregated cell: distinct visitors for a country at an hour of day.
///
/// `hour` runs 1-24 once the service has remapped the engine's raw 0 to 24.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UniqueVisitorsRow {
    pub country: String,
    pub hour: u8,
    pub value: u64,
}

/// Date-range selector offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    LastDay,
    #[default]
    LastWeek,
    LastMonth,
    LastYear,
}

impl DateRange {
    /// Day offset from now covered by this range
    pub fn days(self) -> i64 {
        match self {
            DateRange::LastDay => 1,
            DateRange::LastWeek => 7,
            DateRange::LastMonth => 30,
            DateRange::LastYear => 365,
        }
    }

    /// Parse a query-string value; unknown values yield `None` so the caller
    /// can fall back to the default range.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "last_day" => Some(DateRange::LastDay),
            "last_week" => Some(DateRange::LastWeek),
            "last_month" => Some(DateRange::LastMonth),
            "last_year" => Some(DateRange::LastYear),
            _ => None,
        }
    }

    /// Start of the window: the range's day offset back from `now`,
    /// truncated to midnight UTC.
    pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        (now - Duration::days(self.days()))
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
    }
}
