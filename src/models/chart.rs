//! Chart data shapes and axis helpers shared with the dashboard front-end

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::unique_visitors::UniqueVisitorsRow,
};

/// A single axis tick: a value identifier and its display label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartTick {
    pub value: String,
    pub label: String,
}

impl ChartTick {
    /// Tick for a numeric axis value; the label is rounded for display.
    pub fn from_value(value: f64) -> Self {
        Self {
            value: value.to_string(),
            label: format!("{}", value.round() as i64),
        }
    }
}

/// One point in a chart series (heatmap cell: country row, hour column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartData {
    pub y_value: String,
    pub x_value: f64,
    pub value: f64,
}

impl From<&UniqueVisitorsRow> for ChartData {
    fn from(row: &UniqueVisitorsRow) -> Self {
        Self {
            y_value: row.country.clone(),
            x_value: row.hour as f64,
            value: row.value as f64,
        }
    }
}

/// An annotation line drawn at a percentage offset of the chart axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineMarker {
    pub percent: f64,
    pub dashed: bool,
}

/// Evenly spaced axis values from 0 to `max_value` inclusive.
///
/// Element `i` equals `max_value * i / (count - 1)`, so the sequence always
/// starts at 0 and ends at `max_value`. A single requested tick sits at the
/// axis maximum.
pub fn generate_interpolated_array(count: usize, max_value: f64) -> AppResult<Vec<f64>> {
    if count == 0 || max_value <= 0.0 {
        return Err(AppError::BadRequest(
            "Both count and max_value must be greater than 0".to_string(),
        ));
    }

    if count == 1 {
        return Ok(vec![max_value]);
    }

    Ok((0..count)
        .map(|i| max_value * i as f64 / (count - 1) as f64)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_ticks_to_one_hundred() {
        let values = generate_interpolated_array(5, 100.0).unwrap();
        assert_eq!(values, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn endpoints_and_monotonicity() {
        for count in 2..=12 {
            let values = generate_interpolated_array(count, 42.5).unwrap();
            assert_eq!(values.len(), count);
            assert_eq!(values[0], 0.0);
            assert_eq!(*values.last().unwrap(), 42.5);
            assert!(values.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn single_tick_sits_at_the_maximum() {
        assert_eq!(generate_interpolated_array(1, 7.0).unwrap(), vec![7.0]);
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(generate_interpolated_array(0, 10.0).is_err());
    }

    #[test]
    fn non_positive_max_value_is_rejected() {
        assert!(generate_interpolated_array(5, 0.0).is_err());
        assert!(generate_interpolated_array(5, -3.0).is_err());
    }

    #[test]
    fn tick_label_is_rounded() {
        let tick = ChartTick::from_value(33.333333333333336);
        assert_eq!(tick.value, "33.333333333333336");
        assert_eq!(tick.label, "33");
    }

    #[test]
    fn chart_data_from_visitor_row() {
        let row = UniqueVisitorsRow {
            country: "US".to_string(),
            hour: 14,
            value: 523,
        };
        let point = ChartData::from(&row);
        assert_eq!(point.y_value, "US");
        assert_eq!(point.x_value, 14.0);
        assert_eq!(point.value, 523.0);
    }

    #[test]
    fn line_marker_round_trips_through_json() {
        let marker = LineMarker {
            percent: 62.5,
            dashed: true,
        };
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json, serde_json::json!({ "percent": 62.5, "dashed": true }));
        let back: LineMarker = serde_json::from_value(json).unwrap();
        assert_eq!(back, marker);
    }
}
