//! Unique visitors query service

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    elastic::EsqlExecutor,
    error::{AppError, AppResult},
    models::unique_visitors::{UniqueVisitorsParams, UniqueVisitorsRow},
};

/// Row shape of the top-countries query
#[derive(Debug, Deserialize)]
struct CountryRow {
    country: String,
}

#[derive(Clone)]
pub struct UniqueVisitorsService {
    engine: Arc<dyn EsqlExecutor>,
    index: String,
}

impl UniqueVisitorsService {
    pub fn new(engine: Arc<dyn EsqlExecutor>, index: String) -> Self {
        Self { engine, index }
    }

    /// Aggregate distinct visitors per (country, hour of day) over the
    /// requested window, restricted to the dataset's top countries.
    pub async fn get_unique_visitors(
        &self,
        params: &UniqueVisitorsParams,
    ) -> AppResult<Vec<UniqueVisitorsRow>> {
        params.validate()?;

        // ES|QL has no joins or subqueries, so the top countries have to be
        // fetched up front and fed into the second query's IN filter. The
        // ranking runs over the whole dataset, not the requested window.
        let top_countries = format!(
            "FROM {}\n\
             | STATS value = COUNT_DISTINCT(clientip) BY country = geo.dest\n\
             | SORT value DESC\n\
             | KEEP country\n\
             | LIMIT ?",
            self.index
        );

        let rows = self
            .engine
            .query(&top_countries, vec![json!(params.limit)])
            .await?;
        let countries = rows
            .into_iter()
            .map(|row| serde_json::from_value::<CountryRow>(row).map(|r| r.country))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                AppError::Validation(format!("Malformed country row from engine: {}", e))
            })?;

        // An empty IN list is not valid ES|QL, and there is nothing to chart.
        if countries.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; countries.len()].join(", ");
        let hourly_breakdown = format!(
            "FROM {index}\n\
             | WHERE @timestamp >= ? AND @timestamp <= ? AND geo.dest IN ({placeholders})\n\
             | EVAL hour = DATE_EXTRACT(\"hour_of_day\", @timestamp), country = geo.dest\n\
             | KEEP country, hour, clientip\n\
             | STATS value = COUNT_DISTINCT(clientip) BY country, hour\n\
             | SORT value DESC\n\
             | KEEP country, hour, value",
            index = self.index,
            placeholders = placeholders
        );

        let mut query_params: Vec<Value> = vec![
            json!(params.from.to_rfc3339()),
            json!(params.until.to_rfc3339()),
        ];
        query_params.extend(countries.iter().map(|country| json!(country)));

        let rows = self.engine.query(&hourly_breakdown, query_params).await?;
        let mut data = rows
            .into_iter()
            .map(serde_json::from_value::<UniqueVisitorsRow>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                AppError::Validation(format!("Malformed visitor row from engine: {}", e))
            })?;

        // The chart's hour axis runs 1-24; the engine extracts 0-23.
        for row in &mut data {
            if row.hour == 0 {
                row.hour = 24;
            }
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elastic::MockEsqlExecutor;
    use chrono::{TimeZone, Utc};

    const INDEX: &str = "weblogs-test";

    fn test_params() -> UniqueVisitorsParams {
        UniqueVisitorsParams {
            limit: 25,
            from: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            until: Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        }
    }

    fn service(engine: MockEsqlExecutor) -> UniqueVisitorsService {
        UniqueVisitorsService::new(Arc::new(engine), INDEX.to_string())
    }

    #[tokio::test]
    async fn midnight_hour_is_remapped_to_twenty_four() {
        let mut engine = MockEsqlExecutor::new();
        engine
            .expect_query()
            .withf(|esql, params| esql.contains("LIMIT ?") && params == &vec![json!(25)])
            .times(1)
            .returning(|_, _| Ok(vec![json!({ "country": "US" }), json!({ "country": "CN" })]));
        engine
            .expect_query()
            .withf(|esql, _| esql.contains("IN (?, ?)"))
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    json!({ "country": "US", "hour": 0, "value": 42 }),
                    json!({ "country": "CN", "hour": 5, "value": 17 }),
                ])
            });

        let data = service(engine)
            .get_unique_visitors(&test_params())
            .await
            .unwrap();

        assert_eq!(
            data,
            vec![
                UniqueVisitorsRow {
                    country: "US".to_string(),
                    hour: 24,
                    value: 42
                },
                UniqueVisitorsRow {
                    country: "CN".to_string(),
                    hour: 5,
                    value: 17
                },
            ]
        );
    }

    #[tokio::test]
    async fn window_bounds_and_countries_are_bound_as_parameters() {
        let mut engine = MockEsqlExecutor::new();
        engine
            .expect_query()
            .withf(|esql, _| esql.contains("LIMIT ?"))
            .times(1)
            .returning(|_, _| Ok(vec![json!({ "country": "US" }), json!({ "country": "CN" })]));
        engine
            .expect_query()
            .withf(|esql, params| {
                esql.starts_with(&format!("FROM {}", INDEX))
                    && esql.contains("IN (?, ?)")
                    && params
                        == &vec![
                            json!("2024-01-01T00:00:00+00:00"),
                            json!("2024-01-08T00:00:00+00:00"),
                            json!("US"),
                            json!("CN"),
                        ]
            })
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let data = service(engine)
            .get_unique_visitors(&test_params())
            .await
            .unwrap();

        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn empty_country_set_short_circuits() {
        let mut engine = MockEsqlExecutor::new();
        // Only the top-countries query runs; a second call would panic the mock.
        engine
            .expect_query()
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let data = service(engine)
            .get_unique_visitors(&test_params())
            .await
            .unwrap();

        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn invalid_limit_is_rejected_before_any_query() {
        let engine = MockEsqlExecutor::new();

        let mut params = test_params();
        params.limit = 0;

        let err = service(engine)
            .get_unique_visitors(&params)
            .await
            .unwrap_err();

        match err {
            AppError::Validation(msg) => assert!(msg.contains("limit")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn engine_failure_propagates_unchanged() {
        let mut engine = MockEsqlExecutor::new();
        engine
            .expect_query()
            .times(1)
            .returning(|_, _| Err(AppError::Engine("connection refused".to_string())));

        let err = service(engine)
            .get_unique_visitors(&test_params())
            .await
            .unwrap_err();

        match err {
            AppError::Engine(msg) => assert!(msg.contains("connection refused")),
            other => panic!("expected engine error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_engine_row_is_a_validation_error() {
        let mut engine = MockEsqlExecutor::new();
        engine
            .expect_query()
            .withf(|esql, _| esql.contains("LIMIT ?"))
            .times(1)
            .returning(|_, _| Ok(vec![json!({ "country": "US" })]));
        engine
            .expect_query()
            .withf(|esql, _| esql.contains("IN (?)"))
            .times(1)
            .returning(|_, _| Ok(vec![json!({ "country": "US", "hour": "midnight" })]));

        let err = service(engine)
            .get_unique_visitors(&test_params())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
