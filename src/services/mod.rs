//! Business logic services

pub mod unique_visitors;

use std::sync::Arc;

use crate::{config::AppConfig, elastic::EsqlExecutor};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub unique_visitors: unique_visitors::UniqueVisitorsService,
}

impl Services {
    /// Create all services with the given analytics engine client
    pub fn new(config: &AppConfig, engine: Arc<dyn EsqlExecutor>) -> Self {
        Self {
            unique_visitors: unique_visitors::UniqueVisitorsService::new(
                engine,
                config.elastic.index.clone(),
            ),
        }
    }
}
