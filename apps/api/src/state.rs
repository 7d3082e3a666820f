use std::sync::Arc;

use crate::clock::Clock;
use crate::journey::store::{Entitlements, ProgressStore};
use crate::journey::{Catalog, JourneyRules};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub progress: Arc<dyn ProgressStore>,
    /// Premium flag maintained by the payments webhook.
    pub entitlements: Arc<dyn Entitlements>,
    pub catalog: Arc<Catalog>,
    pub rules: JourneyRules,
    pub clock: Arc<dyn Clock>,
}
