use std::sync::Arc;

use cadence_api::ApiClient;

/// Shared application context passed into resource controllers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub api: Arc<ApiClient>,
}

impl Context {
    /// Create a new application context.
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}
