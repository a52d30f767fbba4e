use std::sync::Arc;
use trekflow_core::TbrRepository;
use trekflow_store::BusinessRules;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TbrRepository>,
    pub rules: BusinessRules,
}
