//! 应用共享状态

use rso_core::ReferenceTables;
use rso_database::ComplianceStore;
use std::sync::Arc;

/// 请求处理器共享的状态，启动时显式构造
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ComplianceStore>,
    pub reference: Arc<ReferenceTables>,
}

impl AppState {
    pub fn new(store: Arc<dyn ComplianceStore>, reference: ReferenceTables) -> Self {
        Self {
            store,
            reference: Arc::new(reference),
        }
    }
}
