use std::sync::Arc;

use crate::core::config::Settings;
use crate::services::evaluations::EvaluationService;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    evaluations: EvaluationService,
}

impl AppState {
    pub(crate) fn new(settings: Settings, evaluations: EvaluationService) -> Self {
        Self { inner: Arc::new(InnerState { settings, evaluations }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn evaluations(&self) -> &EvaluationService {
        &self.inner.evaluations
    }
}
