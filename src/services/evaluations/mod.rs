//! Evaluation lifecycle and access-control service.
//!
//! Reads, permission checks and gated mutations over evaluations, their
//! group assignments and responses. Collaborators are reached through the
//! traits in [`store`], so the same service runs on Postgres in production
//! and on the in-memory directory in tests.

mod commands;
pub(crate) mod error;
mod permissions;
mod queries;
pub(crate) mod store;
pub(crate) mod types;


use std::sync::Arc;

use time::PrimitiveDateTime;

use crate::core::config::EvaluationSettings;
use crate::core::time::primitive_now_utc;
use crate::services::access::AccessPolicy;

pub(crate) use error::{ServiceError, ServiceResult};
use store::{EvaluationStore, GroupResolver, IdentityProvider};

#[derive(Clone)]
pub(crate) struct EvaluationService {
    store: Arc<dyn EvaluationStore>,
    identity: Arc<dyn IdentityProvider>,
    groups: Arc<dyn GroupResolver>,
    settings: EvaluationSettings,
}

impl EvaluationService {
    pub(crate) fn new(
        store: Arc<dyn EvaluationStore>,
        identity: Arc<dyn IdentityProvider>,
        groups: Arc<dyn GroupResolver>,
        settings: EvaluationSettings,
    ) -> Self {
        Self { store, identity, groups, settings }
    }

    pub(crate) fn store(&self) -> &dyn EvaluationStore {
        self.store.as_ref()
    }

    fn policy(&self, now: PrimitiveDateTime) -> AccessPolicy<'_> {
        AccessPolicy::new(self.store.as_ref(), self.identity.as_ref(), self.settings, now)
    }

    fn now(&self) -> PrimitiveDateTime {
        primitive_now_utc()
    }
}
