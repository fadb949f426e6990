use time::PrimitiveDateTime;

use crate::db::models::Evaluation;
use crate::db::types::EvaluationState;

/// The dates (and close override) that decide where an evaluation sits in
/// its lifecycle.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Schedule {
    pub(crate) start: PrimitiveDateTime,
    pub(crate) due: Option<PrimitiveDateTime>,
    pub(crate) stop: Option<PrimitiveDateTime>,
    pub(crate) view: Option<PrimitiveDateTime>,
    pub(crate) force_closed: bool,
}

impl Schedule {
    pub(crate) fn of(evaluation: &Evaluation) -> Self {
        Self {
            start: evaluation.start_date,
            due: evaluation.due_date,
            stop: evaluation.stop_date,
            view: evaluation.view_date,
            force_closed: evaluation.force_closed,
        }
    }

    fn effective_stop(&self) -> Option<PrimitiveDateTime> {
        self.stop.or(self.due)
    }

    fn effective_view(&self) -> Option<PrimitiveDateTime> {
        self.view.or_else(|| self.effective_stop())
    }

    /// End of the answering window. Without a due date the first later date
    /// closes it; with no dates at all the evaluation stays open.
    fn effective_due(&self) -> Option<PrimitiveDateTime> {
        self.due.or(self.stop).or(self.view)
    }

    pub(crate) fn state_at(&self, now: PrimitiveDateTime) -> EvaluationState {
        if now < self.start {
            return EvaluationState::InQueue;
        }

        let view = self.effective_view();

        if self.force_closed {
            return match view {
                Some(view) if now >= view => EvaluationState::Viewable,
                _ => EvaluationState::Closed,
            };
        }

        match self.effective_due() {
            None => return EvaluationState::Active,
            Some(due) if now < due => return EvaluationState::Active,
            Some(_) => {}
        }

        if self.effective_stop().is_some_and(|stop| now < stop) {
            return EvaluationState::Due;
        }

        if view.is_some_and(|view| now < view) {
            return EvaluationState::Closed;
        }

        EvaluationState::Viewable
    }
}

/// Lifecycle state of `evaluation` at `now`, computed from its dates only.
/// The cached `state` column is ignored.
pub(crate) fn derive_state(evaluation: &Evaluation, now: PrimitiveDateTime) -> EvaluationState {
    Schedule::of(evaluation).state_at(now)
}
