use serde::Serialize;
use time::PrimitiveDateTime;

use crate::db::models::Evaluation;
use crate::db::types::{AuthControl, EvaluationState};
use crate::services::access::AccessDecision;

#[derive(Debug, Clone)]
pub(crate) struct NewTemplate {
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) items: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct NewEvaluation {
    pub(crate) template_id: String,
    pub(crate) eid: Option<String>,
    pub(crate) title: String,
    pub(crate) instructions: Option<String>,
    pub(crate) start_date: PrimitiveDateTime,
    pub(crate) due_date: Option<PrimitiveDateTime>,
    pub(crate) stop_date: Option<PrimitiveDateTime>,
    pub(crate) view_date: Option<PrimitiveDateTime>,
    pub(crate) instructors_date: Option<PrimitiveDateTime>,
    pub(crate) students_date: Option<PrimitiveDateTime>,
    pub(crate) reminder_days: i32,
    pub(crate) results_private: bool,
    pub(crate) auth_control: AuthControl,
    pub(crate) modify_responses_allowed: bool,
    pub(crate) blank_responses_allowed: bool,
}

/// Partial edit of an evaluation. Outer `None` leaves a field untouched; for
/// optional dates `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub(crate) struct EvaluationUpdate {
    pub(crate) title: Option<String>,
    pub(crate) instructions: Option<Option<String>>,
    pub(crate) start_date: Option<PrimitiveDateTime>,
    pub(crate) due_date: Option<Option<PrimitiveDateTime>>,
    pub(crate) stop_date: Option<Option<PrimitiveDateTime>>,
    pub(crate) view_date: Option<Option<PrimitiveDateTime>>,
    pub(crate) instructors_date: Option<Option<PrimitiveDateTime>>,
    pub(crate) students_date: Option<Option<PrimitiveDateTime>>,
    pub(crate) reminder_days: Option<i32>,
    pub(crate) results_private: Option<bool>,
    pub(crate) auth_control: Option<AuthControl>,
    pub(crate) modify_responses_allowed: Option<bool>,
    pub(crate) blank_responses_allowed: Option<bool>,
}

fn assign<T: PartialEq>(
    slot: &mut T,
    value: Option<T>,
    name: &'static str,
    changed: &mut Vec<&'static str>,
) {
    if let Some(value) = value {
        if *slot != value {
            *slot = value;
            changed.push(name);
        }
    }
}

impl EvaluationUpdate {
    /// Applies the edit and returns the names of fields whose value changed.
    pub(crate) fn apply_to(self, evaluation: &mut Evaluation) -> Vec<&'static str> {
        let mut changed = Vec::new();
        assign(&mut evaluation.title, self.title, "title", &mut changed);
        assign(&mut evaluation.instructions, self.instructions, "instructions", &mut changed);
        assign(&mut evaluation.start_date, self.start_date, "start_date", &mut changed);
        assign(&mut evaluation.due_date, self.due_date, "due_date", &mut changed);
        assign(&mut evaluation.stop_date, self.stop_date, "stop_date", &mut changed);
        assign(&mut evaluation.view_date, self.view_date, "view_date", &mut changed);
        assign(
            &mut evaluation.instructors_date,
            self.instructors_date,
            "instructors_date",
            &mut changed,
        );
        assign(&mut evaluation.students_date, self.students_date, "students_date", &mut changed);
        assign(&mut evaluation.reminder_days, self.reminder_days, "reminder_days", &mut changed);
        assign(
            &mut evaluation.results_private,
            self.results_private,
            "results_private",
            &mut changed,
        );
        assign(&mut evaluation.auth_control, self.auth_control, "auth_control", &mut changed);
        assign(
            &mut evaluation.modify_responses_allowed,
            self.modify_responses_allowed,
            "modify_responses_allowed",
            &mut changed,
        );
        assign(
            &mut evaluation.blank_responses_allowed,
            self.blank_responses_allowed,
            "blank_responses_allowed",
            &mut changed,
        );
        changed
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NewAnswer {
    pub(crate) item_id: String,
    pub(crate) numeric_value: Option<i32>,
    pub(crate) text_value: Option<String>,
}

impl NewAnswer {
    pub(crate) fn is_blank(&self) -> bool {
        self.numeric_value.is_none()
            && self.text_value.as_deref().map(str::trim).unwrap_or_default().is_empty()
    }
}

/// What an actor may do with one evaluation right now.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct EvaluationPermissions {
    pub(crate) evaluation_id: String,
    pub(crate) state: EvaluationState,
    pub(crate) decisions: Vec<AccessDecision>,
}
