use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use validator::Validate;

use crate::core::time::{format_optional, format_primitive};
use crate::db::models::{AssignGroup, EvalGroup, Evaluation};
use crate::db::types::{AuthControl, EvaluationState, GroupType};
use crate::schemas::{
    deserialize_datetime, deserialize_nullable_datetime, deserialize_nullable_string,
    deserialize_optional_datetime,
};
use crate::services::access::AccessDecision;
use crate::services::evaluations::types::{EvaluationUpdate, NewEvaluation};

fn default_auth_control() -> AuthControl {
    AuthControl::Required
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EvaluationCreate {
    #[validate(length(min = 1, message = "template_id must not be empty"))]
    pub(crate) template_id: String,
    #[serde(default)]
    pub(crate) eid: Option<String>,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) instructions: Option<String>,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub(crate) start_date: PrimitiveDateTime,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub(crate) due_date: Option<PrimitiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub(crate) stop_date: Option<PrimitiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub(crate) view_date: Option<PrimitiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub(crate) instructors_date: Option<PrimitiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub(crate) students_date: Option<PrimitiveDateTime>,
    #[serde(default)]
    #[validate(range(min = 0, message = "reminder_days must be non-negative"))]
    pub(crate) reminder_days: i32,
    #[serde(default)]
    pub(crate) results_private: bool,
    #[serde(default = "default_auth_control")]
    pub(crate) auth_control: AuthControl,
    #[serde(default)]
    pub(crate) modify_responses_allowed: bool,
    #[serde(default)]
    pub(crate) blank_responses_allowed: bool,
}

impl From<EvaluationCreate> for NewEvaluation {
    fn from(payload: EvaluationCreate) -> Self {
        Self {
            template_id: payload.template_id,
            eid: payload.eid,
            title: payload.title.trim().to_string(),
            instructions: payload.instructions,
            start_date: payload.start_date,
            due_date: payload.due_date,
            stop_date: payload.stop_date,
            view_date: payload.view_date,
            instructors_date: payload.instructors_date,
            students_date: payload.students_date,
            reminder_days: payload.reminder_days,
            results_private: payload.results_private,
            auth_control: payload.auth_control,
            modify_responses_allowed: payload.modify_responses_allowed,
            blank_responses_allowed: payload.blank_responses_allowed,
        }
    }
}

/// Partial edit. Nullable columns distinguish an absent field from `null`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub(crate) struct EvaluationPatch {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub(crate) instructions: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub(crate) start_date: Option<PrimitiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_nullable_datetime")]
    pub(crate) due_date: Option<Option<PrimitiveDateTime>>,
    #[serde(default, deserialize_with = "deserialize_nullable_datetime")]
    pub(crate) stop_date: Option<Option<PrimitiveDateTime>>,
    #[serde(default, deserialize_with = "deserialize_nullable_datetime")]
    pub(crate) view_date: Option<Option<PrimitiveDateTime>>,
    #[serde(default, deserialize_with = "deserialize_nullable_datetime")]
    pub(crate) instructors_date: Option<Option<PrimitiveDateTime>>,
    #[serde(default, deserialize_with = "deserialize_nullable_datetime")]
    pub(crate) students_date: Option<Option<PrimitiveDateTime>>,
    #[serde(default)]
    #[validate(range(min = 0, message = "reminder_days must be non-negative"))]
    pub(crate) reminder_days: Option<i32>,
    #[serde(default)]
    pub(crate) results_private: Option<bool>,
    #[serde(default)]
    pub(crate) auth_control: Option<AuthControl>,
    #[serde(default)]
    pub(crate) modify_responses_allowed: Option<bool>,
    #[serde(default)]
    pub(crate) blank_responses_allowed: Option<bool>,
}

impl From<EvaluationPatch> for EvaluationUpdate {
    fn from(patch: EvaluationPatch) -> Self {
        Self {
            title: patch.title.map(|title| title.trim().to_string()),
            instructions: patch.instructions,
            start_date: patch.start_date,
            due_date: patch.due_date,
            stop_date: patch.stop_date,
            view_date: patch.view_date,
            instructors_date: patch.instructors_date,
            students_date: patch.students_date,
            reminder_days: patch.reminder_days,
            results_private: patch.results_private,
            auth_control: patch.auth_control,
            modify_responses_allowed: patch.modify_responses_allowed,
            blank_responses_allowed: patch.blank_responses_allowed,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationResponse {
    pub(crate) id: String,
    pub(crate) eid: Option<String>,
    pub(crate) template_id: String,
    pub(crate) owner_id: String,
    pub(crate) title: String,
    pub(crate) instructions: Option<String>,
    pub(crate) start_date: String,
    pub(crate) due_date: Option<String>,
    pub(crate) stop_date: Option<String>,
    pub(crate) view_date: Option<String>,
    pub(crate) instructors_date: Option<String>,
    pub(crate) students_date: Option<String>,
    pub(crate) reminder_days: i32,
    pub(crate) results_private: bool,
    pub(crate) auth_control: AuthControl,
    pub(crate) modify_responses_allowed: bool,
    pub(crate) blank_responses_allowed: bool,
    pub(crate) force_closed: bool,
    pub(crate) state: EvaluationState,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl EvaluationResponse {
    pub(crate) fn from_db(evaluation: Evaluation) -> Self {
        Self {
            id: evaluation.id,
            eid: evaluation.eid,
            template_id: evaluation.template_id,
            owner_id: evaluation.owner_id,
            title: evaluation.title,
            instructions: evaluation.instructions,
            start_date: format_primitive(evaluation.start_date),
            due_date: format_optional(evaluation.due_date),
            stop_date: format_optional(evaluation.stop_date),
            view_date: format_optional(evaluation.view_date),
            instructors_date: format_optional(evaluation.instructors_date),
            students_date: format_optional(evaluation.students_date),
            reminder_days: evaluation.reminder_days,
            results_private: evaluation.results_private,
            auth_control: evaluation.auth_control,
            modify_responses_allowed: evaluation.modify_responses_allowed,
            blank_responses_allowed: evaluation.blank_responses_allowed,
            force_closed: evaluation.force_closed,
            state: evaluation.state,
            created_at: format_primitive(evaluation.created_at),
            updated_at: format_primitive(evaluation.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StateResponse {
    pub(crate) evaluation_id: String,
    pub(crate) state: EvaluationState,
}

#[derive(Debug, Serialize)]
pub(crate) struct PermissionsResponse {
    pub(crate) evaluation_id: String,
    pub(crate) state: EvaluationState,
    pub(crate) decisions: Vec<AccessDecision>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssignGroupsRequest {
    #[validate(length(min = 1, message = "group_refs must not be empty"))]
    pub(crate) group_refs: Vec<String>,
    #[serde(default)]
    pub(crate) eid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GroupsQuery {
    #[serde(default)]
    pub(crate) include_unapproved: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignGroupResponse {
    pub(crate) id: String,
    pub(crate) eid: Option<String>,
    pub(crate) evaluation_id: String,
    pub(crate) group_ref: String,
    pub(crate) owner_id: String,
    pub(crate) instructor_approval: bool,
    pub(crate) created_at: String,
}

impl AssignGroupResponse {
    pub(crate) fn from_db(assignment: AssignGroup) -> Self {
        Self {
            id: assignment.id,
            eid: assignment.eid,
            evaluation_id: assignment.evaluation_id,
            group_ref: assignment.group_ref,
            owner_id: assignment.owner_id,
            instructor_approval: assignment.instructor_approval,
            created_at: format_primitive(assignment.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupResponse {
    pub(crate) group_ref: String,
    pub(crate) title: String,
    pub(crate) group_type: GroupType,
}

impl From<EvalGroup> for GroupResponse {
    fn from(group: EvalGroup) -> Self {
        Self { group_ref: group.group_ref, title: group.title, group_type: group.group_type }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationGroupsResponse {
    pub(crate) evaluation_id: String,
    pub(crate) assignments: Vec<AssignGroupResponse>,
    pub(crate) groups: Vec<GroupResponse>,
}
