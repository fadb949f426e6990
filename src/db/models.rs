use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{AuthControl, EvaluationState, GroupType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) display_name: String,
    pub(crate) is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Template {
    pub(crate) id: String,
    pub(crate) owner_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Item {
    pub(crate) id: String,
    pub(crate) template_id: String,
    pub(crate) text: String,
    pub(crate) order_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Evaluation {
    pub(crate) id: String,
    pub(crate) eid: Option<String>,
    pub(crate) template_id: String,
    pub(crate) owner_id: String,
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
    pub(crate) force_closed: bool,
    pub(crate) state: EvaluationState,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AssignGroup {
    pub(crate) id: String,
    pub(crate) eid: Option<String>,
    pub(crate) evaluation_id: String,
    pub(crate) group_ref: String,
    pub(crate) owner_id: String,
    pub(crate) instructor_approval: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AssignHierarchy {
    pub(crate) id: String,
    pub(crate) evaluation_id: String,
    pub(crate) node_id: String,
    pub(crate) owner_id: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Response {
    pub(crate) id: String,
    pub(crate) evaluation_id: String,
    pub(crate) group_ref: String,
    pub(crate) owner_id: String,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) completed_at: Option<PrimitiveDateTime>,
    pub(crate) locked: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

impl Response {
    pub(crate) fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Answer {
    pub(crate) id: String,
    pub(crate) response_id: String,
    pub(crate) item_id: String,
    pub(crate) numeric_value: Option<i32>,
    pub(crate) text_value: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub(crate) struct EvalGroup {
    pub(crate) group_ref: String,
    pub(crate) title: String,
    pub(crate) group_type: GroupType,
}

impl EvalGroup {
    /// Placeholder for references the directory does not know about.
    pub(crate) fn unknown(group_ref: &str) -> Self {
        Self {
            group_ref: group_ref.to_string(),
            title: format!("Unknown group {group_ref}"),
            group_type: GroupType::Unknown,
        }
    }
}
