use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::{format_optional, format_primitive};
use crate::db::models::{Answer, Response};
use crate::services::evaluations::types::NewAnswer;

fn default_complete() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerPayload {
    pub(crate) item_id: String,
    #[serde(default)]
    pub(crate) numeric_value: Option<i32>,
    #[serde(default)]
    pub(crate) text_value: Option<String>,
}

impl From<AnswerPayload> for NewAnswer {
    fn from(payload: AnswerPayload) -> Self {
        Self {
            item_id: payload.item_id,
            numeric_value: payload.numeric_value,
            text_value: payload.text_value,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ResponseSubmit {
    #[validate(length(min = 1, message = "group_ref must not be empty"))]
    pub(crate) group_ref: String,
    #[serde(default)]
    pub(crate) answers: Vec<AnswerPayload>,
    #[serde(default = "default_complete")]
    pub(crate) complete: bool,
}

/// Query string for response listings. `group_refs` is comma separated.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponsesQuery {
    #[serde(default)]
    pub(crate) group_refs: Option<String>,
    #[serde(default)]
    pub(crate) completed: Option<bool>,
}

impl ResponsesQuery {
    pub(crate) fn group_refs(&self) -> Option<Vec<String>> {
        self.group_refs.as_deref().map(split_group_refs)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnswersQuery {
    #[serde(default)]
    pub(crate) group_refs: Option<String>,
}

impl AnswersQuery {
    pub(crate) fn group_refs(&self) -> Option<Vec<String>> {
        self.group_refs.as_deref().map(split_group_refs)
    }
}

fn split_group_refs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|group_ref| !group_ref.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponseRecord {
    pub(crate) id: String,
    pub(crate) evaluation_id: String,
    pub(crate) group_ref: String,
    pub(crate) owner_id: String,
    pub(crate) complete: bool,
    pub(crate) locked: bool,
    pub(crate) started_at: String,
    pub(crate) completed_at: Option<String>,
    pub(crate) updated_at: String,
}

impl ResponseRecord {
    pub(crate) fn from_db(response: Response) -> Self {
        Self {
            complete: response.is_complete(),
            id: response.id,
            evaluation_id: response.evaluation_id,
            group_ref: response.group_ref,
            owner_id: response.owner_id,
            locked: response.locked,
            started_at: format_primitive(response.started_at),
            completed_at: format_optional(response.completed_at),
            updated_at: format_primitive(response.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CountResponse {
    pub(crate) count: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerRecord {
    pub(crate) id: String,
    pub(crate) response_id: String,
    pub(crate) item_id: String,
    pub(crate) numeric_value: Option<i32>,
    pub(crate) text_value: Option<String>,
}

impl From<Answer> for AnswerRecord {
    fn from(answer: Answer) -> Self {
        Self {
            id: answer.id,
            response_id: answer.response_id,
            item_id: answer.item_id,
            numeric_value: answer.numeric_value,
            text_value: answer.text_value,
        }
    }
}
