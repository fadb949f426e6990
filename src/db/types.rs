use serde::{Deserialize, Serialize};
use sqlx::Type;

/// Lifecycle of an evaluation. Variants are declared in the order an
/// evaluation moves through them, so `Ord` follows the calendar.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "evaluationstate", rename_all = "snake_case")]
pub(crate) enum EvaluationState {
    InQueue,
    Active,
    Due,
    Closed,
    Viewable,
}

impl EvaluationState {
    pub(crate) const ALL: [EvaluationState; 5] =
        [Self::InQueue, Self::Active, Self::Due, Self::Closed, Self::Viewable];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::InQueue => "in_queue",
            Self::Active => "active",
            Self::Due => "due",
            Self::Closed => "closed",
            Self::Viewable => "viewable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "authcontrol", rename_all = "lowercase")]
pub(crate) enum AuthControl {
    Required,
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "grouptype", rename_all = "lowercase")]
pub(crate) enum GroupType {
    Site,
    Section,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "grouppermission", rename_all = "snake_case")]
pub(crate) enum GroupPermission {
    BeEvaluated,
    AssignEvaluation,
}

impl GroupPermission {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::BeEvaluated => "be_evaluated",
            Self::AssignEvaluation => "assign_evaluation",
        }
    }
}
