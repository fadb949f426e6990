use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::db::types::EvaluationState;

/// Which evaluation fields stay editable in each lifecycle state.
///
/// A state without an entry is unrestricted. A state with an entry only
/// accepts the listed fields, so unknown or misspelled names are refused.
#[derive(Debug)]
pub(crate) struct ModificationRegistry {
    permitted: HashMap<EvaluationState, HashSet<&'static str>>,
}

const ACTIVE_FIELDS: &[&str] = &[
    "due_date",
    "stop_date",
    "view_date",
    "reminder_days",
    "results_private",
    "instructors_date",
    "students_date",
];

const DUE_FIELDS: &[&str] =
    &["stop_date", "view_date", "results_private", "instructors_date", "students_date"];

const CLOSED_FIELDS: &[&str] = &["view_date", "results_private", "instructors_date", "students_date"];

impl ModificationRegistry {
    pub(crate) fn new() -> Self {
        let mut permitted = HashMap::new();
        permitted.insert(EvaluationState::Active, ACTIVE_FIELDS.iter().copied().collect());
        permitted.insert(EvaluationState::Due, DUE_FIELDS.iter().copied().collect());
        permitted.insert(EvaluationState::Closed, CLOSED_FIELDS.iter().copied().collect());
        permitted.insert(EvaluationState::Viewable, HashSet::new());
        Self { permitted }
    }

    pub(crate) fn is_permitted_modification(&self, state: EvaluationState, field: &str) -> bool {
        match self.permitted.get(&state) {
            Some(fields) => fields.contains(field),
            None => true,
        }
    }

    /// First field of a proposed change set that may not be edited in `state`.
    pub(crate) fn first_forbidden<'a, I>(&self, state: EvaluationState, fields: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        fields.into_iter().find(|field| !self.is_permitted_modification(state, field))
    }
}

pub(crate) fn registry() -> &'static ModificationRegistry {
    static REGISTRY: OnceLock<ModificationRegistry> = OnceLock::new();
    REGISTRY.get_or_init(ModificationRegistry::new)
}

pub(crate) fn is_permitted_modification(state: EvaluationState, field: &str) -> bool {
    registry().is_permitted_modification(state, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVERY_FIELD: &[&str] = &[
        "title",
        "instructions",
        "template_id",
        "start_date",
        "due_date",
        "stop_date",
        "view_date",
        "instructors_date",
        "students_date",
        "reminder_days",
        "results_private",
        "auth_control",
        "modify_responses_allowed",
        "blank_responses_allowed",
    ];

    #[test]
    fn queued_evaluations_accept_any_field() {
        for field in EVERY_FIELD.iter().chain(["no_such_field"].iter()) {
            assert!(is_permitted_modification(EvaluationState::InQueue, field), "{field}");
        }
    }

    #[test]
    fn restrictive_states_follow_their_allow_list() {
        let cases = [
            (EvaluationState::Active, ACTIVE_FIELDS),
            (EvaluationState::Due, DUE_FIELDS),
            (EvaluationState::Closed, CLOSED_FIELDS),
            (EvaluationState::Viewable, &[][..]),
        ];

        for (state, allowed) in cases {
            for field in EVERY_FIELD {
                assert_eq!(
                    is_permitted_modification(state, field),
                    allowed.contains(field),
                    "{} / {field}",
                    state.as_str()
                );
            }
        }
    }

    #[test]
    fn unknown_field_names_are_refused_when_restricted() {
        for state in [
            EvaluationState::Active,
            EvaluationState::Due,
            EvaluationState::Closed,
            EvaluationState::Viewable,
        ] {
            assert!(!is_permitted_modification(state, "dueDate"));
            assert!(!is_permitted_modification(state, ""));
        }
    }

    #[test]
    fn viewable_rejects_everything() {
        assert!(EVERY_FIELD
            .iter()
            .all(|field| !is_permitted_modification(EvaluationState::Viewable, field)));
    }

    #[test]
    fn first_forbidden_reports_offending_field() {
        let registry = registry();
        assert_eq!(
            registry.first_forbidden(EvaluationState::Due, ["view_date", "title", "due_date"]),
            Some("title")
        );
        assert_eq!(registry.first_forbidden(EvaluationState::Closed, ["view_date"]), None);
        assert_eq!(registry.first_forbidden(EvaluationState::InQueue, ["title"]), None);
    }
}
