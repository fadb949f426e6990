pub(crate) mod answers;
pub(crate) mod assign_groups;
pub(crate) mod directory;
pub(crate) mod evaluations;
pub(crate) mod health;
pub(crate) mod responses;
pub(crate) mod templates;
