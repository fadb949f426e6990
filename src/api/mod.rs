pub(crate) mod errors;
pub(crate) mod evaluations;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod responses;
pub(crate) mod router;
pub(crate) mod templates;
