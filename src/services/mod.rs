pub(crate) mod access;
pub(crate) mod evaluations;
pub(crate) mod lifecycle;
pub(crate) mod modification_registry;
