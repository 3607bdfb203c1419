pub(crate) mod adjust;
pub(crate) mod document;
pub(crate) mod filters;
