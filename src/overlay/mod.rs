pub(crate) mod drag;
pub(crate) mod model;
