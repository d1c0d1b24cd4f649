pub(crate) mod backend;
pub(crate) mod fingerprint;
pub(crate) mod model;
