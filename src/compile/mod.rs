pub(crate) mod blend;
pub(crate) mod context;
pub(crate) mod driver;
pub(crate) mod hook;
pub(crate) mod layer;
pub(crate) mod params;
pub(crate) mod status;
