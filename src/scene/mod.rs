pub(crate) mod query;
