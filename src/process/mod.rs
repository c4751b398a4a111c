//! Process-table helpers used by batch cancellation.

pub(crate) mod tree;
