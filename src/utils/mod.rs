//! Internal utilities.

pub(crate) mod retry;
