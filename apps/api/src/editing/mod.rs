//! Editable report state: one report at a time, edited in place and persisted
//! after every change.

pub mod handlers;
pub mod ops;
pub mod session;
pub mod store;
