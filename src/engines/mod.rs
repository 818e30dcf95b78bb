//! The three built-in [`crate::engine::RouteEngine`] implementations.

pub mod double_array;
pub mod regexp;
pub mod tst;
