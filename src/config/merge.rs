//! Config composition: defaults, then sources in precedence order.

mod merge_policy;
pub mod service;
