//! Route handlers, one module per resource.

pub mod candidates;
pub mod sessions;
pub mod users;
