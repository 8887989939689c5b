//! Route handlers. Each returns an HTML fragment (or a plain string for the
//! bridge-facing routes) for the request it was dispatched.

pub mod cards;
pub mod util;
