//! HTTP security layer.
//!
//! Request pipeline, outermost first: CORS, path normalization, request id,
//! then [`SecurityFilter`] which runs JWT extraction, OAuth2 logout and the
//! path-based authorization decision before routing.

pub mod cors;
pub mod filter;
pub mod path_pattern;
pub mod policy;

pub use cors::cors_policy;
pub use filter::SecurityFilter;
pub use path_pattern::PathPattern;
pub use policy::{Access, Decision, SecurityPolicy};
