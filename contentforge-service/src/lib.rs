//! ContentForge: tone & sentiment driven copy generation over HTTP.
//!
//! Generation is a deterministic template composer; results are persisted to
//! MongoDB when one is configured and reachable, and the API keeps answering
//! with degraded data when it is not.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
