//! HTTP handlers for the ContentForge service.

pub mod diagnostics;
pub mod generate;
pub mod health;
pub mod recent;
pub mod root;
