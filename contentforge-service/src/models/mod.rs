//! Domain models for the ContentForge service.

pub mod generation;

pub use generation::{
    GenerationRequest, GenerationResult, RecentItem, StoredGeneration, StoredGenerationSummary,
    NOT_PERSISTED_ID,
};
