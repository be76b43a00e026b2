//! FinChain Intelligence Network
//!
//! A multi-agent orchestrator that:
//! - Routes free-text queries to specialized financial agents
//! - Synthesizes per-agent insights into one source-attributed response
//! - Falls back to consulting every agent when no domain matches
//! - Degrades gracefully when an individual agent fails
//!
//! PIPELINE:
//! QUERY → ROUTE → DISPATCH → SYNTHESIZE

pub mod agents;
pub mod api;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod router;
pub mod synthesizer;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use orchestrator::{AgentRegistry, Orchestrator};
pub use router::{KeywordRouter, RelevanceClassifier, Router};
pub use synthesizer::Synthesizer;
