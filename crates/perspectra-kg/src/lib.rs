//! perspectra-kg: the DSA concept graph.
//!
//! - [`catalog`]: the built-in concepts, dependency edges and practice problems
//! - [`graph`]: in-memory graph with prerequisite / unlock lookups and search
//! - [`overlay`]: a learner's mastery projected onto the graph
//! - [`recommend`]: next concepts to study
//! - [`path`]: shortest learning path between two concepts
//! - [`layout`]: concentric-ring layout, camera transform and hit testing

pub mod catalog;
pub mod error;
pub mod graph;
pub mod layout;
pub mod overlay;
pub mod path;
pub mod recommend;

pub use error::KgError;
pub use graph::ConceptGraph;
pub use layout::{Camera, GraphLayout, Point};
pub use path::LearningPath;
pub use recommend::Recommendation;
