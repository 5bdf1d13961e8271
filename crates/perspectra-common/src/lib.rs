//! perspectra-common: Shared models, errors, and mastery rules used across all Perspectra crates.

pub mod error;
pub mod user;
pub mod profile;
pub mod problem;
pub mod review;
pub mod concept;
pub mod mastery;

// Re-export commonly used types
pub use error::ApiError;
pub use user::{User, UserInfo};
pub use profile::{ExperienceLevel, LearningInsights, LearningStyle, LearningVelocity, Profile, ProfileUpdate};
pub use problem::{Problem, ProblemExample, ProblemSummary};
pub use review::{Review, ReviewHistoryEntry, ReviewOutcome, ReviewProfileUpdates};
pub use concept::{Concept, ConceptEdge, ConceptGraphView, StudentConceptNode};
pub use mastery::MasteryStatus;
