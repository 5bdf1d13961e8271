//! Repository traits. Handlers depend on these, never on a concrete store.

use async_trait::async_trait;
use perspectra_common::{Concept, ConceptEdge, Problem, Profile, ProfileUpdate, Review, User};
use uuid::Uuid;

use crate::error::{DbError, Result};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `Duplicate` if the email is taken.
    async fn create(&self, user: &User) -> Result<()>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>>;

    /// Insert or replace the whole profile document.
    async fn save(&self, profile: &Profile) -> Result<()>;

    /// Read-modify-write merge. Last write wins.
    async fn update(&self, user_id: Uuid, update: ProfileUpdate) -> Result<Profile> {
        let mut profile = self
            .get(user_id)
            .await?
            .ok_or_else(|| DbError::NotFound("Profile".to_string()))?;
        profile.apply(update);
        self.save(&profile).await?;
        Ok(profile)
    }
}

/// Problem list filter. Results are ordered by difficulty, then id.
#[derive(Debug, Clone, Default)]
pub struct ProblemFilter {
    pub difficulty: Option<u8>,
    pub concept_id: Option<String>,
    pub limit: usize,
}

impl ProblemFilter {
    pub fn matches(&self, problem: &Problem) -> bool {
        self.difficulty.map_or(true, |d| problem.difficulty == d)
            && self.concept_id.as_deref().map_or(true, |c| problem.covers(c))
    }
}

#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn list(&self, filter: &ProblemFilter) -> Result<Vec<Problem>>;

    async fn get(&self, id: &str) -> Result<Option<Problem>>;

    /// Clear the table and insert `problems`. Returns the number inserted.
    async fn replace_all(&self, problems: &[Problem]) -> Result<usize>;

    async fn count(&self) -> Result<usize>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert(&self, review: &Review) -> Result<()>;

    /// The user's most recent review of one problem.
    async fn latest_for_problem(&self, user_id: Uuid, problem_id: &str) -> Result<Option<Review>>;

    /// Newest first.
    async fn recent(&self, user_id: Uuid, limit: usize) -> Result<Vec<Review>>;

    async fn count_for_user(&self, user_id: Uuid) -> Result<usize>;
}

#[async_trait]
pub trait ConceptRepository: Send + Sync {
    /// Clear the catalog and insert concepts and edges.
    async fn replace_all(&self, concepts: &[Concept], edges: &[ConceptEdge]) -> Result<(usize, usize)>;

    /// Ordered by tier, then id.
    async fn concepts(&self) -> Result<Vec<Concept>>;

    async fn edges(&self) -> Result<Vec<ConceptEdge>>;
}
