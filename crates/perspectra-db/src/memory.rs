//! In-memory store behind `tokio::sync::RwLock`.

use std::collections::HashMap;

use async_trait::async_trait;
use perspectra_common::{user::normalize_email, Concept, ConceptEdge, Problem, Profile, Review, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DbError, Result};
use crate::repository::{
    ConceptRepository, ProblemFilter, ProblemRepository, ProfileRepository, ReviewRepository,
    UserRepository,
};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    profiles: RwLock<HashMap<Uuid, Profile>>,
    problems: RwLock<HashMap<String, Problem>>,
    reviews: RwLock<Vec<Review>>,
    catalog: RwLock<(Vec<Concept>, Vec<ConceptEdge>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DbError::Duplicate("User".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        Ok(self.users.read().await.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn save(&self, profile: &Profile) -> Result<()> {
        self.profiles.write().await.insert(profile.user_id, profile.clone());
        Ok(())
    }
}

#[async_trait]
impl ProblemRepository for MemoryStore {
    async fn list(&self, filter: &ProblemFilter) -> Result<Vec<Problem>> {
        let problems = self.problems.read().await;
        let mut out: Vec<Problem> = problems.values().filter(|p| filter.matches(p)).cloned().collect();
        out.sort_by(|a, b| a.difficulty.cmp(&b.difficulty).then_with(|| a.id.cmp(&b.id)));
        out.truncate(filter.limit);
        Ok(out)
    }

    async fn get(&self, id: &str) -> Result<Option<Problem>> {
        Ok(self.problems.read().await.get(id).cloned())
    }

    async fn replace_all(&self, problems: &[Problem]) -> Result<usize> {
        let mut table = self.problems.write().await;
        table.clear();
        table.extend(problems.iter().map(|p| (p.id.clone(), p.clone())));
        Ok(table.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.problems.read().await.len())
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn insert(&self, review: &Review) -> Result<()> {
        self.reviews.write().await.push(review.clone());
        Ok(())
    }

    async fn latest_for_problem(&self, user_id: Uuid, problem_id: &str) -> Result<Option<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .filter(|r| r.user_id == user_id && r.problem_id == problem_id)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn recent(&self, user_id: Uuid, limit: usize) -> Result<Vec<Review>> {
        let reviews = self.reviews.read().await;
        let mut mine: Vec<Review> = reviews.iter().filter(|r| r.user_id == user_id).cloned().collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine.truncate(limit);
        Ok(mine)
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<usize> {
        Ok(self.reviews.read().await.iter().filter(|r| r.user_id == user_id).count())
    }
}

#[async_trait]
impl ConceptRepository for MemoryStore {
    async fn replace_all(&self, concepts: &[Concept], edges: &[ConceptEdge]) -> Result<(usize, usize)> {
        let mut catalog = self.catalog.write().await;
        let mut concepts = concepts.to_vec();
        concepts.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.id.cmp(&b.id)));
        *catalog = (concepts, edges.to_vec());
        Ok((catalog.0.len(), catalog.1.len()))
    }

    async fn concepts(&self) -> Result<Vec<Concept>> {
        Ok(self.catalog.read().await.0.clone())
    }

    async fn edges(&self) -> Result<Vec<ConceptEdge>> {
        Ok(self.catalog.read().await.1.clone())
    }
}
