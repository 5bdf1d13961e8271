use std::sync::Arc;

use sqlx::PgPool;

use crate::memory::MemoryStore;
use crate::postgres::{
    PgConceptRepository, PgProblemRepository, PgProfileRepository, PgReviewRepository,
    PgUserRepository,
};
use crate::repository::{
    ConceptRepository, ProblemRepository, ProfileRepository, ReviewRepository, UserRepository,
};

/// The set of repositories a running server works against.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub problems: Arc<dyn ProblemRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub concepts: Arc<dyn ConceptRepository>,
    backend: &'static str,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            profiles: Arc::new(PgProfileRepository::new(pool.clone())),
            problems: Arc::new(PgProblemRepository::new(pool.clone())),
            reviews: Arc::new(PgReviewRepository::new(pool.clone())),
            concepts: Arc::new(PgConceptRepository::new(pool)),
            backend: "postgres",
        }
    }

    pub fn in_memory() -> Self {
        let mem = Arc::new(MemoryStore::new());
        Self {
            users: mem.clone(),
            profiles: mem.clone(),
            problems: mem.clone(),
            reviews: mem.clone(),
            concepts: mem,
            backend: "memory",
        }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }
}
