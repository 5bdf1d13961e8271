//! PostgreSQL implementations of the repository traits.
//!
//! Profiles, problems and reviews are stored as JSONB documents next to the
//! columns used for lookups and ordering. Reviews are append-only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use perspectra_common::{user::normalize_email, Concept, ConceptEdge, Problem, Profile, Review, User};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{DbError, Result};
use crate::repository::{
    ConceptRepository, ProblemFilter, ProblemRepository, ProfileRepository, ReviewRepository,
    UserRepository,
};

// ── Users ─────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, "User"))?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }
}

// ── Profiles ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let doc: Option<Json<Profile>> =
            sqlx::query_scalar("SELECT doc FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doc.map(|Json(p)| p))
    }

    async fn save(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, doc, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
                SET doc = EXCLUDED.doc, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(profile.user_id)
        .bind(Json(profile))
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// ── Problems ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgProblemRepository {
    pool: PgPool,
}

impl PgProblemRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ProblemRepository for PgProblemRepository {
    async fn list(&self, filter: &ProblemFilter) -> Result<Vec<Problem>> {
        let docs: Vec<Json<Problem>> = sqlx::query_scalar(
            r#"
            SELECT doc FROM problems
            WHERE ($1::SMALLINT IS NULL OR difficulty = $1)
              AND ($2::TEXT IS NULL OR doc->'concept_ids' ? $2)
            ORDER BY difficulty, id
            LIMIT $3
            "#,
        )
        .bind(filter.difficulty.map(i16::from))
        .bind(filter.concept_id.as_deref())
        .bind(i64::try_from(filter.limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        Ok(docs.into_iter().map(|Json(p)| p).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Problem>> {
        let doc: Option<Json<Problem>> = sqlx::query_scalar("SELECT doc FROM problems WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc.map(|Json(p)| p))
    }

    async fn replace_all(&self, problems: &[Problem]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM problems").execute(&mut *tx).await?;
        for problem in problems {
            sqlx::query("INSERT INTO problems (id, difficulty, doc) VALUES ($1, $2, $3)")
                .bind(&problem.id)
                .bind(i16::from(problem.difficulty))
                .bind(Json(problem))
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::from_insert(e, "Problem"))?;
        }
        tx.commit().await?;
        tracing::debug!(count = problems.len(), "problems replaced");
        Ok(problems.len())
    }

    async fn count(&self) -> Result<usize> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM problems")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

// ── Reviews ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn insert(&self, review: &Review) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, user_id, problem_id, fingerprint, created_at, doc)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.id)
        .bind(review.user_id)
        .bind(&review.problem_id)
        .bind(&review.code_fingerprint)
        .bind(review.created_at)
        .bind(Json(review))
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, "Review"))?;
        Ok(())
    }

    async fn latest_for_problem(&self, user_id: Uuid, problem_id: &str) -> Result<Option<Review>> {
        let doc: Option<Json<Review>> = sqlx::query_scalar(
            r#"
            SELECT doc FROM reviews
            WHERE user_id = $1 AND problem_id = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(problem_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(doc.map(|Json(r)| r))
    }

    async fn recent(&self, user_id: Uuid, limit: usize) -> Result<Vec<Review>> {
        let docs: Vec<Json<Review>> = sqlx::query_scalar(
            "SELECT doc FROM reviews WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        Ok(docs.into_iter().map(|Json(r)| r).collect())
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<usize> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

// ── Concept catalog ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgConceptRepository {
    pool: PgPool,
}

impl PgConceptRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[derive(FromRow)]
struct ConceptRow {
    id: String,
    name: String,
    tier: i16,
    difficulty: i16,
    description: String,
    subject: String,
}

impl From<ConceptRow> for Concept {
    fn from(row: ConceptRow) -> Self {
        Concept {
            id: row.id,
            name: row.name,
            tier: u8::try_from(row.tier).unwrap_or(0),
            difficulty: u8::try_from(row.difficulty).unwrap_or(0),
            description: row.description,
            subject: row.subject,
        }
    }
}

#[async_trait]
impl ConceptRepository for PgConceptRepository {
    async fn replace_all(&self, concepts: &[Concept], edges: &[ConceptEdge]) -> Result<(usize, usize)> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM concept_edges").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM concepts").execute(&mut *tx).await?;

        for c in concepts {
            sqlx::query(
                r#"
                INSERT INTO concepts (id, name, tier, difficulty, description, subject)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&c.id)
            .bind(&c.name)
            .bind(i16::from(c.tier))
            .bind(i16::from(c.difficulty))
            .bind(&c.description)
            .bind(&c.subject)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::from_insert(e, "Concept"))?;
        }

        for e in edges {
            sqlx::query("INSERT INTO concept_edges (source, target) VALUES ($1, $2)")
                .bind(&e.source)
                .bind(&e.target)
                .execute(&mut *tx)
                .await
                .map_err(|err| DbError::from_insert(err, "Concept edge"))?;
        }

        tx.commit().await?;
        tracing::debug!(concepts = concepts.len(), edges = edges.len(), "concept catalog replaced");
        Ok((concepts.len(), edges.len()))
    }

    async fn concepts(&self) -> Result<Vec<Concept>> {
        let rows = sqlx::query_as::<_, ConceptRow>(
            "SELECT id, name, tier, difficulty, description, subject FROM concepts ORDER BY tier, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Concept::from).collect())
    }

    async fn edges(&self) -> Result<Vec<ConceptEdge>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT source, target FROM concept_edges ORDER BY source, target")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(source, target)| ConceptEdge { source, target })
            .collect())
    }
}
