//! Table definitions. Applied idempotently by [`crate::Database::initialize`].

pub const TABLE_USERS: &str = "users";
pub const TABLE_PROFILES: &str = "profiles";
pub const TABLE_PROBLEMS: &str = "problems";
pub const TABLE_REVIEWS: &str = "reviews";
pub const TABLE_CONCEPTS: &str = "concepts";
pub const TABLE_CONCEPT_EDGES: &str = "concept_edges";

pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        email         TEXT NOT NULL,
        name          TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_idx ON users (email)",
    r#"
    CREATE TABLE IF NOT EXISTS profiles (
        user_id    UUID PRIMARY KEY REFERENCES users (id) ON DELETE CASCADE,
        doc        JSONB NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS problems (
        id         TEXT PRIMARY KEY,
        difficulty SMALLINT NOT NULL,
        doc        JSONB NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id          UUID PRIMARY KEY,
        user_id     UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        problem_id  TEXT NOT NULL,
        fingerprint TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL,
        doc         JSONB NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS reviews_user_time_idx ON reviews (user_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS reviews_user_problem_idx ON reviews (user_id, problem_id, created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS concepts (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        tier        SMALLINT NOT NULL,
        difficulty  SMALLINT NOT NULL,
        description TEXT NOT NULL,
        subject     TEXT NOT NULL DEFAULT 'DSA'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS concept_edges (
        source TEXT NOT NULL REFERENCES concepts (id) ON DELETE CASCADE,
        target TEXT NOT NULL REFERENCES concepts (id) ON DELETE CASCADE,
        PRIMARY KEY (source, target)
    )
    "#,
];
