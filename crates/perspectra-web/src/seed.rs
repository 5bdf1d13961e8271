//! Load the built-in catalog (concepts, dependency edges, problems) into a store.

use serde::Serialize;
use thiserror::Error;

use perspectra_db::{DbError, Store};
use perspectra_kg::{catalog, KgError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Catalog(#[from] KgError),

    #[error("Seed verification failed: expected {expected} {what}, found {found}")]
    Mismatch { what: &'static str, expected: usize, found: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub concepts: usize,
    pub edges: usize,
    pub problems: usize,
}

/// Clear and reload the catalog, then check the counts read back.
pub async fn seed(store: &Store) -> Result<SeedReport, SeedError> {
    let concepts = catalog::concepts();
    let edges = catalog::edges();
    let problems = catalog::problems()?;

    let (concept_count, edge_count) = store.concepts.replace_all(&concepts, &edges).await?;
    let problem_count = store.problems.replace_all(&problems).await?;
    tracing::info!(
        concepts = concept_count,
        edges = edge_count,
        problems = problem_count,
        "catalog seeded"
    );

    verify("concepts", concepts.len(), store.concepts.concepts().await?.len())?;
    verify("edges", edges.len(), store.concepts.edges().await?.len())?;
    verify("problems", problems.len(), store.problems.count().await?)?;

    Ok(SeedReport { concepts: concept_count, edges: edge_count, problems: problem_count })
}

fn verify(what: &'static str, expected: usize, found: usize) -> Result<(), SeedError> {
    if expected == found {
        Ok(())
    } else {
        Err(SeedError::Mismatch { what, expected, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_in_memory() {
        let store = Store::in_memory();
        let report = seed(&store).await.unwrap();
        assert_eq!(report, SeedReport { concepts: 30, edges: 42, problems: 50 });

        // Seeding twice replaces rather than duplicates.
        let again = seed(&store).await.unwrap();
        assert_eq!(again, report);
        assert_eq!(store.problems.count().await.unwrap(), 50);
    }
}
