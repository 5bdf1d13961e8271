//! perspectra-web: HTTP API for Perspectra.
//! Serves:
//!   - Registration, login and bearer-token sessions
//!   - Learning profiles and onboarding
//!   - The problem catalogue
//!   - Code review, tutoring and hints
//!   - The concept graph, recommendations and learning paths
//!   - Per-user server-sent events

pub mod auth;
pub mod background;
pub mod bootstrap;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod seed;
pub mod sse;
pub mod state;
pub mod telemetry;
