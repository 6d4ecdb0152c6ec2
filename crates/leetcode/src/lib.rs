//! LeetCode HTTP adapter
//!
//! - **Catalog** (`catalog`) - `GET /api/problems/all/` listing every question slug
//! - **GraphQL** (`graphql`) - `questionData` query for a single question
//! - **Client** (`client`) - reqwest-backed `QuestionSource` used by the selector

pub mod catalog;
pub mod client;
pub mod graphql;

pub use client::{ClientError, LeetCodeClient};
