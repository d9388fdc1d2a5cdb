//! openalex-cache: local relational cache for OpenAlex entities
//!
//! Fetches bibliometric entities (authors, concepts, funders, institutions,
//! publishers, topics) from the OpenAlex web API and persists them into a
//! normalized SQLite schema, reconstructing the original nested JSON
//! document on the way back out.

pub mod cli;
pub mod core;
