//! talentfit-core: Assessment engine, scoring and job matching.
//!
//! This crate defines the data model, repository traits, and the session,
//! scoring and fit logic that the rest of talentfit builds on.

pub mod dataset;
pub mod engine;
pub mod error;
pub mod language;
pub mod matchmaker;
pub mod model;
pub mod profile;
pub mod report;
pub mod scoring;
pub mod selector;
pub mod session;
pub mod traits;
