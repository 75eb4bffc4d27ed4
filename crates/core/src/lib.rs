//! `movietrack-core` — domain building blocks for the movie tracker.
//!
//! This crate contains **pure domain** types (no storage or transport concerns).

pub mod error;
pub mod id;
pub mod movie;

pub use error::{DomainError, DomainResult};
pub use id::MovieId;
pub use movie::{Movie, MoviePatch};
