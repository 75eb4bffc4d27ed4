//! Movie repository boundary.
//!
//! [`MovieRepository`] is the storage contract the HTTP layer talks to. Two
//! backends implement it with the same black-box behaviour:
//!
//! - [`InMemoryMovieRepository`]: process-local map, used for tests and dev.
//! - [`MongoMovieRepository`]: MongoDB collection, used in production.
//!
//! Known differences between the two:
//!
//! - `get_by_title` returns matches in insertion order in memory; MongoDB returns
//!   them in the cursor's natural order, which is not guaranteed to be stable.
//! - Unknown fields in an update are dropped in memory but written to the
//!   document by MongoDB.

pub mod in_memory;
pub mod mongo;
pub mod query;
pub mod r#trait;
pub mod update;

pub use in_memory::InMemoryMovieRepository;
pub use mongo::MongoMovieRepository;
pub use query::{DEFAULT_LIMIT, Pagination};
pub use r#trait::{MovieRepository, RepositoryError};
pub use update::{MovieUpdate, ValidatedUpdate};
