//! Infrastructure layer: movie storage backends and configuration.

pub mod config;
pub mod repository;


pub use config::{AppConfig, BackendKind, ConfigError, MongoConfig};
pub use repository::{
    InMemoryMovieRepository, MongoMovieRepository, MovieRepository, MovieUpdate, Pagination,
    RepositoryError,
};
