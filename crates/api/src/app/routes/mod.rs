pub mod movies;
pub mod system;
