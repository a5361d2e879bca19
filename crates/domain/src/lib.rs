//! crosspub domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `frontmatter`: YAML frontmatter splitting and article parsing
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Application use cases / business logic

pub mod frontmatter;
pub mod model;
pub mod ports;
pub mod usecases;

pub use model::*;
pub use ports::*;
