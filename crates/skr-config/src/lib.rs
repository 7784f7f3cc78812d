//! # skr-config
//!
//! Configuration for skr. A global document at `<config root>/skr/config.yaml`
//! is merged with the nearest project-local `.skr.yaml` / `config.yaml` found
//! by walking up from the working directory.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, KNOWN_AGENTS, agent_skills_dir};
