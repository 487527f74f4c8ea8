//! Domain model for the Permia leave-permit assistant.
//!
//! This crate holds everything the pipeline treats as data: the permit
//! catalog and its lookup indexes, the kinship/medical knowledge tables, the
//! staff-role enumeration, and the startup configuration object. The
//! query-understanding pipeline itself lives in `permia-agent`.

pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod knowledge;

pub use catalog::{
    Catalog, CatalogError, FaqEntry, PermitCode, PermitSummary, PolicyDocument, Role,
};
pub use config::{AssistantConfig, ConfigError, ConfigOverrides, GenerationConfig, LoadOptions};
