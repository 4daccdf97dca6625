//! CLI subcommand implementations for specimen

pub mod candidates;
pub mod graph;
pub mod resolve;

use anyhow::{Context, Result};
use specimen::CatalogSchema;
use specimen_core::catalog::TypeCatalog;
use specimen_core::config::EngineConfig;
use specimen_types::{parse_type_ref, TypeRef};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn load_catalog(path: Option<&Path>) -> Result<TypeCatalog> {
    match path {
        Some(path) => CatalogSchema::load(path)?.into_catalog(),
        None => Ok(TypeCatalog::with_well_known()),
    }
}

pub fn parse_target(ty: &str) -> Result<TypeRef> {
    parse_type_ref(ty).with_context(|| format!("Invalid type '{}'", ty))
}

/// Environment overrides first; flags given on the command line win.
pub fn base_config() -> Result<EngineConfig> {
    EngineConfig::from_env().context("Invalid SPECIMEN_* environment override")
}
