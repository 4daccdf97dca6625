//! Graph command - print the default resolution graph

use anyhow::Result;
use clap::Parser;
use specimen::Engine;
use specimen_core::catalog::TypeCatalog;

use super::base_config;

#[derive(Parser, Debug)]
pub struct GraphCmd {}

impl GraphCmd {
    pub fn execute(&self, catalog: TypeCatalog) -> Result<()> {
        let engine = Engine::builder()
            .with_catalog(catalog)
            .with_config(base_config()?)
            .build();
        print!("{}", engine.describe());
        Ok(())
    }
}
