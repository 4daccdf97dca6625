//! Candidates command - show which constructors and factories would be tried

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use specimen::Engine;
use specimen_core::catalog::{MethodKind, TypeCatalog};
use specimen_core::config::ConstructorQueryKind;
use specimen_core::methods::Method;

use super::{base_config, parse_target};

#[derive(Parser, Debug)]
pub struct CandidatesCmd {
    /// Type to inspect
    pub target: String,

    /// Order constructors by most parameters first
    #[arg(long)]
    pub greedy: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CandidateInfo {
    name: String,
    kind: &'static str,
    parameters: Vec<String>,
}

impl CandidatesCmd {
    pub fn execute(&self, catalog: TypeCatalog) -> Result<()> {
        let target = parse_target(&self.target)?;
        let mut config = base_config()?;
        if self.greedy {
            config = config.with_constructor_query(ConstructorQueryKind::Greedy);
        }
        let engine = Engine::builder()
            .with_catalog(catalog)
            .with_config(config)
            .build();

        let candidates: Vec<CandidateInfo> = engine
            .candidates(&target)
            .iter()
            .map(|m| CandidateInfo {
                name: m.name().to_string(),
                kind: match m.kind() {
                    MethodKind::Constructor => "constructor",
                    MethodKind::Factory => "factory",
                },
                parameters: m
                    .parameters()
                    .iter()
                    .map(|p| format!("{}: {}", p.name, p.ty))
                    .collect(),
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        } else if candidates.is_empty() {
            println!("No candidates for {}", target);
        } else {
            for (i, c) in candidates.iter().enumerate() {
                println!("{}. {} [{}] ({})", i + 1, c.name, c.kind, c.parameters.join(", "));
            }
        }
        Ok(())
    }
}
