//! Resolve command - create a value and print it as JSON

use anyhow::{anyhow, Result};
use clap::Parser;
use specimen::Engine;
use specimen_core::catalog::TypeCatalog;
use specimen_core::config::{ConstructorQueryKind, RecursionPolicy};
use specimen_core::relays::SequencePolicy;

use super::{base_config, parse_target};

#[derive(Parser, Debug)]
pub struct ResolveCmd {
    /// Type to create, e.g. "Order" or "Map<string, List<i32>>"
    pub target: String,

    /// Items per collection
    #[arg(long)]
    pub count: Option<usize>,

    /// What to do when a type needs itself: throw, omit or null
    #[arg(long)]
    pub recursion: Option<RecursionPolicy>,

    /// Prefer constructors with the most parameters
    #[arg(long)]
    pub greedy: bool,

    /// Seed for ranged numbers
    #[arg(long)]
    pub seed: Option<u64>,

    /// Re-resolve sequences every time they are enumerated
    #[arg(long)]
    pub dynamic: bool,

    /// Create this many values instead of one
    #[arg(long)]
    pub many: Option<usize>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

impl ResolveCmd {
    pub fn execute(&self, catalog: TypeCatalog) -> Result<()> {
        let target = parse_target(&self.target)?;

        let mut config = base_config()?;
        if let Some(count) = self.count {
            config = config.with_repeat_count(count);
        }
        if let Some(policy) = self.recursion {
            config = config.with_recursion(policy);
        }
        if self.greedy {
            config = config.with_constructor_query(ConstructorQueryKind::Greedy);
        }
        if let Some(seed) = self.seed {
            config = config.with_random_seed(seed);
        }
        if self.dynamic {
            config = config.with_sequence_policy(SequencePolicy::Dynamic);
        }

        let engine = Engine::builder()
            .with_catalog(catalog)
            .with_config(config)
            .build();

        let value = match self.many {
            Some(n) => {
                let values = engine
                    .create_many(&target, n)
                    .map_err(|e| anyhow!("{}", e))?;
                serde_json::to_value(values)?
            }
            None => serde_json::to_value(engine.create(&target).map_err(|e| anyhow!("{}", e))?)?,
        };

        if self.compact {
            println!("{}", serde_json::to_string(&value)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        let disposed = engine.dispose_all();
        if disposed > 0 {
            eprintln!("Disposed {} tracked object(s)", disposed);
        }
        Ok(())
    }
}
