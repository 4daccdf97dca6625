//! Engine configuration.
//!
//! Every knob has a default that reproduces the classic behavior (three
//! items per collection, throw on recursion, fewest-parameter constructors
//! first). Values can be set in code with the `with_*` builders, loaded from
//! JSON through serde, or overlaid from `SPECIMEN_*` environment variables.

use crate::errors::{ResolutionError, ResolutionResult};
use crate::recursion::{
    NullRecursionHandler, OmitOnRecursionHandler, RecursionHandler, ThrowingRecursionHandler,
};
use crate::relays::{SequencePolicy, DEFAULT_REPEAT_COUNT};
use serde::{Deserialize, Serialize};
use specimen_types::env_utils::env_var_checked;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// What a recursion guard does when it sees a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecursionPolicy {
    /// Fail with a `RECURSION_CYCLE` error.
    #[default]
    Throw,
    /// Leave the recursive member out.
    Omit,
    /// Use the neutral value of the recursive type.
    Null,
}

impl RecursionPolicy {
    pub fn handler(self) -> Arc<dyn RecursionHandler> {
        match self {
            RecursionPolicy::Throw => Arc::new(ThrowingRecursionHandler),
            RecursionPolicy::Omit => Arc::new(OmitOnRecursionHandler),
            RecursionPolicy::Null => Arc::new(NullRecursionHandler),
        }
    }
}

impl FromStr for RecursionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "throw" => Ok(RecursionPolicy::Throw),
            "omit" => Ok(RecursionPolicy::Omit),
            "null" => Ok(RecursionPolicy::Null),
            other => Err(format!(
                "unknown recursion policy '{}' (expected throw, omit or null)",
                other
            )),
        }
    }
}

impl fmt::Display for RecursionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecursionPolicy::Throw => write!(f, "throw"),
            RecursionPolicy::Omit => write!(f, "omit"),
            RecursionPolicy::Null => write!(f, "null"),
        }
    }
}

/// Constructor ordering used for ordinary (non-collection) types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructorQueryKind {
    #[default]
    Modest,
    Greedy,
}

impl FromStr for ConstructorQueryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "modest" => Ok(ConstructorQueryKind::Modest),
            "greedy" => Ok(ConstructorQueryKind::Greedy),
            other => Err(format!(
                "unknown constructor query '{}' (expected modest or greedy)",
                other
            )),
        }
    }
}

impl fmt::Display for ConstructorQueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructorQueryKind::Modest => write!(f, "modest"),
            ConstructorQueryKind::Greedy => write!(f, "greedy"),
        }
    }
}

/// Settings for assembling the default builder graph.
///
/// # Example
///
/// ```
/// use specimen_core::config::{EngineConfig, RecursionPolicy};
///
/// let config = EngineConfig::default()
///     .with_repeat_count(5)
///     .with_recursion(RecursionPolicy::Omit)
///     .with_random_seed(42);
/// assert_eq!(config.repeat_count, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Items produced for an unspecified-count request (default: 3).
    pub repeat_count: usize,

    /// Cycle handling (default: throw).
    pub recursion: RecursionPolicy,

    /// Occurrences of a request already in flight before it counts as a
    /// cycle (default: 1).
    pub recursion_depth: usize,

    /// Whether sequences are materialized once or re-resolved on every
    /// enumeration (default: stable).
    pub sequence_policy: SequencePolicy,

    /// Constructor ordering for ordinary types (default: modest).
    pub constructor_query: ConstructorQueryKind,

    /// Fixed seed for ranged-number draws. `None` seeds from the OS.
    pub random_seed: Option<u64>,

    /// Wrap the graph in a disposal tracker (default: true).
    pub track_disposables: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            repeat_count: DEFAULT_REPEAT_COUNT,
            recursion: RecursionPolicy::Throw,
            recursion_depth: 1,
            sequence_policy: SequencePolicy::Stable,
            constructor_query: ConstructorQueryKind::Modest,
            random_seed: None,
            track_disposables: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with any `SPECIMEN_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Overlay `SPECIMEN_REPEAT_COUNT`, `SPECIMEN_RECURSION`,
    /// `SPECIMEN_RECURSION_DEPTH`, `SPECIMEN_SEQUENCE_POLICY`,
    /// `SPECIMEN_CONSTRUCTOR_QUERY` and `SPECIMEN_RANDOM_SEED`. Unset
    /// variables leave the current value alone; malformed ones are errors.
    pub fn with_env_overrides(mut self) -> anyhow::Result<Self> {
        if let Some(count) = env_override::<i64>("SPECIMEN_REPEAT_COUNT")? {
            self = self.try_with_repeat_count(count)?;
        }
        if let Some(policy) = env_override("SPECIMEN_RECURSION")? {
            self.recursion = policy;
        }
        if let Some(depth) = env_override("SPECIMEN_RECURSION_DEPTH")? {
            self = self.with_recursion_depth(depth);
        }
        if let Some(policy) = env_override("SPECIMEN_SEQUENCE_POLICY")? {
            self.sequence_policy = policy;
        }
        if let Some(kind) = env_override("SPECIMEN_CONSTRUCTOR_QUERY")? {
            self.constructor_query = kind;
        }
        if let Some(seed) = env_override("SPECIMEN_RANDOM_SEED")? {
            self.random_seed = Some(seed);
        }
        Ok(self)
    }

    pub fn with_repeat_count(mut self, count: usize) -> Self {
        self.repeat_count = count;
        self
    }

    /// Set the repeat count from signed input, rejecting negative values.
    pub fn try_with_repeat_count(mut self, count: i64) -> ResolutionResult<Self> {
        self.repeat_count = usize::try_from(count).map_err(|_| {
            ResolutionError::contract(format!("repeat count must not be negative, got {}", count))
        })?;
        Ok(self)
    }

    pub fn with_recursion(mut self, policy: RecursionPolicy) -> Self {
        self.recursion = policy;
        self
    }

    /// Depths below 1 are raised to 1.
    pub fn with_recursion_depth(mut self, depth: usize) -> Self {
        self.recursion_depth = depth.max(1);
        self
    }

    pub fn with_sequence_policy(mut self, policy: SequencePolicy) -> Self {
        self.sequence_policy = policy;
        self
    }

    pub fn with_constructor_query(mut self, kind: ConstructorQueryKind) -> Self {
        self.constructor_query = kind;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_disposal_tracking(mut self, enabled: bool) -> Self {
        self.track_disposables = enabled;
        self
    }
}

fn env_override<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    env_var_checked(key).map_err(anyhow::Error::msg)
}
