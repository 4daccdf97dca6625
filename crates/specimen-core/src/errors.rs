//! Resolution error types.
//!
//! Every failure that escapes a resolution is one of the [`ResolutionError`]
//! variants. Errors that concern a particular request carry the chain of
//! requests that led to it, outermost first, so a failure deep inside an
//! object graph can be traced back to what the caller originally asked for.

use specimen_types::{Request, RequestError, SequenceError};
use std::fmt;

/// Chain of requests from the outermost resolution to the failing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestPath(Vec<Request>);

impl RequestPath {
    pub fn new(requests: Vec<Request>) -> Self {
        Self(requests)
    }

    pub fn requests(&self) -> &[Request] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The outermost request.
    pub fn root(&self) -> Option<&Request> {
        self.0.first()
    }
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, request) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", request)?;
        }
        Ok(())
    }
}

/// Structured resolution failures.
#[derive(Debug, Clone)]
pub enum ResolutionError {
    /// UNSATISFIABLE: no builder in the graph could produce the request.
    Unsatisfiable {
        /// The request nobody handled
        request: Request,
        /// Resolution path at the point of failure
        path: RequestPath,
    },

    /// RECURSION_CYCLE: a request re-entered itself under the throwing policy.
    RecursionCycle {
        /// The request that closed the cycle
        request: Request,
        /// Resolution path including the cycle
        path: RequestPath,
    },

    /// TYPE_INFERENCE: generic method parameters could not be bound from the
    /// supplied arguments.
    TypeInference {
        /// Method whose type arguments are missing
        method: String,
        /// Generic parameters left unbound or bound inconsistently
        unbound: Vec<String>,
    },

    /// ILLEGAL_REQUEST: the request is refused outright, e.g. raw handles.
    IllegalRequest { request: Request, reason: String },

    /// CONTRACT_VIOLATION: a builder received or produced something outside
    /// its contract.
    ContractViolation { message: String },

    /// INVOCATION_FAILED: a constructor or factory body returned an error.
    Invocation { method: String, message: String },
}

impl ResolutionError {
    pub fn contract(message: impl Into<String>) -> Self {
        ResolutionError::ContractViolation {
            message: message.into(),
        }
    }

    pub fn invocation(method: impl Into<String>, message: impl fmt::Display) -> Self {
        ResolutionError::Invocation {
            method: method.into(),
            message: message.to_string(),
        }
    }

    /// Recover a resolution error that travelled through a lazily enumerated
    /// sequence; foreign errors become contract violations.
    pub fn from_sequence_error(err: SequenceError) -> Self {
        match err.downcast::<ResolutionError>() {
            Ok(inner) => *inner,
            Err(other) => ResolutionError::contract(other.to_string()),
        }
    }

    /// Short machine-readable category.
    pub fn code(&self) -> &'static str {
        match self {
            ResolutionError::Unsatisfiable { .. } => "UNSATISFIABLE",
            ResolutionError::RecursionCycle { .. } => "RECURSION_CYCLE",
            ResolutionError::TypeInference { .. } => "TYPE_INFERENCE",
            ResolutionError::IllegalRequest { .. } => "ILLEGAL_REQUEST",
            ResolutionError::ContractViolation { .. } => "CONTRACT_VIOLATION",
            ResolutionError::Invocation { .. } => "INVOCATION_FAILED",
        }
    }

    /// Resolution path, for the variants that record one.
    pub fn path(&self) -> Option<&RequestPath> {
        match self {
            ResolutionError::Unsatisfiable { path, .. }
            | ResolutionError::RecursionCycle { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::Unsatisfiable { request, path } => {
                write!(f, "UNSATISFIABLE: no builder can create {}", request)?;
                if !path.is_empty() {
                    write!(f, "\n  path: {}", path)?;
                }
                Ok(())
            }
            ResolutionError::RecursionCycle { request, path } => {
                write!(f, "RECURSION_CYCLE: {} requested while already being created", request)?;
                if !path.is_empty() {
                    write!(f, "\n  path: {}", path)?;
                }
                Ok(())
            }
            ResolutionError::TypeInference { method, unbound } => write!(
                f,
                "TYPE_INFERENCE: cannot infer {} for {}",
                unbound.join(", "),
                method
            ),
            ResolutionError::IllegalRequest { request, reason } => {
                write!(f, "ILLEGAL_REQUEST: {} ({})", request, reason)
            }
            ResolutionError::ContractViolation { message } => {
                write!(f, "CONTRACT_VIOLATION: {}", message)
            }
            ResolutionError::Invocation { method, message } => {
                write!(f, "INVOCATION_FAILED: {}: {}", method, message)
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

impl From<RequestError> for ResolutionError {
    fn from(err: RequestError) -> Self {
        ResolutionError::contract(err.to_string())
    }
}

pub type ResolutionResult<T> = Result<T, ResolutionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use specimen_types::TypeRef;

    #[test]
    fn test_path_display_joins_requests() {
        let path = RequestPath::new(vec![
            Request::of(TypeRef::named("A")),
            Request::of(TypeRef::named("B")),
            Request::of(TypeRef::named("A")),
        ]);
        assert_eq!(path.to_string(), "A -> B -> A");
        assert_eq!(path.root(), Some(&Request::of(TypeRef::named("A"))));
    }

    #[test]
    fn test_unsatisfiable_message_includes_path() {
        let err = ResolutionError::Unsatisfiable {
            request: Request::of(TypeRef::named("Gadget")),
            path: RequestPath::new(vec![
                Request::of(TypeRef::named("Widget")),
                Request::of(TypeRef::named("Gadget")),
            ]),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("UNSATISFIABLE"));
        assert!(msg.contains("Widget -> Gadget"));
        assert_eq!(err.code(), "UNSATISFIABLE");
    }

    #[test]
    fn test_sequence_error_round_trips() {
        let boxed: SequenceError = Box::new(ResolutionError::contract("boom"));
        match ResolutionError::from_sequence_error(boxed) {
            ResolutionError::ContractViolation { message } => assert_eq!(message, "boom"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_request_error_becomes_contract_violation() {
        let err: ResolutionError = RequestError::NegativeCount { count: -2 }.into();
        assert_eq!(err.code(), "CONTRACT_VIOLATION");
        assert!(err.to_string().contains("-2"));
    }
}
