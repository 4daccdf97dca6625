//! Resolution outcomes and the two sentinels.

use crate::request::Request;
use crate::value::Value;
use std::fmt;

/// "I could not satisfy this request."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoSpecimen {
    request: Option<Box<Request>>,
}

impl NoSpecimen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_request(request: &Request) -> Self {
        Self {
            request: Some(Box::new(request.clone())),
        }
    }

    pub fn request(&self) -> Option<&Request> {
        self.request.as_deref()
    }
}

/// "Deliberately produce nothing for this slot."
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OmitSpecimen;

/// What a builder returns: a real value or one of the sentinels.
#[derive(Debug, Clone, PartialEq)]
pub enum Specimen {
    Value(Value),
    NoSpecimen(NoSpecimen),
    Omit(OmitSpecimen),
}

impl Specimen {
    pub fn none() -> Self {
        Specimen::NoSpecimen(NoSpecimen::new())
    }

    pub fn none_for(request: &Request) -> Self {
        Specimen::NoSpecimen(NoSpecimen::for_request(request))
    }

    pub fn omit() -> Self {
        Specimen::Omit(OmitSpecimen)
    }

    pub fn is_no_specimen(&self) -> bool {
        matches!(self, Specimen::NoSpecimen(_))
    }

    pub fn is_omit(&self) -> bool {
        matches!(self, Specimen::Omit(_))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Specimen::Value(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Specimen::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Specimen::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Value> for Specimen {
    fn from(v: Value) -> Self {
        Specimen::Value(v)
    }
}

impl fmt::Display for Specimen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specimen::Value(v) => write!(f, "{}", v),
            Specimen::NoSpecimen(n) => match n.request() {
                Some(r) => write!(f, "no specimen for {}", r),
                None => write!(f, "no specimen"),
            },
            Specimen::Omit(_) => write!(f, "omitted"),
        }
    }
}
