//! Member metadata carried by parameter, property and field requests.

use crate::types::TypeRef;
use std::fmt;

/// A constructor or method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterInfo {
    /// Owning method, e.g. `Widget::new`.
    pub member: String,
    pub name: String,
    pub position: usize,
    pub ty: TypeRef,
}

impl ParameterInfo {
    pub fn new(
        member: impl Into<String>,
        name: impl Into<String>,
        position: usize,
        ty: TypeRef,
    ) -> Self {
        Self {
            member: member.into(),
            name: name.into(),
            position,
            ty,
        }
    }
}

impl fmt::Display for ParameterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parameter {}: {} of {}", self.name, self.ty, self.member)
    }
}

/// A property or field on a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberInfo {
    pub owner: TypeRef,
    pub name: String,
    pub ty: TypeRef,
    pub writable: bool,
}

impl MemberInfo {
    pub fn new(owner: TypeRef, name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            owner,
            name: name.into(),
            ty,
            writable: true,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }
}

impl fmt::Display for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owner, self.name, self.ty)
    }
}
