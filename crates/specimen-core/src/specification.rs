//! Request specifications: predicates over requests.
//!
//! Specifications gate filtering builders, postprocessors and output guards.
//! Type-based specifications only match plain type requests; member
//! specifications match parameter, property and field requests by name and
//! optionally by type.

use crate::catalog::TypeCatalog;
use crate::recursion::RequestEquality;
use specimen_types::{Request, TypeRef};
use std::fmt;
use std::sync::Arc;

pub trait RequestSpecification: Send + Sync + fmt::Debug {
    fn is_satisfied_by(&self, request: &Request) -> bool;
}

pub type SpecificationRef = Arc<dyn RequestSpecification>;

#[derive(Debug, Clone, Copy, Default)]
pub struct TrueSpecification;

impl RequestSpecification for TrueSpecification {
    fn is_satisfied_by(&self, _request: &Request) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FalseSpecification;

impl RequestSpecification for FalseSpecification {
    fn is_satisfied_by(&self, _request: &Request) -> bool {
        false
    }
}

/// Matches a type request for exactly this type. An open generic target
/// matches every closed instantiation of its definition.
#[derive(Debug, Clone)]
pub struct ExactTypeSpecification {
    target: TypeRef,
}

impl ExactTypeSpecification {
    pub fn new(target: TypeRef) -> Self {
        Self { target }
    }
}

impl RequestSpecification for ExactTypeSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        match request.as_type() {
            Some(ty) if self.target.is_open() => ty.same_definition(&self.target),
            Some(ty) => ty == &self.target,
            None => false,
        }
    }
}

/// Matches type requests for abstract classes and interfaces.
#[derive(Debug, Clone)]
pub struct AbstractTypeSpecification {
    catalog: Arc<TypeCatalog>,
}

impl AbstractTypeSpecification {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }
}

impl RequestSpecification for AbstractTypeSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        request
            .as_type()
            .is_some_and(|ty| self.catalog.is_abstract(ty))
    }
}

/// Matches the target type itself or a type whose direct base is the target.
#[derive(Debug, Clone)]
pub struct DirectBaseTypeSpecification {
    catalog: Arc<TypeCatalog>,
    target: TypeRef,
}

impl DirectBaseTypeSpecification {
    pub fn new(catalog: Arc<TypeCatalog>, target: TypeRef) -> Self {
        Self { catalog, target }
    }
}

impl RequestSpecification for DirectBaseTypeSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        let Some(ty) = request.as_type() else {
            return false;
        };
        ty == &self.target || self.catalog.base_of(ty).as_ref() == Some(&self.target)
    }
}

/// Matches types that implement the interface (open or closed), excluding
/// the interface itself.
#[derive(Debug, Clone)]
pub struct ImplementedInterfaceSpecification {
    catalog: Arc<TypeCatalog>,
    interface: TypeRef,
}

impl ImplementedInterfaceSpecification {
    pub fn new(catalog: Arc<TypeCatalog>, interface: TypeRef) -> Self {
        Self { catalog, interface }
    }
}

impl RequestSpecification for ImplementedInterfaceSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        request
            .as_type()
            .is_some_and(|ty| self.catalog.implements(ty, &self.interface))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    Parameter,
    Property,
    Field,
}

/// Matches parameter, property or field requests by name, optionally
/// requiring the member type too.
#[derive(Debug, Clone)]
pub struct MemberSpecification {
    kind: MemberKind,
    name: String,
    ty: Option<TypeRef>,
}

impl MemberSpecification {
    pub fn parameter(name: impl Into<String>) -> Self {
        Self::new(MemberKind::Parameter, name)
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self::new(MemberKind::Property, name)
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::new(MemberKind::Field, name)
    }

    pub fn of_type(mut self, ty: TypeRef) -> Self {
        self.ty = Some(ty);
        self
    }

    fn new(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            ty: None,
        }
    }
}

impl RequestSpecification for MemberSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        let (kind, name, ty) = match request {
            Request::Parameter(p) => (MemberKind::Parameter, &p.name, &p.ty),
            Request::Property(m) => (MemberKind::Property, &m.name, &m.ty),
            Request::Field(m) => (MemberKind::Field, &m.name, &m.ty),
            _ => return false,
        };
        kind == self.kind && name == &self.name && self.ty.as_ref().map_or(true, |t| t == ty)
    }
}

/// Matches requests equal to a target under a comparer.
#[derive(Debug, Clone)]
pub struct EqualRequestSpecification {
    target: Request,
    comparer: Arc<dyn RequestEquality>,
}

impl EqualRequestSpecification {
    pub fn new(target: Request) -> Self {
        Self::with_comparer(target, Arc::new(crate::recursion::StructuralEquality))
    }

    pub fn with_comparer(target: Request, comparer: Arc<dyn RequestEquality>) -> Self {
        Self { target, comparer }
    }
}

impl RequestSpecification for EqualRequestSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        self.comparer.equals(&self.target, request)
    }
}

/// Matches seeded requests whose inner request is a plain request for the
/// target type.
#[derive(Debug, Clone)]
pub struct SeedRequestSpecification {
    target: TypeRef,
}

impl SeedRequestSpecification {
    pub fn new(target: TypeRef) -> Self {
        Self { target }
    }
}

impl RequestSpecification for SeedRequestSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        match request {
            Request::Seeded(s) => s.inner.as_type() == Some(&self.target),
            _ => false,
        }
    }
}

/// True when every operand is; an empty conjunction is false.
#[derive(Debug, Clone)]
pub struct AndSpecification(Vec<SpecificationRef>);

impl AndSpecification {
    pub fn new(specs: Vec<SpecificationRef>) -> Self {
        Self(specs)
    }
}

impl RequestSpecification for AndSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        !self.0.is_empty() && self.0.iter().all(|s| s.is_satisfied_by(request))
    }
}

/// True when any operand is; an empty disjunction is true.
#[derive(Debug, Clone)]
pub struct OrSpecification(Vec<SpecificationRef>);

impl OrSpecification {
    pub fn new(specs: Vec<SpecificationRef>) -> Self {
        Self(specs)
    }
}

impl RequestSpecification for OrSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        self.0.is_empty() || self.0.iter().any(|s| s.is_satisfied_by(request))
    }
}

#[derive(Debug, Clone)]
pub struct NotSpecification(SpecificationRef);

impl NotSpecification {
    pub fn new(spec: SpecificationRef) -> Self {
        Self(spec)
    }
}

impl RequestSpecification for NotSpecification {
    fn is_satisfied_by(&self, request: &Request) -> bool {
        !self.0.is_satisfied_by(request)
    }
}
