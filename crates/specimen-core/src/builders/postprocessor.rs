//! Postprocessing: commands applied to specimens after creation.

use crate::builder::{BuilderRef, SpecimenBuilder};
use crate::builders::single;
use crate::catalog::TypeCatalog;
use crate::context::SpecimenContext;
use crate::errors::{ResolutionError, ResolutionResult};
use crate::specification::{SpecificationRef, TrueSpecification};
use specimen_types::{Request, Specimen, TypeRef, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// Side effect run against a freshly created specimen.
pub trait SpecimenCommand: Send + Sync + fmt::Debug {
    fn execute(&self, specimen: &Value, context: &mut dyn SpecimenContext)
        -> ResolutionResult<()>;
}

/// Runs a command on every real value the inner builder produces for
/// requests the specification accepts.
#[derive(Debug, Clone)]
pub struct Postprocessor {
    builder: BuilderRef,
    command: Arc<dyn SpecimenCommand>,
    specification: SpecificationRef,
    expected: Option<(Arc<TypeCatalog>, TypeRef)>,
}

impl Postprocessor {
    pub fn new(builder: BuilderRef, command: Arc<dyn SpecimenCommand>) -> Self {
        Self {
            builder,
            command,
            specification: Arc::new(TrueSpecification),
            expected: None,
        }
    }

    pub fn with_specification(mut self, specification: SpecificationRef) -> Self {
        self.specification = specification;
        self
    }

    /// Fail with a contract violation when a produced value is not
    /// assignable to `ty`.
    pub fn with_expected_type(mut self, catalog: Arc<TypeCatalog>, ty: TypeRef) -> Self {
        self.expected = Some((catalog, ty));
        self
    }
}

impl SpecimenBuilder for Postprocessor {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let specimen = self.builder.create(request, context)?;
        let Specimen::Value(value) = &specimen else {
            return Ok(specimen);
        };
        if value.is_null() || !self.specification.is_satisfied_by(request) {
            return Ok(specimen);
        }

        if let Some((catalog, expected)) = &self.expected {
            let assignable = value
                .runtime_type()
                .is_some_and(|actual| catalog.is_assignable(expected, &actual));
            if !assignable {
                return Err(ResolutionError::contract(format!(
                    "postprocessor for {} received {} while creating {}",
                    expected, value, request
                )));
            }
        }

        self.command.execute(value, context)?;
        Ok(specimen)
    }

    fn children(&self) -> Vec<BuilderRef> {
        vec![self.builder.clone()]
    }

    fn compose(&self, children: Vec<BuilderRef>) -> Option<BuilderRef> {
        Some(Arc::new(Self {
            builder: single(children),
            command: self.command.clone(),
            specification: self.specification.clone(),
            expected: self.expected.clone(),
        }))
    }
}

/// Fills every writable property and field of an object by resolving a
/// property or field request for it. Omitted members are left untouched.
#[derive(Debug, Clone)]
pub struct AutoPropertiesCommand {
    catalog: Arc<TypeCatalog>,
    specification: SpecificationRef,
}

impl AutoPropertiesCommand {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            catalog,
            specification: Arc::new(TrueSpecification),
        }
    }

    /// Only fill members whose request satisfies `specification`.
    pub fn with_specification(mut self, specification: SpecificationRef) -> Self {
        self.specification = specification;
        self
    }
}

impl SpecimenCommand for AutoPropertiesCommand {
    fn execute(
        &self,
        specimen: &Value,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<()> {
        let Value::Object(instance) = specimen else {
            return Err(ResolutionError::contract(format!(
                "auto-properties expects an object, got {}",
                specimen
            )));
        };

        let ty = instance.ty().clone();
        let members = self
            .catalog
            .properties(&ty)
            .into_iter()
            .map(Request::Property)
            .chain(self.catalog.fields(&ty).into_iter().map(Request::Field));

        for request in members {
            let writable = matches!(&request, Request::Property(m) | Request::Field(m) if m.writable);
            if !writable || !self.specification.is_satisfied_by(&request) {
                continue;
            }
            let Some(name) = request.member_name().map(str::to_string) else {
                continue;
            };
            match context.resolve(&request)? {
                Specimen::Value(v) => instance.set(name, v),
                Specimen::Omit(_) => trace!(member = %name, "member omitted"),
                Specimen::NoSpecimen(_) => warn!(member = %name, "no specimen for member, skipping"),
            }
        }
        Ok(())
    }
}

type ValueFactory = Arc<dyn Fn(&mut dyn SpecimenContext) -> ResolutionResult<Value> + Send + Sync>;

/// Assigns one member of an object.
#[derive(Clone)]
pub struct BindingCommand {
    member: String,
    factory: ValueFactory,
}

impl BindingCommand {
    /// Always assign `value`.
    pub fn new(member: impl Into<String>, value: Value) -> Self {
        Self::with_factory(member, move |_| Ok(value.clone()))
    }

    /// Assign whatever `factory` produces, typically a nested resolution.
    pub fn with_factory<F>(member: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&mut dyn SpecimenContext) -> ResolutionResult<Value> + Send + Sync + 'static,
    {
        Self {
            member: member.into(),
            factory: Arc::new(factory),
        }
    }
}

impl SpecimenCommand for BindingCommand {
    fn execute(
        &self,
        specimen: &Value,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<()> {
        let instance = specimen.as_object().ok_or_else(|| {
            ResolutionError::contract(format!(
                "cannot bind {} on non-object {}",
                self.member, specimen
            ))
        })?;
        let value = (self.factory)(context)?;
        instance.set(self.member.clone(), value);
        Ok(())
    }
}

impl fmt::Debug for BindingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingCommand")
            .field("member", &self.member)
            .finish()
    }
}

type ActionFn = Arc<dyn Fn(&Value, &mut dyn SpecimenContext) -> ResolutionResult<()> + Send + Sync>;

/// Arbitrary closure run against the specimen.
#[derive(Clone)]
pub struct ActionCommand {
    action: ActionFn,
}

impl ActionCommand {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&Value, &mut dyn SpecimenContext) -> ResolutionResult<()> + Send + Sync + 'static,
    {
        Self {
            action: Arc::new(action),
        }
    }
}

impl SpecimenCommand for ActionCommand {
    fn execute(
        &self,
        specimen: &Value,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<()> {
        (self.action)(specimen, context)
    }
}

impl fmt::Debug for ActionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionCommand")
    }
}
