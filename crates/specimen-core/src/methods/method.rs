use crate::catalog::{Invocation, MethodDef, MethodKind, TypeCatalog};
use crate::errors::{ResolutionError, ResolutionResult};
use crate::methods::infer_type_arguments;
use specimen_types::{Instance, ParameterInfo, TypeRef, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Something that can be invoked with resolved arguments to produce a value.
pub trait Method: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn kind(&self) -> MethodKind;

    fn parameters(&self) -> &[ParameterInfo];

    fn invoke(&self, args: &[Value]) -> ResolutionResult<Value>;
}

pub type MethodRef = Arc<dyn Method>;

/// A catalog constructor or factory closed over a concrete declaring type.
#[derive(Debug, Clone)]
pub struct CatalogMethod {
    declaring: TypeRef,
    def: MethodDef,
    qualified: String,
    parameters: Vec<ParameterInfo>,
    disposable: bool,
}

impl CatalogMethod {
    pub(crate) fn bind(
        declaring: &TypeRef,
        def: &MethodDef,
        bindings: &BTreeMap<String, TypeRef>,
        disposable: bool,
    ) -> Self {
        let qualified = format!("{}::{}", declaring, def.name);
        let parameters = def
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| ParameterInfo::new(&qualified, &p.name, i, p.ty.substitute(bindings)))
            .collect();
        Self {
            declaring: declaring.clone(),
            def: def.clone(),
            qualified,
            parameters,
            disposable,
        }
    }

    pub fn declaring(&self) -> &TypeRef {
        &self.declaring
    }

    pub fn definition(&self) -> &MethodDef {
        &self.def
    }

    /// `Widget::new`
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    /// Has method-level generic parameters.
    pub fn is_generic(&self) -> bool {
        !self.def.generic_params.is_empty()
    }

    /// Parameters still mentioning unbound generic parameters.
    pub fn has_open_parameters(&self) -> bool {
        self.parameters.iter().any(|p| p.ty.is_open())
    }

    /// Wrap for use behind [`MethodRef`], inferring method-level generics
    /// when there are any.
    pub fn into_method(self, catalog: &Arc<TypeCatalog>) -> MethodRef {
        if self.is_generic() {
            Arc::new(GenericMethod::new(self, catalog.clone()))
        } else {
            Arc::new(self)
        }
    }

    pub fn invoke_with(
        &self,
        args: &[Value],
        type_args: &BTreeMap<String, TypeRef>,
    ) -> ResolutionResult<Value> {
        if args.len() != self.parameters.len() {
            return Err(ResolutionError::contract(format!(
                "{} takes {} arguments but {} were supplied",
                self.qualified,
                self.parameters.len(),
                args.len()
            )));
        }

        let invocation = Invocation {
            declaring: &self.declaring,
            method: &self.qualified,
            parameters: &self.parameters,
            args,
            type_args,
        };
        match &self.def.body {
            Some(body) => body(&invocation),
            None => Ok(self.record(args)),
        }
    }

    fn record(&self, args: &[Value]) -> Value {
        let fields = self
            .parameters
            .iter()
            .zip(args)
            .map(|(p, v)| (p.name.clone(), v.clone()));
        let instance = Instance::with_fields(self.declaring.clone(), fields).disposable(self.disposable);
        Value::Object(Arc::new(instance))
    }
}

impl Method for CatalogMethod {
    fn name(&self) -> &str {
        &self.qualified
    }

    fn kind(&self) -> MethodKind {
        self.def.kind
    }

    fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    fn invoke(&self, args: &[Value]) -> ResolutionResult<Value> {
        self.invoke_with(args, &BTreeMap::new())
    }
}

/// A method with its own generic parameters. Type arguments are inferred
/// from the runtime types of the supplied arguments on every invocation.
#[derive(Debug, Clone)]
pub struct GenericMethod {
    inner: CatalogMethod,
    catalog: Arc<TypeCatalog>,
    parameters: Vec<ParameterInfo>,
}

impl GenericMethod {
    pub fn new(inner: CatalogMethod, catalog: Arc<TypeCatalog>) -> Self {
        let parameters = inner.parameters.clone();
        Self {
            inner,
            catalog,
            parameters,
        }
    }

    /// Present parameters closed over `bindings`, so callers resolve
    /// concrete types. Inference still runs against the open signature.
    pub fn closed_over(mut self, bindings: &BTreeMap<String, TypeRef>) -> Self {
        for p in &mut self.parameters {
            p.ty = p.ty.substitute(bindings);
        }
        self
    }

    pub fn generic_params(&self) -> &[String] {
        &self.inner.def.generic_params
    }
}

impl Method for GenericMethod {
    fn name(&self) -> &str {
        self.inner.qualified_name()
    }

    fn kind(&self) -> MethodKind {
        self.inner.def.kind
    }

    fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    fn invoke(&self, args: &[Value]) -> ResolutionResult<Value> {
        let open: Vec<TypeRef> = self.inner.parameters.iter().map(|p| p.ty.clone()).collect();
        let type_args = infer_type_arguments(
            &self.catalog,
            self.inner.qualified_name(),
            self.generic_params(),
            &open,
            args,
        )?;
        self.inner.invoke_with(args, &type_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ParamDef, TypeDefinition};

    #[test]
    fn test_record_constructor_builds_instance() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDefinition::class("Point")
                .disposable()
                .constructor([("x", TypeRef::i32()), ("y", TypeRef::string())]),
        );
        let ctor = catalog.constructors(&TypeRef::named("Point")).remove(0);
        assert_eq!(ctor.name(), "Point::new");
        assert_eq!(ctor.parameters()[1].member, "Point::new");

        let value = ctor.invoke(&[Value::I32(1), Value::from("a")]).unwrap();
        let point = value.as_object().unwrap();
        assert_eq!(point.get("x"), Some(Value::I32(1)));
        assert_eq!(point.get("y"), Some(Value::from("a")));
        assert!(point.is_disposable());

        assert!(ctor.invoke(&[Value::I32(1)]).is_err());
    }

    #[test]
    fn test_generic_method_infers_from_arguments() {
        let mut catalog = TypeCatalog::new();
        let wrap = MethodDef::factory(
            "wrap",
            vec![ParamDef::new("item", TypeRef::param("U"))],
            TypeRef::named("Box"),
            |inv| {
                let bound = inv.type_arg("U").map(|t| t.to_string()).unwrap_or_default();
                Ok(Value::from(bound))
            },
        )
        .with_generic_params(["U"]);
        catalog.register(TypeDefinition::class("Box").method(wrap));
        let catalog = Arc::new(catalog);

        let factory = catalog.factories(&TypeRef::named("Box")).remove(0);
        assert!(factory.has_open_parameters());
        let method = factory.into_method(&catalog);
        assert_eq!(method.invoke(&[Value::I32(5)]).unwrap(), Value::from("i32"));

        let err = method.invoke(&[Value::Null]).unwrap_err();
        match err {
            ResolutionError::TypeInference { unbound, .. } => assert_eq!(unbound, vec!["U".to_string()]),
            other => panic!("unexpected {:?}", other),
        }
    }
}
