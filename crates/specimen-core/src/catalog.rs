//! Type catalog: registered type definitions the engine resolves against.
//!
//! The catalog answers the structural questions the builders need at
//! resolution time: which constructors and static factories a type exposes,
//! what it derives from, which interfaces it implements and which writable
//! members it carries. Definitions are keyed by generic-definition name, so
//! `List<T>` is registered once and closed over any element type on lookup.
//!
//! Type graphs may be self-referential (a `Node` with a `Node` parameter);
//! nothing is resolved at registration time.

use crate::errors::ResolutionResult;
use crate::methods::CatalogMethod;
use specimen_types::{MemberInfo, ParameterInfo, TypeRef, Value};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Body of a constructor or factory.
pub type MethodBody = Arc<dyn Fn(&Invocation<'_>) -> ResolutionResult<Value> + Send + Sync>;

/// Arguments handed to a [`MethodBody`].
pub struct Invocation<'a> {
    /// Closed declaring type
    pub declaring: &'a TypeRef,
    pub method: &'a str,
    pub parameters: &'a [ParameterInfo],
    pub args: &'a [Value],
    /// Method-level generic bindings, empty for non-generic methods
    pub type_args: &'a BTreeMap<String, TypeRef>,
}

impl Invocation<'_> {
    /// Argument for the parameter called `name`.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .position(|p| p.name == name)
            .and_then(|i| self.args.get(i))
    }

    pub fn type_arg(&self, name: &str) -> Option<&TypeRef> {
        self.type_args.get(name)
    }

    /// Declaring type's generic argument at `index`.
    pub fn declaring_arg(&self, index: usize) -> Option<&TypeRef> {
        self.declaring.generic_args().get(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Constructor,
    /// Static method returning an instance of the declaring type
    Factory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDef {
    pub name: String,
    /// May mention the declaring type's or the method's generic parameters.
    pub ty: TypeRef,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A constructor or static factory.
#[derive(Clone)]
pub struct MethodDef {
    pub name: String,
    pub kind: MethodKind,
    pub params: Vec<ParamDef>,
    /// Method-level generic parameters, inferred from arguments at invocation.
    pub generic_params: Vec<String>,
    /// Return type of a factory. Constructors return the declaring type.
    pub returns: Option<TypeRef>,
    pub public: bool,
    /// `None` builds a record instance from the named arguments.
    pub body: Option<MethodBody>,
}

impl MethodDef {
    pub fn constructor(params: Vec<ParamDef>) -> Self {
        Self {
            name: "new".to_string(),
            kind: MethodKind::Constructor,
            params,
            generic_params: Vec::new(),
            returns: None,
            public: true,
            body: None,
        }
    }

    pub fn factory<F>(name: impl Into<String>, params: Vec<ParamDef>, returns: TypeRef, body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ResolutionResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: MethodKind::Factory,
            params,
            generic_params: Vec::new(),
            returns: Some(returns),
            public: true,
            body: Some(Arc::new(body)),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ResolutionResult<Value> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    pub fn with_generic_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Hidden from every method query.
    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("params", &self.params)
            .field("generic_params", &self.generic_params)
            .field("returns", &self.returns)
            .field("public", &self.public)
            .field("custom_body", &self.body.is_some())
            .finish()
    }
}

/// A property or field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDef {
    pub name: String,
    pub ty: TypeRef,
    pub writable: bool,
}

/// A registered type.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub name: String,
    pub generic_params: Vec<String>,
    pub is_abstract: bool,
    pub is_interface: bool,
    pub base: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    /// Instances need tracking for disposal
    pub disposable: bool,
    pub constructors: Vec<MethodDef>,
    pub factories: Vec<MethodDef>,
    pub properties: Vec<MemberDef>,
    pub fields: Vec<MemberDef>,
}

impl TypeDefinition {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_params: Vec::new(),
            is_abstract: false,
            is_interface: false,
            base: None,
            interfaces: Vec::new(),
            disposable: false,
            constructors: Vec::new(),
            factories: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn abstract_class(name: impl Into<String>) -> Self {
        let mut def = Self::class(name);
        def.is_abstract = true;
        def
    }

    pub fn interface(name: impl Into<String>) -> Self {
        let mut def = Self::class(name);
        def.is_interface = true;
        def
    }

    pub fn generic<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn disposable(mut self) -> Self {
        self.disposable = true;
        self
    }

    /// Add a public constructor with a record body.
    pub fn constructor<I, N>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (N, TypeRef)>,
        N: Into<String>,
    {
        let params = params
            .into_iter()
            .map(|(name, ty)| ParamDef::new(name, ty))
            .collect();
        self.method(MethodDef::constructor(params))
    }

    /// Add a constructor or factory.
    pub fn method(mut self, def: MethodDef) -> Self {
        match def.kind {
            MethodKind::Constructor => self.constructors.push(def),
            MethodKind::Factory => self.factories.push(def),
        }
        self
    }

    pub fn property(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.properties.push(MemberDef {
            name: name.into(),
            ty,
            writable: true,
        });
        self
    }

    pub fn read_only_property(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.properties.push(MemberDef {
            name: name.into(),
            ty,
            writable: false,
        });
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(MemberDef {
            name: name.into(),
            ty,
            writable: true,
        });
        self
    }

    /// The open form of this type, e.g. `List<T>`.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::generic(
            self.name.clone(),
            self.generic_params.iter().map(TypeRef::param).collect(),
        )
    }

    /// Type-level generic bindings for a closed instantiation.
    pub fn bindings(&self, ty: &TypeRef) -> BTreeMap<String, TypeRef> {
        self.generic_params
            .iter()
            .cloned()
            .zip(ty.generic_args().iter().cloned())
            .collect()
    }
}

/// Registration table of type definitions.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<String, Arc<TypeDefinition>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog pre-populated with the collection and sequence shapes.
    pub fn with_well_known() -> Self {
        let mut catalog = Self::new();
        crate::well_known::register_well_known(&mut catalog);
        catalog
    }

    /// Register or replace a definition.
    pub fn register(&mut self, def: TypeDefinition) -> &mut Self {
        debug!(
            name = %def.name,
            constructors = def.constructors.len(),
            factories = def.factories.len(),
            "registering type"
        );
        self.types.insert(def.name.clone(), Arc::new(def));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeDefinition>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Definition for a named type whose arity matches the registration.
    pub fn definition(&self, ty: &TypeRef) -> Option<&TypeDefinition> {
        let def = self.types.get(ty.definition_name()?)?;
        (def.generic_params.len() == ty.generic_args().len()).then_some(def.as_ref())
    }

    pub fn is_abstract(&self, ty: &TypeRef) -> bool {
        self.definition(ty)
            .is_some_and(|d| d.is_abstract || d.is_interface)
    }

    pub fn is_interface(&self, ty: &TypeRef) -> bool {
        self.definition(ty).is_some_and(|d| d.is_interface)
    }

    pub fn is_disposable(&self, ty: &TypeRef) -> bool {
        self.definition(ty).is_some_and(|d| d.disposable)
    }

    /// Direct base type, closed over `ty`'s arguments.
    pub fn base_of(&self, ty: &TypeRef) -> Option<TypeRef> {
        let def = self.definition(ty)?;
        let bindings = def.bindings(ty);
        def.base.as_ref().map(|b| b.substitute(&bindings))
    }

    /// Directly declared interfaces, closed over `ty`'s arguments.
    pub fn direct_interfaces(&self, ty: &TypeRef) -> Vec<TypeRef> {
        match self.definition(ty) {
            Some(def) => {
                let bindings = def.bindings(ty);
                def.interfaces.iter().map(|i| i.substitute(&bindings)).collect()
            }
            None => Vec::new(),
        }
    }

    /// Every base type and interface reachable from `ty`, nearest first.
    pub fn ancestors(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let mut seen: HashSet<TypeRef> = HashSet::new();
        let mut out = Vec::new();
        let mut queue: VecDeque<TypeRef> = VecDeque::new();
        queue.push_back(ty.clone());

        while let Some(current) = queue.pop_front() {
            let parents = self
                .base_of(&current)
                .into_iter()
                .chain(self.direct_interfaces(&current));
            for parent in parents {
                if seen.insert(parent.clone()) {
                    out.push(parent.clone());
                    queue.push_back(parent);
                }
            }
        }
        out
    }

    /// True when `ty` implements `interface`. An open interface such as
    /// `Enumerable<T>` matches any closed implementation.
    pub fn implements(&self, ty: &TypeRef, interface: &TypeRef) -> bool {
        self.ancestors(ty).iter().any(|a| {
            a == interface || (interface.is_open() && a.same_definition(interface))
        })
    }

    /// Closed instantiation of the open `interface` that `ty` implements,
    /// e.g. `Enumerable<Widget>` for `List<Widget>`.
    pub fn find_implementation(&self, ty: &TypeRef, interface: &TypeRef) -> Option<TypeRef> {
        if ty.same_definition(interface) {
            return Some(ty.clone());
        }
        self.ancestors(ty)
            .into_iter()
            .find(|a| a.same_definition(interface))
    }

    /// Whether a value of `source` can stand where `target` is expected.
    pub fn is_assignable(&self, target: &TypeRef, source: &TypeRef) -> bool {
        if target == source {
            return true;
        }
        match (target, source) {
            (
                TypeRef::Array {
                    element: te,
                    rank: tr,
                },
                TypeRef::Array {
                    element: se,
                    rank: sr,
                },
            ) => tr == sr && self.is_assignable(te, se),
            (_, TypeRef::Named { .. }) => self.ancestors(source).contains(target),
            _ => false,
        }
    }

    /// Public constructors, closed over `ty`'s arguments.
    pub fn constructors(&self, ty: &TypeRef) -> Vec<CatalogMethod> {
        let Some(def) = self.definition(ty) else {
            return Vec::new();
        };
        let bindings = def.bindings(ty);
        def.constructors
            .iter()
            .filter(|m| m.public)
            .map(|m| CatalogMethod::bind(ty, m, &bindings, def.disposable))
            .collect()
    }

    /// Public static factories on `ty` whose return type is `ty` itself.
    pub fn factories(&self, ty: &TypeRef) -> Vec<CatalogMethod> {
        let Some(def) = self.definition(ty) else {
            return Vec::new();
        };
        let bindings = def.bindings(ty);
        def.factories
            .iter()
            .filter(|m| m.public)
            .filter(|m| {
                m.returns
                    .as_ref()
                    .is_some_and(|r| &r.substitute(&bindings) == ty)
            })
            .map(|m| CatalogMethod::bind(ty, m, &bindings, def.disposable))
            .collect()
    }

    /// Every public constructor and factory on `ty`, regardless of return
    /// type.
    pub fn methods(&self, ty: &TypeRef) -> Vec<CatalogMethod> {
        let Some(def) = self.definition(ty) else {
            return Vec::new();
        };
        let bindings = def.bindings(ty);
        def.constructors
            .iter()
            .chain(&def.factories)
            .filter(|m| m.public)
            .map(|m| CatalogMethod::bind(ty, m, &bindings, def.disposable))
            .collect()
    }

    /// Properties declared on `ty` and its base chain, base members first.
    pub fn properties(&self, ty: &TypeRef) -> Vec<MemberInfo> {
        self.members(ty, |d| &d.properties)
    }

    /// Fields declared on `ty` and its base chain, base members first.
    pub fn fields(&self, ty: &TypeRef) -> Vec<MemberInfo> {
        self.members(ty, |d| &d.fields)
    }

    fn members<F>(&self, ty: &TypeRef, select: F) -> Vec<MemberInfo>
    where
        F: Fn(&TypeDefinition) -> &Vec<MemberDef>,
    {
        let mut chain = vec![ty.clone()];
        let mut current = ty.clone();
        while let Some(base) = self.base_of(&current) {
            if chain.contains(&base) {
                break;
            }
            chain.push(base.clone());
            current = base;
        }

        let mut out: Vec<MemberInfo> = Vec::new();
        for level in chain.iter().rev() {
            let Some(def) = self.definition(level) else {
                continue;
            };
            let bindings = def.bindings(level);
            for member in select(def) {
                out.retain(|m| m.name != member.name);
                let mut info = MemberInfo::new(ty.clone(), &member.name, member.ty.substitute(&bindings));
                info.writable = member.writable;
                out.push(info);
            }
        }
        out
    }
}
