//! Strategies for choosing which constructors or factories to try.
//!
//! Every query filters out methods that take the declaring type itself
//! (copy constructors would recurse forever) and methods whose parameters
//! still mention unbound generic parameters.

use crate::catalog::{ParamDef, TypeCatalog};
use crate::methods::{CatalogMethod, GenericMethod, Method, MethodRef};
use crate::well_known::{enumerable, indexed_list, list};
use specimen_types::TypeRef;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Picks candidate methods for a type, most preferred first.
pub trait MethodQuery: Send + Sync + fmt::Debug {
    fn select_methods(&self, ty: &TypeRef) -> Vec<MethodRef>;
}

fn usable(method: &CatalogMethod, ty: &TypeRef) -> bool {
    !method.has_open_parameters() && !method.parameters().iter().any(|p| &p.ty == ty)
}

fn wrap(catalog: &Arc<TypeCatalog>, methods: Vec<CatalogMethod>) -> Vec<MethodRef> {
    methods.into_iter().map(|m| m.into_method(catalog)).collect()
}

/// Constructors with the fewest parameters first.
#[derive(Debug, Clone)]
pub struct ModestConstructorQuery {
    catalog: Arc<TypeCatalog>,
}

impl ModestConstructorQuery {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }
}

impl MethodQuery for ModestConstructorQuery {
    fn select_methods(&self, ty: &TypeRef) -> Vec<MethodRef> {
        let mut methods: Vec<CatalogMethod> = self
            .catalog
            .constructors(ty)
            .into_iter()
            .filter(|m| usable(m, ty))
            .collect();
        methods.sort_by_key(|m| m.parameters().len());
        wrap(&self.catalog, methods)
    }
}

/// Constructors with the most parameters first.
#[derive(Debug, Clone)]
pub struct GreedyConstructorQuery {
    catalog: Arc<TypeCatalog>,
}

impl GreedyConstructorQuery {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }
}

impl MethodQuery for GreedyConstructorQuery {
    fn select_methods(&self, ty: &TypeRef) -> Vec<MethodRef> {
        let mut methods: Vec<CatalogMethod> = self
            .catalog
            .constructors(ty)
            .into_iter()
            .filter(|m| usable(m, ty))
            .collect();
        methods.sort_by_key(|m| Reverse(m.parameters().len()));
        wrap(&self.catalog, methods)
    }
}

/// Container shape a [`FavoringConstructorQuery`] prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoredShape {
    /// `T[]`
    Array,
    /// `List<T>` or `IndexedList<T>`
    List,
    /// `Enumerable<T>`
    Enumerable,
}

impl FavoredShape {
    fn matches(self, param: &TypeRef, item: &TypeRef) -> bool {
        match self {
            FavoredShape::Array => param == &TypeRef::array(item.clone()),
            FavoredShape::List => {
                param == &list(item.clone()) || param == &indexed_list(item.clone())
            }
            FavoredShape::Enumerable => param == &enumerable(item.clone()),
        }
    }
}

/// Constructors ranked by how many parameters are containers of the type's
/// own items, then by parameter count, most first.
#[derive(Debug, Clone)]
pub struct FavoringConstructorQuery {
    catalog: Arc<TypeCatalog>,
    shape: FavoredShape,
}

impl FavoringConstructorQuery {
    pub fn new(catalog: Arc<TypeCatalog>, shape: FavoredShape) -> Self {
        Self { catalog, shape }
    }

    pub fn arrays(catalog: Arc<TypeCatalog>) -> Self {
        Self::new(catalog, FavoredShape::Array)
    }

    pub fn lists(catalog: Arc<TypeCatalog>) -> Self {
        Self::new(catalog, FavoredShape::List)
    }

    pub fn enumerables(catalog: Arc<TypeCatalog>) -> Self {
        Self::new(catalog, FavoredShape::Enumerable)
    }

    /// Generic arguments plus the item type of any `Enumerable<_>` the type
    /// implements, so `Dictionary<K, V>` counts its key/value pairs.
    fn item_types(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let mut items = ty.generic_args().to_vec();
        if let Some(implemented) = self
            .catalog
            .find_implementation(ty, &enumerable(TypeRef::param("T")))
        {
            for item in implemented.generic_args() {
                if !items.contains(item) {
                    items.push(item.clone());
                }
            }
        }
        items
    }

    fn score(&self, method: &CatalogMethod, items: &[TypeRef]) -> usize {
        method
            .parameters()
            .iter()
            .filter(|p| items.iter().any(|item| self.shape.matches(&p.ty, item)))
            .count()
    }
}

impl MethodQuery for FavoringConstructorQuery {
    fn select_methods(&self, ty: &TypeRef) -> Vec<MethodRef> {
        let items = self.item_types(ty);
        let mut methods: Vec<CatalogMethod> = self
            .catalog
            .constructors(ty)
            .into_iter()
            .filter(|m| usable(m, ty))
            .collect();
        methods.sort_by_key(|m| Reverse((self.score(m, &items), m.parameters().len())));
        wrap(&self.catalog, methods)
    }
}

/// Static factories returning the type, fewest parameters first.
#[derive(Debug, Clone)]
pub struct FactoryMethodQuery {
    catalog: Arc<TypeCatalog>,
}

impl FactoryMethodQuery {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }
}

impl MethodQuery for FactoryMethodQuery {
    fn select_methods(&self, ty: &TypeRef) -> Vec<MethodRef> {
        let mut methods: Vec<CatalogMethod> = self
            .catalog
            .factories(ty)
            .into_iter()
            .filter(|m| usable(m, ty))
            .collect();
        methods.sort_by_key(|m| m.parameters().len());
        wrap(&self.catalog, methods)
    }
}

/// Concatenation of several queries, in order.
#[derive(Debug, Clone, Default)]
pub struct CompositeMethodQuery {
    queries: Vec<Arc<dyn MethodQuery>>,
}

impl CompositeMethodQuery {
    pub fn new(queries: Vec<Arc<dyn MethodQuery>>) -> Self {
        Self { queries }
    }
}

impl MethodQuery for CompositeMethodQuery {
    fn select_methods(&self, ty: &TypeRef) -> Vec<MethodRef> {
        self.queries
            .iter()
            .flat_map(|q| q.select_methods(ty))
            .collect()
    }
}

/// Signature a [`TemplateMethodQuery`] looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTemplate {
    pub name: String,
    pub params: Vec<ParamDef>,
}

impl MethodTemplate {
    pub fn new(name: impl Into<String>, params: Vec<ParamDef>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Methods on the type whose name and arity match a template and whose
/// parameters accept the template's parameter types. Generic methods are
/// closed over the template's types. Candidates sharing more parameter
/// names and exact types with the template rank first.
#[derive(Debug, Clone)]
pub struct TemplateMethodQuery {
    catalog: Arc<TypeCatalog>,
    template: MethodTemplate,
}

impl TemplateMethodQuery {
    pub fn new(catalog: Arc<TypeCatalog>, template: MethodTemplate) -> Self {
        Self { catalog, template }
    }

    /// Generic bindings closing `method` over the template, or `None` when
    /// some parameter cannot accept the template's type.
    fn fit(&self, method: &CatalogMethod) -> Option<BTreeMap<String, TypeRef>> {
        let mut bindings = BTreeMap::new();
        for (param, wanted) in method.parameters().iter().zip(&self.template.params) {
            let ok = if param.ty.is_open() {
                param.ty.bind(&wanted.ty, &mut bindings)
            } else {
                self.catalog.is_assignable(&param.ty, &wanted.ty)
            };
            if !ok {
                return None;
            }
        }
        Some(bindings)
    }

    fn score(&self, method: &CatalogMethod) -> usize {
        method
            .parameters()
            .iter()
            .zip(&self.template.params)
            .map(|(p, t)| usize::from(p.name == t.name) + usize::from(p.ty == t.ty))
            .sum()
    }
}

impl MethodQuery for TemplateMethodQuery {
    fn select_methods(&self, ty: &TypeRef) -> Vec<MethodRef> {
        let mut ranked: Vec<(usize, MethodRef)> = self
            .catalog
            .methods(ty)
            .into_iter()
            .filter(|m| {
                m.definition().name == self.template.name
                    && m.parameters().len() == self.template.params.len()
            })
            .filter_map(|m| {
                let bindings = self.fit(&m)?;
                let score = self.score(&m);
                let method: MethodRef = if m.is_generic() {
                    Arc::new(GenericMethod::new(m, self.catalog.clone()).closed_over(&bindings))
                } else {
                    Arc::new(m)
                };
                Some((score, method))
            })
            .collect();
        ranked.sort_by_key(|(score, _)| Reverse(*score));
        ranked.into_iter().map(|(_, m)| m).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MethodDef, TypeDefinition};
    use specimen_types::Value;

    fn catalog() -> Arc<TypeCatalog> {
        let t = || TypeRef::param("T");
        let mut catalog = TypeCatalog::with_well_known();
        catalog
            .register(
                TypeDefinition::class("Node")
                    .method(MethodDef::constructor(vec![]))
                    .constructor([("parent", TypeRef::named("Node"))])
                    .constructor([("name", TypeRef::string()), ("depth", TypeRef::i32())])
                    .constructor([("name", TypeRef::string())]),
            )
            .register(
                TypeDefinition::class("Bag")
                    .generic(["T"])
                    .constructor([("a", TypeRef::i32()), ("b", TypeRef::i32())])
                    .constructor([("items", enumerable(t()))])
                    .constructor([("items", list(t()))])
                    .constructor([("items", TypeRef::array(t()))]),
            )
            .register(
                TypeDefinition::class("Money")
                    .method(MethodDef::factory(
                        "of",
                        vec![ParamDef::new("amount", TypeRef::i32())],
                        TypeRef::named("Money"),
                        |_| Ok(Value::Null),
                    ))
                    .method(MethodDef::factory("zero", vec![], TypeRef::named("Money"), |_| {
                        Ok(Value::Null)
                    }))
                    .method(MethodDef::factory(
                        "describe",
                        vec![],
                        TypeRef::string(),
                        |_| Ok(Value::Null),
                    )),
            );
        Arc::new(catalog)
    }

    fn arities(methods: &[MethodRef]) -> Vec<usize> {
        methods.iter().map(|m| m.parameters().len()).collect()
    }

    #[test]
    fn test_modest_and_greedy_skip_copy_constructors() {
        let catalog = catalog();
        let node = TypeRef::named("Node");
        let modest = ModestConstructorQuery::new(catalog.clone()).select_methods(&node);
        assert_eq!(arities(&modest), vec![0, 1, 2]);
        assert!(modest.iter().all(|m| m.parameters().iter().all(|p| p.ty != node)));

        let greedy = GreedyConstructorQuery::new(catalog).select_methods(&node);
        assert_eq!(arities(&greedy), vec![2, 1, 0]);
    }

    #[test]
    fn test_favoring_queries_rank_matching_shapes_first() {
        let catalog = catalog();
        let bag = TypeRef::generic("Bag", vec![TypeRef::string()]);
        let first = |q: FavoringConstructorQuery| q.select_methods(&bag)[0].parameters()[0].ty.clone();

        assert_eq!(first(FavoringConstructorQuery::arrays(catalog.clone())), TypeRef::array(TypeRef::string()));
        assert_eq!(first(FavoringConstructorQuery::lists(catalog.clone())), list(TypeRef::string()));
        assert_eq!(
            first(FavoringConstructorQuery::enumerables(catalog.clone())),
            enumerable(TypeRef::string())
        );

        // Without a matching shape, more parameters win.
        let node = FavoringConstructorQuery::arrays(catalog).select_methods(&TypeRef::named("Node"));
        assert_eq!(arities(&node), vec![2, 1, 0]);
    }

    #[test]
    fn test_factory_query_only_returns_own_type() {
        let catalog = catalog();
        let factories = FactoryMethodQuery::new(catalog).select_methods(&TypeRef::named("Money"));
        let names: Vec<&str> = factories.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Money::zero", "Money::of"]);
    }

    #[test]
    fn test_composite_query_concatenates() {
        let catalog = catalog();
        let query = CompositeMethodQuery::new(vec![
            Arc::new(ModestConstructorQuery::new(catalog.clone())),
            Arc::new(FactoryMethodQuery::new(catalog)),
        ]);
        assert_eq!(query.select_methods(&TypeRef::named("Money")).len(), 2);
        assert_eq!(query.select_methods(&TypeRef::named("Node")).len(), 3);
    }

    #[test]
    fn test_template_query_closes_generic_methods() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDefinition::class("Registry")
                .method(
                    MethodDef::factory(
                        "create",
                        vec![ParamDef::new("key", TypeRef::param("U"))],
                        TypeRef::named("Registry"),
                        |inv| Ok(Value::from(inv.type_arg("U").map(|t| t.to_string()).unwrap_or_default())),
                    )
                    .with_generic_params(["U"]),
                )
                .method(MethodDef::factory(
                    "create",
                    vec![ParamDef::new("count", TypeRef::string())],
                    TypeRef::named("Registry"),
                    |_| Ok(Value::Null),
                )),
        );
        let catalog = Arc::new(catalog);
        let template = MethodTemplate::new("create", vec![ParamDef::new("key", TypeRef::i32())]);
        let found = TemplateMethodQuery::new(catalog, template).select_methods(&TypeRef::named("Registry"));

        assert_eq!(found.len(), 1, "string parameter cannot accept i32");
        assert_eq!(found[0].parameters()[0].ty, TypeRef::i32());
        assert_eq!(found[0].invoke(&[Value::I32(1)]).unwrap(), Value::from("i32"));
    }
}
