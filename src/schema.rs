//! JSON catalog schema.
//!
//! Describes types for the CLI and for tests without writing Rust:
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "name": "Order",
//!       "constructors": [[{ "name": "id", "type": "i32" }]],
//!       "properties": [{ "name": "lines", "type": "List<OrderLine>" }]
//!     }
//!   ]
//! }
//! ```
//!
//! Constructors and factories loaded this way build record instances whose
//! fields are the named arguments.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use specimen_core::catalog::{MemberDef, MethodDef, MethodKind, ParamDef, TypeCatalog, TypeDefinition};
use specimen_types::{parse_type_ref_with_params, TypeRef};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSchema {
    #[serde(default)]
    pub types: Vec<TypeSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSchema {
    pub name: String,
    #[serde(default)]
    pub generic_params: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub interface: bool,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub disposable: bool,
    /// One parameter list per constructor.
    #[serde(default)]
    pub constructors: Vec<Vec<ParamSchema>>,
    #[serde(default)]
    pub factories: Vec<FactorySchema>,
    #[serde(default)]
    pub properties: Vec<MemberSchema>,
    #[serde(default)]
    pub fields: Vec<MemberSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorySchema {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamSchema>,
    /// Defaults to the declaring type.
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub generic_params: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "writable_by_default")]
    pub writable: bool,
}

fn writable_by_default() -> bool {
    true
}

impl CatalogSchema {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse catalog JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid catalog {}", path.display()))
    }

    /// Register every type on top of `catalog`.
    pub fn apply(&self, catalog: &mut TypeCatalog) -> Result<()> {
        for ty in &self.types {
            let definition = ty
                .to_definition()
                .with_context(|| format!("Invalid definition for type '{}'", ty.name))?;
            catalog.register(definition);
        }
        debug!(types = self.types.len(), "catalog schema applied");
        Ok(())
    }

    /// The well-known catalog extended with these types.
    pub fn into_catalog(self) -> Result<TypeCatalog> {
        let mut catalog = TypeCatalog::with_well_known();
        self.apply(&mut catalog)?;
        Ok(catalog)
    }
}

impl TypeSchema {
    fn parse(&self, ty: &str, extra: &[String]) -> Result<TypeRef> {
        let params: Vec<&str> = self
            .generic_params
            .iter()
            .chain(extra)
            .map(String::as_str)
            .collect();
        Ok(parse_type_ref_with_params(ty, &params)?)
    }

    fn params(&self, params: &[ParamSchema], extra: &[String]) -> Result<Vec<ParamDef>> {
        params
            .iter()
            .map(|p| Ok(ParamDef::new(&p.name, self.parse(&p.ty, extra)?)))
            .collect()
    }

    fn members(&self, members: &[MemberSchema]) -> Result<Vec<MemberDef>> {
        members
            .iter()
            .map(|m| {
                Ok(MemberDef {
                    name: m.name.clone(),
                    ty: self.parse(&m.ty, &[])?,
                    writable: m.writable,
                })
            })
            .collect()
    }

    pub fn to_definition(&self) -> Result<TypeDefinition> {
        if self.name.trim().is_empty() {
            bail!("type name must not be empty");
        }
        if self.is_abstract && self.interface {
            bail!("a type cannot be both abstract and an interface");
        }

        let mut def = if self.interface {
            TypeDefinition::interface(&self.name)
        } else if self.is_abstract {
            TypeDefinition::abstract_class(&self.name)
        } else {
            TypeDefinition::class(&self.name)
        }
        .generic(self.generic_params.clone());

        if let Some(base) = &self.base {
            def = def.base(self.parse(base, &[])?);
        }
        for iface in &self.interfaces {
            def = def.implements(self.parse(iface, &[])?);
        }
        if self.disposable {
            def = def.disposable();
        }
        for ctor in &self.constructors {
            def = def.method(MethodDef::constructor(self.params(ctor, &[])?));
        }
        for factory in &self.factories {
            let returns = match &factory.returns {
                Some(r) => self.parse(r, &factory.generic_params)?,
                None => def.type_ref(),
            };
            def = def.method(MethodDef {
                name: factory.name.clone(),
                kind: MethodKind::Factory,
                params: self.params(&factory.params, &factory.generic_params)?,
                generic_params: factory.generic_params.clone(),
                returns: Some(returns),
                public: true,
                body: None,
            });
        }
        def.properties = self.members(&self.properties)?;
        def.fields = self.members(&self.fields)?;
        Ok(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specimen_core::methods::Method;

    const SHOP: &str = r#"{
        "types": [
            {
                "name": "Shape",
                "abstract": true,
                "factories": [{ "name": "unit", "params": [{ "name": "sides", "type": "i32" }] }]
            },
            {
                "name": "Box",
                "generic_params": ["T"],
                "constructors": [[{ "name": "item", "type": "T" }], []],
                "properties": [
                    { "name": "label", "type": "string" },
                    { "name": "id", "type": "i32", "writable": false }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_schema_builds_definitions() {
        let catalog = CatalogSchema::from_json(SHOP).unwrap().into_catalog().unwrap();
        let boxed = TypeRef::generic("Box", vec![TypeRef::string()]);

        let ctors = catalog.constructors(&boxed);
        assert_eq!(ctors.len(), 2);
        assert_eq!(ctors[0].parameters()[0].ty, TypeRef::string());

        let props = catalog.properties(&boxed);
        assert_eq!(props.len(), 2);
        assert!(props[0].writable);
        assert!(!props[1].writable);

        let shape = TypeRef::named("Shape");
        assert!(catalog.is_abstract(&shape));
        assert_eq!(catalog.factories(&shape).len(), 1);
    }

    #[test]
    fn test_schema_rejects_bad_types() {
        let bad = r#"{ "types": [ { "name": "Broken", "properties": [ { "name": "x", "type": "List<" } ] } ] }"#;
        let err = CatalogSchema::from_json(bad).unwrap().into_catalog().unwrap_err();
        assert!(format!("{:#}", err).contains("Broken"), "{:#}", err);

        let unknown = r#"{ "types": [ { "name": "X", "colour": "red" } ] }"#;
        assert!(CatalogSchema::from_json(unknown).is_err());
    }
}
