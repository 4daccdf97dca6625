//! Structural type descriptors.
//!
//! A [`TypeRef`] names a type without owning its definition. Definitions
//! (constructors, members, base types) live in a catalog keyed by
//! [`TypeRef::definition_name`], which is what allows self-referential type
//! graphs to be described at all.

use std::collections::BTreeMap;
use std::fmt;

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Bool,
    Char,
    String,
    U8,
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
    /// Raw unmanaged handle. Never synthesized.
    Handle,
}

impl Primitive {
    pub const ALL: [Primitive; 11] = [
        Primitive::Bool,
        Primitive::Char,
        Primitive::String,
        Primitive::U8,
        Primitive::I32,
        Primitive::I64,
        Primitive::U32,
        Primitive::U64,
        Primitive::F32,
        Primitive::F64,
        Primitive::Handle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::String => "string",
            Primitive::U8 => "u8",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
            Primitive::Handle => "handle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integral() || matches!(self, Primitive::F32 | Primitive::F64)
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Primitive::U8 | Primitive::I32 | Primitive::I64 | Primitive::U32 | Primitive::U64
        )
    }

    /// Representable values of an integral primitive as a half-open range.
    pub fn integral_range(&self) -> Option<std::ops::Range<i128>> {
        let range = match self {
            Primitive::U8 => 0..(u8::MAX as i128 + 1),
            Primitive::I32 => i32::MIN as i128..(i32::MAX as i128 + 1),
            Primitive::I64 => i64::MIN as i128..(i64::MAX as i128 + 1),
            Primitive::U32 => 0..(u32::MAX as i128 + 1),
            Primitive::U64 => 0..(u64::MAX as i128 + 1),
            _ => return None,
        };
        Some(range)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural type descriptor.
///
/// Two `TypeRef`s are equal exactly when they print the same, so requests built
/// from them compare structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    Primitive(Primitive),
    /// A named type, generic when `args` is non-empty.
    Named { name: String, args: Vec<TypeRef> },
    /// An unbound generic parameter such as `T`.
    Param(String),
    /// `element[]` for rank 1, `element[,]` for rank 2, and so on.
    Array { element: Box<TypeRef>, rank: usize },
    Pointer(Box<TypeRef>),
}

impl TypeRef {
    pub fn primitive(p: Primitive) -> Self {
        TypeRef::Primitive(p)
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args,
        }
    }

    pub fn param(name: impl Into<String>) -> Self {
        TypeRef::Param(name.into())
    }

    pub fn array(element: TypeRef) -> Self {
        Self::array_of_rank(element, 1)
    }

    /// Rank 0 is normalized to rank 1.
    pub fn array_of_rank(element: TypeRef, rank: usize) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank: rank.max(1),
        }
    }

    pub fn pointer(target: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(target))
    }

    pub fn string() -> Self {
        TypeRef::Primitive(Primitive::String)
    }

    pub fn i32() -> Self {
        TypeRef::Primitive(Primitive::I32)
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            TypeRef::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Name used to look the type up in a catalog. `None` for primitives,
    /// parameters, arrays and pointers.
    pub fn definition_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn generic_args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_args().is_empty()
    }

    /// True when a generic parameter occurs anywhere inside this type.
    pub fn is_open(&self) -> bool {
        match self {
            TypeRef::Param(_) => true,
            TypeRef::Named { args, .. } => args.iter().any(TypeRef::is_open),
            TypeRef::Array { element, .. } => element.is_open(),
            TypeRef::Pointer(target) => target.is_open(),
            TypeRef::Primitive(_) => false,
        }
    }

    /// Same generic definition: equal names and arity.
    pub fn same_definition(&self, other: &TypeRef) -> bool {
        match (self, other) {
            (TypeRef::Named { name: a, args: x }, TypeRef::Named { name: b, args: y }) => {
                a == b && x.len() == y.len()
            }
            _ => false,
        }
    }

    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn rank(&self) -> usize {
        match self {
            TypeRef::Array { rank, .. } => *rank,
            _ => 0,
        }
    }

    /// Handles and pointers, at any depth of array nesting.
    pub fn is_unsafe(&self) -> bool {
        match self {
            TypeRef::Primitive(Primitive::Handle) | TypeRef::Pointer(_) => true,
            TypeRef::Array { element, .. } => element.is_unsafe(),
            _ => false,
        }
    }

    /// Replace generic parameters with their bindings. Unbound parameters are
    /// left in place.
    pub fn substitute(&self, bindings: &BTreeMap<String, TypeRef>) -> TypeRef {
        match self {
            TypeRef::Param(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            TypeRef::Named { name, args } => TypeRef::Named {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            TypeRef::Array { element, rank } => TypeRef::Array {
                element: Box::new(element.substitute(bindings)),
                rank: *rank,
            },
            TypeRef::Pointer(target) => TypeRef::Pointer(Box::new(target.substitute(bindings))),
            TypeRef::Primitive(_) => self.clone(),
        }
    }

    /// Match `actual` against this type as a pattern, binding generic
    /// parameters. A parameter already bound must match its binding.
    pub fn bind(&self, actual: &TypeRef, bindings: &mut BTreeMap<String, TypeRef>) -> bool {
        match (self, actual) {
            (TypeRef::Param(name), _) => match bindings.get(name) {
                Some(existing) => existing == actual,
                None => {
                    bindings.insert(name.clone(), actual.clone());
                    true
                }
            },
            (TypeRef::Named { name: pn, args: pa }, TypeRef::Named { name: an, args: aa }) => {
                pn == an
                    && pa.len() == aa.len()
                    && pa.iter().zip(aa).all(|(p, a)| p.bind(a, bindings))
            }
            (
                TypeRef::Array { element: pe, rank: pr },
                TypeRef::Array { element: ae, rank: ar },
            ) => pr == ar && pe.bind(ae, bindings),
            (TypeRef::Pointer(p), TypeRef::Pointer(a)) => p.bind(a, bindings),
            _ => self == actual,
        }
    }

    /// Generic parameter names in order of first occurrence.
    pub fn params(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_params(&mut out);
        out
    }

    fn collect_params(&self, out: &mut Vec<String>) {
        match self {
            TypeRef::Param(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            TypeRef::Named { args, .. } => args.iter().for_each(|a| a.collect_params(out)),
            TypeRef::Array { element, .. } => element.collect_params(out),
            TypeRef::Pointer(target) => target.collect_params(out),
            TypeRef::Primitive(_) => {}
        }
    }
}

impl From<Primitive> for TypeRef {
    fn from(p: Primitive) -> Self {
        TypeRef::Primitive(p)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{}", p),
            TypeRef::Named { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeRef::Param(name) => write!(f, "{}", name),
            TypeRef::Array { element, rank } => {
                write!(f, "{}[{}]", element, ",".repeat(rank.saturating_sub(1)))
            }
            TypeRef::Pointer(target) => write!(f, "{}*", target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shapes() {
        let t = TypeRef::generic("Map", vec![TypeRef::string(), TypeRef::i32()]);
        assert_eq!(t.to_string(), "Map<string, i32>");
        assert_eq!(TypeRef::array(TypeRef::i32()).to_string(), "i32[]");
        assert_eq!(
            TypeRef::array_of_rank(TypeRef::named("Widget"), 3).to_string(),
            "Widget[,,]"
        );
        assert_eq!(TypeRef::pointer(TypeRef::i32()).to_string(), "i32*");
    }

    #[test]
    fn test_open_and_substitute() {
        let open = TypeRef::generic("List", vec![TypeRef::param("T")]);
        assert!(open.is_open());
        assert_eq!(open.params(), vec!["T".to_string()]);

        let mut bindings = BTreeMap::new();
        bindings.insert("T".to_string(), TypeRef::named("Widget"));
        let closed = open.substitute(&bindings);
        assert!(!closed.is_open());
        assert_eq!(closed.to_string(), "List<Widget>");
        assert!(closed.same_definition(&open));
    }

    #[test]
    fn test_bind_pattern() {
        let pattern = TypeRef::generic("Map", vec![TypeRef::param("K"), TypeRef::param("K")]);
        let mut bindings = BTreeMap::new();
        assert!(pattern.bind(
            &TypeRef::generic("Map", vec![TypeRef::i32(), TypeRef::i32()]),
            &mut bindings
        ));
        assert_eq!(bindings["K"], TypeRef::i32());

        let mut bindings = BTreeMap::new();
        assert!(!pattern.bind(
            &TypeRef::generic("Map", vec![TypeRef::i32(), TypeRef::string()]),
            &mut bindings
        ));
    }

    #[test]
    fn test_unsafe_detection() {
        assert!(TypeRef::primitive(Primitive::Handle).is_unsafe());
        assert!(TypeRef::array(TypeRef::pointer(TypeRef::i32())).is_unsafe());
        assert!(!TypeRef::array(TypeRef::i32()).is_unsafe());
    }
}
