//! Dynamic specimen values.
//!
//! [`Value`] is what a resolution produces. Scalars are held inline, composite
//! objects are shared [`Instance`]s compared by identity, and sequences may be
//! either materialized once or re-enumerated lazily through a [`SequenceSource`].

use crate::types::{Primitive, TypeRef};
use parking_lot::RwLock;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Boxed error returned by lazily enumerated sequences.
pub type SequenceError = Box<dyn std::error::Error + Send + Sync>;

/// A produced value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    Str(String),
    U8(u8),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Array(ArrayValue),
    Collection(CollectionValue),
    Map(MapValue),
    Sequence(SequenceValue),
    Object(Arc<Instance>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The type this value was produced as, when it carries one.
    pub fn runtime_type(&self) -> Option<TypeRef> {
        let p = match self {
            Value::Null => return None,
            Value::Bool(_) => Primitive::Bool,
            Value::Char(_) => Primitive::Char,
            Value::Str(_) => Primitive::String,
            Value::U8(_) => Primitive::U8,
            Value::I32(_) => Primitive::I32,
            Value::I64(_) => Primitive::I64,
            Value::U32(_) => Primitive::U32,
            Value::U64(_) => Primitive::U64,
            Value::F32(_) => Primitive::F32,
            Value::F64(_) => Primitive::F64,
            Value::Array(a) => return Some(a.array_type()),
            Value::Collection(c) => return Some(c.ty.clone()),
            Value::Map(m) => return Some(m.ty.clone()),
            Value::Sequence(s) => return Some(s.sequence_type()),
            Value::Object(o) => return Some(o.ty().clone()),
        };
        Some(TypeRef::Primitive(p))
    }

    /// Numeric view used for range checks.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::U8(v) => Some(*v as f64),
            Value::I32(v) => Some(*v as f64),
            Value::I64(v) => Some(*v as f64),
            Value::U32(v) => Some(*v as f64),
            Value::U64(v) => Some(*v as f64),
            Value::F32(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Integral view; `None` for non-integral values or out-of-range numbers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::U8(v) => Some(*v as i64),
            Value::I32(v) => Some(*v as i64),
            Value::I64(v) => Some(*v),
            Value::U32(v) => Some(*v as i64),
            Value::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<Instance>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Convert a number into the given numeric primitive, truncating floats.
    /// `None` when the number does not fit the primitive.
    pub fn numeric(p: Primitive, n: f64) -> Option<Value> {
        if !n.is_finite() {
            return None;
        }
        match p {
            Primitive::F64 => Some(Value::F64(n)),
            Primitive::F32 => {
                let v = n as f32;
                v.is_finite().then_some(Value::F32(v))
            }
            // Saturation at the i128 edges is caught by the range check.
            _ => Value::integral(p, n.trunc() as i128),
        }
    }

    /// Checked conversion of an integer into the given integral primitive.
    pub fn integral(p: Primitive, n: i128) -> Option<Value> {
        let v = match p {
            Primitive::U8 => Value::U8(u8::try_from(n).ok()?),
            Primitive::I32 => Value::I32(i32::try_from(n).ok()?),
            Primitive::I64 => Value::I64(i64::try_from(n).ok()?),
            Primitive::U32 => Value::U32(u32::try_from(n).ok()?),
            Primitive::U64 => Value::U64(u64::try_from(n).ok()?),
            _ => return None,
        };
        Some(v)
    }

    /// Items of any sequence-like value: arrays, collections, sequences, and
    /// map entries as key/value pairs.
    pub fn items(&self) -> Result<Option<Vec<Value>>, SequenceError> {
        match self {
            Value::Array(a) => Ok(Some(a.items.clone())),
            Value::Collection(c) => Ok(Some(c.items.clone())),
            Value::Sequence(s) => s.items().map(Some),
            Value::Map(m) => Ok(Some(
                m.entries
                    .iter()
                    .map(|(k, v)| Value::Object(Arc::new(Instance::pair(k.clone(), v.clone()))))
                    .collect(),
            )),
            _ => Ok(None),
        }
    }

    /// Total order used for sorted containers: numbers numerically, strings
    /// and chars lexically, everything else by its display form.
    pub fn sort_cmp(&self, other: &Value) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        }
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }

    /// Zero, `false`, empty string, empty container or `Null`, depending on
    /// the type.
    pub fn neutral_for(ty: &TypeRef) -> Value {
        match ty {
            TypeRef::Primitive(p) => match p {
                Primitive::Bool => Value::Bool(false),
                Primitive::Char => Value::Char('\0'),
                Primitive::String => Value::Str(String::new()),
                Primitive::Handle => Value::Null,
                numeric => Value::numeric(*numeric, 0.0).unwrap_or(Value::Null),
            },
            TypeRef::Array { element, rank } => Value::Array(ArrayValue {
                element: (**element).clone(),
                dims: vec![0; *rank],
                items: Vec::new(),
            }),
            _ => Value::Null,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Arc<Instance>> for Value {
    fn from(v: Arc<Instance>) -> Self {
        Value::Object(v)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Collection(a), Value::Collection(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::Char(v) => v.hash(state),
            Value::Str(v) => v.hash(state),
            Value::U8(v) => v.hash(state),
            Value::I32(v) => v.hash(state),
            Value::I64(v) => v.hash(state),
            Value::U32(v) => v.hash(state),
            Value::U64(v) => v.hash(state),
            Value::F32(v) => v.to_bits().hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::Array(a) => {
                a.element.hash(state);
                a.dims.hash(state);
                a.items.hash(state);
            }
            Value::Collection(c) => {
                c.ty.hash(state);
                c.items.hash(state);
            }
            Value::Map(m) => {
                m.ty.hash(state);
                m.entries.hash(state);
            }
            Value::Sequence(s) => s.element.hash(state),
            Value::Object(o) => (Arc::as_ptr(o) as usize).hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "'{}'", v.escape_default()),
            Value::Str(v) => write!(f, "\"{}\"", v),
            Value::U8(v) => write!(f, "{}u8", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}i64", v),
            Value::U32(v) => write!(f, "{}u32", v),
            Value::U64(v) => write!(f, "{}u64", v),
            Value::F32(v) => write!(f, "{}f32", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Array(a) => write!(f, "{} [{} items]", a.array_type(), a.items.len()),
            Value::Collection(c) => write!(f, "{} [{} items]", c.ty, c.items.len()),
            Value::Map(m) => write!(f, "{} [{} entries]", m.ty, m.entries.len()),
            Value::Sequence(s) => write!(f, "{}", s.sequence_type()),
            Value::Object(o) => write!(f, "{}", o.ty()),
        }
    }
}

/// A single- or multi-dimensional array. Items are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayValue {
    pub element: TypeRef,
    pub dims: Vec<usize>,
    pub items: Vec<Value>,
}

impl ArrayValue {
    pub fn new(element: TypeRef, items: Vec<Value>) -> Self {
        Self {
            element,
            dims: vec![items.len()],
            items,
        }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn array_type(&self) -> TypeRef {
        TypeRef::array_of_rank(self.element.clone(), self.rank())
    }

    /// Item at a multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Option<&Value> {
        if index.len() != self.dims.len() {
            return None;
        }
        let mut offset = 0;
        for (i, dim) in index.iter().zip(&self.dims) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        self.items.get(offset)
    }
}

/// A concrete container such as `List<T>` or `HashSet<T>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionValue {
    pub ty: TypeRef,
    pub items: Vec<Value>,
}

impl CollectionValue {
    pub fn new(ty: TypeRef, items: Vec<Value>) -> Self {
        Self { ty, items }
    }
}

/// A concrete map such as `Dictionary<K, V>`. Entry order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapValue {
    pub ty: TypeRef,
    pub entries: Vec<(Value, Value)>,
}

impl MapValue {
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            entries: Vec::new(),
        }
    }

    /// Insert unless the key is already present. Returns whether it was added.
    pub fn insert(&mut self, key: Value, value: Value) -> bool {
        if self.entries.iter().any(|(k, _)| *k == key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Which abstract sequence shape a [`SequenceValue`] presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceShape {
    Enumerable,
    Queryable,
    Enumerator,
}

impl SequenceShape {
    pub fn type_name(&self) -> &'static str {
        match self {
            SequenceShape::Enumerable => "Enumerable",
            SequenceShape::Queryable => "Queryable",
            SequenceShape::Enumerator => "Enumerator",
        }
    }
}

/// Lazily re-enumerated item source. Each call may yield different items.
pub trait SequenceSource: Send + Sync {
    fn enumerate(&self) -> Result<Vec<Value>, SequenceError>;
}

#[derive(Clone)]
pub enum SequenceItems {
    /// Materialized once; every enumeration yields the same items.
    Stable(Arc<[Value]>),
    /// Re-resolved on every enumeration.
    Dynamic(Arc<dyn SequenceSource>),
}

impl fmt::Debug for SequenceItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceItems::Stable(items) => f.debug_tuple("Stable").field(&items.len()).finish(),
            SequenceItems::Dynamic(_) => f.write_str("Dynamic"),
        }
    }
}

/// An enumerable, queryable or enumerator view over items of one type.
#[derive(Debug, Clone)]
pub struct SequenceValue {
    pub element: TypeRef,
    pub shape: SequenceShape,
    pub source: SequenceItems,
}

impl SequenceValue {
    pub fn stable(element: TypeRef, items: Vec<Value>) -> Self {
        Self {
            element,
            shape: SequenceShape::Enumerable,
            source: SequenceItems::Stable(items.into()),
        }
    }

    pub fn dynamic(element: TypeRef, source: Arc<dyn SequenceSource>) -> Self {
        Self {
            element,
            shape: SequenceShape::Enumerable,
            source: SequenceItems::Dynamic(source),
        }
    }

    pub fn with_shape(mut self, shape: SequenceShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn is_stable(&self) -> bool {
        matches!(self.source, SequenceItems::Stable(_))
    }

    /// Enumerate the items. Dynamic sequences resolve afresh on every call.
    pub fn items(&self) -> Result<Vec<Value>, SequenceError> {
        match &self.source {
            SequenceItems::Stable(items) => Ok(items.to_vec()),
            SequenceItems::Dynamic(source) => source.enumerate(),
        }
    }

    pub fn sequence_type(&self) -> TypeRef {
        TypeRef::generic(self.shape.type_name(), vec![self.element.clone()])
    }
}

impl PartialEq for SequenceValue {
    fn eq(&self, other: &Self) -> bool {
        if self.element != other.element || self.shape != other.shape {
            return false;
        }
        match (&self.source, &other.source) {
            (SequenceItems::Stable(a), SequenceItems::Stable(b)) => a == b,
            (SequenceItems::Dynamic(a), SequenceItems::Dynamic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for SequenceValue {}

/// A composite object. Fields are interior-mutable so postprocessors can
/// assign members on a shared instance.
pub struct Instance {
    ty: TypeRef,
    fields: RwLock<BTreeMap<String, Value>>,
    disposable: bool,
    disposals: AtomicUsize,
}

impl Instance {
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            fields: RwLock::new(BTreeMap::new()),
            disposable: false,
            disposals: AtomicUsize::new(0),
        }
    }

    pub fn with_fields(ty: TypeRef, fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        let instance = Self::new(ty);
        instance.fields.write().extend(fields);
        instance
    }

    /// A `KeyValuePair<K, V>` instance with `key` and `value` fields.
    pub fn pair(key: Value, value: Value) -> Self {
        let object = || TypeRef::named("object");
        let ty = TypeRef::generic(
            "KeyValuePair",
            vec![
                key.runtime_type().unwrap_or_else(object),
                value.runtime_type().unwrap_or_else(object),
            ],
        );
        Self::with_fields(
            ty,
            vec![("key".to_string(), key), ("value".to_string(), value)],
        )
    }

    pub fn disposable(mut self, disposable: bool) -> Self {
        self.disposable = disposable;
        self
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.read().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.fields.write().insert(name.into(), value);
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.read().contains_key(name)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.read().keys().cloned().collect()
    }

    pub fn fields(&self) -> BTreeMap<String, Value> {
        self.fields.read().clone()
    }

    pub fn is_disposable(&self) -> bool {
        self.disposable
    }

    /// Release the instance. Counts calls so callers can verify cleanup.
    pub fn dispose(&self) {
        self.disposals.fetch_add(1, Ordering::SeqCst);
    }

    pub fn dispose_count(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Field values are not printed: self-referential graphs would recurse.
        f.debug_struct("Instance")
            .field("ty", &self.ty)
            .field("fields", &self.field_names())
            .field("disposable", &self.disposable)
            .finish()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Char(v) => serializer.serialize_char(*v),
            Value::Str(v) => serializer.serialize_str(v),
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Array(a) => serialize_dims(&a.items, &a.dims, serializer),
            Value::Collection(c) => serializer.collect_seq(c.items.iter()),
            Value::Map(m) => {
                let mut seq = serializer.serialize_seq(Some(m.entries.len()))?;
                for (k, v) in &m.entries {
                    seq.serialize_element(&Entry { key: k, value: v })?;
                }
                seq.end()
            }
            Value::Sequence(s) => {
                let items = s
                    .items()
                    .map_err(<S::Error as serde::ser::Error>::custom)?;
                serializer.collect_seq(items.iter())
            }
            Value::Object(o) => {
                let fields = o.fields();
                let mut map = serializer.serialize_map(Some(fields.len() + 1))?;
                map.serialize_entry("$type", &o.ty().to_string())?;
                for (name, value) in &fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

#[derive(Serialize)]
struct Entry<'a> {
    key: &'a Value,
    value: &'a Value,
}

/// Serialize a row-major block as nested sequences, one level per dimension.
fn serialize_dims<S: Serializer>(
    items: &[Value],
    dims: &[usize],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    struct Block<'a> {
        items: &'a [Value],
        dims: &'a [usize],
    }

    impl Serialize for Block<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serialize_dims(self.items, self.dims, serializer)
        }
    }

    match dims {
        [] | [_] => serializer.collect_seq(items.iter()),
        [outer, rest @ ..] => {
            let stride: usize = rest.iter().product();
            let mut seq = serializer.serialize_seq(Some(*outer))?;
            for i in 0..*outer {
                let start = (i * stride).min(items.len());
                let end = ((i + 1) * stride).min(items.len());
                seq.serialize_element(&Block {
                    items: &items[start..end],
                    dims: rest,
                })?;
            }
            seq.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_conversion_is_checked() {
        assert_eq!(Value::numeric(Primitive::I32, 7.9), Some(Value::I32(7)));
        assert_eq!(Value::numeric(Primitive::U8, -1.0), None);
        assert_eq!(Value::numeric(Primitive::U8, 256.0), None);
        assert_eq!(Value::numeric(Primitive::I32, 1e10), None);
        assert_eq!(Value::numeric(Primitive::U64, 1e300), None);
        assert_eq!(Value::numeric(Primitive::F32, 1e300), None);
        assert_eq!(Value::numeric(Primitive::F64, f64::NAN), None);
        assert_eq!(
            Value::integral(Primitive::I64, i64::MIN as i128),
            Some(Value::I64(i64::MIN))
        );
        assert_eq!(Value::integral(Primitive::U32, u32::MAX as i128 + 1), None);
    }

    #[test]
    fn test_objects_compare_by_identity() {
        let a = Arc::new(Instance::new(TypeRef::named("Widget")));
        let b = Arc::new(Instance::new(TypeRef::named("Widget")));
        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
    }

    #[test]
    fn test_neutral_values() {
        assert_eq!(Value::neutral_for(&TypeRef::i32()), Value::I32(0));
        assert_eq!(Value::neutral_for(&TypeRef::string()), Value::Str(String::new()));
        assert_eq!(Value::neutral_for(&TypeRef::named("Widget")), Value::Null);
        match Value::neutral_for(&TypeRef::array_of_rank(TypeRef::i32(), 2)) {
            Value::Array(a) => assert_eq!(a.dims, vec![0, 0]),
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_multidimensional_index() {
        let items = (0..6).map(Value::I32).collect();
        let array = ArrayValue {
            element: TypeRef::i32(),
            dims: vec![2, 3],
            items,
        };
        assert_eq!(array.get(&[1, 2]), Some(&Value::I32(5)));
        assert_eq!(array.get(&[0, 1]), Some(&Value::I32(1)));
        assert_eq!(array.get(&[2, 0]), None);
        assert_eq!(array.array_type().to_string(), "i32[,]");
    }

    #[test]
    fn test_serialize_object_and_matrix() {
        let widget = Instance::with_fields(
            TypeRef::named("Widget"),
            vec![("size".to_string(), Value::I32(3))],
        );
        let json = serde_json::to_value(Value::Object(Arc::new(widget))).unwrap();
        assert_eq!(json["$type"], "Widget");
        assert_eq!(json["size"], 3);

        let matrix = Value::Array(ArrayValue {
            element: TypeRef::i32(),
            dims: vec![2, 2],
            items: (1..=4).map(Value::I32).collect(),
        });
        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(json, serde_json::json!([[1, 2], [3, 4]]));
    }

    #[test]
    fn test_map_ignores_duplicate_keys() {
        let mut map = MapValue::new(TypeRef::named("Dictionary"));
        assert!(map.insert(Value::I32(1), Value::from("a")));
        assert!(!map.insert(Value::I32(1), Value::from("b")));
        assert_eq!(map.get(&Value::I32(1)), Some(&Value::from("a")));
    }
}
