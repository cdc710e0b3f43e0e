// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic raw values.
//!
//! [`Value`] is what gets assigned to a property before validation: a
//! literal, a plain sequence, a typed buffer, a plain map (which may be a spec
//! shape) or a reference to an [`Object`].

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::array::NdArray;
use crate::class::Object;

/// A plain object: string keys in sorted order.
pub type Map = BTreeMap<String, Value>;

/// A raw attribute value.
///
/// `Instance` values compare by identity; everything else compares
/// structurally.
///
/// ```rust
/// use glyphspec_property::Value;
///
/// let spec = Value::map([("field", Value::from("x"))]);
/// assert_eq!(spec.get("field"), Some(&Value::from("x")));
/// assert_eq!(spec.to_string(), r#"{field: "x"}"#);
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// No value present.
    #[default]
    Undefined,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// A plain ordered sequence.
    Array(Vec<Value>),
    /// A typed, fixed-width buffer.
    Buffer(NdArray),
    /// A plain object.
    Map(Map),
    /// A reference to an object instance.
    Instance(Rc<dyn Object>),
}

impl Value {
    /// Builds a [`Value::Map`] from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for [`Value::Undefined`].
    #[must_use]
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// The number, if this is one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The map, if this is one.
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The referenced instance, if this is one.
    #[must_use]
    pub fn as_instance(&self) -> Option<&Rc<dyn Object>> {
        match self {
            Self::Instance(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up `key` in a map value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Number of elements of a sequence or buffer value.
    #[must_use]
    pub fn seq_len(&self) -> Option<usize> {
        match self {
            Self::Array(items) => Some(items.len()),
            Self::Buffer(buf) => Some(buf.len()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Buffer(a), Self::Buffer(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => same_instance(a, b),
            _ => false,
        }
    }
}

/// Identity comparison of two object references.
pub(crate) fn same_instance(a: &Rc<dyn Object>, b: &Rc<dyn Object>) -> bool {
    core::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Self::Buffer(buf) => f.debug_tuple("Buffer").field(buf).finish(),
            Self::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Self::Instance(obj) => f.debug_tuple("Instance").field(obj).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Buffer(buf) => write!(f, "{:?}{:?}", buf.dtype(), buf.shape()),
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Self::Instance(obj) => write!(f, "{}(..)", obj.class().name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Array(items)
    }
}

impl From<NdArray> for Value {
    fn from(buf: NdArray) -> Self {
        Self::Buffer(buf)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl From<Rc<dyn Object>> for Value {
    fn from(obj: Rc<dyn Object>) -> Self {
        Self::Instance(obj)
    }
}

impl<T: Object> From<Rc<T>> for Value {
    fn from(obj: Rc<T>) -> Self {
        Self::Instance(obj)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl FromIterator<Self> for Value {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::Array(iter.into_iter().collect())
    }
}
