// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of property kinds and their validators.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::class::ClassInfo;
use crate::color::{ColorTable, SvgColors, is_color};
use crate::enums::EnumDef;
use crate::font::is_font_size;
use crate::value::Value;

/// Largest integer below which every `f64` may have a fractional part.
const MAX_FRACTIONAL: f64 = 4_503_599_627_370_496.0;

/// The allowed shape of a property value.
///
/// Validation dispatches on the tag and is a pure, total predicate.
///
/// ```rust
/// use glyphspec_property::{Kind, Value, enums::DIRECTION};
///
/// let kind = Kind::array(Kind::Number);
/// assert!(kind.valid(&Value::from(vec![Value::from(1), Value::from(2.5)])));
/// assert!(!kind.valid(&Value::from(vec![Value::from("x")])));
///
/// let direction = Kind::Enum(&DIRECTION);
/// assert!(direction.valid(&"clock".into()));
/// assert!(!direction.valid(&"top_left".into()));
/// assert_eq!(direction.to_string(), "Enum(clock, anticlock)");
/// ```
#[derive(Clone, Debug)]
pub enum Kind {
    /// Anything except `undefined`.
    Any,
    /// `true` or `false`.
    Boolean,
    /// A finite number.
    Number,
    /// A finite integral number.
    Int,
    /// A finite number measuring an angle.
    Angle,
    /// A number in `[0, 1]`.
    Percent,
    /// Any string.
    String,
    /// A CSS font size string.
    FontSize,
    /// A font name; any string.
    Font,
    /// A color string or packed integer.
    Color,
    /// A member of a string enumeration.
    Enum(&'static EnumDef),
    /// A plain sequence of elements of the given kind.
    Array(Box<Kind>),
    /// An instance of the class or one of its subclasses.
    Ref(&'static ClassInfo),
    /// `null` or the inner kind.
    Nullable(Box<Kind>),
    /// The inner kind, restricted to values that are not negative.
    NonNegative(Box<Kind>),
    /// Any one of the listed kinds.
    Or(Vec<Kind>),
    /// A fixed-length sequence with one kind per position.
    Tuple(Vec<Kind>),
    /// A plain object with the listed fields and no others.
    Struct(Vec<StructField>),
}

/// One field of a [`Kind::Struct`].
#[derive(Clone, Debug)]
pub struct StructField {
    /// Key name.
    pub name: &'static str,
    /// Kind of the field's value.
    pub kind: Kind,
    /// Whether the key may be absent.
    pub optional: bool,
}

impl StructField {
    /// A required field.
    #[must_use]
    pub fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            optional: false,
        }
    }

    /// A field that may be absent.
    #[must_use]
    pub fn optional(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            optional: true,
        }
    }
}

impl Kind {
    /// `Array(kind)`.
    #[must_use]
    pub fn array(kind: Self) -> Self {
        Self::Array(Box::new(kind))
    }

    /// `Nullable(kind)`.
    #[must_use]
    pub fn nullable(kind: Self) -> Self {
        Self::Nullable(Box::new(kind))
    }

    /// `NonNegative(kind)`.
    #[must_use]
    pub fn non_negative(kind: Self) -> Self {
        Self::NonNegative(Box::new(kind))
    }

    /// Validates against the SVG named-color table.
    #[must_use]
    pub fn valid(&self, value: &Value) -> bool {
        self.valid_with(value, &SvgColors)
    }

    /// Validates, looking color names up in `colors`.
    #[must_use]
    pub fn valid_with(&self, value: &Value, colors: &dyn ColorTable) -> bool {
        match self {
            Self::Any => !value.is_undefined(),
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::Number | Self::Angle => value.as_f64().is_some_and(f64::is_finite),
            Self::Int => value.as_f64().is_some_and(is_integral),
            Self::Percent => value.as_f64().is_some_and(|n| (0.0..=1.0).contains(&n)),
            Self::String | Self::Font => matches!(value, Value::String(_)),
            Self::FontSize => value.as_str().is_some_and(is_font_size),
            Self::Color => is_color(value, colors),
            Self::Enum(def) => value.as_str().is_some_and(|s| def.contains(s)),
            Self::Array(item) => match value {
                Value::Array(items) => items.iter().all(|v| item.valid_with(v, colors)),
                _ => false,
            },
            Self::Ref(class) => value
                .as_instance()
                .is_some_and(|obj| obj.class().is_subclass_of(class)),
            Self::Nullable(inner) => value.is_null() || inner.valid_with(value, colors),
            Self::NonNegative(inner) => {
                inner.valid_with(value, colors) && value.as_f64().is_none_or(|n| n >= 0.0)
            }
            Self::Or(kinds) => kinds.iter().any(|k| k.valid_with(value, colors)),
            Self::Tuple(kinds) => match value {
                Value::Array(items) => {
                    items.len() == kinds.len()
                        && kinds
                            .iter()
                            .zip(items)
                            .all(|(k, v)| k.valid_with(v, colors))
                }
                _ => false,
            },
            Self::Struct(fields) => match value {
                Value::Map(map) => {
                    map.keys()
                        .all(|key| fields.iter().any(|f| f.name == key.as_str()))
                        && fields.iter().all(|f| match map.get(f.name) {
                            Some(v) => f.kind.valid_with(v, colors),
                            None => f.optional,
                        })
                }
                _ => false,
            },
        }
    }

    /// Returns `true` if values of this kind can contain references to
    /// property-bearing objects.
    ///
    /// This depends on the kind alone, never on a value: `Any` may hold
    /// anything, and `Ref` qualifies only when its class is a `HasProps`
    /// subclass.
    #[must_use]
    pub fn may_have_refs(&self) -> bool {
        match self {
            Self::Any => true,
            Self::Ref(class) => class.is_model(),
            Self::Array(inner) | Self::Nullable(inner) | Self::NonNegative(inner) => {
                inner.may_have_refs()
            }
            Self::Or(kinds) | Self::Tuple(kinds) => kinds.iter().any(Self::may_have_refs),
            Self::Struct(fields) => fields.iter().any(|f| f.kind.may_have_refs()),
            Self::Boolean
            | Self::Number
            | Self::Int
            | Self::Angle
            | Self::Percent
            | Self::String
            | Self::FontSize
            | Self::Font
            | Self::Color
            | Self::Enum(_) => false,
        }
    }
}

fn is_integral(n: f64) -> bool {
    if !n.is_finite() {
        return false;
    }
    if !(-MAX_FRACTIONAL..=MAX_FRACTIONAL).contains(&n) {
        return true;
    }
    #[expect(clippy::cast_possible_truncation, reason = "|n| < 2^52")]
    let truncated = n as i64;
    truncated as f64 == n
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Number => f.write_str("Number"),
            Self::Int => f.write_str("Int"),
            Self::Angle => f.write_str("Angle"),
            Self::Percent => f.write_str("Percent"),
            Self::String => f.write_str("String"),
            Self::FontSize => f.write_str("FontSize"),
            Self::Font => f.write_str("Font"),
            Self::Color => f.write_str("Color"),
            Self::Enum(def) => write!(f, "Enum({})", def.joined()),
            Self::Array(inner) => write!(f, "Array({inner})"),
            Self::Ref(class) => write!(f, "Ref({})", class.name()),
            Self::Nullable(inner) => write!(f, "Nullable({inner})"),
            Self::NonNegative(inner) => write!(f, "NonNegative({inner})"),
            Self::Or(kinds) => {
                f.write_str("Or(")?;
                write_list(f, kinds)?;
                f.write_str(")")
            }
            Self::Tuple(kinds) => {
                f.write_str("Tuple(")?;
                write_list(f, kinds)?;
                f.write_str(")")
            }
            Self::Struct(fields) => {
                f.write_str("Struct(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    let marker = if field.optional { "?" } else { "" };
                    write!(f, "{}{marker}: {}", field.name, field.kind)?;
                }
                f.write_str(")")
            }
        }
    }
}
