// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data specs: a constant value, a column reference or an expression,
//! optionally with units and a transform.
//!
//! A spec property accepts either a spec map such as
//! `{field: "x", units: "screen"}` or a plain literal, which is wrapped as
//! `{value: literal}` before validation.
//!
//! Keys that mean nothing to a kind (`units` on a kind without a unit
//! system, or keys the spec format does not define) are kept verbatim and
//! rendered back by [`Spec::to_value`], but otherwise ignored.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::class::Object;
use crate::color::ColorTable;
use crate::enums::MARKER_TYPE;
use crate::error::{PropertyError, SpecShapeError};
use crate::kind::Kind;
use crate::model::{Expression, Transform};
use crate::units::{UnitSystem, Units};
use crate::value::{Map, Value};

/// Keys that select the spec variant; exactly one must be present.
const SELECTOR_KEYS: [&str; 3] = ["field", "value", "expr"];

/// Returns `true` if `value` is a map with exactly one of `field`, `value`
/// and `expr`.
///
/// ```rust
/// use glyphspec_property::{Value, is_spec};
///
/// assert!(is_spec(&Value::map([("field", "foo")])));
/// assert!(is_spec(&Value::map([("value", 1)])));
/// assert!(!is_spec(&Value::map([("field", "foo"), ("value", "bar")])));
/// assert!(!is_spec(&Value::map([("units", "screen")])));
/// assert!(!is_spec(&Value::from(1.0)));
/// ```
#[must_use]
pub fn is_spec(value: &Value) -> bool {
    value.as_map().is_some_and(|map| selector_count(map) == 1)
}

fn selector_count(map: &Map) -> usize {
    SELECTOR_KEYS
        .iter()
        .filter(|key| map.contains_key(**key))
        .count()
}

/// Where a spec's data comes from.
#[derive(Clone, Debug)]
pub enum SpecValue {
    /// A constant.
    Value(Value),
    /// A column of the data source.
    Field(String),
    /// A computed value.
    Expr(Rc<dyn Expression>),
}

/// A resolved data spec.
#[derive(Clone, Debug)]
pub struct Spec {
    source: SpecValue,
    units: Option<Units>,
    transform: Option<Rc<dyn Transform>>,
    extras: Map,
}

impl Spec {
    /// A constant spec without units or transform.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::from_source(SpecValue::Value(value.into()))
    }

    /// A column spec without units or transform.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::from_source(SpecValue::Field(name.into()))
    }

    /// An expression spec without units or transform.
    #[must_use]
    pub fn expr(expr: Rc<dyn Expression>) -> Self {
        Self::from_source(SpecValue::Expr(expr))
    }

    fn from_source(source: SpecValue) -> Self {
        Self {
            source,
            units: None,
            transform: None,
            extras: Map::new(),
        }
    }

    /// Sets the units.
    #[must_use]
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    /// Sets the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Rc<dyn Transform>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Data source of the spec.
    #[must_use]
    #[inline]
    pub fn source(&self) -> &SpecValue {
        &self.source
    }

    /// Units as given, if any.
    #[must_use]
    #[inline]
    pub fn units(&self) -> Option<Units> {
        self.units
    }

    /// Transform as given, if any.
    #[must_use]
    #[inline]
    pub fn transform(&self) -> Option<&Rc<dyn Transform>> {
        self.transform.as_ref()
    }

    /// Keys kept as given but not interpreted for this kind.
    #[must_use]
    #[inline]
    pub fn extras(&self) -> &Map {
        &self.extras
    }

    /// The constant, for value specs.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match &self.source {
            SpecValue::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The column name, for field specs.
    #[must_use]
    pub fn as_field(&self) -> Option<&str> {
        match &self.source {
            SpecValue::Field(name) => Some(name),
            _ => None,
        }
    }

    /// Renders the spec as its map form, with only the keys that were given.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = self.extras.clone();
        let (key, value) = match &self.source {
            SpecValue::Value(v) => ("value", v.clone()),
            SpecValue::Field(name) => ("field", Value::from(name.as_str())),
            SpecValue::Expr(expr) => {
                let obj: Rc<dyn Object> = expr.clone();
                ("expr", Value::Instance(obj))
            }
        };
        map.insert(key.into(), value);
        if let Some(units) = self.units {
            map.insert("units".into(), units.as_str().into());
        }
        if let Some(transform) = &self.transform {
            let obj: Rc<dyn Object> = transform.clone();
            map.insert("transform".into(), Value::Instance(obj));
        }
        Value::Map(map)
    }
}

impl From<Spec> for Value {
    fn from(spec: Spec) -> Self {
        spec.to_value()
    }
}

/// Shape of the flat buffer a spec kind materializes into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Material {
    /// `float64` numbers; missing elements are `NaN`.
    Number,
    /// `float32` negated radians.
    Angle,
    /// `uint8` booleans.
    Boolean,
    /// Optional strings.
    Text,
    /// RGBA bytes.
    Color,
    /// One `float64` sequence per element.
    Ragged,
}

impl Material {
    /// Returns `true` for outputs a numeric transform applies to.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Angle | Self::Ragged)
    }
}

/// The declared type of a spec property.
///
/// ```rust
/// use glyphspec_property::{SpecKind, Units, Value};
///
/// let size = SpecKind::distance();
/// let spec = size.resolve("size", &Value::from(5.0)).unwrap();
/// assert_eq!(spec.as_value(), Some(&Value::from(5.0)));
/// assert_eq!(size.effective_units(&spec), Some(Units::Data));
///
/// let spec = size
///     .resolve("size", &Value::map([("field", "s"), ("units", "screen")]))
///     .unwrap();
/// assert_eq!(spec.as_field(), Some("s"));
/// assert_eq!(size.effective_units(&spec), Some(Units::Screen));
///
/// assert!(size.resolve("size", &Value::from(-1.0)).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct SpecKind {
    value_kind: Kind,
    units: Option<UnitSystem>,
    default_units: Option<Units>,
    material: Material,
}

impl SpecKind {
    fn new(value_kind: Kind, material: Material) -> Self {
        Self {
            value_kind,
            units: None,
            default_units: None,
            material,
        }
    }

    fn with_unit_system(mut self, system: UnitSystem) -> Self {
        self.units = Some(system);
        self
    }

    /// Any finite number.
    #[must_use]
    pub fn number() -> Self {
        Self::new(Kind::Number, Material::Number)
    }

    /// An angle in `deg`, `rad`, `grad` or `turn`; defaults to `rad`.
    #[must_use]
    pub fn angle() -> Self {
        Self::new(Kind::Angle, Material::Angle).with_unit_system(UnitSystem::Angle)
    }

    /// A non-negative length in `screen` or `data` units; defaults to `data`.
    #[must_use]
    pub fn distance() -> Self {
        Self::new(Kind::non_negative(Kind::Number), Material::Number)
            .with_unit_system(UnitSystem::Spatial)
    }

    /// As [`distance`](Self::distance), also accepting `null`.
    #[must_use]
    pub fn null_distance() -> Self {
        Self::new(
            Kind::nullable(Kind::non_negative(Kind::Number)),
            Material::Number,
        )
        .with_unit_system(UnitSystem::Spatial)
    }

    /// An x or y coordinate.
    #[must_use]
    pub fn coordinate() -> Self {
        Self::new(Kind::Number, Material::Number)
    }

    /// A sequence of coordinates per element, as for patches and lines.
    #[must_use]
    pub fn coordinate_seq() -> Self {
        Self::new(Kind::array(Kind::Number), Material::Ragged)
    }

    /// An opacity in `[0, 1]`.
    #[must_use]
    pub fn alpha() -> Self {
        Self::new(Kind::Percent, Material::Number)
    }

    /// A boolean.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(Kind::Boolean, Material::Boolean)
    }

    /// Any string.
    #[must_use]
    pub fn string() -> Self {
        Self::new(Kind::String, Material::Text)
    }

    /// A string or `null`.
    #[must_use]
    pub fn null_string() -> Self {
        Self::new(Kind::nullable(Kind::String), Material::Text)
    }

    /// A CSS font size.
    #[must_use]
    pub fn font_size() -> Self {
        Self::new(Kind::FontSize, Material::Text)
    }

    /// A scatter marker shape.
    #[must_use]
    pub fn marker() -> Self {
        Self::new(Kind::Enum(&MARKER_TYPE), Material::Text)
    }

    /// A color or `null` (transparent).
    #[must_use]
    pub fn color() -> Self {
        Self::new(Kind::nullable(Kind::Color), Material::Color)
    }

    /// Overrides the units assumed when a spec names none.
    ///
    /// # Panics
    ///
    /// Panics if the kind has no unit system or `units` is not one of its
    /// members.
    #[must_use]
    pub fn with_default_units(mut self, units: Units) -> Self {
        let system = self.units.map(UnitSystem::names);
        assert!(
            system.is_some_and(|names| names.contains(units.as_str())),
            "units '{units}' are not allowed here"
        );
        self.default_units = Some(units);
        self
    }

    /// Kind of constant values.
    #[must_use]
    #[inline]
    pub fn value_kind(&self) -> &Kind {
        &self.value_kind
    }

    /// Unit system, if the kind carries units.
    #[must_use]
    #[inline]
    pub fn unit_system(&self) -> Option<UnitSystem> {
        self.units
    }

    /// Units assumed when a spec names none.
    #[must_use]
    pub fn default_units(&self) -> Option<Units> {
        self.default_units
            .or_else(|| self.units.map(UnitSystem::default_units))
    }

    /// Units in effect for `spec`: the given units or the default.
    #[must_use]
    pub fn effective_units(&self, spec: &Spec) -> Option<Units> {
        spec.units.or_else(|| self.default_units())
    }

    /// Output buffer shape.
    #[must_use]
    #[inline]
    pub fn material(&self) -> Material {
        self.material
    }

    /// Spec kinds can hold expression and transform references.
    #[must_use]
    pub fn may_have_refs(&self) -> bool {
        true
    }

    /// Resolves a raw assignment into a [`Spec`], using the SVG color table.
    pub fn resolve(&self, property: &'static str, raw: &Value) -> Result<Spec, PropertyError> {
        self.resolve_with(property, raw, &crate::color::SvgColors)
    }

    /// Resolves a raw assignment into a [`Spec`].
    ///
    /// Maps with none of the selector keys, and everything that is not a map,
    /// are treated as the constant of a value spec.
    pub fn resolve_with(
        &self,
        property: &'static str,
        raw: &Value,
        colors: &dyn ColorTable,
    ) -> Result<Spec, PropertyError> {
        let map = match raw {
            Value::Map(map) if selector_count(map) > 0 => map,
            _ => {
                tracing::debug!(property, "wrapping literal as a value spec");
                self.check_value(property, raw, colors)?;
                return Ok(Spec::value(raw.clone()));
            }
        };

        if selector_count(map) > 1 {
            let keys: Vec<&str> = map
                .keys()
                .map(String::as_str)
                .filter(|k| SELECTOR_KEYS.contains(k))
                .collect();
            return Err(shape_error(
                property,
                SpecShapeError::MultipleKeys {
                    keys: keys.join(", "),
                },
            ));
        }

        let mut source = None;
        let mut units = None;
        let mut transform = None;
        let mut extras = Map::new();
        for (key, entry) in map {
            match (key.as_str(), self.units) {
                ("value", _) => {
                    self.check_value(property, entry, colors)?;
                    source = Some(SpecValue::Value(entry.clone()));
                }
                ("field", _) => {
                    let name = entry
                        .as_str()
                        .ok_or_else(|| shape_error(property, SpecShapeError::FieldNotString))?;
                    source = Some(SpecValue::Field(name.into()));
                }
                ("expr", _) => {
                    let expr = entry
                        .as_instance()
                        .and_then(|obj| obj.clone().into_expression())
                        .ok_or_else(|| shape_error(property, SpecShapeError::NotAnExpression))?;
                    source = Some(SpecValue::Expr(expr));
                }
                ("units", Some(system)) => units = Some(system.parse(entry)?),
                ("transform", _) => {
                    let resolved = entry
                        .as_instance()
                        .and_then(|obj| obj.clone().into_transform())
                        .ok_or_else(|| shape_error(property, SpecShapeError::NotATransform))?;
                    transform = Some(resolved);
                }
                _ => {
                    tracing::debug!(property, key = key.as_str(), "keeping uninterpreted spec key");
                    extras.insert(key.clone(), entry.clone());
                }
            }
        }

        // `selector_count` guarantees exactly one selector was visited.
        let source = source.unwrap_or(SpecValue::Value(Value::Null));
        Ok(Spec {
            source,
            units,
            transform,
            extras,
        })
    }

    fn check_value(
        &self,
        property: &'static str,
        value: &Value,
        colors: &dyn ColorTable,
    ) -> Result<(), PropertyError> {
        if self.value_kind.valid_with(value, colors) {
            Ok(())
        } else {
            Err(PropertyError::Validation {
                property,
                expected: self.value_kind.to_string(),
                got: value.to_string(),
            })
        }
    }
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Spec({})", self.value_kind)
    }
}

fn shape_error(property: &'static str, source: SpecShapeError) -> PropertyError {
    PropertyError::SpecShape { property, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassInfo, EXPRESSION, TRANSFORM};
    use crate::error::UnitError;
    use crate::source::DataSource;
    use alloc::format;
    use alloc::vec;

    #[derive(Debug)]
    struct Constant;

    impl Object for Constant {
        fn class(&self) -> &'static ClassInfo {
            &EXPRESSION
        }

        fn into_expression(self: Rc<Self>) -> Option<Rc<dyn Expression>> {
            Some(self)
        }
    }

    impl Expression for Constant {
        fn compute(&self, _: &dyn DataSource) -> Value {
            Value::from(1)
        }

        fn v_compute(&self, source: &dyn DataSource) -> Value {
            vec![Value::from(1); source.get_length().unwrap_or(1)].into()
        }
    }

    #[derive(Debug)]
    struct Double;

    impl Object for Double {
        fn class(&self) -> &'static ClassInfo {
            &TRANSFORM
        }

        fn into_transform(self: Rc<Self>) -> Option<Rc<dyn Transform>> {
            Some(self)
        }
    }

    impl Transform for Double {
        fn compute(&self, x: f64) -> f64 {
            x * 2.0
        }

        fn v_compute(&self, xs: &[f64]) -> Vec<f64> {
            xs.iter().map(|x| x * 2.0).collect()
        }
    }

    fn shape_of(err: PropertyError) -> SpecShapeError {
        match err {
            PropertyError::SpecShape { source, .. } => source,
            other => panic!("expected a shape error, got {other:?}"),
        }
    }

    #[test]
    fn literals_are_wrapped() {
        let spec = SpecKind::number().resolve("x", &Value::from(3)).unwrap();
        assert_eq!(spec.to_value(), Value::map([("value", 3)]));
    }

    #[test]
    fn maps_without_selectors_are_literals() {
        let raw = Value::map([("units", "screen")]);
        let err = SpecKind::distance().resolve("size", &raw).unwrap_err();
        assert!(matches!(err, PropertyError::Validation { .. }));
    }

    #[test]
    fn multiple_selectors_are_rejected() {
        let raw = Value::map([("field", "a"), ("value", "b")]);
        let err = SpecKind::string().resolve("text", &raw).unwrap_err();
        assert_eq!(
            shape_of(err),
            SpecShapeError::MultipleKeys {
                keys: "field, value".into()
            }
        );
    }

    #[test]
    fn field_must_be_a_string() {
        let raw = Value::map([("field", 1)]);
        let err = SpecKind::number().resolve("x", &raw).unwrap_err();
        assert_eq!(shape_of(err), SpecShapeError::FieldNotString);
    }

    #[test]
    fn expr_and_transform_are_checked() {
        let expr: Rc<dyn Object> = Rc::new(Constant);
        let transform: Rc<dyn Object> = Rc::new(Double);

        let raw = Value::map([("expr", expr.clone()), ("transform", transform.clone())]);
        let spec = SpecKind::number().resolve("x", &raw).unwrap();
        assert!(matches!(spec.source(), SpecValue::Expr(_)));
        assert!(spec.transform().is_some());

        let raw = Value::map([("expr", transform.clone())]);
        let err = SpecKind::number().resolve("x", &raw).unwrap_err();
        assert_eq!(shape_of(err), SpecShapeError::NotAnExpression);

        let raw = Value::map([("value", Value::from(1)), ("transform", expr.into())]);
        let err = SpecKind::number().resolve("x", &raw).unwrap_err();
        assert_eq!(shape_of(err), SpecShapeError::NotATransform);

        let raw = Value::map([("field", Value::from("c")), ("transform", transform.into())]);
        let spec = SpecKind::color().resolve("fill", &raw).unwrap();
        assert!(spec.transform().is_some());
        assert_eq!(spec.to_value(), raw);
    }

    #[test]
    fn units_are_checked_against_the_system() {
        let raw = Value::map([("value", "1"), ("units", "screen")]);
        let spec = SpecKind::string().resolve("text", &raw).unwrap();
        assert_eq!(spec.units(), None);
        assert_eq!(spec.extras().get("units"), Some(&Value::from("screen")));

        let raw = Value::map([("value", Value::from(1)), ("units", "bad".into())]);
        let err = SpecKind::distance().resolve("size", &raw).unwrap_err();
        assert_eq!(
            err,
            PropertyError::Units(UnitError {
                allowed: "screen, data".into(),
                got: "bad".into(),
            })
        );
        assert_eq!(
            format!("{err}"),
            "units must be one of screen, data; got: bad"
        );
    }

    #[test]
    fn unknown_keys_are_kept_verbatim() {
        let raw = Value::map([("value", 1), ("scale", 2)]);
        let spec = SpecKind::number().resolve("x", &raw).unwrap();
        assert_eq!(spec.as_value(), Some(&Value::from(1)));
        assert_eq!(spec.units(), None);
        assert_eq!(spec.to_value(), raw);
    }

    #[test]
    fn map_form_keeps_only_given_keys() {
        let kind = SpecKind::angle();
        let raw = Value::map([("value", Value::from(90)), ("units", "deg".into())]);
        let spec = kind.resolve("angle", &raw).unwrap();
        assert_eq!(spec.to_value(), raw);
        assert_eq!(kind.effective_units(&spec), Some(Units::Deg));

        let spec = kind.resolve("angle", &Value::from(1)).unwrap();
        assert_eq!(spec.units(), None);
        assert_eq!(kind.effective_units(&spec), Some(Units::Rad));
    }

    #[test]
    fn default_units_override() {
        let kind = SpecKind::distance().with_default_units(Units::Screen);
        let spec = kind.resolve("size", &Value::from(4)).unwrap();
        assert_eq!(kind.effective_units(&spec), Some(Units::Screen));
    }

    #[test]
    #[should_panic(expected = "units 'deg' are not allowed here")]
    fn default_units_must_belong_to_the_system() {
        let _ = SpecKind::distance().with_default_units(Units::Deg);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", SpecKind::color()), "Spec(Nullable(Color))");
    }
}
