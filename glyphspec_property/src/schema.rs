// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class-level property tables.
//!
//! A [`Schema`] is built once per class with [`SchemaBuilder`] and shared by
//! every instance through an `Rc`. It records each property's kind, default
//! provider and the dirty channels a change invalidates.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use glyphspec_signal::ChannelSet;
use hashbrown::HashMap;

use crate::class::ClassInfo;
use crate::color::{ColorTable, SvgColors};
use crate::id::PropertyId;
use crate::kind::Kind;
use crate::spec::SpecKind;
use crate::value::Value;

/// Provider of a property's initial value.
pub type DefaultFn = Rc<dyn Fn() -> Value>;

/// Either a plain typed property or a data spec property.
#[derive(Clone, Debug)]
pub enum PropertyKind {
    /// Holds a single validated value.
    Plain(Kind),
    /// Holds a [`Spec`](crate::Spec).
    Spec(SpecKind),
}

impl PropertyKind {
    /// Returns `true` if values can contain references to property-bearing
    /// objects.
    #[must_use]
    pub fn may_have_refs(&self) -> bool {
        match self {
            Self::Plain(kind) => kind.may_have_refs(),
            Self::Spec(kind) => kind.may_have_refs(),
        }
    }

    /// The spec kind, for spec properties.
    #[must_use]
    pub fn as_spec(&self) -> Option<&SpecKind> {
        match self {
            Self::Spec(kind) => Some(kind),
            Self::Plain(_) => None,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(kind) => write!(f, "{kind}"),
            Self::Spec(kind) => write!(f, "{kind}"),
        }
    }
}

/// Declaration of one property.
///
/// ```rust
/// use glyphspec_property::{DATA, Kind, PropertyDef, VISUALS};
///
/// let def = PropertyDef::plain("line_width", Kind::non_negative(Kind::Number))
///     .with_default(1.0)
///     .affects(VISUALS.into_set() | DATA.into_set());
///
/// assert_eq!(def.name(), "line_width");
/// assert_eq!(def.default_value(), Some(1.0.into()));
/// assert!(def.affects_channels().contains(DATA));
/// assert!(!def.may_have_refs());
/// ```
#[derive(Clone)]
pub struct PropertyDef {
    name: &'static str,
    kind: PropertyKind,
    default: Option<DefaultFn>,
    affects: ChannelSet,
    may_have_refs: bool,
}

impl PropertyDef {
    /// A plain property.
    #[must_use]
    pub fn plain(name: &'static str, kind: Kind) -> Self {
        Self::new(name, PropertyKind::Plain(kind))
    }

    /// A spec property.
    #[must_use]
    pub fn spec(name: &'static str, kind: SpecKind) -> Self {
        Self::new(name, PropertyKind::Spec(kind))
    }

    fn new(name: &'static str, kind: PropertyKind) -> Self {
        let may_have_refs = kind.may_have_refs();
        Self {
            name,
            kind,
            default: None,
            affects: ChannelSet::empty(),
            may_have_refs,
        }
    }

    /// Sets a constant default.
    #[must_use]
    pub fn with_default(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.with_default_fn(move || value.clone())
    }

    /// Sets a default provider, called once per new instance.
    ///
    /// Use this for defaults that must not be shared, such as fresh object
    /// references.
    #[must_use]
    pub fn with_default_fn<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Value + 'static,
    {
        self.default = Some(Rc::new(provider));
        self
    }

    /// Sets the dirty channels invalidated by changes.
    #[must_use]
    pub fn affects(mut self, channels: impl Into<ChannelSet>) -> Self {
        self.affects = channels.into();
        self
    }

    /// Property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared kind.
    #[must_use]
    #[inline]
    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    /// A fresh default value, if the property has one.
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(|provider| provider())
    }

    /// Dirty channels invalidated by changes.
    #[must_use]
    #[inline]
    pub fn affects_channels(&self) -> ChannelSet {
        self.affects
    }

    /// Whether values can reference property-bearing objects. Fixed at
    /// declaration.
    #[must_use]
    #[inline]
    pub fn may_have_refs(&self) -> bool {
        self.may_have_refs
    }
}

impl fmt::Debug for PropertyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_default", &self.default.is_some())
            .field("affects", &self.affects)
            .field("may_have_refs", &self.may_have_refs)
            .finish()
    }
}

/// Builder for a class [`Schema`].
///
/// ```rust
/// use glyphspec_property::{ClassInfo, HAS_PROPS, Kind, SchemaBuilder, SpecKind};
///
/// static GLYPH: ClassInfo = ClassInfo::extends("Glyph", &HAS_PROPS);
/// static CIRCLE: ClassInfo = ClassInfo::extends("Circle", &GLYPH);
///
/// let glyph = SchemaBuilder::new(&GLYPH)
///     .spec("x", SpecKind::coordinate())
///     .spec("y", SpecKind::coordinate())
///     .build();
///
/// let circle = SchemaBuilder::new(&CIRCLE)
///     .extends(&glyph)
///     .spec("radius", SpecKind::distance())
///     .property("visible", Kind::Boolean)
///     .build();
///
/// assert_eq!(circle.len(), 4);
/// assert_eq!(circle.id("radius").map(|id| id.index()), Some(2));
/// assert!(circle.id("r").is_none());
/// ```
pub struct SchemaBuilder {
    class: &'static ClassInfo,
    properties: Vec<PropertyDef>,
    colors: Rc<dyn ColorTable>,
}

impl SchemaBuilder {
    /// Starts an empty schema for `class`.
    #[must_use]
    pub fn new(class: &'static ClassInfo) -> Self {
        Self {
            class,
            properties: Vec::new(),
            colors: Rc::new(SvgColors),
        }
    }

    /// Inherits every property of `parent`, in order, and its color table.
    ///
    /// # Panics
    ///
    /// Panics if a property of `parent` is already declared.
    #[must_use]
    pub fn extends(mut self, parent: &Schema) -> Self {
        for def in &parent.properties {
            self = self.define(def.clone());
        }
        self.colors = parent.colors.clone();
        self
    }

    /// Declares a property.
    ///
    /// # Panics
    ///
    /// Panics if a property with the same name is already declared, or if
    /// more than 65,535 properties are declared.
    #[must_use]
    pub fn define(mut self, def: PropertyDef) -> Self {
        assert!(
            self.properties.iter().all(|p| p.name != def.name),
            "Property '{}' is already declared on '{}'",
            def.name,
            self.class.name()
        );
        assert!(
            self.properties.len() < usize::from(u16::MAX),
            "Too many properties declared (max {})",
            u16::MAX
        );
        self.properties.push(def);
        self
    }

    /// Declares a plain property without a default.
    #[must_use]
    pub fn property(self, name: &'static str, kind: Kind) -> Self {
        self.define(PropertyDef::plain(name, kind))
    }

    /// Declares a spec property without a default.
    #[must_use]
    pub fn spec(self, name: &'static str, kind: SpecKind) -> Self {
        self.define(PropertyDef::spec(name, kind))
    }

    /// Replaces the default of an inherited or declared property.
    ///
    /// # Panics
    ///
    /// Panics if no property has this name.
    #[must_use]
    pub fn override_default(mut self, name: &str, value: impl Into<Value>) -> Self {
        let def = self
            .properties
            .iter_mut()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("Property '{name}' is not declared"));
        let value = value.into();
        def.default = Some(Rc::new(move || value.clone()));
        self
    }

    /// Uses `colors` to validate and decode color names.
    #[must_use]
    pub fn colors(mut self, colors: impl ColorTable + 'static) -> Self {
        self.colors = Rc::new(colors);
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> Rc<Schema> {
        let by_name = self
            .properties
            .iter()
            .enumerate()
            .map(|(idx, def)| {
                #[expect(clippy::cast_possible_truncation, reason = "checked in define")]
                let id = PropertyId::new(idx as u16);
                (def.name, id)
            })
            .collect();
        Rc::new(Schema {
            class: self.class,
            properties: self.properties,
            by_name,
            colors: self.colors,
        })
    }
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("class", &self.class)
            .field("properties", &self.properties.len())
            .finish_non_exhaustive()
    }
}

/// The property table of a class.
pub struct Schema {
    class: &'static ClassInfo,
    properties: Vec<PropertyDef>,
    by_name: HashMap<&'static str, PropertyId>,
    colors: Rc<dyn ColorTable>,
}

impl Schema {
    /// The class this schema describes.
    #[must_use]
    #[inline]
    pub fn class(&self) -> &'static ClassInfo {
        self.class
    }

    /// Number of properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the class has no properties.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<PropertyId> {
        self.by_name.get(name).copied()
    }

    /// The declaration of a property.
    #[must_use]
    pub fn get(&self, id: PropertyId) -> Option<&PropertyDef> {
        self.properties.get(id.slot())
    }

    /// The declaration behind an ID issued by this schema.
    pub(crate) fn def(&self, id: PropertyId) -> &PropertyDef {
        &self.properties[id.slot()]
    }

    /// Declarations in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &PropertyDef> {
        self.properties.iter()
    }

    /// Color table used for validation and decoding.
    #[must_use]
    pub fn color_table(&self) -> &dyn ColorTable {
        &*self.colors
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("class", &self.class)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::HAS_PROPS;
    use crate::color::Rgba;
    use crate::object::{GEOMETRY, VISUALS};
    use alloc::format;

    static NODE: ClassInfo = ClassInfo::extends("Node", &HAS_PROPS);
    static LEAF: ClassInfo = ClassInfo::extends("Leaf", &NODE);

    struct Corporate;

    impl ColorTable for Corporate {
        fn lookup(&self, name: &str) -> Option<Rgba> {
            (name == "brand").then_some(Rgba::opaque(1, 2, 3))
        }
    }

    #[test]
    fn ids_follow_declaration_order() {
        let schema = SchemaBuilder::new(&NODE)
            .property("a", Kind::Number)
            .spec("b", SpecKind::number())
            .build();
        assert_eq!(schema.id("a"), Some(PropertyId::new(0)));
        assert_eq!(schema.id("b"), Some(PropertyId::new(1)));
        assert_eq!(schema.get(PropertyId::new(1)).map(PropertyDef::name), Some("b"));
        assert!(schema.get(PropertyId::new(2)).is_none());
        assert_eq!(schema.class().name(), "Node");
    }

    #[test]
    fn inheritance_keeps_parent_first() {
        let parent = SchemaBuilder::new(&NODE)
            .define(PropertyDef::plain("a", Kind::Number).affects(GEOMETRY))
            .build();
        let child = SchemaBuilder::new(&LEAF)
            .extends(&parent)
            .property("b", Kind::String)
            .override_default("a", 2.0)
            .build();
        let names: Vec<_> = child.iter().map(PropertyDef::name).collect();
        assert_eq!(names, ["a", "b"]);
        let a = child.get(PropertyId::new(0)).unwrap();
        assert_eq!(a.default_value(), Some(Value::from(2.0)));
        assert!(a.affects_channels().contains(GEOMETRY));
        assert!(parent.get(PropertyId::new(0)).unwrap().default_value().is_none());
    }

    #[test]
    #[should_panic(expected = "Property 'a' is already declared on 'Leaf'")]
    fn duplicate_names_panic() {
        let parent = SchemaBuilder::new(&NODE).property("a", Kind::Number).build();
        let _ = SchemaBuilder::new(&LEAF)
            .extends(&parent)
            .property("a", Kind::String);
    }

    #[test]
    fn default_providers_run_per_call() {
        let def = PropertyDef::plain("v", Kind::Any).with_default_fn(|| Value::from("fresh"));
        assert_eq!(def.default_value(), Some(Value::from("fresh")));
        assert_eq!(def.default_value(), Some(Value::from("fresh")));
    }

    #[test]
    fn may_have_refs_is_fixed_at_declaration() {
        assert!(PropertyDef::plain("r", Kind::Ref(&NODE)).may_have_refs());
        assert!(!PropertyDef::plain("n", Kind::Number).may_have_refs());
        assert!(PropertyDef::spec("s", SpecKind::number()).may_have_refs());
    }

    #[test]
    fn custom_color_tables_are_inherited() {
        let parent = SchemaBuilder::new(&NODE).colors(Corporate).build();
        let child = SchemaBuilder::new(&LEAF).extends(&parent).build();
        assert!(child.color_table().lookup("brand").is_some());
        assert!(child.color_table().lookup("red").is_none());
    }

    #[test]
    fn debug_output() {
        let def = PropertyDef::plain("fill", Kind::Color).affects(VISUALS);
        let debug = format!("{def:?}");
        assert!(debug.contains("PropertyDef"));
        assert!(debug.contains("fill"));
        assert!(debug.contains("has_default: false"));
    }
}
