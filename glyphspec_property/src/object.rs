// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-bearing objects.
//!
//! [`HasProps`] holds one slot per property of its [`Schema`]: the stored
//! value and the property's change signal. Assignments validate first and
//! store second, so a failed assignment leaves the object untouched and
//! fires nothing.
//!
//! Observers receive event values, never the object itself, so an observer
//! cannot re-enter the object it observes.

use alloc::borrow::ToOwned;
use alloc::rc::Rc;
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use glyphspec_signal::{Channel, ChannelSet, ConnectionId, Signal};
use smallvec::SmallVec;

use crate::class::{ClassInfo, Object};
use crate::error::{MaterializeError, PropertyError};
use crate::id::PropertyId;
use crate::materialize::{self, Scalar, SpecArray};
use crate::schema::{PropertyDef, PropertyKind, Schema};
use crate::source::DataSource;
use crate::spec::{Spec, SpecKind, SpecValue};
use crate::units::Units;
use crate::value::{Value, same_instance};

/// Cached visual state: colors, line and text styles.
pub const VISUALS: Channel = Channel::new(0);

/// Cached data columns.
pub const DATA: Channel = Channel::new(1);

/// Cached geometry: positions, sizes, angles.
pub const GEOMETRY: Channel = Channel::new(2);

/// Delivered to a property's observers after it changes.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyChanged {
    /// Which property.
    pub id: PropertyId,
    /// Property name.
    pub name: &'static str,
    /// The new raw value, as [`PropertyRef::get_value`] would return it.
    pub value: Value,
}

/// Delivered to an object's observers once per assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectChanged {
    /// Names of the properties assigned, in schema order.
    pub properties: SmallVec<[&'static str; 4]>,
    /// Dirty channels the assignment invalidated.
    pub dirty: ChannelSet,
}

#[derive(Clone, Debug)]
enum Stored {
    Unset,
    Plain(Value),
    Spec(Spec),
}

impl Stored {
    fn to_value(&self) -> Value {
        match self {
            Self::Unset => Value::Undefined,
            Self::Plain(value) => value.clone(),
            Self::Spec(spec) => spec.to_value(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    value: Stored,
    changed: Signal<PropertyChanged>,
}

/// The property state of one model instance.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use glyphspec_property::{
///     ClassInfo, HAS_PROPS, HasProps, Kind, SchemaBuilder, SpecKind, Value,
/// };
///
/// static LABEL: ClassInfo = ClassInfo::extends("Label", &HAS_PROPS);
///
/// let schema = SchemaBuilder::new(&LABEL)
///     .property("visible", Kind::Boolean)
///     .spec("text", SpecKind::string())
///     .build();
///
/// let mut label = HasProps::new(schema, [("text", Value::from("hello"))]).unwrap();
/// assert_eq!(label.get("text").unwrap(), Value::map([("value", "hello")]));
///
/// let calls = Rc::new(Cell::new(0));
/// let counter = calls.clone();
/// label.connect("text", move |_| counter.set(counter.get() + 1)).unwrap();
///
/// label.set("text", Value::map([("field", "name")])).unwrap();
/// assert_eq!(calls.get(), 1);
///
/// assert!(label.set("visible", "yes").is_err());
/// assert_eq!(calls.get(), 1);
/// ```
pub struct HasProps {
    schema: Rc<Schema>,
    slots: Vec<Slot>,
    changed: Signal<ObjectChanged>,
    dirty: ChannelSet,
}

impl HasProps {
    /// Creates an instance from `attrs`, falling back to declared defaults.
    ///
    /// Plain properties without a default stay unset; spec properties without
    /// a default hold `{value: null}`. No signals fire during construction.
    pub fn new<K, V, I>(schema: Rc<Schema>, attrs: I) -> Result<Self, PropertyError>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut given: Vec<Option<Value>> = vec![None; schema.len()];
        for (name, value) in attrs {
            let id = lookup(&schema, name.as_ref())?;
            given[id.slot()] = Some(value.into());
        }

        let slots = schema
            .iter()
            .zip(given)
            .map(|(def, raw)| {
                let value = match raw.or_else(|| def.default_value()) {
                    Some(raw) => resolve(&schema, def, &raw)?,
                    None => match def.kind() {
                        PropertyKind::Plain(_) => Stored::Unset,
                        PropertyKind::Spec(_) => Stored::Spec(Spec::value(Value::Null)),
                    },
                };
                Ok::<_, PropertyError>(Slot {
                    value,
                    changed: Signal::new(),
                })
            })
            .collect::<Result<Vec<_>, PropertyError>>()?;

        Ok(Self {
            schema,
            slots,
            changed: Signal::new(),
            dirty: ChannelSet::empty(),
        })
    }

    /// The class schema.
    #[must_use]
    #[inline]
    pub fn schema(&self) -> &Rc<Schema> {
        &self.schema
    }

    /// A handle to the named property.
    pub fn property(&self, name: &str) -> Result<PropertyRef<'_>, PropertyError> {
        let id = lookup(&self.schema, name)?;
        Ok(self.property_by_id(id))
    }

    fn property_by_id(&self, id: PropertyId) -> PropertyRef<'_> {
        PropertyRef { obj: self, id }
    }

    /// The raw value of the named property.
    pub fn get(&self, name: &str) -> Result<Value, PropertyError> {
        Ok(self.property(name)?.get_value())
    }

    /// Validates and stores one value, then notifies the property's
    /// observers and the object's observers once each.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), PropertyError> {
        self.setv([(name, value.into())])
    }

    /// Validates every value, then stores them all.
    ///
    /// If any value is invalid nothing is stored. Each assigned property's
    /// observers are notified once, then the object's observers once.
    pub fn setv<K, V, I>(&mut self, attrs: I) -> Result<(), PropertyError>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut pending: Vec<(PropertyId, Stored)> = Vec::new();
        for (name, value) in attrs {
            let id = lookup(&self.schema, name.as_ref())?;
            let def = self.def(id);
            let stored = resolve(&self.schema, def, &value.into())?;
            match pending.iter_mut().find(|(pid, _)| *pid == id) {
                Some(entry) => entry.1 = stored,
                None => pending.push((id, stored)),
            }
        }
        if pending.is_empty() {
            return Ok(());
        }
        pending.sort_by_key(|(id, _)| *id);

        let mut dirty = ChannelSet::empty();
        let mut properties = SmallVec::new();
        for (id, stored) in pending {
            let def = self.schema.def(id);
            tracing::trace!(property = def.name(), "assigning property");
            dirty |= def.affects_channels();
            properties.push(def.name());
            let event = PropertyChanged {
                id,
                name: def.name(),
                value: stored.to_value(),
            };
            let slot = &mut self.slots[id.slot()];
            slot.value = stored;
            slot.changed.emit(&event);
        }
        self.dirty |= dirty;
        self.changed.emit(&ObjectChanged { properties, dirty });
        Ok(())
    }

    /// Observes changes to the named property.
    pub fn connect<F>(&mut self, name: &str, observer: F) -> Result<ConnectionId, PropertyError>
    where
        F: FnMut(&PropertyChanged) + 'static,
    {
        let id = lookup(&self.schema, name)?;
        Ok(self.slots[id.slot()].changed.connect(observer))
    }

    /// Removes an observer of the named property.
    pub fn disconnect(&mut self, name: &str, connection: ConnectionId) -> Result<bool, PropertyError> {
        let id = lookup(&self.schema, name)?;
        Ok(self.slots[id.slot()].changed.disconnect(connection))
    }

    /// Observes every assignment to the object.
    pub fn on_change<F>(&mut self, observer: F) -> ConnectionId
    where
        F: FnMut(&ObjectChanged) + 'static,
    {
        self.changed.connect(observer)
    }

    /// Removes an object observer.
    pub fn disconnect_change(&mut self, connection: ConnectionId) -> bool {
        self.changed.disconnect(connection)
    }

    /// Dirty channels accumulated since the last call, clearing them.
    pub fn take_dirty(&mut self) -> ChannelSet {
        self.dirty.take()
    }

    /// Dirty channels accumulated so far.
    #[must_use]
    #[inline]
    pub fn dirty(&self) -> ChannelSet {
        self.dirty
    }

    /// Every property-bearing object reachable from this one through
    /// properties that may hold references.
    ///
    /// Each object appears once, in discovery order; the object itself is
    /// not included unless a cycle leads back to it.
    #[must_use]
    pub fn references(&self) -> Vec<Rc<dyn Object>> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references(&self, found: &mut Vec<Rc<dyn Object>>) {
        for (def, slot) in self.schema.iter().zip(&self.slots) {
            if !def.may_have_refs() {
                continue;
            }
            match &slot.value {
                Stored::Unset => {}
                Stored::Plain(value) => walk_references(value, found),
                Stored::Spec(spec) => walk_references(&spec.to_value(), found),
            }
        }
    }

    fn def(&self, id: PropertyId) -> &PropertyDef {
        self.schema.def(id)
    }
}

fn walk_references(value: &Value, found: &mut Vec<Rc<dyn Object>>) {
    match value {
        Value::Instance(obj) => {
            if !obj.class().is_model() || found.iter().any(|seen| same_instance(seen, obj)) {
                return;
            }
            found.push(obj.clone());
            if let Some(props) = obj.as_has_props() {
                props.collect_references(found);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_references(item, found);
            }
        }
        Value::Map(map) => {
            for item in map.values() {
                walk_references(item, found);
            }
        }
        _ => {}
    }
}

fn lookup(schema: &Schema, name: &str) -> Result<PropertyId, PropertyError> {
    schema.id(name).ok_or_else(|| PropertyError::UnknownProperty {
        class: schema.class().name(),
        name: name.to_owned(),
    })
}

fn resolve(schema: &Schema, def: &PropertyDef, raw: &Value) -> Result<Stored, PropertyError> {
    let colors = schema.color_table();
    match def.kind() {
        PropertyKind::Plain(kind) => {
            if kind.valid_with(raw, colors) {
                Ok(Stored::Plain(raw.clone()))
            } else {
                Err(PropertyError::Validation {
                    property: def.name(),
                    expected: kind.to_string(),
                    got: raw.to_string(),
                })
            }
        }
        PropertyKind::Spec(kind) => kind.resolve_with(def.name(), raw, colors).map(Stored::Spec),
    }
}

impl Object for HasProps {
    fn class(&self) -> &'static ClassInfo {
        self.schema.class()
    }

    fn as_has_props(&self) -> Option<&Self> {
        Some(self)
    }
}

impl fmt::Debug for HasProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.class().name());
        for (def, slot) in self.schema.iter().zip(&self.slots) {
            s.field(def.name(), &slot.value.to_value());
        }
        s.finish()
    }
}

/// A borrowed view of one property of an instance.
#[derive(Copy, Clone)]
pub struct PropertyRef<'a> {
    obj: &'a HasProps,
    id: PropertyId,
}

impl<'a> PropertyRef<'a> {
    /// Schema index.
    #[must_use]
    #[inline]
    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// Property name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.def().name()
    }

    /// Declared kind.
    #[must_use]
    pub fn kind(&self) -> &'a PropertyKind {
        self.def().kind()
    }

    /// Returns `true` if `value` could be assigned.
    #[must_use]
    pub fn valid(&self, value: &Value) -> bool {
        resolve(&self.obj.schema, self.def(), value).is_ok()
    }

    /// The stored raw value; specs are rendered as their map form and unset
    /// properties as [`Value::Undefined`].
    #[must_use]
    pub fn get_value(&self) -> Value {
        self.slot().to_value()
    }

    /// Whether values can reference property-bearing objects.
    #[must_use]
    pub fn may_have_refs(&self) -> bool {
        self.def().may_have_refs()
    }

    /// The resolved spec, for spec properties.
    #[must_use]
    pub fn spec(&self) -> Option<&'a Spec> {
        match self.slot() {
            Stored::Spec(spec) => Some(spec),
            _ => None,
        }
    }

    /// Units in effect: the spec's units or the kind's default.
    #[must_use]
    pub fn units(&self) -> Option<Units> {
        let (kind, spec) = self.spec_parts().ok()?;
        kind.effective_units(spec)
    }

    /// Converts one raw element with this property's kind and units.
    pub fn materialize(&self, raw: &Value) -> Result<Scalar, MaterializeError> {
        let (kind, spec) = self.spec_parts()?;
        Ok(materialize::materialize(
            kind.material(),
            kind.effective_units(spec),
            raw,
            self.obj.schema.color_table(),
        ))
    }

    /// Converts a sequence or buffer with this property's kind and units.
    pub fn v_materialize(&self, raw: &Value) -> Result<SpecArray, MaterializeError> {
        let (kind, spec) = self.spec_parts()?;
        materialize::v_materialize(
            kind.material(),
            kind.effective_units(spec),
            raw,
            self.obj.schema.color_table(),
        )
    }

    /// The materialized, transformed constant of a value spec.
    pub fn value(&self) -> Result<Scalar, MaterializeError> {
        let (kind, spec) = self.spec_parts()?;
        let raw = spec.as_value().ok_or(MaterializeError::NotAValueSpec)?;
        let Some(transform) = spec.transform() else {
            return self.materialize(raw);
        };
        if kind.material().is_numeric() {
            let scalar = self.materialize(raw)?;
            Ok(materialize::transform_scalar(scalar, &**transform))
        } else {
            match transform.map_value(raw) {
                Some(mapped) => self.materialize(&mapped),
                None => self.materialize(raw),
            }
        }
    }

    /// Materializes the spec against `source`: one element per row.
    ///
    /// Constants are broadcast to the row count (one row if the source has
    /// no length). A missing column yields the kind's missing sentinel in
    /// every row. Numeric kinds apply the transform after unit
    /// normalization; other kinds pass raw values through
    /// [`Transform::v_map_values`](crate::Transform::v_map_values) first.
    pub fn array(&self, source: &dyn DataSource) -> Result<SpecArray, MaterializeError> {
        let (kind, spec) = self.spec_parts()?;
        let rows = source.get_length();
        let owned;
        let raw = match spec.source() {
            SpecValue::Value(value) => {
                owned = Value::Array(vec![value.clone(); rows.unwrap_or(1)]);
                &owned
            }
            SpecValue::Field(name) => match source.column(name) {
                Some(column) => column,
                None => {
                    tracing::debug!(
                        property = self.name(),
                        field = name.as_str(),
                        "column not found; using missing values"
                    );
                    owned = Value::Array(vec![Value::Null; rows.unwrap_or(1)]);
                    &owned
                }
            },
            SpecValue::Expr(expr) => {
                owned = expr.v_compute(source);
                if let Some(expected) = rows {
                    let got = owned.seq_len().unwrap_or(1);
                    if got != expected {
                        return Err(MaterializeError::LengthMismatch { expected, got });
                    }
                }
                &owned
            }
        };
        match spec.transform() {
            Some(transform) if kind.material().is_numeric() => {
                materialize::transform_array(self.v_materialize(raw)?, &**transform)
            }
            Some(transform) => match transform.v_map_values(raw) {
                Some(mapped) => self.v_materialize(&mapped),
                None => self.v_materialize(raw),
            },
            None => self.v_materialize(raw),
        }
    }

    fn def(&self) -> &'a PropertyDef {
        self.obj.def(self.id)
    }

    fn slot(&self) -> &'a Stored {
        &self.obj.slots[self.id.slot()].value
    }

    fn spec_parts(&self) -> Result<(&'a SpecKind, &'a Spec), MaterializeError> {
        match (self.kind().as_spec(), self.slot()) {
            (Some(kind), Stored::Spec(spec)) => Ok((kind, spec)),
            _ => Err(MaterializeError::NotASpec(self.name())),
        }
    }
}

impl fmt::Debug for PropertyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRef")
            .field("name", &self.name())
            .field("value", &self.get_value())
            .finish()
    }
}
