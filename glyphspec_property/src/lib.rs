// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyphspec Property: typed, reactive properties for declarative plotting
//! models.
//!
//! Every model attribute is declared once per class with a closed [`Kind`]
//! (plain properties) or a [`SpecKind`] (data spec properties). Assignments
//! are validated synchronously; valid values are stored and observers are
//! notified exactly once per assignment.
//!
//! ## Core Concepts
//!
//! ### Kinds
//!
//! [`Kind`] is a closed set of validators: primitives (`Boolean`, `Number`,
//! `Int`, `Angle`, `Percent`, `String`, `FontSize`, `Font`, `Color`), string
//! enumerations, arrays, class references and a few combinators. Validation
//! is a pure predicate over a raw [`Value`].
//!
//! ### Specs
//!
//! A spec property holds a [`Spec`]: a constant (`{value: ...}`), a column of
//! a [`DataSource`] (`{field: "name"}`) or an [`Expression`]
//! (`{expr: ...}`), optionally with `units` and a numeric [`Transform`].
//! Plain literals are wrapped as value specs.
//!
//! ### Materialization
//!
//! [`PropertyRef::array`] turns a spec into a flat [`SpecArray`]: one element
//! per row of the data source, normalized for units (angles become negated
//! radians) and transformed. Colors decode into packed RGBA bytes.
//!
//! ### Change propagation
//!
//! Each property has its own [`Signal`](glyphspec_signal::Signal), the object
//! has one more, and every property names the dirty
//! [`Channel`](glyphspec_signal::Channel)s its changes invalidate.
//!
//! ## Quick Start
//!
//! ```rust
//! use glyphspec_property::{
//!     ClassInfo, ColumnDataSource, GEOMETRY, HAS_PROPS, HasProps, PropertyDef,
//!     SchemaBuilder, SpecArray, SpecKind, Value,
//! };
//!
//! static MARKERS: ClassInfo = ClassInfo::extends("Markers", &HAS_PROPS);
//!
//! let schema = SchemaBuilder::new(&MARKERS)
//!     .spec("x", SpecKind::coordinate())
//!     .define(PropertyDef::spec("size", SpecKind::distance()).with_default(4.0).affects(GEOMETRY))
//!     .build();
//!
//! let mut markers = HasProps::new(schema, [("x", Value::map([("field", "xs")]))]).unwrap();
//!
//! let source = ColumnDataSource::new()
//!     .with_column("xs", vec![Value::from(1.0), Value::from(2.0), Value::from(3.0)]);
//!
//! let x = markers.property("x").unwrap().array(&source).unwrap();
//! assert_eq!(x, SpecArray::Float64(vec![1.0, 2.0, 3.0]));
//!
//! let size = markers.property("size").unwrap().array(&source).unwrap();
//! assert_eq!(size, SpecArray::Float64(vec![4.0, 4.0, 4.0]));
//!
//! markers.set("size", Value::map([("value", Value::from(2.0)), ("units", "screen".into())])).unwrap();
//! assert!(markers.take_dirty().contains(GEOMETRY));
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod array;
mod class;
mod color;
pub mod enums;
mod error;
mod font;
mod id;
mod kind;
mod materialize;
mod model;
mod object;
mod schema;
mod source;
mod spec;
mod units;
mod value;

pub use array::{ArrayData, DType, NdArray};
pub use class::{ClassInfo, EXPRESSION, HAS_PROPS, MODEL, Object, TRANSFORM};
pub use color::{ColorTable, Rgba, SvgColors, color_to_rgba, is_color, str_to_rgba};
pub use error::{MaterializeError, PropertyError, ShapeError, SpecShapeError, UnitError};
pub use font::is_font_size;
pub use id::PropertyId;
pub use kind::{Kind, StructField};
pub use materialize::{ColorArray, Scalar, SpecArray};
pub use model::{Expression, Transform};
pub use object::{
    DATA, GEOMETRY, HasProps, ObjectChanged, PropertyChanged, PropertyRef, VISUALS,
};
pub use schema::{DefaultFn, PropertyDef, PropertyKind, Schema, SchemaBuilder};
pub use source::{ColumnDataSource, DataSource};
pub use spec::{Material, Spec, SpecKind, SpecValue, is_spec};
pub use units::{UnitSystem, Units, normalize_angle};
pub use value::{Map, Value};
