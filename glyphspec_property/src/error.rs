// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;
use smallvec::SmallVec;
use thiserror::Error;

use crate::array::DType;

/// Errors raised when assigning or constructing property values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// The value does not satisfy the property's kind.
    #[error("invalid value for property '{property}': expected {expected}, got {got}")]
    Validation {
        /// Property name.
        property: &'static str,
        /// Description of the expected kind.
        expected: String,
        /// Rendering of the offending value.
        got: String,
    },

    /// The value looked like a spec but its shape is wrong.
    #[error("invalid spec for property '{property}': {source}")]
    SpecShape {
        /// Property name.
        property: &'static str,
        /// What is wrong with the shape.
        source: SpecShapeError,
    },

    /// The spec names units outside the property's unit system.
    #[error(transparent)]
    Units(#[from] UnitError),

    /// No property with this name exists on the class.
    #[error("class '{class}' has no property '{name}'")]
    UnknownProperty {
        /// Class name.
        class: &'static str,
        /// Requested property name.
        name: String,
    },
}

/// Spec shape problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecShapeError {
    /// More than one of `field`, `value`, `expr` was given.
    #[error("must have exactly one of field, value, expr; got {keys}")]
    MultipleKeys {
        /// The conflicting keys, comma separated.
        keys: String,
    },

    /// `field` was not a string.
    #[error("field must be a string")]
    FieldNotString,

    /// `expr` did not reference an expression object.
    #[error("expr must reference an expression")]
    NotAnExpression,

    /// `transform` did not reference a transform object.
    #[error("transform must reference a transform")]
    NotATransform,
}

/// A spec named units outside the allowed set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("units must be one of {allowed}; got: {got}")]
pub struct UnitError {
    /// Allowed unit names, comma separated, in declaration order.
    pub allowed: String,
    /// The offending value as given.
    pub got: String,
}

/// Errors raised while materializing a spec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaterializeError {
    /// The buffer's dtype and shape have no color decoding rule.
    #[error("unsupported color encoding: dtype={dtype:?}, shape={shape:?}")]
    UnsupportedColorEncoding {
        /// Buffer element type.
        dtype: DType,
        /// Buffer shape.
        shape: SmallVec<[usize; 2]>,
    },

    /// An expression returned a sequence whose length is not the row count.
    #[error("expression returned {got} elements, expected {expected}")]
    LengthMismatch {
        /// Row count of the data source.
        expected: usize,
        /// Length of the returned sequence.
        got: usize,
    },

    /// A scalar value was requested from a field or expression spec.
    #[error("attempted to retrieve property value for property without value specification")]
    NotAValueSpec,

    /// The property is not a spec property.
    #[error("property '{0}' is not a spec property")]
    NotASpec(&'static str),
}

/// An [`NdArray`](crate::NdArray) shape does not match its data length.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("shape {shape:?} does not describe {len} elements")]
pub struct ShapeError {
    /// Requested shape.
    pub shape: SmallVec<[usize; 2]>,
    /// Number of elements in the data.
    pub len: usize,
}
