// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed, fixed-width buffers.
//!
//! [`NdArray`] is the "typed buffer" raw value: a flat, homogeneously typed
//! data vector plus a shape. It is distinct from a plain [`Value::Array`]
//! sequence, and the generic `Array` kind does not accept it.
//!
//! [`Value::Array`]: crate::Value::Array

use alloc::vec::Vec;
use smallvec::{SmallVec, smallvec};

use crate::error::ShapeError;
use crate::value::Value;

/// Element type of an [`NdArray`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    /// Unsigned bytes.
    Uint8,
    /// 32-bit signed integers.
    Int32,
    /// Single-precision floats.
    Float32,
    /// Double-precision floats.
    Float64,
    /// Arbitrary raw values (strings, nulls, ...).
    Object,
}

/// Storage of an [`NdArray`].
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayData {
    /// `uint8` elements.
    Uint8(Vec<u8>),
    /// `int32` elements.
    Int32(Vec<i32>),
    /// `float32` elements.
    Float32(Vec<f32>),
    /// `float64` elements.
    Float64(Vec<f64>),
    /// `object` elements.
    Object(Vec<Value>),
}

impl ArrayData {
    /// Number of stored elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Uint8(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Object(v) => v.len(),
        }
    }

    /// Returns `true` if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type.
    #[must_use]
    pub fn dtype(&self) -> DType {
        match self {
            Self::Uint8(_) => DType::Uint8,
            Self::Int32(_) => DType::Int32,
            Self::Float32(_) => DType::Float32,
            Self::Float64(_) => DType::Float64,
            Self::Object(_) => DType::Object,
        }
    }
}

/// A typed buffer with a shape.
///
/// ```rust
/// use glyphspec_property::{ArrayData, DType, NdArray};
///
/// let rgb = NdArray::new(ArrayData::Uint8(vec![1, 2, 3, 4, 5, 6]), &[2, 3]).unwrap();
/// assert_eq!(rgb.dtype(), DType::Uint8);
/// assert_eq!(rgb.len(), 2);
/// assert_eq!(rgb.shape(), &[2, 3]);
///
/// assert!(NdArray::new(ArrayData::Uint8(vec![1, 2, 3]), &[2, 3]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NdArray {
    data: ArrayData,
    shape: SmallVec<[usize; 2]>,
}

impl NdArray {
    /// Creates a buffer, checking that `shape` describes exactly the data.
    pub fn new(data: ArrayData, shape: &[usize]) -> Result<Self, ShapeError> {
        let shape: SmallVec<[usize; 2]> = SmallVec::from_slice(shape);
        let expected: usize = shape.iter().product();
        if shape.is_empty() || expected != data.len() {
            return Err(ShapeError {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Creates a one-dimensional buffer.
    #[must_use]
    pub fn from_data(data: ArrayData) -> Self {
        let shape = smallvec![data.len()];
        Self { data, shape }
    }

    /// Element type.
    #[must_use]
    #[inline]
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Shape, outermost dimension first.
    #[must_use]
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    #[must_use]
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of rows (the outermost dimension).
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.shape[0]
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Underlying storage.
    #[must_use]
    #[inline]
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Flat element `i` as a float; `NaN` for non-numeric object elements.
    #[must_use]
    pub fn get_f64(&self, i: usize) -> Option<f64> {
        Some(match &self.data {
            ArrayData::Uint8(v) => f64::from(*v.get(i)?),
            ArrayData::Int32(v) => f64::from(*v.get(i)?),
            ArrayData::Float32(v) => f64::from(*v.get(i)?),
            ArrayData::Float64(v) => *v.get(i)?,
            ArrayData::Object(v) => v.get(i)?.as_f64().unwrap_or(f64::NAN),
        })
    }

    /// Flat element `i` as a raw value.
    #[must_use]
    pub fn get_value(&self, i: usize) -> Option<Value> {
        match &self.data {
            ArrayData::Object(v) => v.get(i).cloned(),
            _ => self.get_f64(i).map(Value::Number),
        }
    }
}

impl From<Vec<u8>> for NdArray {
    fn from(v: Vec<u8>) -> Self {
        Self::from_data(ArrayData::Uint8(v))
    }
}

impl From<Vec<i32>> for NdArray {
    fn from(v: Vec<i32>) -> Self {
        Self::from_data(ArrayData::Int32(v))
    }
}

impl From<Vec<f32>> for NdArray {
    fn from(v: Vec<f32>) -> Self {
        Self::from_data(ArrayData::Float32(v))
    }
}

impl From<Vec<f64>> for NdArray {
    fn from(v: Vec<f64>) -> Self {
        Self::from_data(ArrayData::Float64(v))
    }
}

impl From<Vec<Value>> for NdArray {
    fn from(v: Vec<Value>) -> Self {
        Self::from_data(ArrayData::Object(v))
    }
}
