// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion of raw spec data into flat, typed buffers.
//!
//! Every call allocates a fresh output. Elements that cannot be converted
//! degrade to the kind's missing sentinel (`NaN`, transparent, `None` or
//! `false`) instead of failing; only buffer layouts without a decoding rule
//! and expression length mismatches are errors.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::array::{ArrayData, NdArray};
use crate::color::{ColorTable, Rgba, color_to_rgba, unit_to_byte};
use crate::error::MaterializeError;
use crate::model::Transform;
use crate::spec::Material;
use crate::units::{Units, normalize_angle};
use crate::value::Value;

/// A materialized single element.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// A number; angles are negated radians.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// A string, or `None` when missing.
    Str(Option<String>),
    /// A decoded color.
    Rgba(Rgba),
    /// A coordinate sequence.
    Seq(Vec<f64>),
}

impl Scalar {
    /// The number, if this is one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Colors packed as four bytes (`r`, `g`, `b`, `a`) per element.
///
/// ```rust
/// use glyphspec_property::{ColorArray, Rgba};
///
/// let colors: ColorArray = [Rgba::opaque(0x11, 0x22, 0x33), Rgba::TRANSPARENT]
///     .into_iter()
///     .collect();
/// assert_eq!(colors.len(), 2);
/// assert_eq!(colors.as_bytes(), &[0x11, 0x22, 0x33, 0xFF, 0, 0, 0, 0]);
/// assert_eq!(colors.packed(), vec![0x112233FF, 0]);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ColorArray {
    bytes: Vec<u8>,
}

impl ColorArray {
    /// Creates an empty array with room for `n` colors.
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(n * 4),
        }
    }

    /// Appends a color.
    pub fn push(&mut self, color: Rgba) {
        self.bytes.extend_from_slice(&color.to_array());
    }

    /// Number of colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() / 4
    }

    /// Returns `true` if there are no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Color `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<Rgba> {
        let start = i.checked_mul(4)?;
        let px = self.bytes.get(start..start.checked_add(4)?)?;
        Some(Rgba::new(px[0], px[1], px[2], px[3]))
    }

    /// Raw bytes, four per color.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Colors as `0xRRGGBBAA` words.
    #[must_use]
    pub fn packed(&self) -> Vec<u32> {
        self.bytes
            .chunks_exact(4)
            .map(|px| u32::from_be_bytes([px[0], px[1], px[2], px[3]]))
            .collect()
    }
}

impl FromIterator<Rgba> for ColorArray {
    fn from_iter<I: IntoIterator<Item = Rgba>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut colors = Self::with_capacity(iter.size_hint().0);
        for color in iter {
            colors.push(color);
        }
        colors
    }
}

impl fmt::Debug for ColorArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.len()).filter_map(|i| self.get(i)))
            .finish()
    }
}

/// A materialized column.
#[derive(Clone, Debug, PartialEq)]
pub enum SpecArray {
    /// Numbers, distances and coordinates.
    Float64(Vec<f64>),
    /// Angles, as negated radians.
    Float32(Vec<f32>),
    /// Booleans as `0` or `1`.
    Uint8(Vec<u8>),
    /// Colors.
    Rgba(ColorArray),
    /// Strings; `None` where missing.
    Strings(Vec<Option<String>>),
    /// One coordinate sequence per element.
    Ragged(Vec<Vec<f64>>),
}

impl SpecArray {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Uint8(v) => v.len(),
            Self::Rgba(v) => v.len(),
            Self::Strings(v) => v.len(),
            Self::Ragged(v) => v.len(),
        }
    }

    /// Returns `true` if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The numbers, for [`SpecArray::Float64`].
    #[must_use]
    pub fn as_f64_slice(&self) -> Option<&[f64]> {
        match self {
            Self::Float64(v) => Some(v),
            _ => None,
        }
    }

    /// The angles, for [`SpecArray::Float32`].
    #[must_use]
    pub fn as_f32_slice(&self) -> Option<&[f32]> {
        match self {
            Self::Float32(v) => Some(v),
            _ => None,
        }
    }

    /// The colors, for [`SpecArray::Rgba`].
    #[must_use]
    pub fn as_colors(&self) -> Option<&ColorArray> {
        match self {
            Self::Rgba(v) => Some(v),
            _ => None,
        }
    }
}

/// Converts one raw element.
pub(crate) fn materialize(
    material: Material,
    units: Option<Units>,
    raw: &Value,
    colors: &dyn ColorTable,
) -> Scalar {
    match material {
        Material::Number => Scalar::Number(number(raw)),
        Material::Angle => Scalar::Number(angle(number(raw), units)),
        Material::Boolean => Scalar::Bool(flag(raw)),
        Material::Text => Scalar::Str(raw.as_str().map(String::from)),
        Material::Color => Scalar::Rgba(color_to_rgba(raw, colors).unwrap_or(Rgba::TRANSPARENT)),
        Material::Ragged => Scalar::Seq(numbers(raw)),
    }
}

/// Converts a sequence or buffer; any other value counts as one element.
pub(crate) fn v_materialize(
    material: Material,
    units: Option<Units>,
    raw: &Value,
    colors: &dyn ColorTable,
) -> Result<SpecArray, MaterializeError> {
    Ok(match material {
        Material::Number => SpecArray::Float64(numbers(raw)),
        #[expect(clippy::cast_possible_truncation, reason = "angles are emitted as f32")]
        Material::Angle => SpecArray::Float32(
            numbers(raw)
                .into_iter()
                .map(|x| angle(x, units) as f32)
                .collect(),
        ),
        Material::Boolean => SpecArray::Uint8(
            elements(raw)
                .iter()
                .map(|v| u8::from(flag(v)))
                .collect(),
        ),
        Material::Text => SpecArray::Strings(
            elements(raw)
                .iter()
                .map(|v| v.as_str().map(String::from))
                .collect(),
        ),
        Material::Color => SpecArray::Rgba(decode_colors(raw, colors)?),
        Material::Ragged => SpecArray::Ragged(rows(raw)),
    })
}

/// Applies a transform's scalar form.
pub(crate) fn transform_scalar(scalar: Scalar, transform: &dyn Transform) -> Scalar {
    match scalar {
        Scalar::Number(x) => Scalar::Number(transform.compute(x)),
        Scalar::Seq(xs) => Scalar::Seq(xs.into_iter().map(|x| transform.compute(x)).collect()),
        other => other,
    }
}

/// Applies a transform's vector form.
pub(crate) fn transform_array(
    array: SpecArray,
    transform: &dyn Transform,
) -> Result<SpecArray, MaterializeError> {
    Ok(match array {
        SpecArray::Float64(xs) => SpecArray::Float64(checked(transform, &xs)?),
        SpecArray::Float32(xs) => {
            let wide: Vec<f64> = xs.iter().copied().map(f64::from).collect();
            #[expect(clippy::cast_possible_truncation, reason = "angles are emitted as f32")]
            let narrow = checked(transform, &wide)?
                .into_iter()
                .map(|x| x as f32)
                .collect();
            SpecArray::Float32(narrow)
        }
        SpecArray::Ragged(rows) => SpecArray::Ragged(
            rows.iter()
                .map(|row| checked(transform, row))
                .collect::<Result<_, _>>()?,
        ),
        other => other,
    })
}

fn checked(transform: &dyn Transform, xs: &[f64]) -> Result<Vec<f64>, MaterializeError> {
    let out = transform.v_compute(xs);
    if out.len() == xs.len() {
        Ok(out)
    } else {
        Err(MaterializeError::LengthMismatch {
            expected: xs.len(),
            got: out.len(),
        })
    }
}

/// Booleans as given; numbers (typed buffers) are true when non-zero.
fn flag(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        _ => false,
    }
}

fn number(raw: &Value) -> f64 {
    raw.as_f64().unwrap_or(f64::NAN)
}

fn angle(x: f64, units: Option<Units>) -> f64 {
    normalize_angle(x, units.unwrap_or(Units::Rad))
}

/// Raw elements of a sequence, buffer or scalar.
fn elements(raw: &Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items.clone(),
        Value::Buffer(buf) => (0..buf.data().len())
            .filter_map(|i| buf.get_value(i))
            .collect(),
        other => vec![other.clone()],
    }
}

/// Flat numeric elements; non-numbers become `NaN`.
fn numbers(raw: &Value) -> Vec<f64> {
    match raw {
        Value::Array(items) => items.iter().map(number).collect(),
        Value::Buffer(buf) => (0..buf.data().len())
            .filter_map(|i| buf.get_f64(i))
            .collect(),
        other => vec![number(other)],
    }
}

/// Per-element sequences for ragged kinds.
fn rows(raw: &Value) -> Vec<Vec<f64>> {
    match raw {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) | Value::Buffer(_) => numbers(item),
                _ => Vec::new(),
            })
            .collect(),
        Value::Buffer(buf) if buf.ndim() == 2 => {
            let width = buf.shape()[1];
            (0..buf.len())
                .map(|row| {
                    (row * width..(row + 1) * width)
                        .filter_map(|i| buf.get_f64(i))
                        .collect()
                })
                .collect()
        }
        Value::Buffer(_) => vec![numbers(raw)],
        _ => Vec::new(),
    }
}

fn decode_colors(raw: &Value, colors: &dyn ColorTable) -> Result<ColorArray, MaterializeError> {
    match raw {
        Value::Buffer(buf) => decode_color_buffer(buf, colors),
        Value::Array(items) => Ok(items
            .iter()
            .map(|v| color_to_rgba(v, colors).unwrap_or(Rgba::TRANSPARENT))
            .collect()),
        other => {
            let color = color_to_rgba(other, colors).unwrap_or(Rgba::TRANSPARENT);
            Ok(core::iter::once(color).collect())
        }
    }
}

fn decode_color_buffer(
    buf: &NdArray,
    colors: &dyn ColorTable,
) -> Result<ColorArray, MaterializeError> {
    let channels = match buf.shape() {
        [_] => None,
        [_, c @ (3 | 4)] => Some(*c),
        _ => return Err(unsupported(buf)),
    };
    match (buf.data(), channels) {
        (ArrayData::Uint8(gray), None) => Ok(gray
            .iter()
            .map(|&v| Rgba::opaque(v, v, v))
            .collect()),
        (ArrayData::Uint8(bytes), Some(c)) => Ok(bytes
            .chunks_exact(c)
            .map(|px| Rgba::new(px[0], px[1], px[2], if c == 4 { px[3] } else { 0xFF }))
            .collect()),
        (ArrayData::Float32(_) | ArrayData::Float64(_), Some(c)) => Ok((0..buf.len())
            .map(|row| {
                let channel = |k: usize| buf.get_f64(row * c + k).unwrap_or(0.0);
                let a = if c == 4 { unit_to_byte(channel(3)) } else { 0xFF };
                Rgba::new(
                    unit_to_byte(channel(0)),
                    unit_to_byte(channel(1)),
                    unit_to_byte(channel(2)),
                    a,
                )
            })
            .collect()),
        (ArrayData::Object(items), None) => Ok(items
            .iter()
            .map(|v| color_to_rgba(v, colors).unwrap_or(Rgba::TRANSPARENT))
            .collect()),
        _ => Err(unsupported(buf)),
    }
}

fn unsupported(buf: &NdArray) -> MaterializeError {
    MaterializeError::UnsupportedColorEncoding {
        dtype: buf.dtype(),
        shape: buf.shape().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::DType;
    use crate::color::SvgColors;
    use core::f32::consts::PI;

    fn colors(raw: impl Into<Value>) -> Result<ColorArray, MaterializeError> {
        decode_colors(&raw.into(), &SvgColors)
    }

    fn buffer(data: ArrayData, shape: &[usize]) -> NdArray {
        NdArray::new(data, shape).unwrap()
    }

    #[test]
    fn numbers_degrade_to_nan() {
        let out = v_materialize(
            Material::Number,
            None,
            &vec![Value::from(1), Value::Null, Value::from("x")].into(),
            &SvgColors,
        )
        .unwrap();
        let xs = out.as_f64_slice().unwrap();
        assert_eq!(xs[0], 1.0);
        assert!(xs[1].is_nan() && xs[2].is_nan());
    }

    #[test]
    fn angles_in_radians_are_negated() {
        let raw: Value = [-10, 0, 10, 20].into_iter().map(Value::from).collect();
        let out = v_materialize(Material::Angle, Some(Units::Rad), &raw, &SvgColors).unwrap();
        let xs = out.as_f32_slice().unwrap();
        assert_eq!(xs, &[10.0, -0.0, -10.0, -20.0]);
        assert!(xs[1].is_sign_negative());
    }

    #[test]
    fn angles_in_degrees_are_converted() {
        let raw: Value = [-180, 0, 180].into_iter().map(Value::from).collect();
        let out = v_materialize(Material::Angle, Some(Units::Deg), &raw, &SvgColors).unwrap();
        assert_eq!(out.as_f32_slice().unwrap(), &[PI, -0.0, -PI]);

        let one = materialize(Material::Angle, Some(Units::Deg), &Value::from(0), &SvgColors);
        assert!(one.as_f64().is_some_and(|x| x == 0.0 && x.is_sign_negative()));
    }

    #[test]
    fn gray_uint8() {
        let out = colors(NdArray::from(vec![0x11_u8, 0x22])).unwrap();
        assert_eq!(out.as_bytes(), &[0x11, 0x11, 0x11, 0xFF, 0x22, 0x22, 0x22, 0xFF]);
    }

    #[test]
    fn rgb_and_rgba_uint8() {
        let rgb = buffer(ArrayData::Uint8(vec![0x11, 0x22, 0x33, 0x22, 0x33, 0x44]), &[2, 3]);
        assert_eq!(
            colors(rgb).unwrap().as_bytes(),
            &[0x11, 0x22, 0x33, 0xFF, 0x22, 0x33, 0x44, 0xFF]
        );

        let bytes = vec![0x11, 0x22, 0x33, 0x44, 0x22, 0x33, 0x44, 0x55];
        let rgba = buffer(ArrayData::Uint8(bytes.clone()), &[2, 4]);
        assert_eq!(colors(rgba).unwrap().as_bytes(), bytes.as_slice());
    }

    #[test]
    fn unit_floats_are_scaled() {
        let f32_rgb = buffer(
            ArrayData::Float32(vec![0.068, 0.135, 0.200, 0.135, 0.200, 0.268]),
            &[2, 3],
        );
        assert_eq!(colors(f32_rgb).unwrap().packed(), vec![0x112233FF, 0x223344FF]);

        let f64_rgba = buffer(
            ArrayData::Float64(vec![0.068, 0.135, 0.200, 0.268, 0.135, 0.200, 0.268, 0.335]),
            &[2, 4],
        );
        assert_eq!(colors(f64_rgba).unwrap().packed(), vec![0x11223344, 0x22334455]);
    }

    #[test]
    fn object_strings() {
        let items = vec![Value::from("#112233"), Value::from("#22334455")];
        let out = colors(NdArray::from(items)).unwrap();
        assert_eq!(out.packed(), vec![0x112233FF, 0x22334455]);
    }

    #[test]
    fn plain_arrays_decode_each_element() {
        let items = vec![Value::from("red"), Value::Null, Value::from("nope"), Value::from(0x00ff00)];
        let out = colors(items).unwrap();
        assert_eq!(out.packed(), vec![0xFF0000FF, 0, 0, 0x00FF00FF]);
    }

    #[test]
    fn unsupported_layouts() {
        let err = colors(NdArray::from(vec![1_i32, 2])).unwrap_err();
        assert_eq!(
            err,
            MaterializeError::UnsupportedColorEncoding {
                dtype: DType::Int32,
                shape: smallvec::smallvec![2],
            }
        );
        let wide = buffer(ArrayData::Uint8(vec![0; 10]), &[2, 5]);
        assert!(colors(wide).is_err());
        let gray_floats = NdArray::from(vec![0.5_f64]);
        assert!(colors(gray_floats).is_err());
    }

    #[test]
    fn ragged_rows() {
        let raw: Value = vec![
            Value::from(vec![Value::from(1), Value::from(2)]),
            Value::from(vec![Value::from(3)]),
        ]
        .into();
        let out = v_materialize(Material::Ragged, None, &raw, &SvgColors).unwrap();
        assert_eq!(out, SpecArray::Ragged(vec![vec![1.0, 2.0], vec![3.0]]));

        let grid = buffer(ArrayData::Float64(vec![1.0, 2.0, 3.0, 4.0]), &[2, 2]);
        let out = v_materialize(Material::Ragged, None, &grid.into(), &SvgColors).unwrap();
        assert_eq!(out, SpecArray::Ragged(vec![vec![1.0, 2.0], vec![3.0, 4.0]]));
    }

    #[test]
    fn booleans_and_strings() {
        let raw: Value = vec![Value::from(true), Value::Null].into();
        let out = v_materialize(Material::Boolean, None, &raw, &SvgColors).unwrap();
        assert_eq!(out, SpecArray::Uint8(vec![1, 0]));

        let raw: Value = vec![Value::from("a"), Value::Null].into();
        let out = v_materialize(Material::Text, None, &raw, &SvgColors).unwrap();
        assert_eq!(out, SpecArray::Strings(vec![Some("a".into()), None]));
    }

    #[test]
    fn boolean_buffers_are_non_zero_tests() {
        let raw: Value = NdArray::from(vec![1_u8, 0, 1, 7]).into();
        let out = v_materialize(Material::Boolean, None, &raw, &SvgColors).unwrap();
        assert_eq!(out, SpecArray::Uint8(vec![1, 0, 1, 1]));

        let raw: Value = NdArray::from(vec![0.5_f64, f64::NAN]).into();
        let out = v_materialize(Material::Boolean, None, &raw, &SvgColors).unwrap();
        assert_eq!(out, SpecArray::Uint8(vec![1, 0]));

        let one = materialize(Material::Boolean, None, &Value::from(1), &SvgColors);
        assert_eq!(one, Scalar::Bool(true));
    }

    #[test]
    fn color_index_out_of_range() {
        let colors: ColorArray = [Rgba::opaque(1, 2, 3)].into_iter().collect();
        assert_eq!(colors.get(0), Some(Rgba::opaque(1, 2, 3)));
        assert_eq!(colors.get(1), None);
        assert_eq!(colors.get(usize::MAX / 2), None);
        assert_eq!(colors.get(usize::MAX), None);
    }
}
