// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Externally owned collaborators referenced by specs.

use alloc::vec::Vec;

use crate::class::Object;
use crate::source::DataSource;
use crate::value::Value;

/// A computed-value provider evaluated against a data source.
///
/// Expressions hold no state from the property system's point of view; they
/// are re-invoked on every materialization. Materialization only calls
/// [`v_compute`](Self::v_compute); `compute` is for callers that want a
/// single value and is never invoked by this crate.
pub trait Expression: Object {
    /// Computes a single value.
    fn compute(&self, source: &dyn DataSource) -> Value;

    /// Computes one value per row of `source`, as a sequence or buffer.
    fn v_compute(&self, source: &dyn DataSource) -> Value;
}

/// A value mapping applied after unit normalization.
///
/// Numeric specs (numbers, angles, coordinate sequences) go through
/// [`compute`](Self::compute) and [`v_compute`](Self::v_compute). Every other
/// spec kind hands its raw values to [`map_value`](Self::map_value) and
/// [`v_map_values`](Self::v_map_values) before decoding, so a mapper can turn
/// numbers into colors or labels; the defaults leave values untouched.
///
/// The scalar and vector forms are independent: nothing requires
/// `v_compute` to equal `compute` applied elementwise.
pub trait Transform: Object {
    /// Maps one value.
    fn compute(&self, x: f64) -> f64;

    /// Maps a whole column.
    fn v_compute(&self, xs: &[f64]) -> Vec<f64>;

    /// Maps one raw value of a non-numeric spec, or `None` to keep it.
    fn map_value(&self, _value: &Value) -> Option<Value> {
        None
    }

    /// Maps a raw column of a non-numeric spec, or `None` to keep it.
    fn v_map_values(&self, _values: &Value) -> Option<Value> {
        None
    }
}
