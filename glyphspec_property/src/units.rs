// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Units of measure carried by specs.

use alloc::string::ToString;
use core::f64::consts::PI;
use core::fmt;

use crate::enums::{ANGLE_UNITS, EnumDef, SPATIAL_UNITS};
use crate::error::UnitError;
use crate::value::Value;

/// A unit named by a spec's `units` key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Units {
    /// Screen space (pixels).
    Screen,
    /// Data space.
    Data,
    /// Radians.
    Rad,
    /// Degrees.
    Deg,
    /// Gradians.
    Grad,
    /// Full turns.
    Turn,
}

impl Units {
    /// The unit's name as written in a spec.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Data => "data",
            Self::Rad => "rad",
            Self::Deg => "deg",
            Self::Grad => "grad",
            Self::Turn => "turn",
        }
    }

    fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            "screen" => Self::Screen,
            "data" => Self::Data,
            "rad" => Self::Rad,
            "deg" => Self::Deg,
            "grad" => Self::Grad,
            "turn" => Self::Turn,
            _ => return None,
        })
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A family of units a spec kind accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnitSystem {
    /// `screen` or `data`; defaults to `data`.
    Spatial,
    /// `deg`, `rad`, `grad` or `turn`; defaults to `rad`.
    Angle,
}

impl UnitSystem {
    /// Allowed unit names.
    #[must_use]
    pub fn names(self) -> &'static EnumDef {
        match self {
            Self::Spatial => &SPATIAL_UNITS,
            Self::Angle => &ANGLE_UNITS,
        }
    }

    /// Units assumed when a spec names none.
    #[must_use]
    pub const fn default_units(self) -> Units {
        match self {
            Self::Spatial => Units::Data,
            Self::Angle => Units::Rad,
        }
    }

    /// Parses the raw `units` entry of a spec.
    ///
    /// ```rust
    /// use glyphspec_property::{UnitSystem, Units, Value};
    ///
    /// assert_eq!(UnitSystem::Angle.parse(&"deg".into()), Ok(Units::Deg));
    /// let err = UnitSystem::Spatial.parse(&"bad".into()).unwrap_err();
    /// assert_eq!(err.to_string(), "units must be one of screen, data; got: bad");
    /// ```
    pub fn parse(self, raw: &Value) -> Result<Units, UnitError> {
        let names = self.names();
        raw.as_str()
            .filter(|s| names.contains(s))
            .and_then(Units::from_name)
            .ok_or_else(|| UnitError {
                allowed: names.joined(),
                got: match raw {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })
    }
}

/// Converts an angle in `units` to negated radians.
///
/// Angles are stored counter-clockwise in data and drawn clockwise on
/// screen, so every angle is negated after conversion; `0` becomes `-0.0`.
#[must_use]
pub fn normalize_angle(x: f64, units: Units) -> f64 {
    let radians = match units {
        Units::Deg => x.to_radians(),
        Units::Grad => x * PI / 200.0,
        Units::Turn => x * 2.0 * PI,
        Units::Rad | Units::Screen | Units::Data => x,
    };
    -radians
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_members_only() {
        assert_eq!(UnitSystem::Spatial.parse(&"screen".into()), Ok(Units::Screen));
        assert!(UnitSystem::Spatial.parse(&"deg".into()).is_err());
        assert!(UnitSystem::Angle.parse(&"data".into()).is_err());

        let err = UnitSystem::Angle.parse(&Value::from(3)).unwrap_err();
        assert_eq!(err.allowed, "deg, rad, grad, turn");
        assert_eq!(err.got, "3");
    }

    #[test]
    fn defaults() {
        assert_eq!(UnitSystem::Spatial.default_units(), Units::Data);
        assert_eq!(UnitSystem::Angle.default_units(), Units::Rad);
    }

    #[test]
    fn angles_are_negated_radians() {
        assert_eq!(normalize_angle(1.0, Units::Rad), -1.0);
        let close = |a: f64, b: f64| (a - b) < 1e-12 && (b - a) < 1e-12;
        assert!(close(normalize_angle(180.0, Units::Deg), -PI));
        assert!(close(normalize_angle(200.0, Units::Grad), -PI));
        assert_eq!(normalize_angle(0.5, Units::Turn), -PI);

        let zero = normalize_angle(0.0, Units::Rad);
        assert_eq!(zero, 0.0);
        assert!(zero.is_sign_negative());
    }
}
