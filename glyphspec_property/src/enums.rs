// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enumerations of string literals used by `Enum` kinds.

use core::fmt;

/// A fixed, ordered set of string literals.
pub struct EnumDef {
    name: &'static str,
    members: &'static [&'static str],
}

impl EnumDef {
    /// Declares an enumeration.
    #[must_use]
    pub const fn new(name: &'static str, members: &'static [&'static str]) -> Self {
        Self { name, members }
    }

    /// Enumeration name.
    #[must_use]
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Members in declaration order.
    #[must_use]
    #[inline]
    pub const fn members(&self) -> &'static [&'static str] {
        self.members
    }

    /// Returns `true` if `s` is a member.
    #[must_use]
    pub fn contains(&self, s: &str) -> bool {
        self.members.contains(&s)
    }

    /// Members joined with `", "`, for error messages.
    #[must_use]
    pub fn joined(&self) -> alloc::string::String {
        self.members.join(", ")
    }
}

impl fmt::Debug for EnumDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumDef")
            .field("name", &self.name)
            .field("members", &self.members)
            .finish()
    }
}

/// Anchor points of a box.
pub static ANCHOR: EnumDef = EnumDef::new(
    "Anchor",
    &[
        "top_left",
        "top_center",
        "top_right",
        "center_left",
        "center_center",
        "center_right",
        "bottom_left",
        "bottom_center",
        "bottom_right",
        "top",
        "left",
        "center",
        "right",
        "bottom",
    ],
);

/// Winding direction of arcs and wedges.
pub static DIRECTION: EnumDef = EnumDef::new("Direction", &["clock", "anticlock"]);

/// Units of distances and coordinates.
pub static SPATIAL_UNITS: EnumDef = EnumDef::new("SpatialUnits", &["screen", "data"]);

/// Units of angles.
pub static ANGLE_UNITS: EnumDef = EnumDef::new("AngleUnits", &["deg", "rad", "grad", "turn"]);

/// Scatter marker shapes.
pub static MARKER_TYPE: EnumDef = EnumDef::new(
    "MarkerType",
    &[
        "asterisk",
        "circle",
        "circle_cross",
        "circle_dot",
        "circle_x",
        "circle_y",
        "cross",
        "dash",
        "diamond",
        "diamond_cross",
        "diamond_dot",
        "dot",
        "hex",
        "hex_dot",
        "inverted_triangle",
        "plus",
        "square",
        "square_cross",
        "square_dot",
        "square_pin",
        "square_x",
        "star",
        "star_dot",
        "triangle",
        "triangle_dot",
        "triangle_pin",
        "x",
        "y",
    ],
);

/// Stroke join styles.
pub static LINE_JOIN: EnumDef = EnumDef::new("LineJoin", &["miter", "round", "bevel"]);

/// Stroke cap styles.
pub static LINE_CAP: EnumDef = EnumDef::new("LineCap", &["butt", "round", "square"]);

/// Font styles.
pub static FONT_STYLE: EnumDef =
    EnumDef::new("FontStyle", &["normal", "italic", "bold", "bold italic"]);

/// Horizontal text alignment.
pub static TEXT_ALIGN: EnumDef =
    EnumDef::new("TextAlign", &["left", "right", "center"]);

/// Vertical text alignment.
pub static TEXT_BASELINE: EnumDef = EnumDef::new(
    "TextBaseline",
    &["top", "middle", "bottom", "alphabetic", "hanging", "ideographic"],
);
