// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color values: validation and decoding into RGBA bytes.
//!
//! A color is one of:
//!
//! - `#RRGGBB` or `#RRGGBBAA` hex strings,
//! - a name from a [`ColorTable`] ([`SvgColors`] by default),
//! - `rgb(r, g, b)` / `rgba(r, g, b, a)` functional strings with three or four
//!   plain decimal channels,
//! - a packed `0xRRGGBB` integer.
//!
//! Validation is deliberately permissive about channel ranges: `rgba(2550, 0,
//! 0, 5)` is a valid color. Out-of-range channels are clamped only when a
//! color is decoded.

use core::fmt;

use crate::value::Value;

/// Four color bytes: red, green, blue, alpha.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, 255 is opaque.
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black; the decoding of `null` and of missing data.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a color from four bytes.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// The color as `0xRRGGBBAA`.
    #[must_use]
    pub const fn packed(self) -> u32 {
        u32::from_be_bytes(self.to_array())
    }

    /// Unpacks `0xRRGGBBAA`.
    #[must_use]
    pub const fn from_packed(rgba: u32) -> Self {
        let [r, g, b, a] = rgba.to_be_bytes();
        Self::new(r, g, b, a)
    }

    /// The color as `[r, g, b, a]`.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgba(#{:08x})", self.packed())
    }
}

/// A lookup of named colors.
pub trait ColorTable {
    /// The color with this name, if known.
    fn lookup(&self, name: &str) -> Option<Rgba>;
}

/// The 148 SVG/CSS named colors.
///
/// ```rust
/// use glyphspec_property::{ColorTable, Rgba, SvgColors};
///
/// assert_eq!(SvgColors.lookup("rebeccapurple"), Some(Rgba::opaque(0x66, 0x33, 0x99)));
/// assert_eq!(SvgColors.lookup("notacolor"), None);
/// assert_eq!(SvgColors::names().count(), 148);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct SvgColors;

impl SvgColors {
    /// Every color name, in sorted order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        SVG_COLORS.iter().map(|(name, _)| *name)
    }
}

impl ColorTable for SvgColors {
    fn lookup(&self, name: &str) -> Option<Rgba> {
        SVG_COLORS
            .binary_search_by_key(&name, |(n, _)| *n)
            .ok()
            .map(|idx| {
                let [r, g, b] = SVG_COLORS[idx].1;
                Rgba::opaque(r, g, b)
            })
    }
}

/// Sorted by name for binary search.
static SVG_COLORS: [(&str, [u8; 3]); 148] = [
    ("aliceblue", [0xF0, 0xF8, 0xFF]),
    ("antiquewhite", [0xFA, 0xEB, 0xD7]),
    ("aqua", [0x00, 0xFF, 0xFF]),
    ("aquamarine", [0x7F, 0xFF, 0xD4]),
    ("azure", [0xF0, 0xFF, 0xFF]),
    ("beige", [0xF5, 0xF5, 0xDC]),
    ("bisque", [0xFF, 0xE4, 0xC4]),
    ("black", [0x00, 0x00, 0x00]),
    ("blanchedalmond", [0xFF, 0xEB, 0xCD]),
    ("blue", [0x00, 0x00, 0xFF]),
    ("blueviolet", [0x8A, 0x2B, 0xE2]),
    ("brown", [0xA5, 0x2A, 0x2A]),
    ("burlywood", [0xDE, 0xB8, 0x87]),
    ("cadetblue", [0x5F, 0x9E, 0xA0]),
    ("chartreuse", [0x7F, 0xFF, 0x00]),
    ("chocolate", [0xD2, 0x69, 0x1E]),
    ("coral", [0xFF, 0x7F, 0x50]),
    ("cornflowerblue", [0x64, 0x95, 0xED]),
    ("cornsilk", [0xFF, 0xF8, 0xDC]),
    ("crimson", [0xDC, 0x14, 0x3C]),
    ("cyan", [0x00, 0xFF, 0xFF]),
    ("darkblue", [0x00, 0x00, 0x8B]),
    ("darkcyan", [0x00, 0x8B, 0x8B]),
    ("darkgoldenrod", [0xB8, 0x86, 0x0B]),
    ("darkgray", [0xA9, 0xA9, 0xA9]),
    ("darkgreen", [0x00, 0x64, 0x00]),
    ("darkgrey", [0xA9, 0xA9, 0xA9]),
    ("darkkhaki", [0xBD, 0xB7, 0x6B]),
    ("darkmagenta", [0x8B, 0x00, 0x8B]),
    ("darkolivegreen", [0x55, 0x6B, 0x2F]),
    ("darkorange", [0xFF, 0x8C, 0x00]),
    ("darkorchid", [0x99, 0x32, 0xCC]),
    ("darkred", [0x8B, 0x00, 0x00]),
    ("darksalmon", [0xE9, 0x96, 0x7A]),
    ("darkseagreen", [0x8F, 0xBC, 0x8F]),
    ("darkslateblue", [0x48, 0x3D, 0x8B]),
    ("darkslategray", [0x2F, 0x4F, 0x4F]),
    ("darkslategrey", [0x2F, 0x4F, 0x4F]),
    ("darkturquoise", [0x00, 0xCE, 0xD1]),
    ("darkviolet", [0x94, 0x00, 0xD3]),
    ("deeppink", [0xFF, 0x14, 0x93]),
    ("deepskyblue", [0x00, 0xBF, 0xFF]),
    ("dimgray", [0x69, 0x69, 0x69]),
    ("dimgrey", [0x69, 0x69, 0x69]),
    ("dodgerblue", [0x1E, 0x90, 0xFF]),
    ("firebrick", [0xB2, 0x22, 0x22]),
    ("floralwhite", [0xFF, 0xFA, 0xF0]),
    ("forestgreen", [0x22, 0x8B, 0x22]),
    ("fuchsia", [0xFF, 0x00, 0xFF]),
    ("gainsboro", [0xDC, 0xDC, 0xDC]),
    ("ghostwhite", [0xF8, 0xF8, 0xFF]),
    ("gold", [0xFF, 0xD7, 0x00]),
    ("goldenrod", [0xDA, 0xA5, 0x20]),
    ("gray", [0x80, 0x80, 0x80]),
    ("green", [0x00, 0x80, 0x00]),
    ("greenyellow", [0xAD, 0xFF, 0x2F]),
    ("grey", [0x80, 0x80, 0x80]),
    ("honeydew", [0xF0, 0xFF, 0xF0]),
    ("hotpink", [0xFF, 0x69, 0xB4]),
    ("indianred", [0xCD, 0x5C, 0x5C]),
    ("indigo", [0x4B, 0x00, 0x82]),
    ("ivory", [0xFF, 0xFF, 0xF0]),
    ("khaki", [0xF0, 0xE6, 0x8C]),
    ("lavender", [0xE6, 0xE6, 0xFA]),
    ("lavenderblush", [0xFF, 0xF0, 0xF5]),
    ("lawngreen", [0x7C, 0xFC, 0x00]),
    ("lemonchiffon", [0xFF, 0xFA, 0xCD]),
    ("lightblue", [0xAD, 0xD8, 0xE6]),
    ("lightcoral", [0xF0, 0x80, 0x80]),
    ("lightcyan", [0xE0, 0xFF, 0xFF]),
    ("lightgoldenrodyellow", [0xFA, 0xFA, 0xD2]),
    ("lightgray", [0xD3, 0xD3, 0xD3]),
    ("lightgreen", [0x90, 0xEE, 0x90]),
    ("lightgrey", [0xD3, 0xD3, 0xD3]),
    ("lightpink", [0xFF, 0xB6, 0xC1]),
    ("lightsalmon", [0xFF, 0xA0, 0x7A]),
    ("lightseagreen", [0x20, 0xB2, 0xAA]),
    ("lightskyblue", [0x87, 0xCE, 0xFA]),
    ("lightslategray", [0x77, 0x88, 0x99]),
    ("lightslategrey", [0x77, 0x88, 0x99]),
    ("lightsteelblue", [0xB0, 0xC4, 0xDE]),
    ("lightyellow", [0xFF, 0xFF, 0xE0]),
    ("lime", [0x00, 0xFF, 0x00]),
    ("limegreen", [0x32, 0xCD, 0x32]),
    ("linen", [0xFA, 0xF0, 0xE6]),
    ("magenta", [0xFF, 0x00, 0xFF]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("mediumaquamarine", [0x66, 0xCD, 0xAA]),
    ("mediumblue", [0x00, 0x00, 0xCD]),
    ("mediumorchid", [0xBA, 0x55, 0xD3]),
    ("mediumpurple", [0x93, 0x70, 0xDB]),
    ("mediumseagreen", [0x3C, 0xB3, 0x71]),
    ("mediumslateblue", [0x7B, 0x68, 0xEE]),
    ("mediumspringgreen", [0x00, 0xFA, 0x9A]),
    ("mediumturquoise", [0x48, 0xD1, 0xCC]),
    ("mediumvioletred", [0xC7, 0x15, 0x85]),
    ("midnightblue", [0x19, 0x19, 0x70]),
    ("mintcream", [0xF5, 0xFF, 0xFA]),
    ("mistyrose", [0xFF, 0xE4, 0xE1]),
    ("moccasin", [0xFF, 0xE4, 0xB5]),
    ("navajowhite", [0xFF, 0xDE, 0xAD]),
    ("navy", [0x00, 0x00, 0x80]),
    ("oldlace", [0xFD, 0xF5, 0xE6]),
    ("olive", [0x80, 0x80, 0x00]),
    ("olivedrab", [0x6B, 0x8E, 0x23]),
    ("orange", [0xFF, 0xA5, 0x00]),
    ("orangered", [0xFF, 0x45, 0x00]),
    ("orchid", [0xDA, 0x70, 0xD6]),
    ("palegoldenrod", [0xEE, 0xE8, 0xAA]),
    ("palegreen", [0x98, 0xFB, 0x98]),
    ("paleturquoise", [0xAF, 0xEE, 0xEE]),
    ("palevioletred", [0xDB, 0x70, 0x93]),
    ("papayawhip", [0xFF, 0xEF, 0xD5]),
    ("peachpuff", [0xFF, 0xDA, 0xB9]),
    ("peru", [0xCD, 0x85, 0x3F]),
    ("pink", [0xFF, 0xC0, 0xCB]),
    ("plum", [0xDD, 0xA0, 0xDD]),
    ("powderblue", [0xB0, 0xE0, 0xE6]),
    ("purple", [0x80, 0x00, 0x80]),
    ("rebeccapurple", [0x66, 0x33, 0x99]),
    ("red", [0xFF, 0x00, 0x00]),
    ("rosybrown", [0xBC, 0x8F, 0x8F]),
    ("royalblue", [0x41, 0x69, 0xE1]),
    ("saddlebrown", [0x8B, 0x45, 0x13]),
    ("salmon", [0xFA, 0x80, 0x72]),
    ("sandybrown", [0xF4, 0xA4, 0x60]),
    ("seagreen", [0x2E, 0x8B, 0x57]),
    ("seashell", [0xFF, 0xF5, 0xEE]),
    ("sienna", [0xA0, 0x52, 0x2D]),
    ("silver", [0xC0, 0xC0, 0xC0]),
    ("skyblue", [0x87, 0xCE, 0xEB]),
    ("slateblue", [0x6A, 0x5A, 0xCD]),
    ("slategray", [0x70, 0x80, 0x90]),
    ("slategrey", [0x70, 0x80, 0x90]),
    ("snow", [0xFF, 0xFA, 0xFA]),
    ("springgreen", [0x00, 0xFF, 0x7F]),
    ("steelblue", [0x46, 0x82, 0xB4]),
    ("tan", [0xD2, 0xB4, 0x8C]),
    ("teal", [0x00, 0x80, 0x80]),
    ("thistle", [0xD8, 0xBF, 0xD8]),
    ("tomato", [0xFF, 0x63, 0x47]),
    ("turquoise", [0x40, 0xE0, 0xD0]),
    ("violet", [0xEE, 0x82, 0xEE]),
    ("wheat", [0xF5, 0xDE, 0xB3]),
    ("white", [0xFF, 0xFF, 0xFF]),
    ("whitesmoke", [0xF5, 0xF5, 0xF5]),
    ("yellow", [0xFF, 0xFF, 0x00]),
    ("yellowgreen", [0x9A, 0xCD, 0x32]),
];

/// Largest packed integer color.
const MAX_PACKED: f64 = 16_777_215.0;

/// Returns `true` if `value` is a valid color.
#[must_use]
pub fn is_color(value: &Value, table: &dyn ColorTable) -> bool {
    match value {
        Value::String(s) => is_color_str(s, table),
        Value::Number(n) => packed_int(*n).is_some(),
        _ => false,
    }
}

fn is_color_str(s: &str, table: &dyn ColorTable) -> bool {
    if s.starts_with('#') {
        parse_hex(s).is_some()
    } else if s.starts_with("rgb") {
        parse_rgb_function(s).is_some()
    } else {
        table.lookup(s).is_some()
    }
}

/// Decodes a color value. `null` decodes to [`Rgba::TRANSPARENT`];
/// anything that is not a color gives `None`.
///
/// ```rust
/// use glyphspec_property::{Rgba, SvgColors, Value, color_to_rgba};
///
/// let decode = |v: Value| color_to_rgba(&v, &SvgColors);
/// assert_eq!(decode("#11223344".into()), Some(Rgba::new(0x11, 0x22, 0x33, 0x44)));
/// assert_eq!(decode("rgba(300, 0, 0, 0.5)".into()), Some(Rgba::new(255, 0, 0, 128)));
/// assert_eq!(decode(0xff0080.into()), Some(Rgba::opaque(0xff, 0x00, 0x80)));
/// assert_eq!(decode(Value::Null), Some(Rgba::TRANSPARENT));
/// assert_eq!(decode("foo".into()), None);
/// ```
#[must_use]
pub fn color_to_rgba(value: &Value, table: &dyn ColorTable) -> Option<Rgba> {
    match value {
        Value::Null => Some(Rgba::TRANSPARENT),
        Value::Number(n) => packed_int(*n),
        Value::String(s) => str_to_rgba(s, table),
        _ => None,
    }
}

/// Decodes a color string; see [`color_to_rgba`].
#[must_use]
pub fn str_to_rgba(s: &str, table: &dyn ColorTable) -> Option<Rgba> {
    if s.starts_with('#') {
        parse_hex(s)
    } else if s.starts_with("rgb") {
        let [r, g, b, a] = parse_rgb_function(s)?;
        Some(Rgba::new(
            round_byte(r),
            round_byte(g),
            round_byte(b),
            unit_to_byte(a),
        ))
    } else {
        table.lookup(s)
    }
}

/// Parses `#RRGGBB` and `#RRGGBBAA`.
pub(crate) fn parse_hex(s: &str) -> Option<Rgba> {
    let digits = s.strip_prefix('#')?;
    if !(digits.len() == 6 || digits.len() == 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    let a = if digits.len() == 8 { byte(6)? } else { 0xFF };
    Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, a))
}

/// Parses `rgb(...)`/`rgba(...)` into raw channels; alpha defaults to 1.
fn parse_rgb_function(s: &str) -> Option<[f64; 4]> {
    let body = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut channels = [0.0, 0.0, 0.0, 1.0];
    let mut count = 0;
    for part in body.split(',') {
        if count == 4 {
            return None;
        }
        channels[count] = parse_decimal(part.trim())?;
        count += 1;
    }
    (count >= 3).then_some(channels)
}

/// A plain decimal such as `255`, `254.5`, `.5` or `-0.5`.
///
/// Signs and out-of-range channels are accepted; decoding clamps.
fn parse_decimal(s: &str) -> Option<f64> {
    let unsigned = s
        .strip_prefix('-')
        .or_else(|| s.strip_prefix('+'))
        .unwrap_or(s);
    let mut digits = 0;
    let mut dots = 0;
    for b in unsigned.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    s.parse().ok()
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "range checked before the cast"
)]
fn packed_int(n: f64) -> Option<Rgba> {
    if !(0.0..=MAX_PACKED).contains(&n) || n != (n as u32) as f64 {
        return None;
    }
    let [_, r, g, b] = (n as u32).to_be_bytes();
    Some(Rgba::opaque(r, g, b))
}

/// Clamps to `[0, 255]` and rounds half up; `NaN` becomes 0.
pub(crate) fn round_byte(x: f64) -> u8 {
    if !(x > 0.0) {
        0
    } else if x >= 255.0 {
        255
    } else {
        #[expect(clippy::cast_possible_truncation, reason = "x + 0.5 < 256")]
        let byte = (x + 0.5) as u8;
        byte
    }
}

/// Scales a `[0, 1]` channel to a byte.
pub(crate) fn unit_to_byte(x: f64) -> u8 {
    round_byte(x * 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(v: impl Into<Value>) -> bool {
        is_color(&v.into(), &SvgColors)
    }

    #[test]
    fn table_is_sorted() {
        assert!(SVG_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
        for name in SvgColors::names() {
            assert!(valid(name), "{name}");
        }
    }

    #[test]
    fn hex_lengths() {
        assert!(valid("#aabbcc"));
        assert!(valid("#AABBCCDD"));
        assert!(!valid("#abc"));
        assert!(!valid("#aabbccd"));
        assert!(!valid("#gghhii"));
        assert!(!valid("aabbcc"));
    }

    #[test]
    fn functional_forms_are_permissive() {
        for good in [
            "rgb(255, 0, 0)",
            "rgba(200, 0, 0, 0.5)",
            "rgba(0, 255, 0, 0)",
            "rgb(254.5, 0, 0)",
            "rgba(2550, 0, 0, 0.5)",
            "rgba(255, 0, 0, 5)",
            "rgb(255, 0, 0, 0)",
            "rgba(1,2,3)",
            "rgb(-1, 0, 0)",
            "rgba(255, 0, 0, -0.5)",
            "rgba(255, 0, 0, -5)",
            "rgba(+1, 0, 0, 1)",
        ] {
            assert!(valid(good), "{good}");
        }
        for bad in [
            "rgba(255, 0, 0, 0.5, 0)",
            "rgb( )",
            "rgb(a, b, c)",
            "rgb(1, 2)",
            "rgb(--1, 0, 0)",
            "rgb(-, 0, 0)",
            "rgb(1..2, 0, 0)",
            "rgb(1, 2, 3",
        ] {
            assert!(!valid(bad), "{bad}");
        }
    }

    #[test]
    fn packed_integers() {
        assert!(valid(0xff0080));
        assert!(valid(0));
        assert!(!valid(10.2));
        assert!(!valid(-1));
        assert!(!valid(0x0100_0000_u32));
    }

    #[test]
    fn non_color_values() {
        assert!(!valid(true));
        assert!(!valid(Value::Null));
        assert!(!valid(Value::Undefined));
        assert!(!valid(Value::Array(alloc::vec![])));
        assert!(!valid(Value::map::<&str, Value, _>([])));
        assert!(!valid("foo"));
    }

    #[test]
    fn decoding_clamps() {
        let rgba = str_to_rgba("rgba(0, 255.4, 999, 5)", &SvgColors);
        assert_eq!(rgba, Some(Rgba::new(0, 255, 255, 255)));
        assert_eq!(
            str_to_rgba("rgb(254.5, 0, 0)", &SvgColors),
            Some(Rgba::opaque(255, 0, 0))
        );
        assert_eq!(
            str_to_rgba("rgba(-20, 10, 0, -0.5)", &SvgColors),
            Some(Rgba::new(0, 10, 0, 0))
        );
    }

    #[test]
    fn packing_round_trips() {
        let c = Rgba::new(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.packed(), 0x1122_3344);
        assert_eq!(Rgba::from_packed(0x1122_3344), c);
    }

    #[test]
    fn rounding() {
        assert_eq!(unit_to_byte(0.068), 0x11);
        assert_eq!(unit_to_byte(0.135), 0x22);
        assert_eq!(unit_to_byte(0.2), 0x33);
        assert_eq!(round_byte(f64::NAN), 0);
    }
}
