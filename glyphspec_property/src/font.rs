// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS font size grammar.

const LENGTH_UNITS: &[&str] = &[
    "%", "em", "ex", "ch", "ic", "rem", "vw", "vh", "vi", "vb", "vmin", "vmax", "cm", "mm", "q",
    "in", "pc", "pt", "px",
];

const SIZE_KEYWORDS: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "xxx-large",
    "larger", "smaller",
];

/// Returns `true` for a CSS font size: a length such as `12pt`, `1.5em`,
/// `.8rem` or `110%` (leading spaces allowed, units case-insensitive), or a
/// size keyword such as `x-large`.
#[must_use]
pub fn is_font_size(s: &str) -> bool {
    if SIZE_KEYWORDS.contains(&s) {
        return true;
    }
    let s = s.trim_start_matches(' ');
    let split = s
        .bytes()
        .position(|b| !(b.is_ascii_digit() || b == b'.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    is_css_number(number) && LENGTH_UNITS.iter().any(|u| u.eq_ignore_ascii_case(unit))
}

/// `digits`, `digits.digits` or `.digits`.
fn is_css_number(s: &str) -> bool {
    match s.split_once('.') {
        None => !s.is_empty(),
        Some((int, frac)) => {
            !frac.is_empty() && !frac.contains('.') && int.bytes().all(|b| b.is_ascii_digit())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths() {
        for good in ["10pt", "1.5em", ".8rem", "110%", "  12PX", "0vmin", "3q"] {
            assert!(is_font_size(good), "{good}");
        }
    }

    #[test]
    fn keywords() {
        assert!(is_font_size("x-large"));
        assert!(is_font_size("smaller"));
        assert!(!is_font_size("huge"));
    }

    #[test]
    fn malformed() {
        for bad in ["", "10", "pt", "10 pt", "1.pt", "1.2.3pt", "-1pt", "10pts", "12px "] {
            assert!(!is_font_size(bad), "{bad}");
        }
    }
}
