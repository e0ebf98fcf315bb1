// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Helvetica glyph metrics for line measurement.
//
// Advance widths come from the Adobe Helvetica AFM, in 1/1000 em, for the
// printable ASCII and Latin-1 ranges of WinAnsiEncoding. Anything outside
// those ranges is measured at the widest Helvetica glyph so a measured line
// never draws wider than it was measured.

/// Widest advance in Helvetica (`@`).
pub const MAX_GLYPH_UNITS: u16 = 1015;

/// U+0020 ..= U+007E.
const ASCII_UNITS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0' .. '9'
    278, 278, 584, 584, 584, 556, 1015, // ':' .. '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' .. 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' .. 'Z'
    278, 278, 278, 469, 556, 333, // '[' .. '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' .. 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' .. 'z'
    334, 260, 334, 584, // '{' .. '~'
];

/// U+00A0 ..= U+00FF.
const LATIN1_UNITS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Advance width of one character, in 1/1000 em.
pub fn char_units(c: char) -> u16 {
    match c as u32 {
        code @ 0x20..=0x7E => ASCII_UNITS[(code - 0x20) as usize],
        code @ 0xA0..=0xFF => LATIN1_UNITS[(code - 0xA0) as usize],
        _ => MAX_GLYPH_UNITS,
    }
}

/// Advance width of a string, in 1/1000 em.
pub fn text_units(text: &str) -> u32 {
    text.chars().map(|c| u32::from(char_units(c))).sum()
}

/// Convert 1/1000 em units to points at `font_size`.
pub fn units_to_pt(units: u32, font_size: f32) -> f32 {
    units as f32 * font_size / 1000.0
}

/// Rendered width of `text` in points at `font_size`.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    units_to_pt(text_units(text), font_size)
}
