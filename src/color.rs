//! Color representation and conversion.
//!
//! The crate has its own color type, decoupled from the hardware crate.
//! This lets us test color logic on any machine without needing
//! `rs_ws281x`. At the hardware boundary, the driver converts to the raw
//! channel layout the strip expects.

use crate::error::StripError;

/// Built-in color name table. Names resolve case-insensitively to a
/// packed 24-bit RGB value.
const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("blue", 0x0000FF),
    ("cyan", 0x00FFFF),
    ("green", 0x00FF00),
    ("magenta", 0xFF00FF),
    ("orange", 0xFFA500),
    ("pink", 0xFFC0CB),
    ("purple", 0x800080),
    ("red", 0xFF0000),
    ("white", 0xFFFFFF),
    ("yellow", 0xFFFF00),
];

/// An RGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// All channels off.
    pub const OFF: Color = Color { r: 0, g: 0, b: 0 };

    /// All channels full on.
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert a color from HSL space, each component conventionally in
    /// [0, 1], to RGB with channels rounded to the nearest integer.
    ///
    /// Zero saturation is achromatic: all three channels are
    /// `round(l * 255)` regardless of hue.
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        Self {
            r: (r * 255.0).round() as u8,
            g: (g * 255.0).round() as u8,
            b: (b * 255.0).round() as u8,
        }
    }

    /// Unpack a 24-bit `(R<<16)|(G<<8)|B` integer. Bits above the low 24
    /// are ignored.
    pub fn from_packed(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// Pack into a 24-bit `(R<<16)|(G<<8)|B` integer. Exact inverse of
    /// [`Color::from_packed`].
    pub fn to_packed(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Resolve a color string to a `Color`.
    ///
    /// Accepts a name from the built-in table, the `on`/`off` aliases
    /// (white/black), or a 6-digit hex literal with an optional `#` or
    /// `0x` prefix. Matching is case-insensitive.
    pub fn parse(input: &str) -> Result<Self, StripError> {
        let value = input.trim().to_ascii_lowercase();

        match value.as_str() {
            "on" => return Ok(Color::WHITE),
            "off" => return Ok(Color::OFF),
            _ => {}
        }

        let hex = value
            .strip_prefix('#')
            .or_else(|| value.strip_prefix("0x"))
            .unwrap_or(&value);
        if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            // Length and digits are pre-checked, so this cannot fail.
            let packed = u32::from_str_radix(hex, 16)
                .map_err(|_| StripError::InvalidColor(input.to_string()))?;
            return Ok(Color::from_packed(packed));
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|&(_, packed)| Color::from_packed(packed))
            .ok_or_else(|| StripError::InvalidColor(input.to_string()))
    }

    /// Canonical 7-character `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Apply brightness scaling (0-100) to this color.
    pub fn apply_brightness(self, brightness: u8) -> Self {
        if brightness >= 100 {
            return self;
        }
        Self {
            r: ((self.r as u16 * brightness as u16) / 100) as u8,
            g: ((self.g as u16 * brightness as u16) / 100) as u8,
            b: ((self.b as u16 * brightness as u16) / 100) as u8,
        }
    }
}

/// The two-piecewise hue helper of the standard HSL→RGB conversion.
/// `t` is wrapped into [0, 1) by a single add or subtract of 1.
fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

// ── Tests ──────────────────────────────────────────────────────────
