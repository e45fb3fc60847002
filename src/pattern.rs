//! Full-strip color sequences.
//!
//! Pattern functions are pure: they produce one color per pixel and know
//! nothing about the hardware. The controller wraps their output in a
//! [`StripBuffer`](crate::strip::StripBuffer) and renders it.

use crate::color::Color;

/// Compute a rainbow across the strip, rotated left by `offset` pixels.
///
/// Pixel `i` gets hue `i / pixel_count` at half saturation and half
/// lightness, so the hue sweeps exactly once from red toward violet
/// without repeating red at the end. The offset is reduced modulo
/// `pixel_count`, then the sequence is rotated so the color that was at
/// index `offset` lands at index 0. Rotation relabels pixels; it never
/// recomputes colors.
pub fn rainbow_colors(pixel_count: usize, offset: usize) -> Vec<Color> {
    if pixel_count == 0 {
        return Vec::new();
    }

    let hue_step = 1.0 / pixel_count as f64;
    let mut colors: Vec<Color> = (0..pixel_count)
        .map(|i| Color::from_hsl(i as f64 * hue_step, 0.5, 0.5))
        .collect();

    colors.rotate_left(offset % pixel_count);
    colors
}

/// One color repeated across the whole strip.
pub fn solid(color: Color, pixel_count: usize) -> Vec<Color> {
    vec![color; pixel_count]
}

/// Every pixel off except `index`. The index must be within the strip;
/// the controller checks bounds before calling.
pub fn single(index: usize, color: Color, pixel_count: usize) -> Vec<Color> {
    let mut colors = vec![Color::OFF; pixel_count];
    colors[index] = color;
    colors
}
