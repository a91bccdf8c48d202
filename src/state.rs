//! The decoder's virtual-machine state: register banks, selectors, the
//! current paint, level-of-detail bounds, and the forward/inverse
//! viewbox-to-destination transforms.
//!
//! One [`State`] is created per [`decode`](crate::decode::decode) call, flows
//! top-to-bottom through the bytecode interpreter, and is dropped at the end
//! of that call. Nothing here persists across decode calls.

use crate::color::{Color, Palette};
use crate::geom::Rectangle;
use crate::paint::Paint;

/// The adjustment table `{0,1,2,3,4,5,6,0}` used to compute a register
/// index from a selector and an opcode's low three bits.
///
/// The final `0` (the `& 0x07 == 7` column) is deliberate, not a typo: that
/// column pairs with the auto-advance rule, under which the selector itself
/// is what moves, so the index offset stays zero.
pub const ADJUSTMENTS: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 0];

/// Reduces a selector and an opcode's adjustment into a 6-bit register
/// index, wrapping modulo 64.
#[must_use]
pub fn adjusted_index(selector: u8, opcode_low_bits: u8) -> usize {
	let adj = ADJUSTMENTS[usize::from(opcode_low_bits & 0x07)];
	(selector.wrapping_sub(adj) & 0x3F) as usize
}

/// The forward (source-to-destination) and inverse (destination-to-source)
/// affine mappings between viewbox space and destination space, as plain
/// scale/bias pairs (rather than full [`Matrix2x3`](crate::geom::Matrix2x3)
/// values, matching how the reference decoder carries them inline in its
/// interpreter state).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
	/// Source-to-destination scale, x axis.
	pub s2d_scale_x: f64,
	/// Source-to-destination bias, x axis.
	pub s2d_bias_x: f64,
	/// Source-to-destination scale, y axis.
	pub s2d_scale_y: f64,
	/// Source-to-destination bias, y axis.
	pub s2d_bias_y: f64,
	/// Destination-to-source scale, x axis.
	pub d2s_scale_x: f64,
	/// Destination-to-source bias, x axis.
	pub d2s_bias_x: f64,
	/// Destination-to-source scale, y axis.
	pub d2s_scale_y: f64,
	/// Destination-to-source bias, y axis.
	pub d2s_bias_y: f64,
}

impl Transform {
	/// The identity transform: scale 1, bias 0, both directions.
	pub const IDENTITY: Self = Self {
		s2d_scale_x: 1.0,
		s2d_bias_x: 0.0,
		s2d_scale_y: 1.0,
		s2d_bias_y: 0.0,
		d2s_scale_x: 1.0,
		d2s_bias_x: 0.0,
		d2s_scale_y: 1.0,
		d2s_bias_y: 0.0,
	};

	/// Derives the forward/inverse transform pair from a destination
	/// rectangle and a viewbox, per `spec.md` §4.5's "Initial transform":
	/// identity unless both rectangles have positive area on both axes.
	#[must_use]
	pub fn from_rects(dst: Rectangle, viewbox: Rectangle) -> Self {
		let rw = f64::from(dst.width());
		let rh = f64::from(dst.height());
		let vw = f64::from(viewbox.width());
		let vh = f64::from(viewbox.height());
		if rw > 0.0 && rh > 0.0 && vw > 0.0 && vh > 0.0 {
			let s2d_scale_x = rw / vw;
			let s2d_scale_y = rh / vh;
			let s2d_bias_x = f64::from(dst.min_x) - f64::from(viewbox.min_x) * s2d_scale_x;
			let s2d_bias_y = f64::from(dst.min_y) - f64::from(viewbox.min_y) * s2d_scale_y;
			let d2s_scale_x = 1.0 / s2d_scale_x;
			let d2s_scale_y = 1.0 / s2d_scale_y;
			Self {
				s2d_scale_x,
				s2d_bias_x,
				s2d_scale_y,
				s2d_bias_y,
				d2s_scale_x,
				d2s_bias_x: -s2d_bias_x * d2s_scale_x,
				d2s_scale_y,
				d2s_bias_y: -s2d_bias_y * d2s_scale_y,
			}
		} else {
			Self::IDENTITY
		}
	}

	/// Maps a source-space (viewbox) point into destination space.
	#[must_use]
	pub fn source_to_dest(&self, x: f32, y: f32) -> (f32, f32) {
		(
			(f64::from(x) * self.s2d_scale_x + self.s2d_bias_x) as f32,
			(f64::from(y) * self.s2d_scale_y + self.s2d_bias_y) as f32,
		)
	}
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// The level-of-detail gate: a half-open interval `[lo, hi)` of
/// `height_in_pixels` values for which a drawing reaches the real sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lod {
	/// Inclusive lower bound.
	pub lo: f64,
	/// Exclusive upper bound.
	pub hi: f64,
}

impl Lod {
	/// The default interval: every height passes.
	pub const EVERYTHING: Self = Self { lo: 0.0, hi: f64::INFINITY };

	/// Whether `height_in_pixels` falls inside `[lo, hi)`.
	#[must_use]
	pub fn contains(&self, height_in_pixels: i64) -> bool {
		let h = height_in_pixels as f64;
		self.lo <= h && h < self.hi
	}
}

impl Default for Lod {
	fn default() -> Self {
		Self::EVERYTHING
	}
}

/// The decoder's full virtual-machine state for a single decode call.
#[derive(Debug, Clone)]
pub struct State {
	/// The effective viewbox (file chunk or default).
	pub viewbox: Rectangle,
	/// Resolved `height_in_pixels`, used only for level-of-detail gating.
	pub height_in_pixels: i64,
	/// The custom palette: suggested-palette chunk, caller override, or the
	/// built-in default, in that order of precedence.
	pub custom_palette: Palette,
	/// The 64-entry color register bank, seeded from `custom_palette`.
	pub creg: Palette,
	/// The 64-entry number register bank, all zero at decode start.
	pub nreg: [f32; 64],
	/// The color-register selector, 6 bits.
	pub csel: u8,
	/// The number-register selector, 6 bits.
	pub nsel: u8,
	/// The forward/inverse viewbox-destination transform pair.
	pub transform: Transform,
	/// The paint selected by the most recent `begin_drawing` styling opcode.
	pub paint: Paint,
	/// The current level-of-detail gate.
	pub lod: Lod,
}

impl State {
	/// Builds the initial VM state for one decode call: registers seeded
	/// from `custom_palette`, transform derived from `viewbox` and `dst`,
	/// everything else at its spec-mandated default.
	#[must_use]
	pub fn new(viewbox: Rectangle, dst: Rectangle, height_in_pixels: i64, custom_palette: Palette) -> Self {
		Self {
			viewbox,
			height_in_pixels,
			custom_palette,
			creg: custom_palette,
			nreg: [0.0; 64],
			csel: 0,
			nsel: 0,
			transform: Transform::from_rects(dst, viewbox),
			paint: Paint::Invalid,
			lod: Lod::EVERYTHING,
		}
	}

	/// The CREG slot an opcode's low three bits select, relative to `csel`.
	#[must_use]
	pub fn creg_index(&self, opcode_low_bits: u8) -> usize {
		adjusted_index(self.csel, opcode_low_bits)
	}

	/// The NREG slot an opcode's low three bits select, relative to `nsel`.
	#[must_use]
	pub fn nreg_index(&self, opcode_low_bits: u8) -> usize {
		adjusted_index(self.nsel, opcode_low_bits)
	}

	/// Advances `csel` by one, if the opcode's low three bits are `0x07`
	/// (the auto-advance column).
	pub fn maybe_advance_csel(&mut self, opcode_low_bits: u8) {
		if opcode_low_bits & 0x07 == 0x07 {
			self.csel = self.csel.wrapping_add(1) & 0x3F;
		}
	}

	/// Advances `nsel` by one, if the opcode's low three bits are `0x07`.
	pub fn maybe_advance_nsel(&mut self, opcode_low_bits: u8) {
		if opcode_low_bits & 0x07 == 0x07 {
			self.nsel = self.nsel.wrapping_add(1) & 0x3F;
		}
	}

	/// Resolves a one-byte color per `spec.md` §4.5's "one-byte color rule":
	/// the built-in 128-entry table, a CREG shorthand, or `custom_palette`,
	/// partitioned by `u`'s high bits.
	#[must_use]
	pub fn one_byte_color(&self, u: u8) -> Color {
		match u {
			0x00..=0x7F => crate::color::builtin_one_byte_color(u),
			0x80..=0xBF => self.creg[usize::from(u - 0x80)],
			0xC0..=0xFF => self.custom_palette[usize::from(u - 0xC0)],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identity_transform_when_either_rect_is_empty() {
		let t = Transform::from_rects(Rectangle::EMPTY, Rectangle::DEFAULT_VIEWBOX);
		assert_eq!(t, Transform::IDENTITY);
	}

	#[test]
	fn transform_maps_viewbox_corners_to_dst_corners() {
		let viewbox = Rectangle::new(-16.0, -16.0, 16.0, 16.0);
		let dst = Rectangle::new(0.0, 0.0, 100.0, 100.0);
		let t = Transform::from_rects(dst, viewbox);
		let (x0, y0) = t.source_to_dest(viewbox.min_x, viewbox.min_y);
		let (x1, y1) = t.source_to_dest(viewbox.max_x, viewbox.max_y);
		assert!((x0 - dst.min_x).abs() < 1e-4 && (y0 - dst.min_y).abs() < 1e-4);
		assert!((x1 - dst.max_x).abs() < 1e-4 && (y1 - dst.max_y).abs() < 1e-4);
	}

	#[test]
	fn adjusted_index_wraps_modulo_64() {
		assert_eq!(adjusted_index(0, 1), 63);
		assert_eq!(adjusted_index(5, 0), 5);
	}

	#[test]
	fn auto_advance_only_on_low_bits_seven() {
		let mut s = State::new(Rectangle::DEFAULT_VIEWBOX, Rectangle::DEFAULT_VIEWBOX, 0, Palette::EMPTY);
		s.csel = 10;
		s.maybe_advance_csel(0x03);
		assert_eq!(s.csel, 10);
		s.maybe_advance_csel(0x07);
		assert_eq!(s.csel, 11);
	}

	#[test]
	fn lod_gate_is_half_open() {
		let lod = Lod { lo: 10.0, hi: 20.0 };
		assert!(!lod.contains(9));
		assert!(lod.contains(10));
		assert!(lod.contains(19));
		assert!(!lod.contains(20));
	}

	#[test]
	fn one_byte_color_partitions_by_range() {
		let mut s = State::new(Rectangle::DEFAULT_VIEWBOX, Rectangle::DEFAULT_VIEWBOX, 0, Palette::EMPTY);
		s.custom_palette[0] = Color::rgb(1, 2, 3);
		s.creg[0] = Color::rgb(4, 5, 6);
		assert_eq!(s.one_byte_color(0xC0), Color::rgb(1, 2, 3));
		assert_eq!(s.one_byte_color(0x80), Color::rgb(4, 5, 6));
		assert_eq!(s.one_byte_color(0x00), crate::color::builtin_one_byte_color(0));
	}
}
