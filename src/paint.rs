//! Paint: what a drawing is filled with.
//!
//! The reference implementation overlays a flat color and the two gradient
//! kinds on a single shared byte block, discriminated by a type tag read out
//! of band. Here that's an explicit Rust enum, so every variant owns exactly
//! the fields it needs and there's no union to misinterpret.

use crate::color::Color;
use crate::geom::Matrix2x3;

/// Which kind of paint a [`Paint`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintType {
	/// No paint has been selected yet, or the selected CREG slot held no
	/// usable color. A drawing opcode must reject this paint type.
	Invalid,
	/// A single flat color.
	FlatColor,
	/// A gradient varying along one axis, `x ∈ [0, 1]` in pattern space.
	LinearGradient,
	/// A gradient varying radially from the origin of the unit circle in
	/// pattern space.
	RadialGradient,
}

/// How a gradient behaves outside its defined `[0, 1]` stop range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientSpread {
	/// Values outside `[0, 1]` render as fully transparent.
	None,
	/// Clamp to the nearest endpoint stop.
	Pad,
	/// Mirror back and forth.
	Reflect,
	/// Wrap around.
	Repeat,
}

/// A single color stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
	/// Position along the gradient axis, in `[0, 1]`.
	pub offset: f32,
	/// The stop's premultiplied color.
	pub color: Color,
}

/// The maximum number of stops a gradient may carry.
pub const MAX_GRADIENT_STOPS: usize = 63;

/// A gradient's shared fields: spread behavior, its stops, and the matrix
/// mapping destination space into the gradient's own pattern space.
#[derive(Debug, Clone)]
pub struct Gradient {
	/// Edge behavior outside `[0, 1]`.
	pub spread: GradientSpread,
	/// Color stops, in increasing offset order, `0..=63` of them.
	pub stops: Vec<GradientStop>,
	/// Destination-space-to-pattern-space matrix.
	pub matrix: Matrix2x3,
}

/// What a drawing is filled with.
#[derive(Debug, Clone)]
pub enum Paint {
	/// No usable paint; a drawing opcode selecting this must fail.
	Invalid,
	/// A single flat premultiplied color.
	FlatColor(Color),
	/// A linear gradient.
	LinearGradient(Gradient),
	/// A radial gradient.
	RadialGradient(Gradient),
}

impl Paint {
	/// The paint's [`PaintType`] discriminator.
	#[must_use]
	pub const fn paint_type(&self) -> PaintType {
		match self {
			Self::Invalid => PaintType::Invalid,
			Self::FlatColor(_) => PaintType::FlatColor,
			Self::LinearGradient(_) => PaintType::LinearGradient,
			Self::RadialGradient(_) => PaintType::RadialGradient,
		}
	}

	/// The flat color this paint holds, premultiplied, if it is
	/// [`Paint::FlatColor`]. Registers and palettes store premultiplied
	/// colors, so this is a plain field read.
	#[must_use]
	pub const fn flat_color(&self) -> Option<Color> {
		match self {
			Self::FlatColor(c) => Some(*c),
			_ => None,
		}
	}

	/// The flat color this paint holds, un-premultiplied, if it is
	/// [`Paint::FlatColor`]. See [`Color::to_non_premultiplied`].
	#[must_use]
	pub fn flat_color_non_premul(&self) -> Option<Color> {
		self.flat_color().map(Color::to_non_premultiplied)
	}

	/// The gradient this paint holds, if it is a gradient variant.
	#[must_use]
	pub const fn gradient(&self) -> Option<&Gradient> {
		match self {
			Self::LinearGradient(g) | Self::RadialGradient(g) => Some(g),
			_ => None,
		}
	}

	/// The gradient's destination-to-pattern matrix with a guaranteed
	/// non-zero determinant; see
	/// [`Matrix2x3::with_invertible_second_row`].
	#[must_use]
	pub fn invertible_matrix(&self) -> Option<Matrix2x3> {
		self.gradient().map(|g| g.matrix.with_invertible_second_row())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_paint_has_invalid_type() {
		assert_eq!(Paint::Invalid.paint_type(), PaintType::Invalid);
		assert!(Paint::Invalid.flat_color().is_none());
	}

	#[test]
	fn flat_color_round_trips() {
		let c = Color::rgb(10, 20, 30);
		let p = Paint::FlatColor(c);
		assert_eq!(p.paint_type(), PaintType::FlatColor);
		assert_eq!(p.flat_color(), Some(c));
	}

	#[test]
	fn flat_color_non_premul_unpremultiplies_half_alpha() {
		// Premultiplied (128, 0, 0, 128) un-premultiplies to roughly full-red
		// at half alpha.
		let p = Paint::FlatColor(Color::new(128, 0, 0, 128));
		let non_premul = p.flat_color_non_premul().unwrap();
		assert_eq!(non_premul.a, 128);
		assert_eq!(non_premul.r, 255);

		assert!(Paint::Invalid.flat_color_non_premul().is_none());
	}

	#[test]
	fn gradient_matrix_is_made_invertible() {
		let g = Gradient {
			spread: GradientSpread::Pad,
			stops: vec![],
			matrix: Matrix2x3::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0),
		};
		let p = Paint::LinearGradient(g);
		assert!(p.invertible_matrix().unwrap().determinant() != 0.0);
	}
}
