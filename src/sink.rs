//! The rendering collaborator the interpreter drives.
//!
//! The reference implementation expresses this as a hand-rolled virtual
//! function table (`iconvg_canvas_vtable`) carrying an opaque context
//! pointer and a `sizeof` field used to detect ABI mismatches across
//! dynamically-loaded backends. None of that applies to a Rust trait
//! object, so [`Canvas`] is an ordinary trait with the same eleven
//! operations and no version negotiation.
//!
//! Every method defaults to doing nothing and returning success, so an
//! implementation only needs to override the calls it cares about — a
//! palette-collecting sink, for instance, needs only
//! [`Canvas::on_metadata_suggested_palette`].

use crate::color::Palette;
use crate::error::DecodeError;
use crate::geom::Rectangle;
use crate::paint::Paint;

/// The sequence of calls the interpreter makes into a [`Canvas`] while
/// decoding one file:
///
/// ```text
/// begin_decode
///   on_metadata_viewbox
///   on_metadata_suggested_palette
///   (begin_drawing
///      begin_path
///        (path_line_to | path_quad_to | path_cube_to)*
///      end_path
///    end_drawing)*
/// end_decode
/// ```
///
/// Returning `Err` from any method aborts decoding immediately; the
/// interpreter still calls [`Canvas::end_decode`] exactly once, passing that
/// error through.
pub trait Canvas {
	/// Called once, before any parsing, with the destination rectangle the
	/// caller passed to [`decode`](crate::decode::decode).
	fn begin_decode(&mut self, _dst_rect: Rectangle) -> Result<(), DecodeError> {
		Ok(())
	}

	/// Called exactly once, regardless of whether decoding succeeded, with
	/// the final result and how much of the input was consumed.
	///
	/// The default implementation passes `result` straight through: this is
	/// the method whose return value becomes [`decode`](crate::decode::decode)'s
	/// own return value.
	fn end_decode(
		&mut self,
		result: Result<(), DecodeError>,
		_bytes_consumed: usize,
		_bytes_remaining: usize,
	) -> Result<(), DecodeError> {
		result
	}

	/// Called once per view-box metadata, whether the file supplied one or
	/// the default was used.
	fn on_metadata_viewbox(&mut self, _viewbox: Rectangle) -> Result<(), DecodeError> {
		Ok(())
	}

	/// Called once per decode, with the effective custom palette (the
	/// file's suggested palette, the built-in default, or the caller's
	/// override, in that order of precedence).
	fn on_metadata_suggested_palette(&mut self, _palette: &Palette) -> Result<(), DecodeError> {
		Ok(())
	}

	/// Begins a drawing. The drawing's chosen paint is available from
	/// [`Canvas::end_drawing`], not here, so that an implementation needing
	/// the paint up front should read ahead via its own buffering if it
	/// needs to.
	fn begin_drawing(&mut self) -> Result<(), DecodeError> {
		Ok(())
	}

	/// Ends the drawing opened by the matching [`Canvas::begin_drawing`],
	/// with the paint selected for it.
	fn end_drawing(&mut self, _paint: &Paint) -> Result<(), DecodeError> {
		Ok(())
	}

	/// Begins a path at `(x0, y0)`, in destination space.
	fn begin_path(&mut self, _x0: f32, _y0: f32) -> Result<(), DecodeError> {
		Ok(())
	}

	/// Ends the path opened by the matching [`Canvas::begin_path`].
	fn end_path(&mut self) -> Result<(), DecodeError> {
		Ok(())
	}

	/// A straight line segment to `(x1, y1)`, in destination space.
	fn path_line_to(&mut self, _x1: f32, _y1: f32) -> Result<(), DecodeError> {
		Ok(())
	}

	/// A quadratic Bézier segment, control point then endpoint, in
	/// destination space.
	fn path_quad_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32) -> Result<(), DecodeError> {
		Ok(())
	}

	/// A cubic Bézier segment, two control points then endpoint, in
	/// destination space.
	fn path_cube_to(
		&mut self,
		_x1: f32,
		_y1: f32,
		_x2: f32,
		_y2: f32,
		_x3: f32,
		_y3: f32,
	) -> Result<(), DecodeError> {
		Ok(())
	}
}

/// A [`Canvas`] that accepts every call and does nothing.
///
/// Useful as a destination for [`decode`](crate::decode::decode) calls made
/// purely to validate a file, and as the active canvas for drawings
/// suppressed by level-of-detail gating.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCanvas;

impl Canvas for NullCanvas {}

/// A [`Canvas`] that rejects every call with
/// [`RuntimeError::InvalidBackendNotEnabled`](crate::error::RuntimeError::InvalidBackendNotEnabled).
///
/// Mirrors the reference implementation's "broken canvas", substituted
/// whenever a caller passes a null vtable; in this crate it's useful as an
/// explicit placeholder while wiring up a real backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrokenCanvas;

impl Canvas for BrokenCanvas {
	fn begin_decode(&mut self, _dst_rect: Rectangle) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}

	fn end_decode(
		&mut self,
		_result: Result<(), DecodeError>,
		_bytes_consumed: usize,
		_bytes_remaining: usize,
	) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}

	fn on_metadata_viewbox(&mut self, _viewbox: Rectangle) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}

	fn on_metadata_suggested_palette(&mut self, _palette: &Palette) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}

	fn begin_drawing(&mut self) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}

	fn end_drawing(&mut self, _paint: &Paint) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}

	fn begin_path(&mut self, _x0: f32, _y0: f32) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}

	fn end_path(&mut self) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}

	fn path_line_to(&mut self, _x1: f32, _y1: f32) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}

	fn path_quad_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}

	fn path_cube_to(
		&mut self,
		_x1: f32,
		_y1: f32,
		_x2: f32,
		_y2: f32,
		_x3: f32,
		_y3: f32,
	) -> Result<(), DecodeError> {
		Err(crate::error::RuntimeError::InvalidBackendNotEnabled.into())
	}
}

/// Wraps another [`Canvas`], logging every call at `trace` level before
/// forwarding it.
#[derive(Debug)]
pub struct LoggingCanvas<C> {
	inner: C,
}

impl<C> LoggingCanvas<C> {
	/// Wraps `inner` so every call is logged before being forwarded.
	pub const fn new(inner: C) -> Self {
		Self { inner }
	}

	/// Unwraps the inner canvas.
	pub fn into_inner(self) -> C {
		self.inner
	}
}

impl<C: Canvas> Canvas for LoggingCanvas<C> {
	fn begin_decode(&mut self, dst_rect: Rectangle) -> Result<(), DecodeError> {
		log::trace!("begin_decode({dst_rect:?})");
		self.inner.begin_decode(dst_rect)
	}

	fn end_decode(
		&mut self,
		result: Result<(), DecodeError>,
		bytes_consumed: usize,
		bytes_remaining: usize,
	) -> Result<(), DecodeError> {
		log::trace!("end_decode({result:?}, consumed={bytes_consumed}, remaining={bytes_remaining})");
		self.inner.end_decode(result, bytes_consumed, bytes_remaining)
	}

	fn on_metadata_viewbox(&mut self, viewbox: Rectangle) -> Result<(), DecodeError> {
		log::trace!("on_metadata_viewbox({viewbox:?})");
		self.inner.on_metadata_viewbox(viewbox)
	}

	fn on_metadata_suggested_palette(&mut self, palette: &Palette) -> Result<(), DecodeError> {
		log::trace!("on_metadata_suggested_palette(..)");
		self.inner.on_metadata_suggested_palette(palette)
	}

	fn begin_drawing(&mut self) -> Result<(), DecodeError> {
		log::trace!("begin_drawing()");
		self.inner.begin_drawing()
	}

	fn end_drawing(&mut self, paint: &Paint) -> Result<(), DecodeError> {
		log::trace!("end_drawing({:?})", paint.paint_type());
		self.inner.end_drawing(paint)
	}

	fn begin_path(&mut self, x0: f32, y0: f32) -> Result<(), DecodeError> {
		log::trace!("begin_path({x0}, {y0})");
		self.inner.begin_path(x0, y0)
	}

	fn end_path(&mut self) -> Result<(), DecodeError> {
		log::trace!("end_path()");
		self.inner.end_path()
	}

	fn path_line_to(&mut self, x1: f32, y1: f32) -> Result<(), DecodeError> {
		log::trace!("path_line_to({x1}, {y1})");
		self.inner.path_line_to(x1, y1)
	}

	fn path_quad_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<(), DecodeError> {
		log::trace!("path_quad_to({x1}, {y1}, {x2}, {y2})");
		self.inner.path_quad_to(x1, y1, x2, y2)
	}

	fn path_cube_to(
		&mut self,
		x1: f32,
		y1: f32,
		x2: f32,
		y2: f32,
		x3: f32,
		y3: f32,
	) -> Result<(), DecodeError> {
		log::trace!("path_cube_to({x1}, {y1}, {x2}, {y2}, {x3}, {y3})");
		self.inner.path_cube_to(x1, y1, x2, y2, x3, y3)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Default)]
	struct RecordingCanvas {
		calls: Vec<String>,
	}

	impl Canvas for RecordingCanvas {
		fn begin_drawing(&mut self) -> Result<(), DecodeError> {
			self.calls.push("begin_drawing".into());
			Ok(())
		}

		fn end_drawing(&mut self, _paint: &Paint) -> Result<(), DecodeError> {
			self.calls.push("end_drawing".into());
			Ok(())
		}

		fn path_line_to(&mut self, _x1: f32, _y1: f32) -> Result<(), DecodeError> {
			self.calls.push("path_line_to".into());
			Ok(())
		}
	}

	#[test]
	fn null_canvas_accepts_everything() {
		let mut c = NullCanvas;
		assert!(c.begin_decode(Rectangle::EMPTY).is_ok());
		assert!(c.path_line_to(1.0, 2.0).is_ok());
	}

	#[test]
	fn broken_canvas_rejects_every_call() {
		let mut c = BrokenCanvas;
		assert!(c.begin_decode(Rectangle::EMPTY).is_err());
		assert!(c.end_decode(Ok(()), 0, 0).is_err());
		assert!(c.on_metadata_viewbox(Rectangle::EMPTY).is_err());
		assert!(c.on_metadata_suggested_palette(&Palette::EMPTY).is_err());
		assert!(c.begin_drawing().is_err());
		assert!(c.end_drawing(&Paint::Invalid).is_err());
		assert!(c.begin_path(0.0, 0.0).is_err());
		assert!(c.end_path().is_err());
		assert!(c.path_line_to(0.0, 0.0).is_err());
		assert!(c.path_quad_to(0.0, 0.0, 0.0, 0.0).is_err());
		assert!(c.path_cube_to(0.0, 0.0, 0.0, 0.0, 0.0, 0.0).is_err());
	}

	#[test]
	fn logging_canvas_forwards_to_inner() {
		let mut c = LoggingCanvas::new(RecordingCanvas::default());
		c.begin_drawing().unwrap();
		c.path_line_to(1.0, 1.0).unwrap();
		c.end_drawing(&Paint::Invalid).unwrap();
		assert_eq!(c.into_inner().calls, vec!["begin_drawing", "path_line_to", "end_drawing"]);
	}
}
