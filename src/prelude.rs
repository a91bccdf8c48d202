//! Prelude for `iconvg`.
//!
//! This module re-exports the types most callers need to decode a file and
//! implement a [`Canvas`] sink, without pulling in the individual submodules.
//!
//! # Examples
//!
//! ```no_run
//! use iconvg::prelude::*;
//!
//! struct NullCanvas;
//! impl Canvas for NullCanvas {}
//!
//! let data: &[u8] = &[];
//! let dst_rect = Rectangle::new(0.0, 0.0, 64.0, 64.0);
//! let _ = decode(data, dst_rect, &DecodeOptions::default(), &mut NullCanvas);
//! ```

#[doc(inline)]
pub use crate::color::{Color, Palette};

#[doc(inline)]
pub use crate::decode::{decode, decode_viewbox};

#[doc(inline)]
pub use crate::error::{DecodeError, FileFormatError, RuntimeError};

#[doc(inline)]
pub use crate::geom::{Matrix2x3, Rectangle};

#[doc(inline)]
pub use crate::options::DecodeOptions;

#[doc(inline)]
pub use crate::paint::{GradientSpread, GradientStop, Paint, PaintType};

#[doc(inline)]
pub use crate::sink::Canvas;
