//! A decoder for IconVG, a compact, binary format for simple vector icons.
//!
//! IconVG files describe paths made of lines, quadratic and cubic Beziers and
//! elliptical arcs, filled with flat colors or linear/radial gradients, driven
//! by a small register-based bytecode. This crate parses that bytecode and
//! drives the result into a caller-supplied [`Canvas`](sink::Canvas)
//! implementation — it does not rasterize anything itself.
//!
//! # Examples
//!
//! ```rust
//! use iconvg::decode_viewbox;
//!
//! // The smallest possible (and technically invalid, for brevity) input:
//! // just the magic identifier with no metadata and no bytecode.
//! let data = [0x89, 0x49, 0x56, 0x47];
//! let err = decode_viewbox(&data).unwrap_err();
//! assert!(err.to_string().contains("metadata"));
//! ```

pub mod arc;
pub mod color;
pub mod cursor;
pub mod decode;
pub mod error;
pub mod geom;
pub mod interpreter;
pub mod metadata;
pub mod number;
pub mod options;
pub mod paint;
pub mod prelude;
pub mod sink;
pub mod state;

pub use color::{Color, Palette};
pub use decode::{decode, decode_viewbox};
pub use error::{DecodeError, FileFormatError, RuntimeError};
pub use geom::{Matrix2x3, Rectangle};
pub use options::DecodeOptions;
pub use paint::{GradientSpread, Paint, PaintType};
pub use sink::Canvas;
