//! The public decode entry points.
//!
//! [`decode`] is the crate's top-level function: it runs the metadata
//! pipeline, seeds the VM state, and drives the bytecode interpreter,
//! reporting every step to a caller-supplied [`Canvas`]. [`decode_viewbox`]
//! is the lighter-weight "just tell me the view-box" convenience entry
//! point `spec.md` §4.3 calls out, mirroring the reference's
//! `iconvg_decode` / `iconvg_decode_viewbox` pair one-to-one
//! (`SPEC_FULL.md` §6).

use crate::cursor::Cursor;
use crate::error::DecodeError;
use crate::geom::Rectangle;
use crate::interpreter;
use crate::metadata::decode_metadata;
use crate::options::DecodeOptions;
use crate::sink::Canvas;
use crate::state::State;

/// Decodes an IconVG file from `data`, rendering it into `dst_rect` by
/// driving `canvas`.
///
/// The call sequence into `canvas` follows `spec.md` §5/§6 exactly:
/// `begin_decode(dst_rect)`, the two metadata callbacks, zero or more
/// drawings, then `end_decode` exactly once with the final result and how
/// much of `data` was consumed. `end_decode`'s return value becomes this
/// function's return value, so a `Canvas` can recover from (or re-wrap) a
/// parse error if it wants to.
///
/// # Errors
///
/// Returns whatever [`Canvas::end_decode`] returns for the error it was
/// called with on failure — ordinarily the originating [`DecodeError`],
/// unchanged. See `spec.md` §7 for the full error taxonomy.
pub fn decode(
	data: &[u8],
	dst_rect: Rectangle,
	options: &DecodeOptions,
	canvas: &mut dyn Canvas,
) -> Result<(), DecodeError> {
	canvas.begin_decode(dst_rect)?;

	let total_len = data.len();
	let mut c = Cursor::new(data);

	let result = run_metadata_and_bytecode(&mut c, dst_rect, options, canvas);
	let bytes_remaining = c.len();
	let bytes_consumed = total_len - bytes_remaining;
	canvas.end_decode(result, bytes_consumed, bytes_remaining)
}

fn run_metadata_and_bytecode(
	c: &mut Cursor<'_>,
	dst_rect: Rectangle,
	options: &DecodeOptions,
	canvas: &mut dyn Canvas,
) -> Result<(), DecodeError> {
	log::trace!("decoding metadata");
	let metadata = decode_metadata(c)?;

	canvas.on_metadata_viewbox(metadata.viewbox)?;
	let mut custom_palette = metadata.custom_palette;
	// on_metadata_suggested_palette reports the effective palette, which
	// precedes any caller override per SPEC_FULL.md §4.5.4 step 4 — the
	// file's own suggested palette is what gets reported, even though CREG
	// ends up seeded from the override.
	canvas.on_metadata_suggested_palette(&custom_palette)?;

	if let Some(override_palette) = options.palette {
		custom_palette = override_palette;
	}

	let height_in_pixels = options.resolve_height_in_pixels(dst_rect.height());
	let mut state = State::new(metadata.viewbox, dst_rect, height_in_pixels, custom_palette);

	log::trace!("running bytecode interpreter, height_in_pixels={height_in_pixels}");
	interpreter::run(c, &mut state, canvas)
}

/// A pure view-box lookup, with no [`Canvas`] involved: runs the metadata
/// chunk loop and returns the effective view-box (the file's chunk, or the
/// default if it has none).
///
/// # Errors
///
/// Returns a [`DecodeError`] for any malformed metadata, per
/// [`crate::metadata::decode_metadata`] — the bytecode section (if any) is
/// never parsed, since the view-box is fully determined by metadata alone.
pub fn decode_viewbox(data: &[u8]) -> Result<Rectangle, DecodeError> {
	Ok(crate::metadata::decode_viewbox_only(data)?)
}
