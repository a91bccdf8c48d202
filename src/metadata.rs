//! The magic-identifier check and metadata chunk pipeline.

use crate::color::{Color, Palette, builtin_one_byte_color};
use crate::cursor::Cursor;
use crate::error::FileFormatError;
use crate::geom::Rectangle;
use crate::number::{decode_coordinate_number, decode_natural_number};

/// The four magic bytes every IconVG file must begin with.
pub const MAGIC_IDENTIFIER: [u8; 4] = [0x89, 0x49, 0x56, 0x47];

/// Metadata chunk id for the view-box.
const METADATA_ID_VIEWBOX: u32 = 0;

/// Metadata chunk id for the suggested palette.
const METADATA_ID_SUGGESTED_PALETTE: u32 = 1;

/// The result of running the metadata pipeline: the effective view-box and
/// the custom palette it collected (the suggested palette, or the built-in
/// default if the file carried none).
#[derive(Debug, Clone, Copy)]
pub struct Metadata {
	/// The file's view-box, or the default if none was present.
	pub viewbox: Rectangle,
	/// The file's suggested palette, or the built-in default.
	pub custom_palette: Palette,
}

/// Reads the four-byte magic identifier.
///
/// # Errors
///
/// Returns [`FileFormatError::BadMagic`] if the next four bytes don't match
/// [`MAGIC_IDENTIFIER`], including if fewer than four bytes remain.
pub fn decode_magic_identifier(c: &mut Cursor<'_>) -> Result<(), FileFormatError> {
	let bytes = c.advance(4).map_err(|_| FileFormatError::BadMagic)?;
	if bytes == MAGIC_IDENTIFIER { Ok(()) } else { Err(FileFormatError::BadMagic) }
}

/// Decodes the view-box metadata chunk body: four coordinate numbers, all
/// finite, each axis's min no greater than its max (`spec.md` §4.3: "require
/// finite and min ≤ max on each axis"), with nothing left over.
///
/// # Errors
///
/// Returns [`FileFormatError::BadMetadataViewbox`] if any coordinate is
/// unparsable or non-finite, either axis is inverted, or the chunk has
/// trailing bytes.
pub fn decode_metadata_viewbox(c: &mut Cursor<'_>) -> Result<Rectangle, FileFormatError> {
	let min_x = decode_coordinate_number(c).map_err(|_| FileFormatError::BadMetadataViewbox)?;
	let min_y = decode_coordinate_number(c).map_err(|_| FileFormatError::BadMetadataViewbox)?;
	let max_x = decode_coordinate_number(c).map_err(|_| FileFormatError::BadMetadataViewbox)?;
	let max_y = decode_coordinate_number(c).map_err(|_| FileFormatError::BadMetadataViewbox)?;
	if !c.is_empty() {
		return Err(FileFormatError::BadMetadataViewbox);
	}
	let r = Rectangle::new(min_x, min_y, max_x, max_y);
	if !min_x.is_finite() || !min_y.is_finite() || !max_x.is_finite() || !max_y.is_finite() {
		return Err(FileFormatError::BadMetadataViewbox);
	}
	if min_x > max_x || min_y > max_y {
		return Err(FileFormatError::BadMetadataViewbox);
	}
	Ok(r)
}

/// Decodes the suggested-palette metadata chunk body into a full 64-entry
/// palette, leaving entries the chunk doesn't cover at
/// [`Color::TRANSPARENT`].
///
/// # Errors
///
/// Returns [`FileFormatError::BadMetadataSuggestedPalette`] if the chunk's
/// first byte can't be read, or its declared `N * bytes_per_elem` doesn't
/// match the number of bytes actually remaining.
pub fn decode_metadata_suggested_palette(c: &mut Cursor<'_>) -> Result<Palette, FileFormatError> {
	let spec = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
	let n = 1usize + usize::from(spec & 0x3F);
	let bpe = 1usize + usize::from(spec >> 6);
	if c.len() != n * bpe {
		return Err(FileFormatError::BadMetadataSuggestedPalette);
	}

	let mut palette = Palette::EMPTY;
	for i in 0..n {
		let color = match bpe {
			1 => {
				let u = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
				if u < 0x80 { builtin_one_byte_color(u) } else { Color::OPAQUE_BLACK }
			}
			2 => {
				let rg = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
				let ba = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
				Color::from_nibbles(rg, ba)
			}
			3 => {
				let r = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
				let g = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
				let b = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
				Color::rgb(r, g, b)
			}
			_ => {
				let r = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
				let g = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
				let b = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
				let a = c.take_u8().map_err(|_| FileFormatError::BadMetadataSuggestedPalette)?;
				Color::new(r, g, b, a)
			}
		};
		palette[i] = color;
	}
	Ok(palette)
}

/// Runs the full metadata chunk loop: magic check, then a natural-number
/// chunk count, then that many `{length, id, payload}` chunks with strictly
/// increasing ids.
///
/// # Errors
///
/// Returns [`FileFormatError::BadMagic`] if the magic identifier doesn't
/// match, [`FileFormatError::BadMetadataIdOrder`] if a chunk's id doesn't
/// exceed the previous chunk's, or the per-chunk errors documented on
/// [`decode_metadata_viewbox`] and [`decode_metadata_suggested_palette`].
/// An unrecognized chunk id fails with [`FileFormatError::BadMetadata`].
pub fn decode_metadata(c: &mut Cursor<'_>) -> Result<Metadata, FileFormatError> {
	decode_magic_identifier(c)?;

	let mut viewbox = Rectangle::DEFAULT_VIEWBOX;
	let mut custom_palette = Palette::default_custom_palette();

	let chunk_count = decode_natural_number(c).map_err(|_| FileFormatError::BadMetadata)?;
	let mut previous_id: Option<u32> = None;

	for _ in 0..chunk_count {
		let chunk_len = decode_natural_number(c).map_err(|_| FileFormatError::BadMetadata)?;
		let mut chunk = c.limit(chunk_len as usize);
		let id = decode_natural_number(&mut chunk).map_err(|_| FileFormatError::BadMetadata)?;

		if previous_id.is_some_and(|prev| id <= prev) {
			return Err(FileFormatError::BadMetadataIdOrder);
		}
		previous_id = Some(id);

		match id {
			METADATA_ID_VIEWBOX => viewbox = decode_metadata_viewbox(&mut chunk)?,
			METADATA_ID_SUGGESTED_PALETTE => custom_palette = decode_metadata_suggested_palette(&mut chunk)?,
			_ => return Err(FileFormatError::BadMetadata),
		}
	}

	Ok(Metadata { viewbox, custom_palette })
}

/// A pure view-box lookup: runs the same chunk loop as [`decode_metadata`]
/// but records only the view-box, falling back to the default if the file
/// carries no view-box chunk. Does not invoke a [`Canvas`](crate::sink::Canvas)
/// and ignores the suggested-palette chunk's contents entirely (though it
/// still validates its framing, since a malformed chunk elsewhere in the
/// file is still a malformed file).
///
/// # Errors
///
/// Same as [`decode_metadata`].
pub fn decode_viewbox_only(data: &[u8]) -> Result<Rectangle, FileFormatError> {
	let mut c = Cursor::new(data);
	Ok(decode_metadata(&mut c)?.viewbox)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn magic_mismatch_fails() {
		let mut c = Cursor::new(&[0x89, 0x49, 0x56]);
		assert_eq!(decode_magic_identifier(&mut c).unwrap_err(), FileFormatError::BadMagic);
	}

	#[test]
	fn empty_file_yields_default_viewbox() {
		let data = [0x89, 0x49, 0x56, 0x47, 0x00];
		let md = decode_metadata(&mut Cursor::new(&data)).unwrap();
		assert_eq!(md.viewbox, Rectangle::DEFAULT_VIEWBOX);
	}

	#[test]
	fn viewbox_chunk_overrides_default() {
		// magic, 1 chunk, length 5, MID 0, four 1-byte coords -16,-16,16,16.
		let data = [0x89, 0x49, 0x56, 0x47, 1 << 1, 5 << 1, 0, 0x60, 0x60, 0xA0, 0xA0];
		let md = decode_metadata(&mut Cursor::new(&data)).unwrap();
		assert_eq!(md.viewbox, Rectangle::new(-16.0, -16.0, 16.0, 16.0));
	}

	#[test]
	fn viewbox_with_equal_min_and_max_is_accepted() {
		// spec.md §4.3 requires min <= max, not min < max: a zero-width
		// viewbox on one axis is a valid (if degenerate) chunk.
		let mut c = Cursor::new(&[0x60, 0x60, 0x60, 0xA0]); // -16,-16,-16,16
		let r = decode_metadata_viewbox(&mut c).unwrap();
		assert_eq!(r, Rectangle::new(-16.0, -16.0, -16.0, 16.0));
	}

	#[test]
	fn reversed_metadata_ids_fail() {
		// chunk 0: MID 1, empty suggested-palette spec byte (n=1, bpe=1, one byte 0).
		// chunk 1: MID 0, would be a viewbox but never parsed because order fails first.
		let data = [
			0x89, 0x49, 0x56, 0x47, // magic
			2 << 1, // 2 chunks
			3 << 1, 1 << 1, 0, 0, // chunk: len=3, MID=1, spec=0, one byte 0
			5 << 1, 0, 0x60, 0x60, 0xA0, 0xA0, // chunk: len=5, MID=0, viewbox payload
		];
		let err = decode_metadata(&mut Cursor::new(&data)).unwrap_err();
		assert_eq!(err, FileFormatError::BadMetadataIdOrder);
	}

	#[test]
	fn unknown_metadata_id_fails() {
		let data = [0x89, 0x49, 0x56, 0x47, 1 << 1, 1 << 1, 2 << 1];
		let err = decode_metadata(&mut Cursor::new(&data)).unwrap_err();
		assert_eq!(err, FileFormatError::BadMetadata);
	}

	#[test]
	fn suggested_palette_4bpe_reads_direct_rgba() {
		// spec byte: n=1 (bits0-5=0), bpe=4 (bits6-7=3) -> 0xC0.
		// chunk payload is MID (1 byte) + spec (1 byte) + 4 color bytes = 6 bytes.
		let data = [0x89, 0x49, 0x56, 0x47, 1 << 1, 6 << 1, 1 << 1, 0xC0, 10, 20, 30, 40];
		let md = decode_metadata(&mut Cursor::new(&data)).unwrap();
		assert_eq!(md.custom_palette[0], Color::new(10, 20, 30, 40));
	}

	#[test]
	fn decode_viewbox_only_matches_full_pipeline() {
		let data = [0x89, 0x49, 0x56, 0x47, 0x00];
		assert_eq!(decode_viewbox_only(&data).unwrap(), Rectangle::DEFAULT_VIEWBOX);
	}
}
