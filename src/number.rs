//! Variable-length number parsers.
//!
//! IconVG packs four distinct number kinds — natural, coordinate, real and
//! zero-to-one — behind a shared 1/2/4-byte tag scheme. The tag lives in the
//! low two bits of the first byte: `0` selects a 1-byte payload, `1` selects
//! 2 bytes, and `3` selects 4 bytes (`2` is unused). What differs between the
//! four kinds is only how the raw payload bits are turned into a value; see
//! [`Cursor`] for the shared byte-consuming plumbing.

use crate::cursor::Cursor;
use crate::error::FileFormatError;

/// Reads the raw payload bits (not yet reinterpreted) and how many bytes
/// they occupied.
fn take_tagged_payload(c: &mut Cursor<'_>) -> Result<u32, FileFormatError> {
	let tag = c.peek_u8().ok_or(FileFormatError::BadNumber)? & 0x03;
	match tag {
		0 | 2 => {
			let b = c.take_u8()?;
			Ok(u32::from(b >> 1))
		}
		1 => {
			let v = c.peek_u16_le().ok_or(FileFormatError::BadNumber)?;
			c.advance(2)?;
			Ok(u32::from(v >> 2))
		}
		3 => {
			let v = c.peek_u32_le().ok_or(FileFormatError::BadNumber)?;
			c.advance(4)?;
			Ok(v & 0xFFFF_FFFC)
		}
		_ => unreachable!("masked with 0x03"),
	}
}

/// The width, in bytes, of the tagged encoding the next byte declares.
fn tag_width(first: u8) -> usize {
	match first & 0x03 {
		0 | 2 => 1,
		1 => 2,
		_ => 4,
	}
}

/// Decodes an unsigned "natural number": a plain magnitude with no offset
/// or scale.
///
/// # Errors
///
/// Returns [`FileFormatError::BadNumber`] if the buffer is too short for
/// the width its first byte declares.
pub fn decode_natural_number(c: &mut Cursor<'_>) -> Result<u32, FileFormatError> {
	let first = c.peek_u8().ok_or(FileFormatError::BadNumber)?;
	let width = tag_width(first);
	let payload = take_tagged_payload(c)?;
	Ok(match width {
		1 => payload,
		2 => payload,
		_ => payload >> 2,
	})
}

/// Decodes a "coordinate number": a signed offset scaled so the smallest
/// encoding covers roughly `[-64, 64)`.
///
/// # Errors
///
/// Returns [`FileFormatError::BadNumber`] if the buffer is too short for
/// the width its first byte declares.
pub fn decode_coordinate_number(c: &mut Cursor<'_>) -> Result<f32, FileFormatError> {
	let first = c.peek_u8().ok_or(FileFormatError::BadNumber)?;
	let width = tag_width(first);
	let payload = take_tagged_payload(c)?;
	Ok(match width {
		1 => (payload as f32) - 64.0,
		2 => ((payload as f32) - 128.0 * 64.0) / 64.0,
		_ => f32::from_bits(payload),
	})
}

/// Decodes a "real number": an unscaled signed-ish float (the 1- and 2-byte
/// forms carry their payload straight into the float with no offset).
///
/// # Errors
///
/// Returns [`FileFormatError::BadNumber`] if the buffer is too short for
/// the width its first byte declares.
pub fn decode_real_number(c: &mut Cursor<'_>) -> Result<f32, FileFormatError> {
	let first = c.peek_u8().ok_or(FileFormatError::BadNumber)?;
	let width = tag_width(first);
	let payload = take_tagged_payload(c)?;
	Ok(match width {
		1 => payload as f32,
		2 => payload as f32,
		_ => f32::from_bits(payload),
	})
}

/// Decodes a "zero-to-one number": a fraction in `[0, 1]`.
///
/// # Errors
///
/// Returns [`FileFormatError::BadNumber`] if the buffer is too short for
/// the width its first byte declares.
pub fn decode_zero_to_one_number(c: &mut Cursor<'_>) -> Result<f32, FileFormatError> {
	let first = c.peek_u8().ok_or(FileFormatError::BadNumber)?;
	let width = tag_width(first);
	let payload = take_tagged_payload(c)?;
	Ok(match width {
		1 => (payload as f32) / 120.0,
		2 => (payload as f32) / 15120.0,
		_ => f32::from_bits(payload),
	})
}
