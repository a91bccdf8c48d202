//! Error identities returned by the decoder.
//!
//! The reference implementation returns nullable C strings whose *identity*
//! (the pointer value) is the real discriminator; human-readable text is
//! incidental. Here the discriminator is the enum variant itself, with
//! [`thiserror::Error`] supplying the display text.

use thiserror::Error;

/// Everything that can go wrong while decoding an IconVG file.
///
/// Split into [`FileFormatError`] (the input bytes are malformed) and
/// [`RuntimeError`] (the call was misused, or the host ran out of some
/// resource the decoder itself never allocates). Callers that only care
/// about "did decoding succeed" can match on this outer type; callers that
/// want to distinguish "bad file" from "bad caller" can match the inner one.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum DecodeError {
	/// The byte stream itself is malformed.
	#[error(transparent)]
	FileFormat(#[from] FileFormatError),

	/// The call was made incorrectly, or a backend misbehaved.
	#[error(transparent)]
	Runtime(#[from] RuntimeError),
}

/// Errors detected while parsing the IconVG byte stream.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum FileFormatError {
	/// The first four bytes were not `89 49 56 47`.
	#[error("bad magic identifier")]
	BadMagic,

	/// A metadata chunk's header or body could not be parsed, or its id was
	/// not one of the known ids.
	#[error("bad metadata")]
	BadMetadata,

	/// Two metadata chunks appeared with non-increasing ids.
	#[error("bad metadata: chunk ids are not strictly increasing")]
	BadMetadataIdOrder,

	/// The view-box metadata chunk decoded to a non-finite or inverted
	/// rectangle, or left bytes unconsumed.
	#[error("bad metadata: view-box")]
	BadMetadataViewbox,

	/// The suggested-palette metadata chunk's declared length didn't match
	/// its actual payload.
	#[error("bad metadata: suggested palette")]
	BadMetadataSuggestedPalette,

	/// A coordinate number was non-finite where finiteness is required.
	#[error("bad coordinate")]
	BadCoordinate,

	/// A variable-length number could not be parsed (buffer too short).
	#[error("bad number")]
	BadNumber,

	/// A color value was malformed (e.g. an out-of-range one-byte color
	/// index).
	#[error("bad color")]
	BadColor,

	/// An opcode in [0x00, 0xC8) styling mode wasn't recognized.
	#[error("bad styling opcode")]
	BadStylingOpcode,

	/// An opcode in drawing mode wasn't recognized.
	#[error("bad drawing opcode")]
	BadDrawingOpcode,

	/// The byte stream ended in the middle of a path.
	#[error("unfinished path at end of input")]
	BadPathUnfinished,
}

/// Errors that indicate programmer error or backend misbehavior rather than
/// a malformed file.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum RuntimeError {
	/// A required argument was absent (reserved for future API surface that
	/// accepts optional collaborators).
	#[error("null argument")]
	NullArgument,

	/// A constructor was given an argument outside its valid domain.
	#[error("invalid constructor argument")]
	InvalidConstructorArgument,

	/// The interpreter asked for a paint whose type is
	/// [`PaintType::Invalid`](crate::paint::PaintType::Invalid).
	#[error("invalid paint type")]
	InvalidPaintType,

	/// A drawing opcode requested a paint in a build without the requested
	/// paint kind enabled (reserved; this crate compiles in every paint
	/// kind unconditionally).
	#[error("backend not enabled")]
	InvalidBackendNotEnabled,

	/// Reserved for ABI-versioned vtable callers; this crate's [`Canvas`]
	/// trait has no such concept, so this variant is never produced.
	///
	/// [`Canvas`]: crate::sink::Canvas
	#[error("unsupported vtable")]
	UnsupportedVtable,

	/// The host is out of memory. This crate never allocates during
	/// decoding itself, so this can only originate from a [`Canvas`]
	/// implementation.
	#[error("out of memory")]
	SystemFailureOutOfMemory,
}
