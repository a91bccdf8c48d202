//! End-to-end scenarios driving the public [`iconvg::decode`] entry point,
//! mirroring the concrete cases enumerated in `spec.md` §8.

use iconvg::prelude::*;

#[derive(Default)]
struct Recording {
	calls: Vec<String>,
}

impl Canvas for Recording {
	fn begin_decode(&mut self, _dst_rect: Rectangle) -> Result<(), DecodeError> {
		self.calls.push("begin_decode".into());
		Ok(())
	}
	fn end_decode(
		&mut self,
		result: Result<(), DecodeError>,
		bytes_consumed: usize,
		bytes_remaining: usize,
	) -> Result<(), DecodeError> {
		self.calls.push(format!("end_decode(ok={}, consumed={bytes_consumed}, remaining={bytes_remaining})", result.is_ok()));
		result
	}
	fn on_metadata_viewbox(&mut self, viewbox: Rectangle) -> Result<(), DecodeError> {
		self.calls.push(format!("on_metadata_viewbox({viewbox:?})"));
		Ok(())
	}
	fn on_metadata_suggested_palette(&mut self, _palette: &Palette) -> Result<(), DecodeError> {
		self.calls.push("on_metadata_suggested_palette".into());
		Ok(())
	}
	fn begin_drawing(&mut self) -> Result<(), DecodeError> {
		self.calls.push("begin_drawing".into());
		Ok(())
	}
	fn end_drawing(&mut self, paint: &Paint) -> Result<(), DecodeError> {
		self.calls.push(format!("end_drawing({:?})", paint.paint_type()));
		Ok(())
	}
	fn begin_path(&mut self, x0: f32, y0: f32) -> Result<(), DecodeError> {
		self.calls.push(format!("begin_path({x0}, {y0})"));
		Ok(())
	}
	fn end_path(&mut self) -> Result<(), DecodeError> {
		self.calls.push("end_path".into());
		Ok(())
	}
	fn path_line_to(&mut self, x1: f32, y1: f32) -> Result<(), DecodeError> {
		self.calls.push(format!("path_line_to({x1}, {y1})"));
		Ok(())
	}
}

fn dst() -> Rectangle {
	Rectangle::new(0.0, 0.0, 64.0, 64.0)
}

/// Scenario 1: the four magic bytes plus a single natural-number zero (no
/// metadata chunks) decodes to the default view-box with no drawings.
#[test_log::test]
fn empty_file_reports_default_viewbox_and_no_drawings() {
	let data = [0x89, 0x49, 0x56, 0x47, 0x00];
	let mut canvas = Recording::default();
	decode(&data, dst(), &DecodeOptions::default(), &mut canvas).unwrap();

	assert_eq!(
		canvas.calls,
		vec![
			"begin_decode".to_string(),
			format!("on_metadata_viewbox({:?})", Rectangle::DEFAULT_VIEWBOX),
			"on_metadata_suggested_palette".to_string(),
			"end_decode(ok=true, consumed=5, remaining=0)".to_string(),
		]
	);
}

/// Scenario 2: a truncated magic fails outright, with no partial parse.
#[test_log::test]
fn truncated_magic_fails_bad_magic() {
	let data = [0x89, 0x49, 0x56];
	let mut canvas = Recording::default();
	let err = decode(&data, dst(), &DecodeOptions::default(), &mut canvas).unwrap_err();
	assert_eq!(err, FileFormatError::BadMagic.into());
}

/// Scenario 3: a single view-box chunk overrides the default view-box.
#[test_log::test]
fn viewbox_chunk_overrides_the_default() {
	// magic, 1 chunk, length 5, MID 0, four 1-byte coords -16,-16,16,16
	// (natural numbers are themselves encoded with the <<1 one-byte tag).
	let data = [0x89, 0x49, 0x56, 0x47, 1 << 1, 5 << 1, 0, 0x60, 0x60, 0xA0, 0xA0];

	let mut canvas = Recording::default();
	decode(&data, dst(), &DecodeOptions::default(), &mut canvas).unwrap();
	assert_eq!(canvas.calls[1], format!("on_metadata_viewbox({:?})", Rectangle::new(-16.0, -16.0, 16.0, 16.0)));
}

/// Scenario 4: metadata IDs must strictly increase; a second chunk whose ID
/// goes backwards is rejected.
#[test_log::test]
fn reversed_metadata_ids_are_rejected() {
	let data = [
		0x89, 0x49, 0x56, 0x47, // magic
		2 << 1, // 2 chunks
		3 << 1, 1 << 1, 0, 0, // chunk: len=3, MID=1, spec=0, one byte 0
		5 << 1, 0, 0x60, 0x60, 0xA0, 0xA0, // chunk: len=5, MID=0 — out of order, never parsed
	];

	let mut canvas = Recording::default();
	let err = decode(&data, dst(), &DecodeOptions::default(), &mut canvas).unwrap_err();
	match err {
		DecodeError::FileFormat(FileFormatError::BadMetadataIdOrder) => {}
		other => panic!("expected BadMetadataIdOrder, got {other:?}"),
	}
}

/// Scenario 5: a minimal drawing - one flat-colored line - produces the
/// exact sink-call trace `spec.md` prescribes.
#[test_log::test]
fn minimal_drawing_matches_the_prescribed_trace() {
	let mut data = vec![0x89, 0x49, 0x56, 0x47, 0x00]; // magic, zero metadata chunks
	data.push(0x00); // CSEL <- 0
	data.push(0x98); // CREG[0] <- 4-byte RGBA color
	data.extend_from_slice(&[0xFF, 0x00, 0x00, 0xFF]); // opaque red
	data.push(0xC0); // enter drawing mode, paint <- CREG[0]
	data.push(64 << 1); // curr_x = 0
	data.push(64 << 1); // curr_y = 0
	data.push(0x00); // one absolute line-to
	data.push((64 + 10) << 1); // x = 10
	data.push(64 << 1); // y = 0
	data.push(0xE1); // close path, end drawing

	let mut canvas = Recording::default();
	decode(&data, dst(), &DecodeOptions::default(), &mut canvas).unwrap();
	assert_eq!(
		canvas.calls,
		vec![
			"begin_decode".to_string(),
			format!("on_metadata_viewbox({:?})", Rectangle::DEFAULT_VIEWBOX),
			"on_metadata_suggested_palette".to_string(),
			"begin_drawing".to_string(),
			"begin_path(0, 0)".to_string(),
			"path_line_to(10, 0)".to_string(),
			"end_path".to_string(),
			format!("end_drawing({:?})", PaintType::FlatColor),
			format!("end_decode(ok=true, consumed={}, remaining=0)", data.len()),
		]
	);
}

/// Scenario 6: the same bytecode as scenario 5, but the closing opcode is
/// replaced by an opcode that isn't valid in drawing mode.
#[test_log::test]
fn bad_drawing_opcode_is_reported_through_end_decode() {
	let mut data = vec![0x89, 0x49, 0x56, 0x47, 0x00];
	data.push(0x00);
	data.push(0x98);
	data.extend_from_slice(&[0xFF, 0x00, 0x00, 0xFF]);
	data.push(0xC0);
	data.push(64 << 1);
	data.push(64 << 1);
	data.push(0x00);
	data.push((64 + 10) << 1);
	data.push(64 << 1);
	data.push(0xE0); // not a valid drawing opcode

	let mut canvas = Recording::default();
	let err = decode(&data, dst(), &DecodeOptions::default(), &mut canvas).unwrap_err();
	match err {
		DecodeError::FileFormat(FileFormatError::BadDrawingOpcode) => {}
		other => panic!("expected BadDrawingOpcode, got {other:?}"),
	}
	assert!(canvas.calls.last().unwrap().starts_with("end_decode(ok=false"));
}

/// Decoding the same buffer twice with identical options produces identical
/// sink-call traces (`spec.md` §8, universal properties).
#[test_log::test]
fn decoding_twice_is_deterministic() {
	let mut data = vec![0x89, 0x49, 0x56, 0x47, 0x00];
	data.push(0x00);
	data.push(0x98);
	data.extend_from_slice(&[0xFF, 0x00, 0x00, 0xFF]);
	data.push(0xC0);
	data.push(64 << 1);
	data.push(64 << 1);
	data.push(0x00);
	data.push((64 + 10) << 1);
	data.push(64 << 1);
	data.push(0xE1);

	let mut first = Recording::default();
	decode(&data, dst(), &DecodeOptions::default(), &mut first).unwrap();
	let mut second = Recording::default();
	decode(&data, dst(), &DecodeOptions::default(), &mut second).unwrap();
	assert_eq!(first.calls, second.calls);
}

/// `decode_viewbox` agrees with the view-box `decode` reports for the same
/// file.
#[test_log::test]
fn decode_viewbox_agrees_with_full_decode() {
	let data = [0x89, 0x49, 0x56, 0x47, 0x00];
	let mut canvas = Recording::default();
	decode(&data, dst(), &DecodeOptions::default(), &mut canvas).unwrap();
	assert_eq!(decode_viewbox(&data).unwrap(), Rectangle::DEFAULT_VIEWBOX);
}
