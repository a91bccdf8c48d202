//! The bytecode interpreter: the two-mode (styling, drawing) state machine
//! that walks the IconVG bytecode section and drives a [`Canvas`].
//!
//! This is the core of the crate (`spec.md` §2 item 5, "~50%" of the
//! implementation budget). [`run`] owns the whole interpreter loop;
//! everything else in this module is either opcode-table data or a small
//! per-opcode helper.

use crate::arc::path_arc_to;
use crate::color::Color;
use crate::cursor::Cursor;
use crate::error::{DecodeError, FileFormatError, RuntimeError};
use crate::number::{decode_coordinate_number, decode_natural_number, decode_real_number, decode_zero_to_one_number};
use crate::paint::Paint;
use crate::sink::{Canvas, NullCanvas};
use crate::state::State;

/// Scratch carried across drawing-mode opcodes: the current point and the
/// previous segment's trailing control points, used by the smooth-curve
/// reflection rule. All in source (viewbox) space.
#[derive(Debug, Clone, Copy, Default)]
struct PathScratch {
	curr_x: f32,
	curr_y: f32,
	x1: f32,
	y1: f32,
	x2: f32,
	y2: f32,
}

/// Runs the bytecode interpreter to completion (a clean end of input in
/// styling mode) or to its first error, driving `canvas`.
///
/// `state` must already have its transform, `CREG`/`NREG`, and
/// `height_in_pixels` initialized (see [`crate::decode::decode`]).
///
/// # Errors
///
/// Returns the first [`FileFormatError`] or [`RuntimeError`] encountered,
/// wrapped in [`DecodeError`]; this includes any error a `canvas` callback
/// returns, which aborts the interpreter immediately.
pub fn run(c: &mut Cursor<'_>, state: &mut State, canvas: &mut dyn Canvas) -> Result<(), DecodeError> {
	loop {
		let Ok(opcode) = c.take_u8() else {
			return Ok(());
		};
		run_styling_opcode(c, state, canvas, opcode)?;
	}
}

fn run_styling_opcode(
	c: &mut Cursor<'_>,
	state: &mut State,
	canvas: &mut dyn Canvas,
	opcode: u8,
) -> Result<(), DecodeError> {
	match opcode {
		0x00..=0x3F => {
			state.csel = opcode & 0x3F;
			Ok(())
		}
		0x40..=0x7F => {
			state.nsel = opcode & 0x3F;
			Ok(())
		}
		0x80..=0x87 => {
			let u = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let color = state.one_byte_color(u);
			let idx = state.creg_index(opcode);
			state.creg[idx] = color;
			state.maybe_advance_csel(opcode);
			Ok(())
		}
		0x88..=0x8F => {
			let rg = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let ba = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let idx = state.creg_index(opcode);
			state.creg[idx] = Color::from_nibbles(rg, ba);
			state.maybe_advance_csel(opcode);
			Ok(())
		}
		0x90..=0x97 => {
			let r = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let g = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let b = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let idx = state.creg_index(opcode);
			state.creg[idx] = Color::rgb(r, g, b);
			state.maybe_advance_csel(opcode);
			Ok(())
		}
		0x98..=0x9F => {
			let r = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let g = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let b = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let a = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let idx = state.creg_index(opcode);
			state.creg[idx] = Color::new(r, g, b, a);
			state.maybe_advance_csel(opcode);
			Ok(())
		}
		0xA0..=0xA7 => {
			let blend = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let p_index = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let q_index = c.take_u8().map_err(|_| FileFormatError::BadColor)?;
			let p = state.one_byte_color(p_index);
			let q = state.one_byte_color(q_index);
			let idx = state.creg_index(opcode);
			state.creg[idx] = blend_colors(p, q, blend);
			state.maybe_advance_csel(opcode);
			Ok(())
		}
		0xA8..=0xAF => {
			let v = decode_real_number(c).map_err(|_| FileFormatError::BadNumber)?;
			let idx = state.nreg_index(opcode);
			state.nreg[idx] = v;
			state.maybe_advance_nsel(opcode);
			Ok(())
		}
		0xB0..=0xB7 => {
			let v = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
			let idx = state.nreg_index(opcode);
			state.nreg[idx] = v;
			state.maybe_advance_nsel(opcode);
			Ok(())
		}
		0xB8..=0xBF => {
			let v = decode_zero_to_one_number(c).map_err(|_| FileFormatError::BadNumber)?;
			let idx = state.nreg_index(opcode);
			state.nreg[idx] = v;
			state.maybe_advance_nsel(opcode);
			Ok(())
		}
		0xC0..=0xC6 => {
			let idx = state.creg_index(opcode);
			let color = state.creg[idx];
			// A CREG slot that was never set (or was explicitly set to fully
			// transparent black) carries no usable paint: a premultiplied
			// fully-transparent color is indistinguishable from "unset", so
			// it's rejected rather than silently drawing nothing.
			if color == Color::TRANSPARENT {
				return Err(RuntimeError::InvalidPaintType.into());
			}
			state.paint = Paint::FlatColor(color);
			let x = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
			let y = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;

			// A drawing whose height falls outside the current level-of-detail
			// gate is parsed in full (so the cursor stays in sync) but its
			// calls are routed to a no-op sink instead of the caller's.
			let mut suppressed = NullCanvas;
			let active: &mut dyn Canvas =
				if state.lod.contains(state.height_in_pixels) { canvas } else { &mut suppressed };

			active.begin_drawing()?;
			let (dx, dy) = state.transform.source_to_dest(x, y);
			active.begin_path(dx, dy)?;

			let mut scratch = PathScratch { curr_x: x, curr_y: y, x1: x, y1: y, x2: 0.0, y2: 0.0 };
			run_drawing_mode_inner(c, state, active, &mut scratch)
		}
		0xC7 => {
			let lo = decode_real_number(c).map_err(|_| FileFormatError::BadNumber)?;
			let hi = decode_real_number(c).map_err(|_| FileFormatError::BadNumber)?;
			state.lod.lo = f64::from(lo);
			state.lod.hi = f64::from(hi);
			Ok(())
		}
		_ => Err(FileFormatError::BadStylingOpcode.into()),
	}
}

/// Runs drawing mode from just after a `begin_path`, returning to the
/// caller (styling mode) once a closing opcode (`z`-family) hands control
/// back.
fn run_drawing_mode_inner(
	c: &mut Cursor<'_>,
	state: &mut State,
	canvas: &mut dyn Canvas,
	scratch: &mut PathScratch,
) -> Result<(), DecodeError> {
	loop {
		let opcode = c.take_u8().map_err(|_| FileFormatError::BadPathUnfinished)?;
		let upper = opcode >> 4;
		match upper {
			0x0 | 0x1 => {
				for _ in 0..=(opcode & 0x1F) {
					let x = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.curr_x = x;
					scratch.curr_y = y;
					emit_line(state, canvas, scratch)?;
				}
			}
			0x2 | 0x3 => {
				for _ in 0..=(opcode & 0x1F) {
					let dx = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.curr_x += dx;
					scratch.curr_y += dy;
					emit_line(state, canvas, scratch)?;
				}
			}
			0x4 => {
				for _ in 0..=(opcode & 0x0F) {
					let x2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					emit_quad(state, canvas, scratch, x2, y2)?;
				}
			}
			0x5 => {
				for _ in 0..=(opcode & 0x0F) {
					let dx2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let (x2, y2) = (scratch.curr_x + dx2, scratch.curr_y + dy2);
					emit_quad(state, canvas, scratch, x2, y2)?;
				}
			}
			0x6 => {
				for _ in 0..=(opcode & 0x0F) {
					let x1 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y1 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let x2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.x1 = x1;
					scratch.y1 = y1;
					emit_quad(state, canvas, scratch, x2, y2)?;
				}
			}
			0x7 => {
				for _ in 0..=(opcode & 0x0F) {
					let dx1 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy1 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dx2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.x1 = scratch.curr_x + dx1;
					scratch.y1 = scratch.curr_y + dy1;
					let (x2, y2) = (scratch.curr_x + dx2, scratch.curr_y + dy2);
					emit_quad(state, canvas, scratch, x2, y2)?;
				}
			}
			0x8 => {
				for _ in 0..=(opcode & 0x0F) {
					let x2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let x3 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y3 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					emit_cube(state, canvas, scratch, x2, y2, x3, y3)?;
				}
			}
			0x9 => {
				for _ in 0..=(opcode & 0x0F) {
					let dx2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dx3 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy3 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let (x2, y2) = (scratch.curr_x + dx2, scratch.curr_y + dy2);
					let (x3, y3) = (scratch.curr_x + dx3, scratch.curr_y + dy3);
					emit_cube(state, canvas, scratch, x2, y2, x3, y3)?;
				}
			}
			0xA => {
				for _ in 0..=(opcode & 0x0F) {
					let x1 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y1 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let x2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let x3 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y3 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.x1 = x1;
					scratch.y1 = y1;
					emit_cube(state, canvas, scratch, x2, y2, x3, y3)?;
				}
			}
			0xB => {
				for _ in 0..=(opcode & 0x0F) {
					let dx1 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy1 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dx2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy2 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dx3 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy3 = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.x1 = scratch.curr_x + dx1;
					scratch.y1 = scratch.curr_y + dy1;
					let (x2, y2) = (scratch.curr_x + dx2, scratch.curr_y + dy2);
					let (x3, y3) = (scratch.curr_x + dx3, scratch.curr_y + dy3);
					emit_cube(state, canvas, scratch, x2, y2, x3, y3)?;
				}
			}
			0xC => {
				for _ in 0..=(opcode & 0x0F) {
					let (x0, y0) = (scratch.curr_x, scratch.curr_y);
					let rx = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let ry = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let rot = decode_zero_to_one_number(c).map_err(|_| FileFormatError::BadNumber)?;
					let flags = decode_natural_number(c).map_err(|_| FileFormatError::BadNumber)?;
					let x = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.curr_x = x;
					scratch.curr_y = y;
					path_arc_to(
						canvas,
						&state.transform,
						x0,
						y0,
						rx,
						ry,
						rot,
						flags & 0x01 != 0,
						flags & 0x02 != 0,
						x,
						y,
					)?;
					scratch.x1 = x;
					scratch.y1 = y;
				}
			}
			0xD => {
				for _ in 0..=(opcode & 0x0F) {
					let (x0, y0) = (scratch.curr_x, scratch.curr_y);
					let rx = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let ry = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let rot = decode_zero_to_one_number(c).map_err(|_| FileFormatError::BadNumber)?;
					let flags = decode_natural_number(c).map_err(|_| FileFormatError::BadNumber)?;
					let dx = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.curr_x += dx;
					scratch.curr_y += dy;
					path_arc_to(
						canvas,
						&state.transform,
						x0,
						y0,
						rx,
						ry,
						rot,
						flags & 0x01 != 0,
						flags & 0x02 != 0,
						scratch.curr_x,
						scratch.curr_y,
					)?;
					scratch.x1 = scratch.curr_x;
					scratch.y1 = scratch.curr_y;
				}
			}
			_ => match opcode {
				0xE1 => {
					canvas.end_path()?;
					canvas.end_drawing(&state.paint)?;
					return Ok(());
				}
				0xE2 => {
					canvas.end_path()?;
					let x = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let y = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.curr_x = x;
					scratch.curr_y = y;
					let (dx, dy) = state.transform.source_to_dest(x, y);
					canvas.begin_path(dx, dy)?;
					scratch.x1 = x;
					scratch.y1 = y;
				}
				0xE3 => {
					canvas.end_path()?;
					let dx = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					let dy = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.curr_x += dx;
					scratch.curr_y += dy;
					let (tx, ty) = state.transform.source_to_dest(scratch.curr_x, scratch.curr_y);
					canvas.begin_path(tx, ty)?;
					scratch.x1 = scratch.curr_x;
					scratch.y1 = scratch.curr_y;
				}
				0xE6 => {
					let x = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.curr_x = x;
					emit_line(state, canvas, scratch)?;
				}
				0xE7 => {
					let dx = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.curr_x += dx;
					emit_line(state, canvas, scratch)?;
				}
				0xE8 => {
					let y = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.curr_y = y;
					emit_line(state, canvas, scratch)?;
				}
				0xE9 => {
					let dy = decode_coordinate_number(c).map_err(|_| FileFormatError::BadCoordinate)?;
					scratch.curr_y += dy;
					emit_line(state, canvas, scratch)?;
				}
				_ => return Err(FileFormatError::BadDrawingOpcode.into()),
			},
		}
	}
}

fn emit_line(state: &State, canvas: &mut dyn Canvas, scratch: &mut PathScratch) -> Result<(), DecodeError> {
	let (dx, dy) = state.transform.source_to_dest(scratch.curr_x, scratch.curr_y);
	canvas.path_line_to(dx, dy)?;
	scratch.x1 = scratch.curr_x;
	scratch.y1 = scratch.curr_y;
	Ok(())
}

fn emit_quad(
	state: &State,
	canvas: &mut dyn Canvas,
	scratch: &mut PathScratch,
	x2: f32,
	y2: f32,
) -> Result<(), DecodeError> {
	let (dx1, dy1) = state.transform.source_to_dest(scratch.x1, scratch.y1);
	let (dx2, dy2) = state.transform.source_to_dest(x2, y2);
	canvas.path_quad_to(dx1, dy1, dx2, dy2)?;
	scratch.curr_x = x2;
	scratch.curr_y = y2;
	// Smoothness: the implicit next control point reflects this segment's
	// control point through the new current point.
	scratch.x1 = 2.0 * scratch.curr_x - scratch.x1;
	scratch.y1 = 2.0 * scratch.curr_y - scratch.y1;
	Ok(())
}

fn emit_cube(
	state: &State,
	canvas: &mut dyn Canvas,
	scratch: &mut PathScratch,
	x2: f32,
	y2: f32,
	x3: f32,
	y3: f32,
) -> Result<(), DecodeError> {
	let (dx1, dy1) = state.transform.source_to_dest(scratch.x1, scratch.y1);
	let (dx2, dy2) = state.transform.source_to_dest(x2, y2);
	let (dx3, dy3) = state.transform.source_to_dest(x3, y3);
	canvas.path_cube_to(dx1, dy1, dx2, dy2, dx3, dy3)?;
	scratch.curr_x = x3;
	scratch.curr_y = y3;
	scratch.x2 = x2;
	scratch.y2 = y2;
	// Smoothness: reflect the *second* control point through the new
	// current point (cubics have two control points; only the second is
	// implicit to the next smooth segment).
	scratch.x1 = 2.0 * scratch.curr_x - scratch.x2;
	scratch.y1 = 2.0 * scratch.curr_y - scratch.y2;
	Ok(())
}

/// Blends two colors per-channel: `round((p*(255-blend) + q*blend) / 255)`,
/// matching the reference's `(p_blend*p + q_blend*q + 128) / 255` integer
/// rounding exactly (`p_blend = 255 - blend`, `q_blend = blend`).
fn blend_colors(p: Color, q: Color, blend: u8) -> Color {
	let q_blend = u32::from(blend);
	let p_blend = 255 - q_blend;
	let channel = |p: u8, q: u8| (((p_blend * u32::from(p)) + (q_blend * u32::from(q)) + 128) / 255) as u8;
	Color::new(channel(p.r, q.r), channel(p.g, q.g), channel(p.b, q.b), channel(p.a, q.a))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::color::Palette;
	use crate::geom::Rectangle;

	#[derive(Default)]
	struct Recording {
		calls: Vec<String>,
	}

	impl Canvas for Recording {
		fn begin_drawing(&mut self) -> Result<(), DecodeError> {
			self.calls.push("begin_drawing".into());
			Ok(())
		}
		fn end_drawing(&mut self, _paint: &Paint) -> Result<(), DecodeError> {
			self.calls.push("end_drawing".into());
			Ok(())
		}
		fn begin_path(&mut self, x0: f32, y0: f32) -> Result<(), DecodeError> {
			self.calls.push(format!("begin_path({x0},{y0})"));
			Ok(())
		}
		fn end_path(&mut self) -> Result<(), DecodeError> {
			self.calls.push("end_path".into());
			Ok(())
		}
		fn path_line_to(&mut self, x1: f32, y1: f32) -> Result<(), DecodeError> {
			self.calls.push(format!("path_line_to({x1},{y1})"));
			Ok(())
		}
	}

	fn fresh_state() -> State {
		State::new(Rectangle::DEFAULT_VIEWBOX, Rectangle::DEFAULT_VIEWBOX, 100, Palette::EMPTY)
	}

	#[test]
	fn clean_end_of_input_in_styling_mode_is_not_an_error() {
		let mut c = Cursor::new(&[]);
		let mut state = fresh_state();
		let mut canvas = Recording::default();
		assert!(run(&mut c, &mut state, &mut canvas).is_ok());
	}

	#[test]
	fn minimal_drawing_scenario_matches_spec_trace() {
		// CSEL=0, set CREG[0] via 4-byte RGBA (red, premul), enter drawing at
		// (0,0), one absolute line-to (10,0), close.
		let mut data = vec![0x00]; // CSEL <- 0
		data.push(0x98); // set CREG[0] from 4 bytes
		data.extend_from_slice(&[0xFF, 0x00, 0x00, 0xFF]);
		data.push(0xC0); // enter drawing, paint <- CREG[0]
		// coordinate encoding: payload p, value = p - 64. For value 0, p = 64.
		data.push((64u8) << 1);
		data.push((64u8) << 1);
		data.push(0x00); // line-to, 1 repetition
		data.push((64u8 + 10) << 1); // x = 10
		data.push((64u8) << 1); // y = 0
		data.push(0xE1); // close

		let mut c = Cursor::new(&data);
		let mut state = fresh_state();
		let mut canvas = Recording::default();
		run(&mut c, &mut state, &mut canvas).unwrap();
		assert_eq!(canvas.calls[0], "begin_drawing");
		assert!(canvas.calls[1].starts_with("begin_path"));
		assert!(canvas.calls[2].starts_with("path_line_to"));
		assert_eq!(canvas.calls[3], "end_path");
		assert_eq!(canvas.calls[4], "end_drawing");
	}

	#[test]
	fn bad_drawing_opcode_is_reported() {
		let mut data = vec![0x00, 0x98, 0xFF, 0x00, 0x00, 0xFF, 0xC0, 64 << 1, 64 << 1];
		data.push(0xE0); // invalid drawing opcode
		let mut c = Cursor::new(&data);
		let mut state = fresh_state();
		let mut canvas = Recording::default();
		let err = run(&mut c, &mut state, &mut canvas).unwrap_err();
		assert_eq!(err, DecodeError::FileFormat(FileFormatError::BadDrawingOpcode));
	}

	#[test]
	fn unfinished_path_at_eof_is_an_error() {
		let data = vec![0x00, 0x98, 0xFF, 0x00, 0x00, 0xFF, 0xC0, 64 << 1, 64 << 1];
		let mut c = Cursor::new(&data);
		let mut state = fresh_state();
		let mut canvas = Recording::default();
		let err = run(&mut c, &mut state, &mut canvas).unwrap_err();
		assert_eq!(err, DecodeError::FileFormat(FileFormatError::BadPathUnfinished));
	}

	#[test]
	fn invalid_paint_type_rejected() {
		// CSEL=0, enter drawing with CREG[0] still fully-transparent-black
		// (the default), which is Invalid per Paint::paint_type.
		let data = vec![0x00, 0xC0, 64 << 1, 64 << 1];
		let mut c = Cursor::new(&data);
		let mut state = fresh_state();
		let mut canvas = Recording::default();
		let err = run(&mut c, &mut state, &mut canvas).unwrap_err();
		assert_eq!(err, DecodeError::Runtime(RuntimeError::InvalidPaintType));
	}

	#[test]
	fn auto_advance_only_fires_on_low_bits_seven() {
		let data = vec![0x87, 0x05, 0x80, 0x00]; // set CREG via 0x87 (low bits = 7), then one-byte color
		let mut c = Cursor::new(&data);
		let mut state = fresh_state();
		state.csel = 10;
		let mut canvas = Recording::default();
		run_styling_opcode(&mut c, &mut state, &mut canvas, 0x87).unwrap();
		assert_eq!(state.csel, 11);
	}

	#[test]
	fn lod_gate_suppresses_drawing_calls() {
		let mut data = vec![0x00, 0x98, 0xFF, 0x00, 0x00, 0xFF];
		data.push(0xC7); // set LOD
		data.push(0 << 1); // lo = 0 (real, payload/2 no offset => 0)
		data.push(1 << 1); // hi = 1
		data.push(0xC0);
		data.push(64 << 1);
		data.push(64 << 1);
		data.push(0xE1);
		let mut c = Cursor::new(&data);
		let mut state = fresh_state();
		state.height_in_pixels = 100; // outside [0, 1)
		let mut canvas = Recording::default();
		run(&mut c, &mut state, &mut canvas).unwrap();
		assert!(canvas.calls.is_empty());
	}

	#[test]
	fn blend_opcode_matches_rounding_formula() {
		let p = Color::new(0, 0, 0, 0);
		let q = Color::new(255, 255, 255, 255);
		assert_eq!(blend_colors(p, q, 128), Color::new(128, 128, 128, 128));
		assert_eq!(blend_colors(p, q, 0), p);
		assert_eq!(blend_colors(p, q, 255), q);
	}
}
