//! IconVG Dump CLI Utility
//!
//! A command-line tool for inspecting IconVG files: their view-box,
//! suggested palette, and the sequence of path/paint calls the bytecode
//! interpreter would drive into a rendering backend.
//!
//! # Usage
//!
//! ```bash
//! # Print a file's view-box and suggested palette only.
//! cargo run --example icon_dump -- info icon.ivg
//!
//! # Print the full begin/end/path call trace.
//! cargo run --example icon_dump -- trace icon.ivg --width 64 --height 64
//! ```

use clap::{Parser, Subcommand};
use iconvg::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "icon_dump")]
#[command(author = "iconvg project")]
#[command(version = "1.0")]
#[command(about = "IconVG inspector - dump metadata and decode traces", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the view-box and suggested palette, without running the
	/// bytecode interpreter.
	Info {
		/// Input IconVG file path.
		#[arg(value_name = "INPUT_IVG")]
		input: PathBuf,
	},

	/// Decode the file against a destination rectangle and print every
	/// sink call the interpreter makes, in order.
	Trace {
		/// Input IconVG file path.
		#[arg(value_name = "INPUT_IVG")]
		input: PathBuf,

		/// Destination rectangle width, in canvas units.
		#[arg(long, default_value_t = 64.0)]
		width: f32,

		/// Destination rectangle height, in canvas units.
		#[arg(long, default_value_t = 64.0)]
		height: f32,
	},
}

fn main() -> anyhow::Result<()> {
	env_logger::init();
	let cli = Cli::parse();

	match cli.command {
		Commands::Info { input } => {
			let data = fs::read(&input)?;
			let viewbox = decode_viewbox(&data)?;
			println!("viewbox: {viewbox:?}");

			let mut palette_sink = PaletteCapture::default();
			let dst = Rectangle::new(0.0, 0.0, viewbox.width(), viewbox.height());
			decode(&data, dst, &DecodeOptions::default(), &mut palette_sink)?;
			println!("suggested palette (first 4 entries): {:?}", &palette_sink.palette.as_array()[..4]);
		}
		Commands::Trace { input, width, height } => {
			let data = fs::read(&input)?;
			let dst = Rectangle::new(0.0, 0.0, width, height);
			let mut sink = TracingCanvas::default();
			decode(&data, dst, &DecodeOptions::default(), &mut sink)?;
			for line in sink.lines {
				println!("{line}");
			}
		}
	}

	Ok(())
}

/// A [`Canvas`] that records only the effective suggested palette.
#[derive(Default)]
struct PaletteCapture {
	palette: Palette,
}

impl Canvas for PaletteCapture {
	fn on_metadata_suggested_palette(&mut self, palette: &Palette) -> Result<(), DecodeError> {
		self.palette = *palette;
		Ok(())
	}
}

/// A [`Canvas`] that renders nothing but prints every call it receives, in
/// the order the interpreter makes them.
#[derive(Default)]
struct TracingCanvas {
	lines: Vec<String>,
}

impl Canvas for TracingCanvas {
	fn begin_decode(&mut self, dst_rect: Rectangle) -> Result<(), DecodeError> {
		self.lines.push(format!("begin_decode({dst_rect:?})"));
		Ok(())
	}

	fn end_decode(
		&mut self,
		result: Result<(), DecodeError>,
		bytes_consumed: usize,
		bytes_remaining: usize,
	) -> Result<(), DecodeError> {
		self.lines.push(format!("end_decode({result:?}, consumed={bytes_consumed}, remaining={bytes_remaining})"));
		result
	}

	fn on_metadata_viewbox(&mut self, viewbox: Rectangle) -> Result<(), DecodeError> {
		self.lines.push(format!("on_metadata_viewbox({viewbox:?})"));
		Ok(())
	}

	fn on_metadata_suggested_palette(&mut self, _palette: &Palette) -> Result<(), DecodeError> {
		self.lines.push("on_metadata_suggested_palette(..)".to_string());
		Ok(())
	}

	fn begin_drawing(&mut self) -> Result<(), DecodeError> {
		self.lines.push("begin_drawing()".to_string());
		Ok(())
	}

	fn end_drawing(&mut self, paint: &Paint) -> Result<(), DecodeError> {
		self.lines.push(format!("end_drawing({:?})", paint.paint_type()));
		Ok(())
	}

	fn begin_path(&mut self, x0: f32, y0: f32) -> Result<(), DecodeError> {
		self.lines.push(format!("begin_path({x0}, {y0})"));
		Ok(())
	}

	fn end_path(&mut self) -> Result<(), DecodeError> {
		self.lines.push("end_path()".to_string());
		Ok(())
	}

	fn path_line_to(&mut self, x1: f32, y1: f32) -> Result<(), DecodeError> {
		self.lines.push(format!("path_line_to({x1}, {y1})"));
		Ok(())
	}

	fn path_quad_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<(), DecodeError> {
		self.lines.push(format!("path_quad_to({x1}, {y1}, {x2}, {y2})"));
		Ok(())
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
		self.lines.push(format!("path_cube_to({x1}, {y1}, {x2}, {y2}, {x3}, {y3})"));
		Ok(())
	}
}
