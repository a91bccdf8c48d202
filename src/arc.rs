//! Elliptical-arc-to-cubic-Bézier conversion.
//!
//! `spec.md` §1 scopes the arc algorithm itself out as "a well-known SVG
//! formula" treated as a leaf primitive, but the interpreter still needs
//! *something* behind the `A`/`a` opcodes. `SPEC_FULL.md` §2 item 8 resolves
//! this by implementing the standard SVG 1.1 endpoint-to-center
//! parameterization (F.6.5) locally, subdividing the resulting arc into at
//! most four quarter-turn-or-smaller cubic Bézier segments.
//!
//! The helper receives *source*-space (viewbox) endpoints and the
//! scale/bias pair, mirroring `iconvg_private_path_arc_to` in the reference
//! decoder: it performs its own transform-and-emit of one or more
//! `path_cube_to` calls, rather than handing source-space points back to the
//! caller.

use crate::error::DecodeError;
use crate::sink::Canvas;
use crate::state::Transform;

/// Converts one elliptical arc segment into cubic Bézier segments and emits
/// them via `canvas.path_cube_to`, transforming every coordinate from
/// source (viewbox) space to destination space with `transform`.
///
/// `(x0, y0)` is the pre-motion current point (source space); `(x, y)` is
/// the post-motion endpoint (source space). `rx`/`ry` need not be
/// non-negative on input; their absolute value is used, per the SVG
/// algorithm. `x_axis_rotation` is a fraction of a half turn (i.e. the
/// rotation in radians is `x_axis_rotation * PI`), matching how IconVG
/// encodes it as a `zero-to-one` number rather than raw radians or degrees.
///
/// # Errors
///
/// Propagates whatever error `canvas.path_cube_to` returns, stopping at the
/// first one.
#[allow(clippy::too_many_arguments)]
pub fn path_arc_to(
	canvas: &mut dyn Canvas,
	transform: &Transform,
	x0: f32,
	y0: f32,
	rx: f32,
	ry: f32,
	x_axis_rotation: f32,
	large_arc: bool,
	sweep: bool,
	x: f32,
	y: f32,
) -> Result<(), DecodeError> {
	let emit = |canvas: &mut dyn Canvas, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64| {
		let (dx1, dy1) = transform.source_to_dest(x1 as f32, y1 as f32);
		let (dx2, dy2) = transform.source_to_dest(x2 as f32, y2 as f32);
		let (dx3, dy3) = transform.source_to_dest(x3 as f32, y3 as f32);
		canvas.path_cube_to(dx1, dy1, dx2, dy2, dx3, dy3)
	};

	// A degenerate radius, or an endpoint equal to the start, is a straight
	// line per the SVG spec.
	let (x0, y0, x, y) = (f64::from(x0), f64::from(y0), f64::from(x), f64::from(y));
	let (rx, ry) = (f64::from(rx).abs(), f64::from(ry).abs());
	if (x0 - x).abs() < f64::EPSILON && (y0 - y).abs() < f64::EPSILON {
		return Ok(());
	}
	if rx < f64::EPSILON || ry < f64::EPSILON {
		let third = |t: f64| (x0 + (x - x0) * t, y0 + (y - y0) * t);
		let (x1, y1) = third(1.0 / 3.0);
		let (x2, y2) = third(2.0 / 3.0);
		return emit(canvas, x1, y1, x2, y2, x, y);
	}

	let phi = f64::from(x_axis_rotation) * std::f64::consts::PI;
	let (sin_phi, cos_phi) = phi.sin_cos();

	// F.6.5.1: compute (x1', y1'), the midpoint in the rotated frame.
	let dx2 = (x0 - x) / 2.0;
	let dy2 = (y0 - y) / 2.0;
	let x1p = cos_phi * dx2 + sin_phi * dy2;
	let y1p = -sin_phi * dx2 + cos_phi * dy2;

	// F.6.6.2/3: scale up rx, ry if the endpoints can't be reached.
	let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
	let (rx, ry) = if lambda > 1.0 {
		let s = lambda.sqrt();
		(rx * s, ry * s)
	} else {
		(rx, ry)
	};

	// F.6.5.2: compute (cx', cy'), the ellipse center in the rotated frame.
	let rx_sq = rx * rx;
	let ry_sq = ry * ry;
	let x1p_sq = x1p * x1p;
	let y1p_sq = y1p * y1p;
	let num = (rx_sq * ry_sq - rx_sq * y1p_sq - ry_sq * x1p_sq).max(0.0);
	let den = rx_sq * y1p_sq + ry_sq * x1p_sq;
	let co = if den < f64::EPSILON { 0.0 } else { (num / den).sqrt() };
	let co = if large_arc == sweep { -co } else { co };
	let cxp = co * (rx * y1p / ry);
	let cyp = co * -(ry * x1p / rx);

	// F.6.5.3: transform back to get the actual center.
	let cx = cos_phi * cxp - sin_phi * cyp + (x0 + x) / 2.0;
	let cy = sin_phi * cxp + cos_phi * cyp + (y0 + y) / 2.0;

	// F.6.5.5/6: start angle and angular extent.
	let angle = |ux: f64, uy: f64, vx: f64, vy: f64| -> f64 {
		let dot = ux * vx + uy * vy;
		let len = ((ux * ux + uy * uy) * (vx * vx + vy * vy)).sqrt();
		let mut a = (dot / len).clamp(-1.0, 1.0).acos();
		if ux * vy - uy * vx < 0.0 {
			a = -a;
		}
		a
	};
	let theta1 = angle(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
	let mut dtheta = angle((x1p - cxp) / rx, (y1p - cyp) / ry, (-x1p - cxp) / rx, (-y1p - cyp) / ry);
	if !sweep && dtheta > 0.0 {
		dtheta -= 2.0 * std::f64::consts::PI;
	} else if sweep && dtheta < 0.0 {
		dtheta += 2.0 * std::f64::consts::PI;
	}

	// Subdivide into segments no larger than a quarter turn, at most 4.
	let segment_count = ((dtheta.abs() / (std::f64::consts::PI / 2.0)).ceil() as usize).clamp(1, 4);
	let segment_theta = dtheta / segment_count as f64;
	// The standard cubic-Bézier-approximates-a-circular-arc constant for a
	// span of `segment_theta` radians.
	let alpha = (4.0 / 3.0) * (segment_theta / 4.0).tan();

	let point = |theta: f64| -> (f64, f64, f64, f64) {
		// Returns (x, y, dx/dtheta, dy/dtheta) on the rotated, scaled ellipse.
		let (s, c) = theta.sin_cos();
		let ex = cx + rx * c * cos_phi - ry * s * sin_phi;
		let ey = cy + rx * c * sin_phi + ry * s * cos_phi;
		let edx = -rx * s * cos_phi - ry * c * sin_phi;
		let edy = -rx * s * sin_phi + ry * c * cos_phi;
		(ex, ey, edx, edy)
	};

	let mut theta = theta1;
	let (mut px, mut py, mut pdx, mut pdy) = point(theta);
	for i in 0..segment_count {
		let next_theta = theta + segment_theta;
		let c1x = px + alpha * pdx;
		let c1y = py + alpha * pdy;
		let (ex, ey, edx, edy) = point(next_theta);
		let c2x = ex - alpha * edx;
		let c2y = ey - alpha * edy;
		let (end_x, end_y) = if i + 1 == segment_count { (x, y) } else { (ex, ey) };

		emit(canvas, c1x, c1y, c2x, c2y, end_x, end_y)?;

		theta = next_theta;
		px = end_x;
		py = end_y;
		pdx = edx;
		pdy = edy;
	}
	Ok(())
}
