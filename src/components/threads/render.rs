use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::PositionedNode;
use super::state::{FrameLayout, ProjectorState};
use crate::constants::*;
use crate::options::{Animation, OptionsRecord, ThreadStyle};

/// Stroke parameters for a thread or one of its segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
	pub color: String,
	pub width: f64,
	/// Dash pattern and offset; `None` for a continuous line.
	pub dash: Option<([f64; 2], f64)>,
}

/// Quadratic curve from `from` to `to` bent towards `control`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curve {
	pub from: (f64, f64),
	pub control: (f64, f64),
	pub to: (f64, f64),
}

impl Curve {
	pub fn point_at(&self, t: f64) -> (f64, f64) {
		let u = 1.0 - t;
		let (a, b, c) = (u * u, 2.0 * u * t, t * t);
		(
			a * self.from.0 + b * self.control.0 + c * self.to.0,
			a * self.from.1 + b * self.control.1 + c * self.to.1,
		)
	}
}

/// The drawing operations the projector needs from its host.
pub trait Surface {
	fn fill_background(&self, width: f64, height: f64, rgb: (u8, u8, u8), alpha: f64);
	fn set_glow(&self, color: &str, blur: f64);
	fn clear_glow(&self);
	fn stroke_curve(&self, curve: &Curve, stroke: &Stroke);
	fn stroke_segment(&self, from: (f64, f64), to: (f64, f64), stroke: &Stroke);
	fn fill_circle(&self, center: (f64, f64), diameter: f64, color: &str);
}

/// Glow that stays on for the lifetime of the scope and is cleared on drop.
struct GlowScope<'s, S: Surface + ?Sized> {
	surface: &'s S,
}

impl<'s, S: Surface + ?Sized> GlowScope<'s, S> {
	fn begin(surface: &'s S, color: &str, blur: f64) -> Self {
		surface.set_glow(color, blur);
		Self { surface }
	}
}

impl<S: Surface + ?Sized> Drop for GlowScope<'_, S> {
	fn drop(&mut self) {
		self.surface.clear_glow();
	}
}

pub fn render<S: Surface + ?Sized>(state: &ProjectorState, surface: &S) {
	surface.fill_background(
		state.width,
		state.height,
		BACKGROUND_RGB,
		background_alpha(&state.options, state.frame),
	);
	let frame = state.frame_layout();
	draw_threads(state, &frame, surface);
	draw_nodes(state, &frame, surface);
}

fn speed(options: &OptionsRecord) -> f64 {
	SPEED_BASE + options.animation_speed * SPEED_RANGE
}

/// Background fill alpha in [0, 1] for the given frame.
pub fn background_alpha(options: &OptionsRecord, frame: u64) -> f64 {
	let alpha = match options.animation {
		Animation::Pulse => {
			let wave = 0.5 + 0.5 * (frame as f64 * PULSE_RATE * speed(options)).sin();
			PULSE_BASE_ALPHA + PULSE_SWING_ALPHA * wave
		}
		Animation::Flow => FLOW_ALPHA,
		Animation::Static => STATIC_ALPHA,
	};
	alpha / 255.0
}

/// Effective stroke width, never thinner than one pixel.
pub fn thread_width(options: &OptionsRecord) -> f64 {
	(options.thread_thickness * options.density).max(1.0)
}

/// Opacity of gradient segment `i` of `n`: full at the start, fading along the curve.
pub fn gradient_alpha(i: usize, n: usize) -> f64 {
	let t = i as f64 / n as f64;
	((80.0 + 175.0 * (0.3 + 0.7 * (1.0 - t))) / 255.0).min(1.0)
}

/// Parse `#rrggbb` or `#rgb`.
///
/// Named and functional CSS colors are not understood; the tablet's color
/// picker only produces hex, and gradient threads fall back to the default
/// color's channels for anything else.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
	let hex = color.trim().strip_prefix('#')?;
	if !hex.is_ascii() {
		return None;
	}
	let channel = |s: &str| u8::from_str_radix(s, 16).ok();
	match hex.len() {
		6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
		3 => {
			let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
			Some((it.next()??, it.next()??, it.next()??))
		}
		_ => None,
	}
}

fn thread_curve(a: &PositionedNode, b: &PositionedNode, frame: u64) -> Curve {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len = match dx.hypot(dy) {
		l if l > 0.0 => l,
		_ => 1.0,
	};
	let (px, py) = (-dy / len, dx / len);
	let sag = len * SAG_FACTOR * (0.7 + 0.3 * (frame as f64 * SAG_RATE).sin());
	Curve {
		from: (a.x, a.y),
		control: ((a.x + b.x) / 2.0 + px * sag, (a.y + b.y) / 2.0 + py * sag),
		to: (b.x, b.y),
	}
}

fn draw_threads<S: Surface + ?Sized>(state: &ProjectorState, frame: &FrameLayout, surface: &S) {
	let options = &state.options;
	let width = thread_width(options);
	let color = options.thread_color.as_str();

	for &(start, end) in &frame.pairs {
		let _glow = options
			.glow
			.then(|| GlowScope::begin(surface, color, THREAD_GLOW_BLUR + width * THREAD_GLOW_PER_WIDTH));
		let curve = thread_curve(start, end, state.frame);

		match options.thread_style {
			ThreadStyle::Solid => surface.stroke_curve(
				&curve,
				&Stroke {
					color: color.into(),
					width,
					dash: None,
				},
			),
			ThreadStyle::Dashed => {
				let offset = match options.animation {
					Animation::Flow => {
						let period = DASH_PATTERN[0] + DASH_PATTERN[1];
						-(state.frame as f64 * FLOW_DASH_SPEED * speed(options)) % period
					}
					_ => 0.0,
				};
				surface.stroke_curve(
					&curve,
					&Stroke {
						color: color.into(),
						width,
						dash: Some((DASH_PATTERN, offset)),
					},
				);
			}
			ThreadStyle::Gradient => {
				let (r, g, b) = parse_hex_color(color)
					.or_else(|| parse_hex_color(&OptionsRecord::default().thread_color))
					.unwrap_or((255, 255, 255));
				let n = GRADIENT_SEGMENTS;
				for i in 0..n {
					let from = curve.point_at(i as f64 / n as f64);
					let to = curve.point_at((i + 1) as f64 / n as f64);
					let alpha = gradient_alpha(i, n);
					let stroke = Stroke {
						color: format!("rgba({r}, {g}, {b}, {alpha:.3})"),
						width,
						dash: None,
					};
					surface.stroke_segment(from, to, &stroke);
				}
			}
		}
	}
}

fn draw_nodes<S: Surface + ?Sized>(state: &ProjectorState, frame: &FrameLayout, surface: &S) {
	let color = state.options.thread_color.as_str();
	for node in &state.nodes {
		let active = frame.is_active(node.id);
		let (diameter, blur) = if active {
			(ACTIVE_NODE_DIAMETER, ACTIVE_NODE_GLOW)
		} else {
			(INACTIVE_NODE_DIAMETER, INACTIVE_NODE_GLOW)
		};
		let _glow = state
			.options
			.glow
			.then(|| GlowScope::begin(surface, color, blur));
		surface.fill_circle((node.x, node.y), diameter, color);
	}
}

impl Surface for CanvasRenderingContext2d {
	fn fill_background(&self, width: f64, height: f64, (r, g, b): (u8, u8, u8), alpha: f64) {
		self.set_fill_style_str(&format!("rgba({r}, {g}, {b}, {alpha:.4})"));
		self.fill_rect(0.0, 0.0, width, height);
	}

	fn set_glow(&self, color: &str, blur: f64) {
		self.set_shadow_color(color);
		self.set_shadow_blur(blur);
		self.set_shadow_offset_x(0.0);
		self.set_shadow_offset_y(0.0);
	}

	fn clear_glow(&self) {
		self.set_shadow_blur(0.0);
		self.set_shadow_color("transparent");
	}

	fn stroke_curve(&self, curve: &Curve, stroke: &Stroke) {
		apply_stroke(self, stroke);
		self.begin_path();
		self.move_to(curve.from.0, curve.from.1);
		self.quadratic_curve_to(curve.control.0, curve.control.1, curve.to.0, curve.to.1);
		self.stroke();
		let _ = self.set_line_dash(&js_sys::Array::new());
	}

	fn stroke_segment(&self, from: (f64, f64), to: (f64, f64), stroke: &Stroke) {
		apply_stroke(self, stroke);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
		let _ = self.set_line_dash(&js_sys::Array::new());
	}

	fn fill_circle(&self, (x, y): (f64, f64), diameter: f64, color: &str) {
		self.begin_path();
		let _ = self.arc(x, y, diameter / 2.0, 0.0, TAU);
		self.set_fill_style_str(color);
		self.fill();
	}
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke) {
	ctx.set_stroke_style_str(&stroke.color);
	ctx.set_line_width(stroke.width);
	ctx.set_line_cap("round");
	match stroke.dash {
		Some(([dash, gap], offset)) => {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(offset);
		}
		None => {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;
	use crate::options::ConnectionMode;

	#[derive(Clone, Debug, PartialEq)]
	enum Op {
		Background(f64),
		Glow(f64),
		ClearGlow,
		Curve(Stroke),
		Segment(Stroke),
		Circle(f64),
	}

	#[derive(Default)]
	struct Recorder(RefCell<Vec<Op>>);

	impl Recorder {
		fn ops(&self) -> Vec<Op> {
			self.0.borrow().clone()
		}
	}

	impl Surface for Recorder {
		fn fill_background(&self, _: f64, _: f64, _: (u8, u8, u8), alpha: f64) {
			self.0.borrow_mut().push(Op::Background(alpha));
		}
		fn set_glow(&self, _: &str, blur: f64) {
			self.0.borrow_mut().push(Op::Glow(blur));
		}
		fn clear_glow(&self) {
			self.0.borrow_mut().push(Op::ClearGlow);
		}
		fn stroke_curve(&self, _: &Curve, stroke: &Stroke) {
			self.0.borrow_mut().push(Op::Curve(stroke.clone()));
		}
		fn stroke_segment(&self, _: (f64, f64), _: (f64, f64), stroke: &Stroke) {
			self.0.borrow_mut().push(Op::Segment(stroke.clone()));
		}
		fn fill_circle(&self, _: (f64, f64), diameter: f64, _: &str) {
			self.0.borrow_mut().push(Op::Circle(diameter));
		}
	}

	fn three_nodes(options: OptionsRecord) -> ProjectorState {
		ProjectorState::new(
			OptionsRecord {
				selected_nodes: vec!["self".into(), "family".into(), "work".into()],
				connection_mode: ConnectionMode::Selected,
				..options
			},
			1280.0,
			720.0,
		)
	}

	fn draw(state: &ProjectorState) -> Vec<Op> {
		let rec = Recorder::default();
		render(state, &rec);
		rec.ops()
	}

	#[test]
	fn threads_are_drawn_before_nodes() {
		let ops = draw(&three_nodes(OptionsRecord::default()));
		assert!(matches!(ops[0], Op::Background(_)));
		let last_curve = ops.iter().rposition(|o| matches!(o, Op::Curve(_))).unwrap();
		let first_circle = ops.iter().position(|o| matches!(o, Op::Circle(_))).unwrap();
		assert!(last_curve < first_circle);
		assert_eq!(ops.iter().filter(|o| matches!(o, Op::Curve(_))).count(), 3);
		assert_eq!(ops.iter().filter(|o| matches!(o, Op::Circle(_))).count(), 9);
	}

	#[test]
	fn glow_is_released_after_every_draw() {
		let ops = draw(&three_nodes(OptionsRecord::default()));
		let mut lit = false;
		for op in &ops {
			match op {
				Op::Glow(_) => {
					assert!(!lit, "glow set twice without release");
					lit = true;
				}
				Op::ClearGlow => {
					assert!(lit);
					lit = false;
				}
				Op::Curve(_) | Op::Circle(_) => assert!(lit),
				_ => {}
			}
		}
		assert!(!lit);
	}

	#[test]
	fn glow_off_never_touches_shadow() {
		let ops = draw(&three_nodes(OptionsRecord {
			glow: false,
			..Default::default()
		}));
		assert!(!ops.iter().any(|o| matches!(o, Op::Glow(_) | Op::ClearGlow)));
	}

	#[test]
	fn active_nodes_are_larger_and_glow_brighter() {
		let ops = draw(&three_nodes(OptionsRecord::default()));
		let circles: Vec<f64> = ops
			.iter()
			.filter_map(|o| match o {
				Op::Circle(d) => Some(*d),
				_ => None,
			})
			.collect();
		assert_eq!(circles.iter().filter(|&&d| d == ACTIVE_NODE_DIAMETER).count(), 3);
		assert_eq!(circles.iter().filter(|&&d| d == INACTIVE_NODE_DIAMETER).count(), 6);
		assert!(ops.contains(&Op::Glow(ACTIVE_NODE_GLOW)));
		assert!(ops.contains(&Op::Glow(INACTIVE_NODE_GLOW)));
	}

	#[test]
	fn thread_width_has_a_one_pixel_floor() {
		let thin = OptionsRecord {
			density: 0.0,
			..Default::default()
		};
		assert_eq!(thread_width(&thin), 1.0);
		let thick = OptionsRecord {
			thread_thickness: 10.0,
			density: 0.5,
			..Default::default()
		};
		assert_eq!(thread_width(&thick), 5.0);
	}

	#[test]
	fn dashed_threads_carry_the_dash_pattern() {
		let ops = draw(&three_nodes(OptionsRecord {
			thread_style: ThreadStyle::Dashed,
			animation: Animation::Static,
			..Default::default()
		}));
		for op in &ops {
			if let Op::Curve(stroke) = op {
				assert_eq!(stroke.dash, Some((DASH_PATTERN, 0.0)));
			}
		}
		let solid = draw(&three_nodes(OptionsRecord::default()));
		assert!(solid.iter().all(|o| !matches!(o, Op::Curve(Stroke { dash: Some(_), .. }))));
	}

	#[test]
	fn flow_marches_the_dash_offset() {
		let mut state = three_nodes(OptionsRecord {
			thread_style: ThreadStyle::Dashed,
			animation: Animation::Flow,
			..Default::default()
		});
		let offset = |ops: Vec<Op>| {
			ops.into_iter()
				.find_map(|o| match o {
					Op::Curve(Stroke { dash: Some((_, off)), .. }) => Some(off),
					_ => None,
				})
				.unwrap()
		};
		let first = offset(draw(&state));
		state.tick();
		assert_ne!(first, offset(draw(&state)));
	}

	#[test]
	fn gradient_threads_fade_along_six_segments() {
		let ops = draw(&three_nodes(OptionsRecord {
			thread_style: ThreadStyle::Gradient,
			..Default::default()
		}));
		let segments: Vec<&Stroke> = ops
			.iter()
			.filter_map(|o| match o {
				Op::Segment(s) => Some(s),
				_ => None,
			})
			.collect();
		assert_eq!(segments.len(), 3 * GRADIENT_SEGMENTS);
		assert!(segments[0].color.starts_with("rgba(196, 155, 255, "));
		assert!(!ops.iter().any(|o| matches!(o, Op::Curve(_))));

		let alphas: Vec<f64> = (0..GRADIENT_SEGMENTS)
			.map(|i| gradient_alpha(i, GRADIENT_SEGMENTS))
			.collect();
		assert!((alphas[0] - 1.0).abs() < 1e-9);
		assert!(alphas.windows(2).all(|w| w[0] > w[1]));
	}

	#[test]
	fn background_alpha_by_animation_mode() {
		let with = |animation| OptionsRecord {
			animation,
			..Default::default()
		};
		assert_eq!(background_alpha(&with(Animation::Static), 10), STATIC_ALPHA / 255.0);
		assert_eq!(background_alpha(&with(Animation::Flow), 10), FLOW_ALPHA / 255.0);

		let pulse = with(Animation::Pulse);
		let samples: Vec<f64> = (0..200).map(|f| background_alpha(&pulse, f * 7)).collect();
		let lo = samples.iter().cloned().fold(f64::INFINITY, f64::min);
		let hi = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
		assert!(lo >= PULSE_BASE_ALPHA / 255.0 - 1e-9);
		assert!(hi <= (PULSE_BASE_ALPHA + PULSE_SWING_ALPHA) / 255.0 + 1e-9);
		assert!(hi - lo > 0.01);
	}

	#[test]
	fn hex_colors() {
		assert_eq!(parse_hex_color("#c49bff"), Some((196, 155, 255)));
		assert_eq!(parse_hex_color("#fff"), Some((255, 255, 255)));
		assert_eq!(parse_hex_color("purple"), None);
		assert_eq!(parse_hex_color("#12345"), None);
		assert_eq!(parse_hex_color("#éé"), None);
	}

	#[test]
	fn curve_endpoints_match_nodes() {
		let state = three_nodes(OptionsRecord::default());
		let (a, b) = (&state.nodes[0], &state.nodes[2]);
		let curve = thread_curve(a, b, 0);
		assert_eq!(curve.point_at(0.0), (a.x, a.y));
		let end = curve.point_at(1.0);
		assert!((end.0 - b.x).abs() < 1e-9 && (end.1 - b.y).abs() < 1e-9);
	}

	#[test]
	fn thread_glow_scales_with_width() {
		for (thickness, density) in [(2.0, 0.6), (10.0, 1.0), (6.0, 0.5)] {
			let options = OptionsRecord {
				thread_thickness: thickness,
				density,
				..Default::default()
			};
			let expected = THREAD_GLOW_BLUR + thread_width(&options) * THREAD_GLOW_PER_WIDTH;
			let ops = draw(&three_nodes(options));
			let first_circle = ops.iter().position(|o| matches!(o, Op::Circle(_))).unwrap();
			let thread_glows: Vec<f64> = ops[..first_circle]
				.iter()
				.filter_map(|o| match o {
					Op::Glow(blur) => Some(*blur),
					_ => None,
				})
				.collect();
			assert_eq!(thread_glows, vec![expected; 3]);
		}
	}

	#[test]
	fn thread_sag_breathes_over_time() {
		let state = three_nodes(OptionsRecord::default());
		let (a, b) = (&state.nodes[0], &state.nodes[2]);
		let early = thread_curve(a, b, 0);
		let later = thread_curve(a, b, 40);
		assert_ne!(early.control, later.control);
		assert_eq!(early.from, later.from);
		assert_eq!(early.to, later.to);
	}
}
