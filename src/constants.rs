//! Tunables shared by the tablet and projector screens.

/// localStorage key holding the serialized options record.
pub const STORAGE_KEY: &str = "thread-installation-options";

/// Viewport assumed when the host reports a zero or unknown size.
pub const FALLBACK_WIDTH: f64 = 1920.0;
pub const FALLBACK_HEIGHT: f64 = 1080.0;

/// Node circle radius as a fraction of the half-extent of the short side.
pub const RADIUS_FACTOR: f64 = 0.38;

/// Background fill, drawn translucently every frame to leave trails.
pub const BACKGROUND_RGB: (u8, u8, u8) = (8, 10, 18);
/// Background alphas on a 0..=255 scale.
pub const STATIC_ALPHA: f64 = 28.0;
pub const FLOW_ALPHA: f64 = 18.0;
pub const PULSE_BASE_ALPHA: f64 = 20.0;
pub const PULSE_SWING_ALPHA: f64 = 8.0;
pub const PULSE_RATE: f64 = 0.03;

/// `animationSpeed` in [0, 1] maps onto [SPEED_BASE, SPEED_BASE + SPEED_RANGE].
pub const SPEED_BASE: f64 = 0.3;
pub const SPEED_RANGE: f64 = 0.4;

/// Threads sag by this fraction of their length, breathing at SAG_RATE.
pub const SAG_FACTOR: f64 = 0.08;
pub const SAG_RATE: f64 = 0.02;

pub const THREAD_GLOW_BLUR: f64 = 18.0;
pub const THREAD_GLOW_PER_WIDTH: f64 = 4.0;
pub const GRADIENT_SEGMENTS: usize = 6;
pub const DASH_PATTERN: [f64; 2] = [8.0, 12.0];
/// Dash offset advance per frame in `flow` mode.
pub const FLOW_DASH_SPEED: f64 = 0.6;

pub const ACTIVE_NODE_DIAMETER: f64 = 14.0;
pub const INACTIVE_NODE_DIAMETER: f64 = 8.0;
pub const ACTIVE_NODE_GLOW: f64 = 24.0;
pub const INACTIVE_NODE_GLOW: f64 = 12.0;
