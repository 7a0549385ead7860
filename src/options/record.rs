use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How node pairs are derived from the active set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
	/// Every active node connects to every other active node.
	All,
	/// Same pairing as `All`; the active set comes from `selectedNodes`.
	#[default]
	Selected,
	/// Use the explicit `connections` list when it is non-empty.
	Custom,
}

/// Stroke style for threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStyle {
	/// A single continuous curve.
	#[default]
	Solid,
	/// The same curve with a dash pattern.
	Dashed,
	/// Short segments whose opacity fades along the curve.
	Gradient,
}

/// Background animation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
	/// Fixed background alpha.
	Static,
	/// Background alpha follows a sine wave.
	#[default]
	Pulse,
	/// Low fixed alpha for long trails.
	Flow,
}

/// The configuration shared between the tablet and the projector.
///
/// Serialized as one JSON object with camelCase keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsRecord {
	/// Active node ids; empty means every node is active.
	pub selected_nodes: Vec<String>,
	/// Explicit pairs, used only in [`ConnectionMode::Custom`].
	pub connections: Vec<(String, String)>,
	/// Pairing policy.
	pub connection_mode: ConnectionMode,
	/// CSS color for threads and node markers.
	pub thread_color: String,
	/// Base stroke width.
	pub thread_thickness: f64,
	/// Soft shadow around threads and markers.
	pub glow: bool,
	/// Thread stroke style.
	pub thread_style: ThreadStyle,
	/// Thickness multiplier in [0, 1].
	pub density: f64,
	/// Background animation.
	pub animation: Animation,
	/// Animation rate multiplier in [0, 1].
	pub animation_speed: f64,
}

impl Default for OptionsRecord {
	fn default() -> Self {
		Self {
			selected_nodes: Vec::new(),
			connections: Vec::new(),
			connection_mode: ConnectionMode::Selected,
			thread_color: "#c49bff".into(),
			thread_thickness: 2.0,
			glow: true,
			thread_style: ThreadStyle::Solid,
			density: 0.6,
			animation: Animation::Pulse,
			animation_speed: 0.5,
		}
	}
}

/// A partial update: every `Some` field replaces the stored one wholesale.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionsPatch {
	pub selected_nodes: Option<Vec<String>>,
	pub connections: Option<Vec<(String, String)>>,
	pub connection_mode: Option<ConnectionMode>,
	pub thread_color: Option<String>,
	pub thread_thickness: Option<f64>,
	pub glow: Option<bool>,
	pub thread_style: Option<ThreadStyle>,
	pub density: Option<f64>,
	pub animation: Option<Animation>,
	pub animation_speed: Option<f64>,
}

impl From<OptionsRecord> for OptionsPatch {
	fn from(r: OptionsRecord) -> Self {
		Self {
			selected_nodes: Some(r.selected_nodes),
			connections: Some(r.connections),
			connection_mode: Some(r.connection_mode),
			thread_color: Some(r.thread_color),
			thread_thickness: Some(r.thread_thickness),
			glow: Some(r.glow),
			thread_style: Some(r.thread_style),
			density: Some(r.density),
			animation: Some(r.animation),
			animation_speed: Some(r.animation_speed),
		}
	}
}

impl OptionsRecord {
	/// Shallow, last-write-wins merge of `patch` over `self`.
	pub fn merged(mut self, patch: OptionsPatch) -> Self {
		macro_rules! take {
			($($field:ident),*) => {
				$(if let Some(v) = patch.$field {
					self.$field = v;
				})*
			};
		}
		take!(
			selected_nodes,
			connections,
			connection_mode,
			thread_color,
			thread_thickness,
			glow,
			thread_style,
			density,
			animation,
			animation_speed
		);
		self
	}

	/// Decode a persisted document, falling back to defaults per field.
	///
	/// Fields that are missing or fail to decode keep their default, so a
	/// single bad value never discards the rest of the record. Anything that
	/// is not a JSON object yields the defaults.
	pub fn from_json_lenient(raw: &str) -> Self {
		let defaults = Self::default();
		let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(raw) else {
			return defaults;
		};
		let Ok(Value::Object(mut base)) = serde_json::to_value(&defaults) else {
			return defaults;
		};

		for (key, value) in parsed {
			let Some(previous) = base.get(&key).cloned() else {
				continue;
			};
			base.insert(key.clone(), value);
			if Self::decode(&base).is_none() {
				log::debug!("options field {key:?} is invalid, keeping default");
				base.insert(key, previous);
			}
		}
		Self::decode(&base).unwrap_or(defaults)
	}

	fn decode(map: &Map<String, Value>) -> Option<Self> {
		serde_json::from_value(Value::Object(map.clone())).ok()
	}

	/// Whether the unordered pair `(a, b)` is in the explicit connections.
	pub fn has_connection(&self, a: &str, b: &str) -> bool {
		self.connections
			.iter()
			.any(|(x, y)| (x == a && y == b) || (x == b && y == a))
	}
}
