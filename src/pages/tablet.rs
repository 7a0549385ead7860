use leptos::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::components::threads::{CatalogNode, NODES};
use crate::options::{Animation, ConnectionMode, OptionsPatch, OptionsRecord, OptionsStore, ThreadStyle};

const STYLES: &[(ThreadStyle, &str)] = &[
	(ThreadStyle::Solid, "Solid"),
	(ThreadStyle::Dashed, "Dashed"),
	(ThreadStyle::Gradient, "Gradient"),
];

const ANIMATIONS: &[(Animation, &str)] = &[
	(Animation::Static, "Static"),
	(Animation::Pulse, "Pulse"),
	(Animation::Flow, "Flow"),
];

const MODES: &[(ConnectionMode, &str)] = &[
	(ConnectionMode::Selected, "Selected nodes"),
	(ConnectionMode::All, "All pairs"),
	(ConnectionMode::Custom, "Custom pairs"),
];

/// Widget value of a number input, or `fallback` if it does not parse.
fn parse_number(raw: &str, fallback: f64) -> f64 {
	raw.trim()
		.parse::<f64>()
		.ok()
		.filter(|v| v.is_finite())
		.unwrap_or(fallback)
}

/// Select value for an enum, using the same lowercase names as storage.
fn choice_value<T: Serialize>(value: &T) -> String {
	serde_json::to_value(value)
		.ok()
		.and_then(|v| v.as_str().map(str::to_owned))
		.unwrap_or_default()
}

fn parse_choice<T: DeserializeOwned>(raw: String, fallback: T) -> T {
	serde_json::from_value(serde_json::Value::String(raw)).unwrap_or(fallback)
}

fn choices<T>(current: impl Fn() -> T + Copy + Send + Sync + 'static, all: &'static [(T, &'static str)]) -> impl IntoView
where
	T: PartialEq + Copy + Serialize + Send + Sync + 'static,
{
	all.iter()
		.map(|&(value, label)| {
			view! {
				<option value=choice_value(&value) prop:selected=move || current() == value>
					{label}
				</option>
			}
		})
		.collect_view()
}

fn catalog_pairs() -> Vec<(&'static CatalogNode, &'static CatalogNode)> {
	NODES
		.iter()
		.enumerate()
		.flat_map(|(i, a)| NODES[i + 1..].iter().map(move |b| (a, b)))
		.collect()
}

fn toggled<T>(mut items: Vec<T>, item: T, present: impl Fn(&T) -> bool) -> Vec<T> {
	if items.iter().any(&present) {
		items.retain(|x| !present(x));
	} else {
		items.push(item);
	}
	items
}

/// Operator control panel. Every change is persisted immediately so the
/// projector tab picks it up.
#[component]
pub fn Tablet() -> impl IntoView {
	let store = OptionsStore::local();
	let options = RwSignal::new(store.load());
	let defaults = OptionsRecord::default();
	let (default_thickness, default_density, default_speed) =
		(defaults.thread_thickness, defaults.density, defaults.animation_speed);

	let persist = move |patch: OptionsPatch| options.set(store.save_over(options.get_untracked(), patch));
	let patch = OptionsPatch::default;

	let toggle_node = move |id: &'static str| {
		let selected = options.with_untracked(|o| o.selected_nodes.clone());
		let selected = toggled(selected, id.to_string(), |s| s == id);
		persist(OptionsPatch {
			selected_nodes: Some(selected),
			..patch()
		});
	};

	let toggle_pair = move |a: &'static str, b: &'static str| {
		let connections = options.with_untracked(|o| o.connections.clone());
		let connections = toggled(connections, (a.to_string(), b.to_string()), |(x, y)| {
			(x == a && y == b) || (x == b && y == a)
		});
		persist(OptionsPatch {
			connections: Some(connections),
			..patch()
		});
	};

	let style = move || options.with(|o| o.thread_style);
	let animation = move || options.with(|o| o.animation);
	let mode = move || options.with(|o| o.connection_mode);

	view! {
		<main class="tablet">
			<h1>"Threads"</h1>

			<section class="tablet-section">
				<h2>"Nodes"</h2>
				<div class="tablet-nodes">
					{NODES
						.iter()
						.map(|n| {
							let id = n.id;
							let on = move || options.with(|o| o.selected_nodes.iter().any(|s| s == id));
							view! {
								<button
									type="button"
									class=move || if on() { "tablet-node tablet-node--on" } else { "tablet-node" }
									aria-pressed=move || on().to_string()
									on:click=move |_| toggle_node(id)
								>
									{n.label}
								</button>
							}
						})
						.collect_view()}
				</div>
			</section>

			<section class="tablet-section">
				<h2>"Connections"</h2>
				<label>
					"Mode"
					<select on:change=move |ev| persist(OptionsPatch {
						connection_mode: Some(parse_choice(event_target_value(&ev), ConnectionMode::default())),
						..patch()
					})>
						{choices(mode, MODES)}
					</select>
				</label>
				<Show when=move || mode() == ConnectionMode::Custom>
					<div class="tablet-pairs">
						{catalog_pairs()
							.into_iter()
							.map(|(a, b)| {
								let (ia, ib) = (a.id, b.id);
								let on = move || options.with(|o| o.has_connection(ia, ib));
								view! {
									<button
										type="button"
										class=move || if on() { "tablet-pair tablet-pair--on" } else { "tablet-pair" }
										aria-pressed=move || on().to_string()
										on:click=move |_| toggle_pair(ia, ib)
									>
										{format!("{} + {}", a.label, b.label)}
									</button>
								}
							})
							.collect_view()}
					</div>
				</Show>
			</section>

			<section class="tablet-section">
				<h2>"Thread"</h2>
				<label>
					"Color"
					<input
						type="color"
						prop:value=move || options.with(|o| o.thread_color.clone())
						on:input=move |ev| persist(OptionsPatch {
							thread_color: Some(event_target_value(&ev)),
							..patch()
						})
					/>
				</label>
				<label>
					"Thickness"
					<input
						type="range"
						min="1"
						max="12"
						step="0.5"
						prop:value=move || options.with(|o| o.thread_thickness.to_string())
						on:input=move |ev| persist(OptionsPatch {
							thread_thickness: Some(parse_number(&event_target_value(&ev), default_thickness)),
							..patch()
						})
					/>
				</label>
				<label>
					"Density"
					<input
						type="range"
						min="0"
						max="1"
						step="0.05"
						prop:value=move || options.with(|o| o.density.to_string())
						on:input=move |ev| persist(OptionsPatch {
							density: Some(parse_number(&event_target_value(&ev), default_density)),
							..patch()
						})
					/>
				</label>
				<label class="tablet-check">
					<input
						type="checkbox"
						prop:checked=move || options.with(|o| o.glow)
						on:change=move |ev| persist(OptionsPatch {
							glow: Some(event_target_checked(&ev)),
							..patch()
						})
					/>
					"Glow"
				</label>
				<label>
					"Style"
					<select on:change=move |ev| persist(OptionsPatch {
						thread_style: Some(parse_choice(event_target_value(&ev), ThreadStyle::default())),
						..patch()
					})>
						{choices(style, STYLES)}
					</select>
				</label>
			</section>

			<section class="tablet-section">
				<h2>"Animation"</h2>
				<label>
					"Background"
					<select on:change=move |ev| persist(OptionsPatch {
						animation: Some(parse_choice(event_target_value(&ev), Animation::default())),
						..patch()
					})>
						{choices(animation, ANIMATIONS)}
					</select>
				</label>
				<label>
					"Speed"
					<input
						type="range"
						min="0"
						max="1"
						step="0.05"
						prop:value=move || options.with(|o| o.animation_speed.to_string())
						on:input=move |ev| persist(OptionsPatch {
							animation_speed: Some(parse_number(&event_target_value(&ev), default_speed)),
							..patch()
						})
					/>
				</label>
			</section>

			<div class="tablet-actions">
				<button type="button" class="tablet-reset" on:click=move |_| options.set(store.reset())>
					"Reset"
				</button>
				<a class="tablet-open" href="/projector" target="_blank" rel="noopener">
					"Open projector"
				</a>
			</div>
		</main>
	}
}
