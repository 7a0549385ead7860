use leptos::prelude::*;

use crate::components::threads::ThreadCanvas;

/// The display screen: nothing but the canvas.
#[component]
pub fn Projector() -> impl IntoView {
	view! {
		<div class="projector">
			<ThreadCanvas />
		</div>
	}
}
