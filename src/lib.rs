//! Two-screen thread installation: a tablet control panel and a projector
//! canvas kept in sync through localStorage.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
mod constants;
pub mod error;
pub mod options;
mod pages;

// Top-Level pages
use crate::pages::not_found::NotFound;
use crate::pages::projector::Projector;
use crate::pages::tablet::Tablet;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Routes the tablet panel at `/` and the projector at `/projector`.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		<Title text="Threads" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Tablet />
				<Route path=path!("/projector") view=Projector />
			</Routes>
		</Router>
	}
}
