use leptos::prelude::*;
use thread_installation::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
