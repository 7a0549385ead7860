mod catalog;
mod component;
mod layout;
mod render;
mod state;

pub use catalog::{CatalogNode, NODES};
pub use component::ThreadCanvas;
