pub mod not_found;
pub mod projector;
pub mod tablet;
