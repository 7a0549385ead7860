//! The persisted options record shared by the tablet and the projector.

mod record;
mod slot;
mod store;

pub use record::{Animation, ConnectionMode, OptionsPatch, OptionsRecord, ThreadStyle};
pub use slot::{LocalStorageSlot, OptionsSlot, Subscription};
pub use store::OptionsStore;
