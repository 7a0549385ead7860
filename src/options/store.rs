use log::{debug, warn};

use super::record::{OptionsPatch, OptionsRecord};
use super::slot::{LocalStorageSlot, OptionsSlot, Subscription};
use crate::constants::STORAGE_KEY;
use crate::error::StoreError;

/// Load/save/subscribe over a persisted slot.
///
/// Every failure is absorbed here: reads degrade to defaults and writes are
/// dropped, so callers always get a complete record back.
#[derive(Clone, Copy, Debug)]
pub struct OptionsStore<S> {
	slot: S,
}

impl OptionsStore<LocalStorageSlot> {
	/// The store both screens share.
	pub const fn local() -> Self {
		Self::new(LocalStorageSlot::new(STORAGE_KEY))
	}
}

impl<S: OptionsSlot> OptionsStore<S> {
	/// Store backed by `slot`.
	pub const fn new(slot: S) -> Self {
		Self { slot }
	}

	/// Persisted record merged over defaults, or defaults if absent/unreadable.
	pub fn load(&self) -> OptionsRecord {
		match self.slot.read() {
			Ok(Some(raw)) => OptionsRecord::from_json_lenient(&raw),
			Ok(None) => OptionsRecord::default(),
			Err(e) => {
				debug!("options read failed, using defaults: {e}");
				OptionsRecord::default()
			}
		}
	}

	/// Merge `patch` over the current record and persist the result.
	///
	/// Returns the merged record even when the write fails.
	pub fn save(&self, patch: OptionsPatch) -> OptionsRecord {
		self.save_over(self.load(), patch)
	}

	/// Merge `patch` over `base` and persist the result.
	///
	/// A writer that keeps its own copy passes it as `base`, so its earlier
	/// changes survive even if they never reached the slot.
	pub fn save_over(&self, base: OptionsRecord, patch: OptionsPatch) -> OptionsRecord {
		let merged = base.merged(patch);
		let written = serde_json::to_string(&merged)
			.map_err(StoreError::from)
			.and_then(|raw| self.slot.write(&raw));
		if let Err(e) = written {
			warn!("options write dropped: {e}");
		}
		merged
	}

	/// Restore and persist the default record.
	pub fn reset(&self) -> OptionsRecord {
		self.save(OptionsRecord::default().into())
	}
}

impl<S: OptionsSlot + Clone + 'static> OptionsStore<S> {
	/// Deliver the current record now and a fresh one after every external change.
	pub fn subscribe(&self, callback: impl Fn(OptionsRecord) + 'static) -> Subscription {
		let store = self.clone();
		let callback = std::rc::Rc::new(callback);
		let on_change = {
			let callback = callback.clone();
			Box::new(move || callback(store.load()))
		};
		let subscription = self.slot.watch(on_change).unwrap_or_else(|e| {
			warn!("options change feed unavailable: {e}");
			Subscription::inert()
		});
		callback(self.load());
		subscription
	}
}
