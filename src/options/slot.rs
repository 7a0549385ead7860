use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Storage, StorageEvent, Window};

use crate::error::{Result, StoreError};

/// A single persisted key-value slot shared between browsing contexts.
pub trait OptionsSlot {
	/// Current raw value, `None` when the key was never written.
	fn read(&self) -> Result<Option<String>>;
	/// Replace the stored value. Does not notify this context's watchers.
	fn write(&self, raw: &str) -> Result<()>;
	/// Call `on_change` whenever another context modifies the slot.
	fn watch(&self, on_change: Box<dyn Fn()>) -> Result<Subscription>;
}

/// Handle to a registered change listener.
///
/// Dropping the handle keeps the listener registered; [`Subscription::unsubscribe`]
/// removes it. Taking `self` by value means it can only run once.
#[must_use = "call unsubscribe() to stop notifications"]
pub struct Subscription {
	release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// Wrap the teardown for a listener.
	pub fn new(release: impl FnOnce() + 'static) -> Self {
		Self {
			release: Some(Box::new(release)),
		}
	}

	/// A handle with nothing to release, for contexts without change events.
	pub fn inert() -> Self {
		Self { release: None }
	}

	/// Stop all future notifications for this listener.
	pub fn unsubscribe(mut self) {
		if let Some(release) = self.release.take() {
			release();
		}
	}
}

/// Browser `localStorage` slot, notified through the `storage` event.
///
/// The `storage` event only fires in *other* documents of the same origin,
/// which gives exactly the "external changes only" contract.
#[derive(Clone, Copy, Debug)]
pub struct LocalStorageSlot {
	key: &'static str,
}

impl LocalStorageSlot {
	/// Slot stored under `key`.
	pub const fn new(key: &'static str) -> Self {
		Self { key }
	}

	fn window() -> Result<Window> {
		web_sys::window().ok_or(StoreError::Unavailable)
	}

	fn storage() -> Result<Storage> {
		Self::window()?
			.local_storage()?
			.ok_or(StoreError::Unavailable)
	}
}

impl OptionsSlot for LocalStorageSlot {
	fn read(&self) -> Result<Option<String>> {
		Ok(Self::storage()?.get_item(self.key)?)
	}

	fn write(&self, raw: &str) -> Result<()> {
		Ok(Self::storage()?.set_item(self.key, raw)?)
	}

	fn watch(&self, on_change: Box<dyn Fn()>) -> Result<Subscription> {
		let window = Self::window()?;
		let storage = Self::storage()?;
		let key = self.key;
		let handler = Closure::<dyn FnMut(StorageEvent)>::new(move |ev: StorageEvent| {
			if ev.key().as_deref() != Some(key) || ev.storage_area().as_ref() != Some(&storage) {
				return;
			}
			on_change();
		});
		window.add_event_listener_with_callback("storage", handler.as_ref().unchecked_ref())?;

		Ok(Subscription::new(move || {
			let _ = window
				.remove_event_listener_with_callback("storage", handler.as_ref().unchecked_ref());
			drop(handler);
		}))
	}
}

#[cfg(test)]
pub(crate) mod memory {
	use std::cell::{Cell, RefCell};
	use std::collections::BTreeMap;
	use std::rc::Rc;

	use super::*;

	#[derive(Default)]
	struct Inner {
		value: RefCell<Option<String>>,
		fail_writes: Cell<bool>,
		listeners: RefCell<BTreeMap<usize, Rc<dyn Fn()>>>,
		next_id: Cell<usize>,
	}

	/// In-memory slot standing in for localStorage in host tests.
	#[derive(Clone, Default)]
	pub struct MemorySlot(Rc<Inner>);

	impl MemorySlot {
		pub fn with_raw(raw: &str) -> Self {
			let slot = Self::default();
			*slot.0.value.borrow_mut() = Some(raw.into());
			slot
		}

		pub fn raw(&self) -> Option<String> {
			self.0.value.borrow().clone()
		}

		pub fn fail_writes(&self, fail: bool) {
			self.0.fail_writes.set(fail);
		}

		pub fn listener_count(&self) -> usize {
			self.0.listeners.borrow().len()
		}

		/// Write as if from another browsing context, then notify.
		pub fn external_write(&self, raw: &str) {
			*self.0.value.borrow_mut() = Some(raw.into());
			let listeners: Vec<_> = self.0.listeners.borrow().values().cloned().collect();
			for listener in listeners {
				listener();
			}
		}
	}

	impl OptionsSlot for MemorySlot {
		fn read(&self) -> Result<Option<String>> {
			Ok(self.raw())
		}

		fn write(&self, raw: &str) -> Result<()> {
			if self.0.fail_writes.get() {
				return Err(StoreError::Js("QuotaExceededError".into()));
			}
			*self.0.value.borrow_mut() = Some(raw.into());
			Ok(())
		}

		fn watch(&self, on_change: Box<dyn Fn()>) -> Result<Subscription> {
			let id = self.0.next_id.get();
			self.0.next_id.set(id + 1);
			self.0.listeners.borrow_mut().insert(id, Rc::from(on_change));
			let inner = Rc::downgrade(&self.0);
			Ok(Subscription::new(move || {
				if let Some(inner) = inner.upgrade() {
					inner.listeners.borrow_mut().remove(&id);
				}
			}))
		}
	}
}
