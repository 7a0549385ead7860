//! Errors raised by the persisted options slot.

/// Result alias for slot operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure talking to the persisted options slot.
///
/// None of these reach the operator: [`crate::options::OptionsStore`] logs
/// them and degrades to defaults or to the in-memory value.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	/// No window or no localStorage in this browsing context.
	#[error("local storage is unavailable")]
	Unavailable,
	/// A storage call threw, e.g. quota exceeded.
	#[error("storage call failed: {0}")]
	Js(String),
	/// The options record could not be encoded.
	#[error("{0}")]
	Json(#[from] serde_json::Error),
}

impl From<wasm_bindgen::JsValue> for StoreError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		Self::Js(format!("{value:?}"))
	}
}
