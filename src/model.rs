//! Trait seams toward the host framework.
//!
//! The field never talks to a concrete ORM or request type. The host admin
//! panel implements these traits and drives the field during its own request
//! lifecycle; tests implement them with in-memory mocks.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;

/// Hook queued by a field during fill and run by the host after the model
/// has been persisted.
pub type SavedHook = Box<dyn FnOnce(&mut dyn FormModel) -> Result<()> + Send>;

/// A model instance the field reads from and writes to.
///
/// `get_field`/`set_field` address top-level attributes by name; nested
/// lookups are handled by the field itself by traversing the returned JSON.
/// Persistence is the host's responsibility — the field only stages in-memory
/// attribute values and saved hooks.
pub trait FormModel {
	/// Stable identifier for the model type (e.g. `"blog.Post"`), used in
	/// error messages and cache keys.
	fn model_key(&self) -> &str;

	fn get_field(&self, name: &str) -> Option<Value>;

	fn set_field(&mut self, name: &str, value: Value) -> std::result::Result<(), String>;

	/// Look up a relation accessor by attribute name.
	///
	/// Returns `None` when the attribute is a plain column rather than a
	/// relation; models without relations can rely on the default.
	fn relation(&mut self, name: &str) -> Option<&mut dyn Relation> {
		let _ = name;
		None
	}

	/// Register a hook to run after this instance has been saved.
	fn on_saved(&mut self, hook: SavedHook);
}

/// A relation accessor exposed by a model.
pub trait Relation {
	/// Capability probe: whether this relation can reconcile a member set.
	///
	/// Many-to-many and polymorphic many-to-many relations return `Some`;
	/// everything else returns `None` and is rejected by the field as a
	/// configuration error.
	fn as_many_to_many(&mut self) -> Option<&mut dyn ManyToMany>;
}

/// A relation whose member set can be replaced wholesale.
pub trait ManyToMany {
	/// Replace the association's member set with exactly `keys`, performing
	/// the inserts and deletes needed to reconcile the junction state.
	fn sync(&mut self, keys: Vec<Value>) -> SyncReport;
}

/// Keys attached and detached by a [`ManyToMany::sync`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
	pub attached: Vec<Value>,
	pub detached: Vec<Value>,
}

/// The submitted form data, as exposed by the host's request object.
pub trait FormRequest {
	/// The submitted value for a named field, or `None` when absent.
	fn input(&self, name: &str) -> Option<Value>;
}

impl FormRequest for HashMap<String, Value> {
	fn input(&self, name: &str) -> Option<Value> {
		self.get(name).cloned()
	}
}

impl FormRequest for serde_json::Map<String, Value> {
	fn input(&self, name: &str) -> Option<Value> {
		self.get(name).cloned()
	}
}
