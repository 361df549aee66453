//! The field's metadata bag.
//!
//! Configuration setters on [`Multiselect`](crate::Multiselect) accumulate
//! into this bag; the rendering layer consumes it as a plain JSON object.

use serde_json::{Map, Value};

/// Ordered JSON object carrying the field's presentation configuration.
///
/// Keys recognized by the multiselect component: `options`, `max`,
/// `placeholder`, `optionsLimit`, `reorderable`, `singleSelect`, `taggable`,
/// `groupSelect`, `dependsOn`, `dependsOnOptions`, `dependsOnMax`. Unknown
/// keys are kept untouched so integrators can pass extra data to custom
/// frontends via [`FieldMeta::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMeta(Map<String, Value>);

impl FieldMeta {
	pub fn new() -> Self {
		Self(Map::new())
	}

	/// Upsert a single key. Later writes overwrite earlier ones; no value
	/// validation is performed here.
	pub fn insert(&mut self, key: impl Into<String>, value: Value) {
		self.0.insert(key.into(), value);
	}

	/// Merge a patch into the bag, key by key (`with_meta` semantics).
	pub fn merge(&mut self, patch: Map<String, Value>) {
		for (key, value) in patch {
			self.0.insert(key, value);
		}
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Read a boolean flag, treating anything but `true` as unset.
	pub fn flag(&self, key: &str) -> bool {
		self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
	}

	pub fn as_object(&self) -> &Map<String, Value> {
		&self.0
	}

	pub fn into_inner(self) -> Map<String, Value> {
		self.0
	}
}

impl From<FieldMeta> for Value {
	fn from(meta: FieldMeta) -> Self {
		Value::Object(meta.0)
	}
}
