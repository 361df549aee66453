//! The value bridge: conversion between the wire representation of a
//! selection and the persisted model attribute.
//!
//! Read path: dotted-path attribute lookup, then JSON-text decoding unless
//! single-select or JSON-storage mode is active. Write path: JSON-text
//! encoding of the submitted sequence, or direct assignment for scalars,
//! nulls and JSON-storage mode. Decode failures are absorbed into `None` —
//! they are data errors, not integrator mistakes — and logged at debug level.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error::{MultiselectError, Result};
use crate::field::Multiselect;
use crate::model::{FormModel, FormRequest};
use crate::options::OptionsSource;
use crate::relation::{BelongsToManyCache, pluck_primary_keys, sync_relation};

impl Multiselect {
	/// Resolve the field's wire value from a model instance.
	///
	/// In belongs-to-many mode this also populates `meta["options"]` from the
	/// related listing (via the process-wide cache) and projects the current
	/// relation rows to their primary keys.
	pub fn resolve(&mut self, resource: &dyn FormModel) -> Option<Value> {
		if let Some(relation) = &self.relation {
			let related = Arc::clone(&relation.related);
			let options = BelongsToManyCache::get_or_load(&*related);
			self.meta
				.insert("options", OptionsSource::Flat(options).normalize());

			let current = resource.get_field(&self.attribute);
			return Some(pluck_primary_keys(current, related.primary_key()));
		}

		let value = resolve_path(resource, &self.attribute)?;
		if self.save_as_json || self.is_single_select() {
			return Some(value);
		}

		match value {
			Value::Array(_) => Some(value),
			Value::Object(map) => Some(Value::Array(map.into_values().collect())),
			other => decode_json_text(&other),
		}
	}

	/// Stage the submitted value onto the model attribute.
	///
	/// Missing input normalizes to null; a null is stored as-is (never as the
	/// literal string `"null"`). Persistence stays with the caller. In
	/// belongs-to-many mode no attribute is written — instead a post-save
	/// hook is queued that syncs the submitted primary keys onto the
	/// relation, failing fast on misconfiguration.
	pub fn fill(&self, request: &dyn FormRequest, model: &mut dyn FormModel) -> Result<()> {
		if self.relation.is_some() {
			let keys = match request.input(&self.attribute) {
				Some(Value::Array(values)) => values,
				Some(Value::Null) | None => Vec::new(),
				Some(single) => vec![single],
			};
			let attribute = self.attribute.clone();
			model.on_saved(Box::new(move |saved: &mut dyn FormModel| {
				sync_relation(saved, &attribute, keys).map(|_| ())
			}));
			return Ok(());
		}

		let value = request.input(&self.attribute).unwrap_or(Value::Null);
		let stored = if self.is_single_select() {
			value
		} else if self.save_as_json || value.is_null() {
			value
		} else {
			Value::String(serde_json::to_string(&value).unwrap_or_default())
		};

		model
			.set_field(&self.attribute, stored)
			.map_err(|reason| MultiselectError::AttributeWrite {
				attribute: self.attribute.clone(),
				reason,
			})
	}

	/// Resolve the value used when building a page response.
	///
	/// An absent stored value yields `None` regardless of any registered
	/// callback. Otherwise the stored value is JSON-decoded (passed through
	/// untouched in JSON-storage mode) and handed to the callback registered
	/// via [`resolve_for_page_response_using`][r], whose result is returned
	/// verbatim.
	///
	/// [r]: Multiselect::resolve_for_page_response_using
	pub fn resolve_response_value(
		&self,
		stored: Option<&Value>,
		template_model: &Value,
	) -> Option<Value> {
		let stored = stored?;
		let parsed = if self.save_as_json {
			Some(stored.clone())
		} else {
			decode_json_text(stored)
		};

		match &self.page_response_resolver {
			Some(resolver) => resolver(parsed, template_model),
			None => parsed,
		}
	}
}

/// Dotted-path lookup against a model, normalizing the arrow-style separator
/// (`meta->color`) to dots first. Nested segments traverse the JSON returned
/// for the leading attribute; numeric segments index into arrays.
pub(crate) fn resolve_path(resource: &dyn FormModel, attribute: &str) -> Option<Value> {
	let path = attribute.replace("->", ".");
	let mut segments = path.split('.');
	let mut current = resource.get_field(segments.next()?)?;

	for segment in segments {
		current = match current {
			Value::Object(mut map) => map.remove(segment)?,
			Value::Array(items) => {
				let index: usize = segment.parse().ok()?;
				items.into_iter().nth(index)?
			}
			_ => return None,
		};
	}
	Some(current)
}

/// Decode a stored value as JSON text. Non-string scalars are decoded from
/// their textual form, matching the loose stored-value typing of admin
/// backends. Malformed text yields `None`.
pub(crate) fn decode_json_text(value: &Value) -> Option<Value> {
	if value.is_null() {
		return None;
	}
	let text = match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	};
	match serde_json::from_str(&text) {
		Ok(decoded) => Some(decoded),
		Err(error) => {
			debug!(%error, "stored multiselect value is not valid JSON, resolving to null");
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::SavedHook;
	use serde_json::json;
	use std::collections::HashMap;

	struct Record {
		attributes: HashMap<String, Value>,
	}

	impl Record {
		fn new(attributes: Vec<(&str, Value)>) -> Self {
			Self {
				attributes: attributes
					.into_iter()
					.map(|(k, v)| (k.to_string(), v))
					.collect(),
			}
		}
	}

	impl FormModel for Record {
		fn model_key(&self) -> &str {
			"tests.Record"
		}

		fn get_field(&self, name: &str) -> Option<Value> {
			self.attributes.get(name).cloned()
		}

		fn set_field(&mut self, name: &str, value: Value) -> std::result::Result<(), String> {
			self.attributes.insert(name.to_string(), value);
			Ok(())
		}

		fn on_saved(&mut self, _hook: SavedHook) {}
	}

	#[test]
	fn test_resolve_decodes_json_text() {
		let record = Record::new(vec![("colors", json!("[10,20]"))]);
		let mut field = Multiselect::new("colors");

		assert_eq!(field.resolve(&record), Some(json!([10, 20])));
	}

	#[test]
	fn test_resolve_passes_arrays_through() {
		let record = Record::new(vec![("colors", json!([1, 2, 3]))]);
		let mut field = Multiselect::new("colors");

		assert_eq!(field.resolve(&record), Some(json!([1, 2, 3])));
	}

	#[test]
	fn test_resolve_casts_objects_to_sequences() {
		let record = Record::new(vec![("colors", json!({"a": 10, "b": 20}))]);
		let mut field = Multiselect::new("colors");

		assert_eq!(field.resolve(&record), Some(json!([10, 20])));
	}

	#[test]
	fn test_resolve_invalid_json_is_absorbed() {
		let record = Record::new(vec![("colors", json!("not json"))]);
		let mut field = Multiselect::new("colors");

		assert_eq!(field.resolve(&record), None);
	}

	#[test]
	fn test_resolve_single_select_returns_raw_value() {
		let record = Record::new(vec![("status", json!("draft"))]);
		let mut field = Multiselect::new("status").single_select(true);

		assert_eq!(field.resolve(&record), Some(json!("draft")));
	}

	#[test]
	fn test_resolve_save_as_json_returns_raw_structure() {
		let record = Record::new(vec![("colors", json!([{"deep": true}]))]);
		let mut field = Multiselect::new("colors").save_as_json(true);

		assert_eq!(field.resolve(&record), Some(json!([{"deep": true}])));
	}

	#[test]
	fn test_resolve_arrow_path_is_normalized() {
		let record = Record::new(vec![("meta", json!({"colors": "[1,2]"}))]);
		let mut field = Multiselect::new("colors").attribute("meta->colors");

		assert_eq!(field.resolve(&record), Some(json!([1, 2])));
	}

	#[test]
	fn test_resolve_nested_dotted_path() {
		let record = Record::new(vec![(
			"settings",
			json!({"display": {"tags": [{"id": 7}]}}),
		)]);
		let mut field = Multiselect::new("tags")
			.attribute("settings.display.tags")
			.save_as_json(true);

		assert_eq!(field.resolve(&record), Some(json!([{"id": 7}])));
	}

	#[test]
	fn test_fill_encodes_sequences_as_json_text() {
		let mut record = Record::new(vec![]);
		let mut request = HashMap::new();
		request.insert("colors".to_string(), json!([10, 20]));

		let field = Multiselect::new("colors");
		field.fill(&request, &mut record).unwrap();

		assert_eq!(record.get_field("colors"), Some(json!("[10,20]")));
	}

	#[test]
	fn test_fill_missing_input_stores_null() {
		let mut record = Record::new(vec![]);
		let request: HashMap<String, Value> = HashMap::new();

		let field = Multiselect::new("colors");
		field.fill(&request, &mut record).unwrap();

		// Null, never the literal string "null"
		assert_eq!(record.get_field("colors"), Some(Value::Null));
	}

	#[test]
	fn test_fill_single_select_stores_scalar() {
		let mut record = Record::new(vec![]);
		let mut request = HashMap::new();
		request.insert("status".to_string(), json!("published"));

		let field = Multiselect::new("status").single_select(true);
		field.fill(&request, &mut record).unwrap();

		assert_eq!(record.get_field("status"), Some(json!("published")));
	}

	#[test]
	fn test_fill_save_as_json_stores_structure() {
		let mut record = Record::new(vec![]);
		let mut request = HashMap::new();
		request.insert("colors".to_string(), json!([10, 20]));

		let field = Multiselect::new("colors").save_as_json(true);
		field.fill(&request, &mut record).unwrap();

		assert_eq!(record.get_field("colors"), Some(json!([10, 20])));
	}

	#[test]
	fn test_fill_then_resolve_round_trips() {
		let mut record = Record::new(vec![]);
		let mut request = HashMap::new();
		request.insert("colors".to_string(), json!(["red", "blue", 3]));

		let mut field = Multiselect::new("colors");
		field.fill(&request, &mut record).unwrap();

		assert_eq!(field.resolve(&record), Some(json!(["red", "blue", 3])));
	}

	#[test]
	fn test_response_value_absent_is_none_even_with_callback() {
		let field = Multiselect::new("colors")
			.resolve_for_page_response_using(|_, _| Some(json!("never")));

		assert_eq!(field.resolve_response_value(None, &json!({})), None);
	}

	#[test]
	fn test_response_value_decodes_stored_text() {
		let field = Multiselect::new("colors");
		assert_eq!(
			field.resolve_response_value(Some(&json!("[1,2]")), &json!({})),
			Some(json!([1, 2]))
		);
	}

	#[test]
	fn test_response_value_save_as_json_passes_through() {
		let field = Multiselect::new("colors").save_as_json(true);
		assert_eq!(
			field.resolve_response_value(Some(&json!([1, 2])), &json!({})),
			Some(json!([1, 2]))
		);
	}

	#[test]
	fn test_response_callback_receives_decoded_value_and_model() {
		let field = Multiselect::new("colors").resolve_for_page_response_using(
			|decoded, template_model| {
				assert_eq!(decoded, Some(json!([1, 2])));
				assert_eq!(template_model, &json!({"id": 9}));
				Some(json!(["mapped"]))
			},
		);

		assert_eq!(
			field.resolve_response_value(Some(&json!("[1,2]")), &json!({"id": 9})),
			Some(json!(["mapped"]))
		);
	}
}
