//! Belongs-to-many mode: backing the field with a many-to-many association
//! instead of a plain attribute.
//!
//! The candidate option set is loaded from a [`RelatedList`] and kept in a
//! process-wide cache. The write side queues a post-save hook that replaces
//! the association's member set with the submitted primary keys, failing
//! fast when the named attribute is not a syncable relation.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{MultiselectError, Result};
use crate::model::{FormModel, SyncReport};

/// Listing of the related entity type backing a belongs-to-many field.
///
/// The host implements this over its resource layer: `load_all` returns every
/// instance as a JSON object, from which the field projects
/// `(primary_key, label_attribute)` pairs for the option list.
pub trait RelatedList: Send + Sync {
	/// Stable identifier for the related model type; also the cache key.
	fn model_key(&self) -> &str;

	fn primary_key(&self) -> &str {
		"id"
	}

	/// The attribute displayed as the option label.
	fn label_attribute(&self) -> &str;

	/// Load all instances of the related type.
	fn load_all(&self) -> Vec<Value>;
}

/// Field-side state for belongs-to-many mode.
pub(crate) struct BelongsToMany {
	pub(crate) related: Arc<dyn RelatedList>,
}

impl BelongsToMany {
	pub(crate) fn new(related: Arc<dyn RelatedList>) -> Self {
		Self { related }
	}
}

static OPTIONS_CACHE: Lazy<RwLock<HashMap<String, Vec<(Value, String)>>>> =
	Lazy::new(|| RwLock::new(HashMap::new()));

/// Process-wide cache of related-model option projections.
///
/// Populated lazily on first resolve of a belongs-to-many field and never
/// invalidated automatically: a write to the related entity set is not
/// reflected in the options until [`invalidate`](BelongsToManyCache::invalidate)
/// or [`clear`](BelongsToManyCache::clear) is called, or the process
/// restarts. Concurrent requests race benignly to populate the same key (the
/// overwrite is idempotent). Integrators who mutate the related set at
/// runtime must invalidate the key themselves.
pub struct BelongsToManyCache;

impl BelongsToManyCache {
	/// Return the cached projection for `related`, loading and caching it on
	/// a miss.
	pub fn get_or_load(related: &dyn RelatedList) -> Vec<(Value, String)> {
		{
			let cache = OPTIONS_CACHE.read();
			if let Some(cached) = cache.get(related.model_key()) {
				debug!(model = related.model_key(), "belongs_to_many options cache hit");
				return cached.clone();
			}
		}

		let primary_key = related.primary_key();
		let label_attribute = related.label_attribute();
		let projected: Vec<(Value, String)> = related
			.load_all()
			.into_iter()
			.filter_map(|row| project_row(row, primary_key, label_attribute))
			.collect();

		debug!(
			model = related.model_key(),
			count = projected.len(),
			"belongs_to_many options cache populated"
		);
		OPTIONS_CACHE
			.write()
			.insert(related.model_key().to_string(), projected.clone());
		projected
	}

	/// Drop the cached projection for one related model.
	pub fn invalidate(model_key: &str) {
		OPTIONS_CACHE.write().remove(model_key);
	}

	/// Drop every cached projection.
	pub fn clear() {
		OPTIONS_CACHE.write().clear();
	}
}

fn project_row(row: Value, primary_key: &str, label_attribute: &str) -> Option<(Value, String)> {
	let Value::Object(mut row) = row else {
		return None;
	};
	let key = row.remove(primary_key)?;
	let label = match row.remove(label_attribute)? {
		Value::String(label) => label,
		other => other.to_string(),
	};
	Some((key, label))
}

/// Project the relation's current rows to their primary keys, flattening one
/// level of nesting first. Anything that is not a keyed object is skipped.
pub(crate) fn pluck_primary_keys(current: Option<Value>, primary_key: &str) -> Value {
	let rows = match current {
		Some(Value::Array(rows)) => rows,
		_ => return Value::Array(Vec::new()),
	};

	let mut keys = Vec::new();
	for row in rows {
		match row {
			Value::Array(nested) => {
				for item in nested {
					push_key(&mut keys, item, primary_key);
				}
			}
			item => push_key(&mut keys, item, primary_key),
		}
	}
	Value::Array(keys)
}

fn push_key(keys: &mut Vec<Value>, item: Value, primary_key: &str) {
	if let Value::Object(mut item) = item
		&& let Some(key) = item.remove(primary_key)
	{
		keys.push(key);
	}
}

/// Replace the member set of the named relation with `keys`.
///
/// Both failure modes are configuration errors surfaced immediately, before
/// any persistence attempt: the attribute must resolve to a relation, and
/// that relation must expose sync capability.
pub(crate) fn sync_relation(
	model: &mut dyn FormModel,
	attribute: &str,
	keys: Vec<Value>,
) -> Result<SyncReport> {
	let model_key = model.model_key().to_string();

	let relation = model
		.relation(attribute)
		.ok_or_else(|| MultiselectError::NotARelation {
			model: model_key.clone(),
			attribute: attribute.to_string(),
		})?;

	let many_to_many =
		relation
			.as_many_to_many()
			.ok_or_else(|| MultiselectError::SyncUnsupported {
				model: model_key.clone(),
				attribute: attribute.to_string(),
			})?;

	let report = many_to_many.sync(keys);
	debug!(
		model = %model_key,
		attribute,
		attached = report.attached.len(),
		detached = report.detached.len(),
		"synced belongs_to_many selection"
	);
	Ok(report)
}
