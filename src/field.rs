//! The multiselect field and its configuration surface.

use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::meta::FieldMeta;
use crate::options::OptionsSource;
use crate::relation::{BelongsToMany, RelatedList};

pub(crate) type PageResponseResolver =
	Box<dyn Fn(Option<Value>, &Value) -> Option<Value> + Send + Sync>;

/// A multi-select (or single-select, or tag-input) form field bound to a
/// model attribute.
///
/// Configuration accumulates into the field's [`FieldMeta`] through chained
/// setters; none of them validate ranges or types — invalid values propagate
/// to the rendering layer unchanged. The stored representation of the
/// selection depends on two independent flags: `single_select` stores one
/// scalar, `save_as_json` stores the structured value untouched (for SQL JSON
/// columns), and the default stores JSON-encoded array text.
///
/// # Examples
///
/// ```
/// use reinhardt_multiselect::Multiselect;
///
/// let field = Multiselect::new("colors")
/// 	.options([(10, "Red"), (20, "Blue")])
/// 	.placeholder("Pick some colors")
/// 	.max(2)
/// 	.reorderable(true);
///
/// assert_eq!(field.attribute_name(), "colors");
/// ```
pub struct Multiselect {
	pub(crate) name: String,
	pub(crate) attribute: String,
	pub(crate) meta: FieldMeta,
	pub(crate) save_as_json: bool,
	pub(crate) relation: Option<BelongsToMany>,
	pub(crate) page_response_resolver: Option<PageResponseResolver>,
}

/// Frontend component identifier consumed by the admin's rendering layer.
pub const COMPONENT: &str = "multiselect-field";

impl Multiselect {
	/// Create a field whose attribute defaults to its display name.
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		let attribute = name.clone();
		Self {
			name,
			attribute,
			meta: FieldMeta::new(),
			save_as_json: false,
			relation: None,
			page_response_resolver: None,
		}
	}

	/// Bind the field to a model attribute different from its display name.
	pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
		self.attribute = attribute.into();
		self
	}

	/// Set the options available for select.
	///
	/// Replaces `meta["options"]` wholesale; later calls overwrite earlier
	/// ones. Accepts anything convertible to an [`OptionsSource`], including
	/// the eager [`OptionsSource::from_fn`] supplier form.
	pub fn options(mut self, options: impl Into<OptionsSource>) -> Self {
		let normalized = options.into().normalize();
		self.meta.insert("options", normalized);
		self
	}

	/// Set the max number of options the user can select.
	pub fn max(mut self, max: u32) -> Self {
		self.meta.insert("max", json!(max));
		self
	}

	/// Set the placeholder value displayed on the field.
	pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.meta.insert("placeholder", json!(placeholder.into()));
		self
	}

	/// Set the maximum number of options displayed at once.
	pub fn options_limit(mut self, options_limit: u32) -> Self {
		self.meta.insert("optionsLimit", json!(options_limit));
		self
	}

	/// Enable or disable reordering of the selected values.
	pub fn reorderable(mut self, reorderable: bool) -> Self {
		self.meta.insert("reorderable", json!(reorderable));
		self
	}

	/// Use the field as a single select.
	///
	/// Forces the stored value to be a single scalar and not an array.
	pub fn single_select(mut self, single_select: bool) -> Self {
		self.meta.insert("singleSelect", json!(single_select));
		self
	}

	/// Allow the user to submit values outside the configured options.
	pub fn taggable(mut self, taggable: bool) -> Self {
		self.meta.insert("taggable", json!(taggable));
		self
	}

	/// Enable the group-select feature, letting the user pick a whole option
	/// group at once.
	pub fn group_select(mut self, group_select: bool) -> Self {
		self.meta.insert("groupSelect", json!(group_select));
		self
	}

	/// Make this field's options depend on another field's current value.
	pub fn depends_on(mut self, other_field: impl Into<String>) -> Self {
		self.meta.insert("dependsOn", json!(other_field.into()));
		self
	}

	/// Set the dependency options map, keyed by the trigger field's value.
	pub fn depends_on_options<I, K, O>(mut self, options: I) -> Self
	where
		I: IntoIterator<Item = (K, O)>,
		K: Into<String>,
		O: Into<OptionsSource>,
	{
		let mut map = Map::new();
		for (trigger, source) in options {
			map.insert(trigger.into(), source.into().normalize());
		}
		self.meta.insert("dependsOnOptions", Value::Object(map));
		self
	}

	/// Set the max selectable value count per trigger value.
	pub fn depends_on_max<I, K>(mut self, max_options: I) -> Self
	where
		I: IntoIterator<Item = (K, u32)>,
		K: Into<String>,
	{
		let mut map = Map::new();
		for (trigger, max) in max_options {
			map.insert(trigger.into(), json!(max));
		}
		self.meta.insert("dependsOnMax", Value::Object(map));
		self
	}

	/// Store the selection directly in a SQL JSON column, bypassing the
	/// JSON-text encode/decode on both the read and write paths.
	pub fn save_as_json(mut self, save_as_json: bool) -> Self {
		self.save_as_json = save_as_json;
		self
	}

	/// Merge an arbitrary configuration patch into the metadata bag.
	pub fn with_meta(mut self, patch: Map<String, Value>) -> Self {
		self.meta.merge(patch);
		self
	}

	/// Register a callback that post-processes the decoded stored value when
	/// building a page response. See
	/// [`resolve_response_value`](Multiselect::resolve_response_value).
	pub fn resolve_for_page_response_using(
		mut self,
		resolver: impl Fn(Option<Value>, &Value) -> Option<Value> + Send + Sync + 'static,
	) -> Self {
		self.page_response_resolver = Some(Box::new(resolver));
		self
	}

	/// Make the field manage a many-to-many relationship instead of a plain
	/// attribute.
	///
	/// Options are loaded from `related` (through the process-wide
	/// [`BelongsToManyCache`](crate::relation::BelongsToManyCache)), the
	/// resolved value becomes the list of related primary keys, and filling
	/// queues a post-save hook that syncs the submitted keys onto the
	/// relation.
	pub fn belongs_to_many(mut self, related: Arc<dyn RelatedList>) -> Self {
		self.relation = Some(BelongsToMany::new(related));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn attribute_name(&self) -> &str {
		&self.attribute
	}

	pub fn meta(&self) -> &FieldMeta {
		&self.meta
	}

	pub fn is_single_select(&self) -> bool {
		self.meta.flag("singleSelect")
	}

	pub fn is_save_as_json(&self) -> bool {
		self.save_as_json
	}
}
