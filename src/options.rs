//! Option list construction and normalization.
//!
//! The select component consumes either a flat list of options or a list of
//! labelled option groups. Which shape the caller wants is chosen by an
//! explicit constructor ([`OptionsSource::flat`] or [`OptionsSource::grouped`])
//! rather than inspecting the runtime shape of the input.

use serde::Serialize;
use serde_json::Value;

/// A single selectable option shown to the user.
///
/// `value` is a string or number; uniqueness within a flat list is expected
/// but not enforced by this layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
	pub label: String,
	pub value: Value,
}

impl SelectOption {
	pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
		Self {
			label: label.into(),
			value: value.into(),
		}
	}
}

/// A labelled group of options, rendered as an optgroup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionGroup {
	pub label: String,
	pub values: Vec<SelectOption>,
}

/// Input record for grouped options: an option plus the group it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedEntry {
	pub value: Value,
	pub label: String,
	pub group: String,
}

impl GroupedEntry {
	pub fn new(value: impl Into<Value>, label: impl Into<String>, group: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
			group: group.into(),
		}
	}
}

/// The options supplied to a multiselect field, before normalization.
///
/// # Examples
///
/// ```
/// use reinhardt_multiselect::OptionsSource;
///
/// let flat = OptionsSource::flat([(10, "Red"), (20, "Blue")]);
/// let computed = OptionsSource::from_fn(|| OptionsSource::flat([("a", "A")]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsSource {
	/// Value → label pairs, in insertion order
	Flat(Vec<(Value, String)>),
	/// Group records, partitioned by `group` during normalization
	Grouped(Vec<GroupedEntry>),
}

impl OptionsSource {
	pub fn flat<I, V, L>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (V, L)>,
		V: Into<Value>,
		L: Into<String>,
	{
		Self::Flat(
			pairs
				.into_iter()
				.map(|(value, label)| (value.into(), label.into()))
				.collect(),
		)
	}

	pub fn grouped(entries: impl IntoIterator<Item = GroupedEntry>) -> Self {
		Self::Grouped(entries.into_iter().collect())
	}

	/// Build options from a supplier, invoked eagerly exactly once.
	pub fn from_fn(supplier: impl FnOnce() -> OptionsSource) -> Self {
		supplier()
	}

	/// Normalize into the JSON the select component renders.
	///
	/// Flat input becomes `[{label, value}, ...]` in insertion order. Grouped
	/// input is partitioned by `group`, preserving the first-seen order of
	/// each group and the insertion order within a group, and becomes
	/// `[{label, values: [{label, value}, ...]}, ...]`.
	pub fn normalize(self) -> Value {
		match self {
			Self::Flat(pairs) => {
				let options: Vec<SelectOption> = pairs
					.into_iter()
					.map(|(value, label)| SelectOption { label, value })
					.collect();
				serde_json::to_value(options).unwrap_or_default()
			}
			Self::Grouped(entries) => {
				let mut groups: Vec<OptionGroup> = Vec::new();
				for entry in entries {
					let option = SelectOption {
						label: entry.label,
						value: entry.value,
					};
					match groups.iter_mut().find(|g| g.label == entry.group) {
						Some(group) => group.values.push(option),
						None => groups.push(OptionGroup {
							label: entry.group,
							values: vec![option],
						}),
					}
				}
				serde_json::to_value(groups).unwrap_or_default()
			}
		}
	}
}

impl<V: Into<Value>, L: Into<String>> From<Vec<(V, L)>> for OptionsSource {
	fn from(pairs: Vec<(V, L)>) -> Self {
		Self::flat(pairs)
	}
}

impl<V: Into<Value>, L: Into<String>, const N: usize> From<[(V, L); N]> for OptionsSource {
	fn from(pairs: [(V, L); N]) -> Self {
		Self::flat(pairs)
	}
}

impl From<Vec<GroupedEntry>> for OptionsSource {
	fn from(entries: Vec<GroupedEntry>) -> Self {
		Self::Grouped(entries)
	}
}

impl<const N: usize> From<[GroupedEntry; N]> for OptionsSource {
	fn from(entries: [GroupedEntry; N]) -> Self {
		Self::grouped(entries)
	}
}
