use thiserror::Error;

/// Errors raised by the multiselect field.
///
/// Everything here is a configuration error: a wiring mistake by the
/// integrator that must surface immediately. Data-shaped problems (malformed
/// stored JSON, missing request input) are absorbed into null values instead
/// and never reach this enum.
#[derive(Debug, Error)]
pub enum MultiselectError {
	/// The attribute named in `belongs_to_many` is not a relation on the model
	#[error("{model}::{attribute} must be a relation method")]
	NotARelation { model: String, attribute: String },

	/// The relation exists but cannot reconcile a member set
	#[error(
		"{model}::{attribute} does not appear to model a many-to-many or polymorphic many-to-many relation"
	)]
	SyncUnsupported { model: String, attribute: String },

	/// The model rejected an attribute write
	#[error("failed to write attribute {attribute}: {reason}")]
	AttributeWrite { attribute: String, reason: String },
}

/// Result type for multiselect operations
pub type Result<T> = std::result::Result<T, MultiselectError>;
