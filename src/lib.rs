//! # reinhardt-multiselect
//!
//! Multiselect form field plugin for Reinhardt admin panels.
//!
//! A backend declares a multi-select (or single-select, or tag-input) field
//! on a data model, configures its presentation through chained setters, and
//! the field bridges the wire value to and from the persisted model
//! attribute:
//!
//! - default mode stores the selection as JSON-encoded array text
//! - `single_select` stores one scalar value instead of a list
//! - `save_as_json` passes the structured value through untouched, for SQL
//!   JSON columns
//! - `belongs_to_many` backs the field with a many-to-many association,
//!   syncing the submitted primary keys onto the relation after save
//!
//! The host framework is reached only through the trait seams in
//! [`model`] and [`relation`]; this crate defines no request lifecycle,
//! rendering or persistence of its own.
//!
//! ## Quick start
//!
//! ```
//! use reinhardt_multiselect::Multiselect;
//!
//! let field = Multiselect::new("colors")
//! 	.options([(10, "Red"), (20, "Blue")])
//! 	.placeholder("Pick some colors")
//! 	.max(2);
//!
//! assert!(field.meta().get("options").is_some());
//! ```

pub mod error;
pub mod field;
pub mod meta;
pub mod model;
pub mod options;
pub mod relation;
pub mod value;

pub use error::{MultiselectError, Result};
pub use field::{COMPONENT, Multiselect};
pub use meta::FieldMeta;
pub use model::{FormModel, FormRequest, ManyToMany, Relation, SavedHook, SyncReport};
pub use options::{GroupedEntry, OptionGroup, OptionsSource, SelectOption};
pub use relation::{BelongsToManyCache, RelatedList};

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::error::{MultiselectError, Result};
	pub use crate::field::Multiselect;
	pub use crate::model::{FormModel, FormRequest, ManyToMany, Relation, SyncReport};
	pub use crate::options::{GroupedEntry, OptionsSource};
	pub use crate::relation::{BelongsToManyCache, RelatedList};
}
