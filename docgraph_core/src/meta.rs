use derive_more::Deref;
use serde::Serialize;

use crate::Attributes;
use crate::MetaValue;

/// Front matter keys kept on a content node when no `[meta] allowed` list is
/// configured.
pub const DEFAULT_ALLOWED_META_FIELDS: [&str; 7] = [
	"title",
	"meta_description",
	"meta_keywords",
	"languages",
	"redirect_from",
	"product",
	"jump_to",
];

/// Fields that page templates always read as lists.
const LIST_FIELDS: [&str; 2] = ["languages", "redirect_from"];

pub const META_DESCRIPTION: &str = "meta_description";

/// The persisted `meta` record of a content node: front matter attributes
/// restricted to the allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref)]
#[serde(transparent)]
pub struct DocumentMeta(Attributes);

impl DocumentMeta {
	/// The `meta_description` field, when present and not blank.
	pub fn meta_description(&self) -> Option<&str> {
		self.0
			.get(META_DESCRIPTION)
			.filter(|value| !value.is_blank())
			.and_then(MetaValue::as_text)
	}

	pub fn has_meta_description(&self) -> bool {
		self.0
			.get(META_DESCRIPTION)
			.is_some_and(|value| !value.is_blank())
	}
}

/// Drop every attribute whose key is not in `allowed`. Unknown keys are
/// silently discarded.
pub fn filter_allowed_meta_fields<S: AsRef<str>>(attributes: &Attributes, allowed: &[S]) -> Attributes {
	attributes
		.iter()
		.filter(|(key, _)| allowed.iter().any(|field| field.as_ref() == key.as_str()))
		.map(|(key, value)| (key.clone(), value.clone()))
		.collect()
}

/// Normalise filtered attributes into the node's `meta` record. List fields
/// written as a single string become one element lists.
pub fn prepare_allowed_meta_fields(attributes: Attributes) -> DocumentMeta {
	let prepared = attributes
		.into_iter()
		.map(|(key, value)| {
			let value = match value {
				MetaValue::Text(text) if LIST_FIELDS.contains(&key.as_str()) => {
					MetaValue::List(vec![text])
				}
				other => other,
			};
			(key, value)
		})
		.collect();

	DocumentMeta(prepared)
}
