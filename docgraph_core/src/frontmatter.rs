//! Front matter extraction.
//!
//! A document may open with a fenced YAML header:
//!
//! ```text
//! ---
//! title: Channels
//! meta_description: "Publish and subscribe over channels."
//! redirect_from:
//!   - /docs/realtime/channels
//! ---
//!
//! h2. Body starts here
//! ```
//!
//! The closing fence may also be written as `...`, and `= yaml =` is
//! accepted as an alternative fence pair. Extraction never fails: a missing
//! fence, an unterminated fence or YAML that does not decode to a mapping all
//! produce [`FrontMatter::NoMatch`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml_ng::Value;

const BYTE_ORDER_MARK: char = '\u{feff}';
const FENCES: [&str; 2] = ["---", "= yaml ="];
const ALTERNATE_CLOSING_FENCE: &str = "...";

/// A single front matter value. Scalars are kept as text and sequences of
/// scalars as lists of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
	Text(String),
	List(Vec<String>),
}

impl MetaValue {
	/// The value as a single string, if it is one.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text.as_str()),
			Self::List(_) => None,
		}
	}

	/// True for empty strings and empty lists.
	pub fn is_blank(&self) -> bool {
		match self {
			Self::Text(text) => text.trim().is_empty(),
			Self::List(items) => items.is_empty(),
		}
	}
}

/// Parsed front matter keys. Unrestricted until filtered by
/// [`crate::filter_allowed_meta_fields`].
pub type Attributes = BTreeMap<String, MetaValue>;

/// Outcome of [`extract_front_matter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatter {
	/// The content does not start with a well formed front matter block.
	NoMatch,
	/// The block was found and decoded.
	Matched {
		/// Everything after the closing fence.
		body: String,
		attributes: Attributes,
	},
}

impl FrontMatter {
	pub fn attributes(&self) -> Option<&Attributes> {
		match self {
			Self::NoMatch => None,
			Self::Matched { attributes, .. } => Some(attributes),
		}
	}
}

/// Split a leading front matter block from `content`.
pub fn extract_front_matter(content: &str) -> FrontMatter {
	let Some(block) = find_fenced_block(content) else {
		return FrontMatter::NoMatch;
	};

	let Some(attributes) = decode_attributes(block.yaml) else {
		return FrontMatter::NoMatch;
	};

	FrontMatter::Matched {
		body: content[block.body_start..].to_string(),
		attributes,
	}
}

struct FencedBlock<'a> {
	yaml: &'a str,
	body_start: usize,
}

fn find_fenced_block(content: &str) -> Option<FencedBlock<'_>> {
	let start = if content.starts_with(BYTE_ORDER_MARK) {
		BYTE_ORDER_MARK.len_utf8()
	} else {
		0
	};
	let fence = FENCES
		.iter()
		.find(|fence| content[start..].starts_with(**fence))?;
	let yaml_start = start + fence.len();

	// The opening fence must be alone on its line.
	if !matches!(content[yaml_start..].chars().next(), Some('\n' | '\r')) {
		return None;
	}

	let mut line_start = yaml_start;
	while let Some(offset) = content[line_start..].find('\n') {
		line_start += offset + 1;
		let line = &content[line_start..];

		let Some(closing) = [*fence, ALTERNATE_CLOSING_FENCE]
			.into_iter()
			.find(|candidate| line.starts_with(*candidate))
		else {
			continue;
		};

		let after_closing = line_start + closing.len();
		if let Some(body_start) = body_start_after_fence(content, after_closing) {
			return Some(FencedBlock {
				yaml: &content[yaml_start..line_start],
				body_start,
			});
		}
	}

	None
}

/// The closing fence may only be followed by whitespace on its line. Blank
/// lines after it belong to the fence, so the body starts on the first line
/// holding content (keeping that line's indentation).
fn body_start_after_fence(content: &str, after_closing: usize) -> Option<usize> {
	let rest = &content[after_closing..];
	let run_len = rest
		.find(|ch: char| !ch.is_whitespace())
		.unwrap_or(rest.len());
	let run = &rest[..run_len];

	if run_len == rest.len() {
		return Some(content.len());
	}

	run.rfind('\n').map(|newline| after_closing + newline + 1)
}

fn decode_attributes(yaml: &str) -> Option<Attributes> {
	let value: Value = serde_yaml_ng::from_str(yaml).ok()?;

	let mapping = match value {
		Value::Null => return Some(Attributes::new()),
		Value::Mapping(mapping) => mapping,
		_ => return None,
	};

	let mut attributes = Attributes::new();
	for (key, value) in mapping {
		let Some(key) = scalar_to_string(&key) else {
			continue;
		};

		match to_meta_value(&value) {
			Some(value) => {
				attributes.insert(key, value);
			}
			None => {
				tracing::warn!(key = %key, "dropping front matter value that is not text or a list of text");
			}
		}
	}

	Some(attributes)
}

fn to_meta_value(value: &Value) -> Option<MetaValue> {
	match value {
		Value::Sequence(items) => Some(MetaValue::List(
			items.iter().filter_map(scalar_to_string).collect(),
		)),
		Value::Tagged(tagged) => to_meta_value(&tagged.value),
		other => scalar_to_string(other).map(MetaValue::Text),
	}
}

fn scalar_to_string(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}
