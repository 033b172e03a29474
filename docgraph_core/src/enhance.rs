use crate::Attributes;
use crate::MetaValue;

/// Normalisation pass run over the raw content of every document before any
/// other processing.
pub trait PreParser {
	fn pre_parse(&self, content: &str) -> String;
}

/// Rewrites the text of each content segment once front matter has been
/// extracted. Implementations must return exactly one string per call so the
/// segment count and order never change.
pub trait Enhancer {
	fn enhance(&self, segment: &str, attributes: &Attributes) -> String;
}

/// Converts CRLF and lone CR line endings to LF so the line anchored
/// matchers only ever see `\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeLineEndings;

impl PreParser for NormalizeLineEndings {
	fn pre_parse(&self, content: &str) -> String {
		normalize_line_endings(content)
	}
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}

/// Leaves every segment untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Enhancer for Passthrough {
	fn enhance(&self, segment: &str, _attributes: &Attributes) -> String {
		segment.to_string()
	}
}

/// Replaces `{{ key }}` with the text value of the front matter attribute
/// `key`. Tokens naming unknown or list valued attributes are kept as they
/// are.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeSubstitution;

impl Enhancer for AttributeSubstitution {
	fn enhance(&self, segment: &str, attributes: &Attributes) -> String {
		let mut output = String::with_capacity(segment.len());
		let mut rest = segment;

		while let Some(open) = rest.find("{{") {
			let after_open = &rest[open + 2..];
			let Some(close) = after_open.find("}}") else {
				break;
			};

			let key = after_open[..close].trim();
			output.push_str(&rest[..open]);

			match attributes.get(key).and_then(MetaValue::as_text) {
				Some(value) => output.push_str(value),
				None => output.push_str(&rest[open..open + 2 + close + 2]),
			}

			rest = &after_open[close + 2..];
		}

		output.push_str(rest);
		output
	}
}
