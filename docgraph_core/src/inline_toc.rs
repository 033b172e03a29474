//! Author written tables of contents.
//!
//! A document can carry one block like
//!
//! ```text
//! inline-toc.
//!   - Introduction#intro
//!   - Channels:
//!     - Publishing#publish
//!     - Subscribing
//!
//! h2(#intro). Introduction
//! ```
//!
//! The block starts with `inline-toc.` at the beginning of a line and runs
//! until the first blank line (or the end of the document). Its body is
//! YAML.

use std::ops::Range;

use serde::Serialize;
use serde_yaml_ng::Value;

const INLINE_TOC_MARKER: &str = "inline-toc.";

/// Result of [`extract_inline_toc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineTocExtraction {
	/// The input with the whole block (marker included) cut out.
	pub no_inline_toc: String,
	/// The YAML body of the block, or `None` without a block.
	pub inline_toc_only: Option<String>,
	/// Byte range of the input that was removed.
	pub removed: Option<Range<usize>>,
}

/// A node of a parsed table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TocEntry {
	/// An empty YAML value, kept as a terminal.
	Empty,
	/// A single link.
	Leaf {
		#[serde(rename = "linkTitle")]
		link_title: String,
		link: String,
	},
	/// A YAML sequence, order preserved.
	List(Vec<TocEntry>),
	/// A YAML mapping, keys in document order.
	Group { content: Vec<TocGroupEntry> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocGroupEntry {
	pub key: String,
	pub values: TocEntry,
}

impl TocEntry {
	/// Build a leaf from a raw label such as `Introduction#getting-started`.
	///
	/// The text after the last `#` is the anchor. Without an anchor the
	/// label with its first character lower-cased is used. Whitespace in the
	/// anchor becomes `-`.
	pub fn leaf(label: &str) -> Self {
		let (link_title, anchor) = match split_anchor(label) {
			Some((title, anchor)) => (title.to_string(), anchor.to_string()),
			None => (label.to_string(), lower_first(label)),
		};

		Self::Leaf {
			link_title,
			link: anchor
				.chars()
				.map(|ch| if ch.is_whitespace() { '-' } else { ch })
				.collect(),
		}
	}
}

/// Find and cut out the first inline TOC block of `content`.
pub fn extract_inline_toc(content: &str) -> InlineTocExtraction {
	let Some(block) = find_block(content) else {
		return InlineTocExtraction {
			no_inline_toc: content.to_string(),
			inline_toc_only: None,
			removed: None,
		};
	};

	let mut no_inline_toc = String::with_capacity(content.len());
	no_inline_toc.push_str(&content[..block.removed.start]);
	no_inline_toc.push_str(&content[block.removed.end..]);

	InlineTocExtraction {
		no_inline_toc,
		inline_toc_only: Some(content[block.body].to_string()),
		removed: Some(block.removed),
	}
}

/// Decode the YAML body of an inline TOC block into a [`TocEntry`] tree.
pub fn parse_inline_toc(inline_toc_only: &str) -> Result<TocEntry, serde_yaml_ng::Error> {
	let value: Value = serde_yaml_ng::from_str(inline_toc_only)?;
	Ok(process_toc_value(&value))
}

/// Turn a decoded YAML value into a [`TocEntry`].
pub fn process_toc_value(value: &Value) -> TocEntry {
	match value {
		Value::Sequence(items) if !items.is_empty() => {
			TocEntry::List(items.iter().map(process_toc_value).collect())
		}
		Value::Mapping(mapping) if !mapping.is_empty() => TocEntry::Group {
			content: mapping
				.iter()
				.map(|(key, values)| TocGroupEntry {
					key: key_to_string(key),
					values: process_toc_value(values),
				})
				.collect(),
		},
		Value::String(label) if !label.is_empty() => TocEntry::leaf(label),
		Value::Tagged(tagged) => process_toc_value(&tagged.value),
		_ => TocEntry::Empty,
	}
}

fn key_to_string(key: &Value) -> String {
	match key {
		Value::String(text) => text.clone(),
		Value::Number(number) => number.to_string(),
		Value::Bool(flag) => flag.to_string(),
		_ => String::new(),
	}
}

struct TocBlock {
	removed: Range<usize>,
	body: Range<usize>,
}

fn is_line_start(content: &str, offset: usize) -> bool {
	offset == 0 || content.as_bytes()[offset - 1] == b'\n'
}

fn whitespace_run_end(content: &str, from: usize) -> usize {
	content[from..]
		.find(|ch: char| !ch.is_whitespace())
		.map_or(content.len(), |offset| from + offset)
}

fn find_block(content: &str) -> Option<TocBlock> {
	let mut search_from = 0;

	while let Some(offset) = content[search_from..].find(INLINE_TOC_MARKER) {
		let marker = search_from + offset;
		search_from = marker + INLINE_TOC_MARKER.len();

		if !is_line_start(content, marker) {
			continue;
		}

		// The body starts on a fresh line after the marker; blank lines and
		// the body's own indentation in between are skipped.
		let after_marker = marker + INLINE_TOC_MARKER.len();
		let run_end = whitespace_run_end(content, after_marker);
		let Some(newline) = content[after_marker..run_end].rfind('\n') else {
			continue;
		};
		let body_start = after_marker + newline + 1;

		let body_end = first_blank_line(content, body_start);
		let removed_end = if body_end == content.len() {
			body_end
		} else {
			let run_end = whitespace_run_end(content, body_end);
			if run_end == content.len() {
				run_end
			} else {
				// Keep the newline that precedes the next line of content.
				content[body_end..run_end]
					.rfind('\n')
					.map_or(body_end, |offset| body_end + offset)
			}
		};

		return Some(TocBlock {
			removed: marker..removed_end,
			body: body_start..body_end,
		});
	}

	None
}

/// Offset of the first whitespace-only line at or after `from`, or the end
/// of `content` when there is none.
fn first_blank_line(content: &str, from: usize) -> usize {
	let mut line_start = from;

	loop {
		let line_end = content[line_start..]
			.find('\n')
			.map_or(content.len(), |offset| line_start + offset);

		if content[line_start..line_end].trim().is_empty() {
			return line_start;
		}

		if line_end == content.len() {
			return content.len();
		}

		line_start = line_end + 1;
	}
}

/// Split on the last `#` that has text on both sides, within the first line
/// where such a `#` exists.
fn split_anchor(label: &str) -> Option<(&str, &str)> {
	label.split(['\n', '\r']).find_map(|line| {
		line.char_indices()
			.rev()
			.find(|(index, ch)| *ch == '#' && *index > 0 && index + 1 < line.len())
			.map(|(index, _)| (&line[..index], &line[index + 1..]))
	})
}

fn lower_first(text: &str) -> String {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}
