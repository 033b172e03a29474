use derive_more::Deref;
use derive_more::Display;
use serde::Deserialize;
use serde::Serialize;

use crate::ArticleType;
use crate::ContentSegment;
use crate::DocumentMeta;
use crate::TocEntry;

pub const MEDIA_TYPE_HTML: &str = "text/html";
pub const MEDIA_TYPE_PLAIN: &str = "text/plain";
pub const MEDIA_TYPE_TEXTILE: &str = "text/x-textile";

/// Identity of a node in the site graph, issued by a
/// [`crate::NodeRegistry`].
#[derive(
	Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Deref, Display,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}
}

/// Integrity hash over a node's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Deref, Display)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
	pub fn new(digest: impl Into<String>) -> Self {
		Self(digest.into())
	}
}

/// Which collection a raw document was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceBucket {
	/// Full pages.
	Normal,
	/// Reusable fragments referenced by partial directives.
	Partials,
}

impl SourceBucket {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Normal => "normal",
			Self::Partials => "partials",
		}
	}
}

/// A source file as handed over by the content-sourcing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
	/// Identity of the source record itself.
	pub id: NodeId,
	/// Path relative to the bucket directory, `/` separated.
	pub path: String,
	pub content: String,
	pub bucket: SourceBucket,
}

/// The file a document was read from. Transformed documents are its
/// children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
	pub id: NodeId,
	pub children: Vec<NodeId>,
	pub bucket: SourceBucket,
	pub relative_path: String,
	pub internal: NodeInternals,
}

/// Bookkeeping shared by every node kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInternals {
	#[serde(rename = "type")]
	pub r#type: String,
	pub content_digest: ContentDigest,
	pub media_type: String,
}

/// A transformed document or partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
	pub id: NodeId,
	pub parent: NodeId,
	pub children: Vec<NodeId>,
	pub article_type: ArticleType,
	pub content_ordered_list: Vec<ContentSegment>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub meta: Option<DocumentMeta>,
	/// Set for full pages only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub slug: Option<String>,
	/// Set for partials only; partials are looked up by path.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub relative_path: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	pub internal: NodeInternals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineTocNode {
	pub id: NodeId,
	pub parent: NodeId,
	pub children: Vec<NodeId>,
	pub slug: String,
	pub table_of_contents: TocEntry,
	pub internal: NodeInternals,
}

/// Marks a document as one version of a versioned product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionNode {
	pub id: NodeId,
	pub parent: NodeId,
	pub children: Vec<NodeId>,
	pub slug: String,
	pub version: String,
	pub internal: NodeInternals,
}

/// One breadcrumb of a document's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathNode {
	pub id: NodeId,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parent: Option<NodeId>,
	pub children: Vec<NodeId>,
	/// Cumulative path up to and including this segment, e.g. `/docs/channels`.
	pub link: String,
	pub label: String,
	pub level: usize,
	pub internal: NodeInternals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
	Source(SourceNode),
	Content(ContentNode),
	InlineToc(InlineTocNode),
	Version(VersionNode),
	Path(PathNode),
}

impl Node {
	pub fn id(&self) -> &NodeId {
		match self {
			Self::Source(node) => &node.id,
			Self::Content(node) => &node.id,
			Self::InlineToc(node) => &node.id,
			Self::Version(node) => &node.id,
			Self::Path(node) => &node.id,
		}
	}

	pub fn internal(&self) -> &NodeInternals {
		match self {
			Self::Source(node) => &node.internal,
			Self::Content(node) => &node.internal,
			Self::InlineToc(node) => &node.internal,
			Self::Version(node) => &node.internal,
			Self::Path(node) => &node.internal,
		}
	}

	pub fn children(&self) -> &[NodeId] {
		match self {
			Self::Source(node) => &node.children,
			Self::Content(node) => &node.children,
			Self::InlineToc(node) => &node.children,
			Self::Version(node) => &node.children,
			Self::Path(node) => &node.children,
		}
	}

	pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
		match self {
			Self::Source(node) => &mut node.children,
			Self::Content(node) => &mut node.children,
			Self::InlineToc(node) => &mut node.children,
			Self::Version(node) => &mut node.children,
			Self::Path(node) => &mut node.children,
		}
	}

	pub fn as_content(&self) -> Option<&ContentNode> {
		match self {
			Self::Content(node) => Some(node),
			_ => None,
		}
	}
}

/// Type name of a node derived from its parent's type, e.g. `FileHtml` and
/// `InlineTOC` give `FileHtmlInlineToc`.
///
/// The concatenation is split into words at separators and case changes,
/// then every word is capitalised with the rest of it lower-cased.
pub fn type_from_parent(parent_type: &str, suffix: &str) -> String {
	split_words(&format!("{parent_type}{suffix}"))
		.iter()
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first
					.to_uppercase()
					.chain(chars.flat_map(char::to_lowercase))
					.collect(),
				None => String::new(),
			}
		})
		.collect()
}

fn split_words(text: &str) -> Vec<String> {
	let chars: Vec<char> = text.chars().collect();
	let mut words = Vec::new();
	let mut current = String::new();

	for (index, &ch) in chars.iter().enumerate() {
		if !ch.is_alphanumeric() {
			if !current.is_empty() {
				words.push(std::mem::take(&mut current));
			}
			continue;
		}

		let previous = index.checked_sub(1).map(|previous| chars[previous]);
		let next = chars.get(index + 1).copied();
		let boundary = match previous {
			Some(previous) if ch.is_uppercase() => {
				previous.is_lowercase()
					|| previous.is_ascii_digit()
					|| (previous.is_uppercase() && next.is_some_and(char::is_lowercase))
			}
			_ => false,
		};

		if boundary && !current.is_empty() {
			words.push(std::mem::take(&mut current));
		}
		current.push(ch);
	}

	if !current.is_empty() {
		words.push(current);
	}

	words
}
