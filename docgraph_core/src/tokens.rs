use serde::Deserialize;
use serde::Serialize;

use crate::lexer::directive_name;

/// What a [`ContentSegment`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentType {
	/// Literal markup, rendered as is.
	Html,
	/// A partial directive, resolved against the partials bucket later.
	#[serde(rename = "Partial")]
	PartialReference,
}

/// One entry of a content node's ordered content list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSegment {
	pub data: String,
	#[serde(rename = "type")]
	pub r#type: SegmentType,
}

impl ContentSegment {
	pub fn html(data: impl Into<String>) -> Self {
		Self {
			data: data.into(),
			r#type: SegmentType::Html,
		}
	}

	pub fn partial(data: impl Into<String>) -> Self {
		Self {
			data: data.into(),
			r#type: SegmentType::PartialReference,
		}
	}

	pub fn is_partial(&self) -> bool {
		self.r#type == SegmentType::PartialReference
	}

	/// The name quoted inside a partial directive, e.g. `realtime/options`
	/// for `<%= partial partial_version('realtime/options') %>`.
	pub fn partial_name(&self) -> Option<&str> {
		if !self.is_partial() {
			return None;
		}

		directive_name(&self.data)
	}
}
