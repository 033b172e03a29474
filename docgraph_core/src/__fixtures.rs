use std::path::Path;

use crate::BuildEnvironment;
use crate::BuildMode;
use crate::DocgraphConfig;
use crate::DocgraphResult;
use crate::MemoryRegistry;
use crate::NodeId;
use crate::RawDocument;
use crate::SourceBucket;
use crate::TransformContext;
use crate::TransformOutcome;
use crate::transform_document;

pub(crate) const OPTIONS_DIRECTIVE: &str = "<%= partial partial_version('realtime/options') %>";

pub(crate) const CHANNELS_DOCUMENT: &str = "---
title: Channels
meta_description: Publish and subscribe.
languages: javascript
internal_note: dropped
---

inline-toc.
  - Publishing#publish
  - Subscribing

h2(#publish). Publishing

<%= partial partial_version('realtime/options') %>

h2(#subscribing). Subscribing
";

pub(crate) const CHANNELS_BODY_BEFORE_PARTIAL: &str = "h2(#publish). Publishing\n\n";
pub(crate) const CHANNELS_BODY_AFTER_PARTIAL: &str = "\n\nh2(#subscribing). Subscribing\n";

pub(crate) const WITHOUT_META_DESCRIPTION: &str = "---
title: Presence
---

h1. Presence
";

pub(crate) fn normal_document(path: &str, content: &str) -> RawDocument {
	RawDocument {
		id: NodeId::new(format!("source:normal:{path}")),
		path: path.to_string(),
		content: content.to_string(),
		bucket: SourceBucket::Normal,
	}
}

pub(crate) fn partial_document(path: &str, content: &str) -> RawDocument {
	RawDocument {
		id: NodeId::new(format!("source:partials:{path}")),
		path: path.to_string(),
		content: content.to_string(),
		bucket: SourceBucket::Partials,
	}
}

pub(crate) fn development() -> BuildEnvironment {
	BuildEnvironment {
		mode: BuildMode::Development,
		editor_warnings_off: false,
	}
}

pub(crate) fn production() -> BuildEnvironment {
	BuildEnvironment {
		mode: BuildMode::Production,
		editor_warnings_off: false,
	}
}

/// Run every document through the assembler with a fresh registry.
pub(crate) fn transform_all(
	config: &DocgraphConfig,
	environment: BuildEnvironment,
	documents: &[RawDocument],
) -> DocgraphResult<(MemoryRegistry, Vec<TransformOutcome>)> {
	let mut registry = MemoryRegistry::new();
	let mut ctx = TransformContext::from_config(&mut registry, config, environment);
	let mut outcomes = Vec::with_capacity(documents.len());

	for document in documents {
		outcomes.push(transform_document(&mut ctx, document)?);
	}

	Ok((registry, outcomes))
}

pub(crate) fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}
