#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;

pub fn docgraph_cmd() -> Command {
	let mut cmd = Command::new(env!("CARGO_BIN_EXE_docgraph"));
	cmd.env("NO_COLOR", "1")
		.env_remove("NODE_ENV")
		.env_remove("EDITOR_WARNINGS_OFF")
		.env_remove("RUST_LOG");
	cmd
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

pub const CHANNELS_DOCUMENT: &str = "---
title: Channels
meta_description: Publish and subscribe.
---

inline-toc.
  - Publishing#publish

h2(#publish). Publishing

<%= partial partial_version('realtime/options') %>
";

pub const WITHOUT_META_DESCRIPTION: &str = "---
title: Presence
---

h1. Presence
";

/// A small site with one partial, one page and one excluded tutorial.
pub fn sample_site(root: &Path) -> std::io::Result<()> {
	write_file(root, "content/partials/realtime/options.textile", "Options go here.")?;
	write_file(root, "content/textile/docs/channels.textile", CHANNELS_DOCUMENT)?;
	write_file(root, "content/textile/tutorials/intro.textile", "h1. Tutorial\n")
}
