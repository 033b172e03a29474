use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DocgraphError {
	#[error(transparent)]
	#[diagnostic(code(docgraph::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to serialize node content: {0}")]
	#[diagnostic(code(docgraph::serialize))]
	Serialize(#[from] serde_json::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(docgraph::config_parse),
		help("check that docgraph.toml is valid TOML with [sources], [node_types] and/or [meta] sections")
	)]
	ConfigParse(String),

	#[error("No meta_description for file: {path}")]
	#[diagnostic(
		code(docgraph::missing_meta_description),
		help(
			"Please add a custom meta_description to the frontmatter YAML at the top of the file. \
			 Set EDITOR_WARNINGS_OFF=true to silence this check while drafting."
		)
	)]
	MissingMetaDescription { path: String },

	#[error("inline table of contents in `{path}` is not valid YAML: {reason}")]
	#[diagnostic(
		code(docgraph::malformed_inline_toc),
		help("the block after `inline-toc.` must be an indented YAML list or mapping ending at a blank line")
	)]
	MalformedInlineToc { path: String, reason: String },

	#[error("node `{id}` was registered twice with different content")]
	#[diagnostic(
		code(docgraph::conflicting_node),
		help("two sources produced the same node id; check for duplicate paths across buckets")
	)]
	ConflictingNode { id: String },

	#[error("partial reference cycle: {}", chain.join(" -> "))]
	#[diagnostic(
		code(docgraph::partial_cycle),
		help("a partial cannot include itself, directly or through other partials")
	)]
	PartialCycle { chain: Vec<String> },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(docgraph::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

pub type DocgraphResult<T> = Result<T, DocgraphError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
