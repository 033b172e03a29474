use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DocgraphError;
use crate::DocgraphResult;
use crate::meta::DEFAULT_ALLOWED_META_FIELDS;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"docgraph.toml",
	".docgraph.toml",
	".config/docgraph.toml",
];

/// Configuration loaded from a `docgraph.toml` file.
///
/// ```toml
/// mode = "development"
/// editor_warnings = true
///
/// [sources]
/// documents = "content/textile"
/// partials = "content/partials"
/// extensions = ["textile"]
/// exclude = ["drafts/"]
///
/// [node_types]
/// document = "FileHtml"
///
/// [meta]
/// allowed = ["title", "meta_description"]
///
/// [enhance]
/// substitute_attributes = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DocgraphConfig {
	/// Build mode. The `meta_description` authoring check only runs in
	/// development builds.
	#[serde(default)]
	pub mode: BuildMode,
	/// When false, the `meta_description` check is skipped even in
	/// development builds.
	#[serde(default = "default_true")]
	pub editor_warnings: bool,
	/// Where the two source buckets live.
	#[serde(default)]
	pub sources: SourcesConfig,
	/// Type names given to emitted nodes.
	#[serde(default)]
	pub node_types: NodeTypesConfig,
	/// Front matter allow-list.
	#[serde(default)]
	pub meta: MetaConfig,
	/// Optional content enhancement rules.
	#[serde(default)]
	pub enhance: EnhanceConfig,
}

impl Default for DocgraphConfig {
	fn default() -> Self {
		Self {
			mode: BuildMode::default(),
			editor_warnings: true,
			sources: SourcesConfig::default(),
			node_types: NodeTypesConfig::default(),
			meta: MetaConfig::default(),
			enhance: EnhanceConfig::default(),
		}
	}
}

fn default_true() -> bool {
	true
}

/// Whether the build is a local authoring build or a production build.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
	Development,
	#[default]
	Production,
}

impl BuildMode {
	/// Interpret a `NODE_ENV`-style value. Anything other than
	/// `development` is a production build.
	pub fn from_env_value(value: &str) -> Self {
		if value.trim().eq_ignore_ascii_case("development") {
			Self::Development
		} else {
			Self::Production
		}
	}
}

/// The two external flags consulted by the assembler when deciding whether
/// a document without a `meta_description` aborts the build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
	pub mode: BuildMode,
	pub editor_warnings_off: bool,
}

impl BuildEnvironment {
	/// True when missing `meta_description` fields must fail the build.
	pub fn enforces_meta_description(&self) -> bool {
		self.mode == BuildMode::Development && !self.editor_warnings_off
	}
}

/// Source bucket directories and file filters.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
	/// Directory holding full documents, relative to the project root.
	#[serde(default = "default_documents_dir")]
	pub documents: PathBuf,
	/// Directory holding reusable partial fragments.
	#[serde(default = "default_partials_dir")]
	pub partials: PathBuf,
	/// File extensions (without the dot) picked up from both buckets.
	#[serde(default = "default_extensions")]
	pub extensions: Vec<String>,
	/// Gitignore-style patterns excluded from both buckets.
	#[serde(default)]
	pub exclude: Vec<String>,
	/// When true, `.gitignore` files are not consulted.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl Default for SourcesConfig {
	fn default() -> Self {
		Self {
			documents: default_documents_dir(),
			partials: default_partials_dir(),
			extensions: default_extensions(),
			exclude: Vec::new(),
			disable_gitignore: false,
		}
	}
}

fn default_documents_dir() -> PathBuf {
	PathBuf::from("content/textile")
}

fn default_partials_dir() -> PathBuf {
	PathBuf::from("content/partials")
}

fn default_extensions() -> Vec<String> {
	vec!["textile".to_string()]
}

/// Type names for emitted nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeTypesConfig {
	/// Type of the raw records handed over by the sourcing layer.
	#[serde(default = "default_source_type")]
	pub source: String,
	/// Type of full document nodes. Partial documents append `Partial`.
	#[serde(default = "default_document_type")]
	pub document: String,
	/// Type of breadcrumb path nodes.
	#[serde(default = "default_path_type")]
	pub path: String,
}

impl Default for NodeTypesConfig {
	fn default() -> Self {
		Self {
			source: default_source_type(),
			document: default_document_type(),
			path: default_path_type(),
		}
	}
}

fn default_source_type() -> String {
	"File".to_string()
}

fn default_document_type() -> String {
	"FileHtml".to_string()
}

fn default_path_type() -> String {
	"DocumentPath".to_string()
}

/// Front matter fields that survive into a node's `meta`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaConfig {
	#[serde(default = "default_allowed_meta_fields")]
	pub allowed: Vec<String>,
}

impl Default for MetaConfig {
	fn default() -> Self {
		Self {
			allowed: default_allowed_meta_fields(),
		}
	}
}

fn default_allowed_meta_fields() -> Vec<String> {
	DEFAULT_ALLOWED_META_FIELDS
		.iter()
		.map(ToString::to_string)
		.collect()
}

/// Post front matter enhancement rules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnhanceConfig {
	/// Replace `{{ key }}` tokens with front matter values.
	#[serde(default)]
	pub substitute_attributes: bool,
}

impl DocgraphConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> DocgraphResult<Option<DocgraphConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;

		Ok(Some(config))
	}

	/// Parse a config from TOML text.
	pub fn from_toml(content: &str) -> DocgraphResult<DocgraphConfig> {
		toml::from_str(content).map_err(|e| DocgraphError::ConfigParse(e.to_string()))
	}

	/// The build environment described by this config alone, before any
	/// command line or environment variable overrides.
	pub fn environment(&self) -> BuildEnvironment {
		BuildEnvironment {
			mode: self.mode,
			editor_warnings_off: !self.editor_warnings,
		}
	}
}
