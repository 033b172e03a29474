//! Directory based content sourcing.
//!
//! Reads the two configured buckets from disk, turns every matching file
//! into a [`RawDocument`] and drives the assembler over them.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::BuildEnvironment;
use crate::DocgraphConfig;
use crate::DocgraphError;
use crate::DocgraphResult;
use crate::MEDIA_TYPE_TEXTILE;
use crate::MemoryRegistry;
use crate::Node;
use crate::NodeInternals;
use crate::NodeRegistry;
use crate::RawDocument;
use crate::SourceBucket;
use crate::SourceNode;
use crate::TransformContext;
use crate::TransformOutcome;
use crate::digest_str;
use crate::transform_document;

/// Collect every document of both buckets below `root`.
///
/// Partials come first so that their nodes exist before the documents that
/// reference them. Within a bucket documents are sorted by path. When one
/// bucket directory is nested inside the other, its files belong to the
/// nested bucket only.
pub fn collect_documents(
	root: &Path,
	config: &DocgraphConfig,
	registry: &dyn NodeRegistry,
) -> DocgraphResult<Vec<RawDocument>> {
	let filters = SourceFilters::new(root, config)?;
	let mut documents = Vec::new();

	for bucket in [SourceBucket::Partials, SourceBucket::Normal] {
		let bucket_dir = bucket_dir(root, config, bucket);
		let other_bucket = bucket_dir_of_other(root, config, bucket);
		let mut files = Vec::new();
		let mut visited_dirs = HashSet::new();
		walk_dir(
			&bucket_dir,
			&filters,
			other_bucket.as_deref(),
			&mut files,
			&mut visited_dirs,
		)?;
		files.sort();

		for file in files {
			documents.push(read_document(&bucket_dir, &file, bucket, registry)?);
		}
	}

	tracing::debug!(count = documents.len(), "collected documents");

	Ok(documents)
}

/// Find which bucket `file` lives in and read it.
///
/// Returns `None` when the file is outside both bucket directories.
pub fn load_document(
	root: &Path,
	config: &DocgraphConfig,
	registry: &dyn NodeRegistry,
	file: &Path,
) -> DocgraphResult<Option<RawDocument>> {
	let file = if file.is_absolute() {
		file.to_path_buf()
	} else {
		root.join(file)
	};
	let file = file.canonicalize()?;

	for bucket in [SourceBucket::Partials, SourceBucket::Normal] {
		let bucket_dir = bucket_dir(root, config, bucket);
		let Ok(bucket_dir) = bucket_dir.canonicalize() else {
			continue;
		};

		if file.starts_with(&bucket_dir) {
			return read_document(&bucket_dir, &file, bucket, registry).map(Some);
		}
	}

	Ok(None)
}

/// Add the source node of `document` to the registry. Its transformed
/// document node is registered as a child by [`transform_document`].
pub fn register_source_node(
	ctx: &mut TransformContext<'_>,
	document: &RawDocument,
) -> DocgraphResult<()> {
	let node = SourceNode {
		id: document.id.clone(),
		children: Vec::new(),
		bucket: document.bucket,
		relative_path: document.path.clone(),
		internal: NodeInternals {
			r#type: ctx.node_types.source.clone(),
			content_digest: digest_str(&*ctx.registry, &document.content),
			media_type: MEDIA_TYPE_TEXTILE.to_string(),
		},
	};

	ctx.registry.register_node(Node::Source(node))
}

/// Source and transform every document below `root`, stopping at the first
/// error.
pub fn build_site(
	root: &Path,
	config: &DocgraphConfig,
	environment: BuildEnvironment,
) -> DocgraphResult<MemoryRegistry> {
	let mut registry = MemoryRegistry::new();
	let documents = collect_documents(root, config, &registry)?;
	let mut ctx = TransformContext::from_config(&mut registry, config, environment);
	let mut excluded = 0;

	for document in &documents {
		register_source_node(&mut ctx, document)?;
		if let TransformOutcome::Excluded { .. } = transform_document(&mut ctx, document)? {
			excluded += 1;
		}
	}

	tracing::debug!(
		documents = documents.len(),
		excluded,
		nodes = registry.len(),
		"site built"
	);

	Ok(registry)
}

/// Outcome of [`check_site`].
#[derive(Debug, Default)]
pub struct CheckReport {
	/// Number of documents that were run through the pipeline.
	pub documents: usize,
	/// Every failure, paired with the path of the offending document.
	pub errors: Vec<DocumentError>,
}

#[derive(Debug)]
pub struct DocumentError {
	pub path: String,
	pub error: DocgraphError,
}

impl CheckReport {
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Run the same pipeline as [`build_site`] but keep going after a failing
/// document.
pub fn check_site(
	root: &Path,
	config: &DocgraphConfig,
	environment: BuildEnvironment,
) -> DocgraphResult<CheckReport> {
	let mut registry = MemoryRegistry::new();
	let documents = collect_documents(root, config, &registry)?;
	let mut ctx = TransformContext::from_config(&mut registry, config, environment);
	let mut report = CheckReport {
		documents: documents.len(),
		errors: Vec::new(),
	};

	for document in &documents {
		let result = register_source_node(&mut ctx, document)
			.and_then(|()| transform_document(&mut ctx, document));
		if let Err(error) = result {
			report.errors.push(DocumentError {
				path: document.path.clone(),
				error,
			});
		}
	}

	Ok(report)
}

fn bucket_dir(root: &Path, config: &DocgraphConfig, bucket: SourceBucket) -> PathBuf {
	match bucket {
		SourceBucket::Normal => root.join(&config.sources.documents),
		SourceBucket::Partials => root.join(&config.sources.partials),
	}
}

/// Canonical directory of the bucket that is not `bucket`, if it exists.
fn bucket_dir_of_other(
	root: &Path,
	config: &DocgraphConfig,
	bucket: SourceBucket,
) -> Option<PathBuf> {
	let other = match bucket {
		SourceBucket::Normal => SourceBucket::Partials,
		SourceBucket::Partials => SourceBucket::Normal,
	};

	bucket_dir(root, config, other).canonicalize().ok()
}

fn read_document(
	bucket_dir: &Path,
	file: &Path,
	bucket: SourceBucket,
	registry: &dyn NodeRegistry,
) -> DocgraphResult<RawDocument> {
	let content = std::fs::read_to_string(file)?;
	let relative = file.strip_prefix(bucket_dir).unwrap_or(file);
	let path = relative
		.components()
		.map(|component| component.as_os_str().to_string_lossy())
		.collect::<Vec<_>>()
		.join("/");
	let id = registry.create_node_id(&format!("{}:{path} >>> File", bucket.as_str()));

	Ok(RawDocument {
		id,
		path,
		content,
		bucket,
	})
}

struct SourceFilters {
	gitignore: Gitignore,
	exclude: Gitignore,
	extensions: GlobSet,
}

impl SourceFilters {
	fn new(root: &Path, config: &DocgraphConfig) -> DocgraphResult<Self> {
		let gitignore = if config.sources.disable_gitignore {
			Gitignore::empty()
		} else {
			build_gitignore(root)
		};

		Ok(Self {
			gitignore,
			exclude: build_exclude_matcher(root, &config.sources.exclude)?,
			extensions: build_extension_set(&config.sources.extensions)?,
		})
	}

	fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
		self.gitignore.matched(path, is_dir).is_ignore()
			|| self.exclude.matched(path, is_dir).is_ignore()
	}
}

fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		if let Some(error) = builder.add(&gitignore_path) {
			tracing::warn!(path = %gitignore_path.display(), %error, "skipping unreadable .gitignore");
		}
	}

	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn build_exclude_matcher(root: &Path, patterns: &[String]) -> DocgraphResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			DocgraphError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}

	builder
		.build()
		.map_err(|e| DocgraphError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

fn build_extension_set(extensions: &[String]) -> DocgraphResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for extension in extensions {
		let extension = extension.trim_start_matches('.');
		let glob = Glob::new(&format!("*.{extension}")).map_err(|e| {
			DocgraphError::ConfigParse(format!("invalid source extension `{extension}`: {e}"))
		})?;
		builder.add(glob);
	}

	builder
		.build()
		.map_err(|e| DocgraphError::ConfigParse(format!("failed to build extension filter: {e}")))
}

fn walk_dir(
	dir: &Path,
	filters: &SourceFilters,
	other_bucket: Option<&Path>,
	files: &mut Vec<PathBuf>,
	visited_dirs: &mut HashSet<PathBuf>,
) -> DocgraphResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(DocgraphError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();

		if path
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(|name| name.starts_with('.'))
		{
			continue;
		}

		let is_dir = path.is_dir();
		if filters.is_ignored(&path, is_dir) {
			continue;
		}

		if is_dir {
			let is_other_bucket = other_bucket
				.is_some_and(|other| path.canonicalize().is_ok_and(|dir| dir == other));
			if is_other_bucket {
				tracing::debug!(path = %path.display(), "skipping nested bucket directory");
				continue;
			}
			walk_dir(&path, filters, other_bucket, files, visited_dirs)?;
		} else if path
			.file_name()
			.is_some_and(|name| filters.extensions.is_match(Path::new(name)))
		{
			files.push(path);
		}
	}

	Ok(())
}
