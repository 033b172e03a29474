//! The node assembler.
//!
//! [`transform_document`] turns one [`RawDocument`] into a content node and
//! its satellites (inline TOC, version marker, breadcrumbs) and hands them to
//! the registry carried by a [`TransformContext`].

use crate::Attributes;
use crate::BuildEnvironment;
use crate::ContentNode;
use crate::DocgraphConfig;
use crate::DocgraphError;
use crate::DocgraphResult;
use crate::DocumentMeta;
use crate::FrontMatter;
use crate::InlineTocNode;
use crate::MEDIA_TYPE_HTML;
use crate::Node;
use crate::NodeId;
use crate::NodeInternals;
use crate::NodeRegistry;
use crate::NodeTypesConfig;
use crate::RawDocument;
use crate::SlugShape;
use crate::SourceBucket;
use crate::VersionNode;
use crate::build_content_ordered_list;
use crate::derive_slug;
use crate::digest_json;
use crate::enhance::AttributeSubstitution;
use crate::enhance::Enhancer;
use crate::enhance::NormalizeLineEndings;
use crate::enhance::Passthrough;
use crate::enhance::PreParser;
use crate::extract_front_matter;
use crate::extract_inline_toc;
use crate::filter_allowed_meta_fields;
use crate::generate_breadcrumbs;
use crate::is_excluded_slug;
use crate::parse_inline_toc;
use crate::prepare_allowed_meta_fields;
use crate::strip_extension;
use crate::type_from_parent;

const PARTIAL_TYPE_SUFFIX: &str = "Partial";
const INLINE_TOC_TYPE_SUFFIX: &str = "InlineTOC";
const VERSION_TYPE_SUFFIX: &str = "Version";

/// Everything a pipeline stage needs from the outside world, passed in
/// explicitly instead of being read from ambient state.
pub struct TransformContext<'a> {
	pub registry: &'a mut dyn NodeRegistry,
	pub environment: BuildEnvironment,
	pub node_types: &'a NodeTypesConfig,
	pub allowed_meta: &'a [String],
	pub pre_parser: &'a dyn PreParser,
	pub enhancer: &'a dyn Enhancer,
}

impl<'a> TransformContext<'a> {
	/// Build a context from a loaded config. The enhancer is chosen by
	/// `[enhance] substitute_attributes`.
	pub fn from_config(
		registry: &'a mut dyn NodeRegistry,
		config: &'a DocgraphConfig,
		environment: BuildEnvironment,
	) -> Self {
		let enhancer: &'a dyn Enhancer = if config.enhance.substitute_attributes {
			&AttributeSubstitution
		} else {
			&Passthrough
		};

		Self {
			registry,
			environment,
			node_types: &config.node_types,
			allowed_meta: &config.meta.allowed,
			pre_parser: &NormalizeLineEndings,
			enhancer,
		}
	}
}

/// Ids of everything emitted for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedNodes {
	pub document: NodeId,
	pub inline_toc: Option<NodeId>,
	pub version: Option<NodeId>,
	/// Breadcrumb chain, root first. Empty for partials.
	pub breadcrumbs: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
	Emitted(EmittedNodes),
	/// The document's slug is excluded from the site and nothing was
	/// emitted.
	Excluded { slug: String },
}

impl TransformOutcome {
	pub fn emitted(&self) -> Option<&EmittedNodes> {
		match self {
			Self::Emitted(emitted) => Some(emitted),
			Self::Excluded { .. } => None,
		}
	}
}

/// Run the whole per-document pipeline for `document`.
///
/// The only fatal authoring failure is a missing `meta_description` in a
/// development build; an inline TOC that is not valid YAML fails as well.
/// Missing front matter, TOC or partials are all valid.
pub fn transform_document(
	ctx: &mut TransformContext<'_>,
	document: &RawDocument,
) -> DocgraphResult<TransformOutcome> {
	let slug = derive_slug(&document.path);

	if is_excluded_slug(&slug) {
		tracing::debug!(path = %document.path, slug = %slug, "excluding document");
		return Ok(TransformOutcome::Excluded { slug });
	}

	let is_partial = document.bucket == SourceBucket::Partials;
	let document_type = if is_partial {
		format!("{}{PARTIAL_TYPE_SUFFIX}", ctx.node_types.document)
	} else {
		ctx.node_types.document.clone()
	};
	let document_id = ctx.registry.create_node_id(&format!("{} >>> Html", document.id));

	let raw = if is_partial {
		format!("{}\n", document.content)
	} else {
		document.content.clone()
	};
	let normalized = ctx.pre_parser.pre_parse(&raw);

	let extraction = extract_inline_toc(&normalized);
	let inline_toc = match extraction.inline_toc_only.as_deref() {
		Some(inline_toc_only) => Some(emit_inline_toc(
			ctx,
			document,
			&document_id,
			&document_type,
			&slug,
			inline_toc_only,
		)?),
		None => None,
	};

	let (body, attributes) = match extract_front_matter(&extraction.no_inline_toc) {
		FrontMatter::Matched { body, attributes } => (body, Some(attributes)),
		FrontMatter::NoMatch => (extraction.no_inline_toc, None),
	};

	let content_ordered_list = build_content_ordered_list(&body, attributes.as_ref(), ctx.enhancer);
	let shape = SlugShape::of(&slug);
	let meta = match attributes {
		Some(attributes) => Some(check_meta(ctx, document, &shape, &attributes)?),
		None => None,
	};

	let content_digest = digest_json(&*ctx.registry, &content_ordered_list)?;

	let breadcrumbs = if is_partial {
		Vec::new()
	} else {
		generate_breadcrumbs(
			strip_extension(&document.path),
			&ctx.node_types.path,
			&mut *ctx.registry,
		)?
	};

	let version = match shape.version.as_deref() {
		Some(version) => {
			let version_id = ctx
				.registry
				.create_node_id(&format!("{document_id} >>> Version"));
			let node = VersionNode {
				id: version_id.clone(),
				parent: document_id.clone(),
				children: Vec::new(),
				slug: slug.clone(),
				version: version.to_string(),
				internal: NodeInternals {
					r#type: type_from_parent(&document_type, VERSION_TYPE_SUFFIX),
					content_digest: content_digest.clone(),
					media_type: MEDIA_TYPE_HTML.to_string(),
				},
			};

			ctx.registry.register_node(Node::Version(node))?;
			ctx.registry.register_relationship(&document_id, &version_id)?;
			Some(version_id)
		}
		None => None,
	};

	tracing::debug!(
		path = %document.path,
		slug = %slug,
		bucket = document.bucket.as_str(),
		segments = content_ordered_list.len(),
		"transformed document"
	);

	let node = ContentNode {
		id: document_id.clone(),
		parent: document.id.clone(),
		children: Vec::new(),
		article_type: shape.article_type,
		content_ordered_list,
		meta,
		slug: (!is_partial).then(|| slug.clone()),
		relative_path: is_partial.then(|| document.path.clone()),
		version: shape.version.clone(),
		internal: NodeInternals {
			r#type: document_type,
			content_digest,
			media_type: MEDIA_TYPE_HTML.to_string(),
		},
	};

	ctx.registry.register_node(Node::Content(node))?;
	ctx.registry.register_relationship(&document.id, &document_id)?;

	Ok(TransformOutcome::Emitted(EmittedNodes {
		document: document_id,
		inline_toc,
		version,
		breadcrumbs,
	}))
}

fn emit_inline_toc(
	ctx: &mut TransformContext<'_>,
	document: &RawDocument,
	document_id: &NodeId,
	document_type: &str,
	slug: &str,
	inline_toc_only: &str,
) -> DocgraphResult<NodeId> {
	let table_of_contents =
		parse_inline_toc(inline_toc_only).map_err(|error| DocgraphError::MalformedInlineToc {
			path: document.path.clone(),
			reason: error.to_string(),
		})?;

	let id = ctx
		.registry
		.create_node_id(&format!("{document_id} >>> InlineTOC"));
	let content_digest = digest_json(&*ctx.registry, &table_of_contents)?;
	let node = InlineTocNode {
		id: id.clone(),
		parent: document_id.clone(),
		children: Vec::new(),
		slug: slug.to_string(),
		table_of_contents,
		internal: NodeInternals {
			r#type: type_from_parent(document_type, INLINE_TOC_TYPE_SUFFIX),
			content_digest,
			media_type: MEDIA_TYPE_HTML.to_string(),
		},
	};

	// The document node arrives later; the registry attaches the child then.
	ctx.registry.register_node(Node::InlineToc(node))?;
	ctx.registry.register_relationship(document_id, &id)?;

	Ok(id)
}

fn check_meta(
	ctx: &TransformContext<'_>,
	document: &RawDocument,
	shape: &SlugShape,
	attributes: &Attributes,
) -> DocgraphResult<DocumentMeta> {
	let meta = prepare_allowed_meta_fields(filter_allowed_meta_fields(attributes, ctx.allowed_meta));

	if ctx.environment.enforces_meta_description()
		&& !shape.does_not_need_meta()
		&& !meta.has_meta_description()
	{
		return Err(DocgraphError::MissingMetaDescription {
			path: document.path.clone(),
		});
	}

	Ok(meta)
}
