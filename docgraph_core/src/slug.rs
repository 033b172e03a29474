use serde::Deserialize;
use serde::Serialize;

const ROOT_PREFIX: &str = "root/";
const INDEX_SEGMENT: &str = "index";
const VERSIONS_MARKER: &str = "/versions/v";
const EXCLUDED_PREFIX: &str = "tutorials/";
const API_PREFIX: &str = "api/";
const COMPARE_PREFIX: &str = "compare/";
const CLIENT_LIB_GUIDE_PREFIX: &str = "client-lib-development-guide/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArticleType {
	Document,
	ApiReference,
}

/// Strip the file extension from the last path segment, if it has one.
pub fn strip_extension(path: &str) -> &str {
	let last_segment = path.rfind('/').map_or(0, |slash| slash + 1);
	match path[last_segment..].rfind('.') {
		Some(dot) if last_segment + dot + 1 < path.len() => &path[..last_segment + dot],
		_ => path,
	}
}

/// Derive the URL slug of a document from its path relative to its source
/// bucket.
///
/// `root/docs/channels/index.textile` becomes `docs/channels/`.
pub fn derive_slug(relative_path: &str) -> String {
	let slug = strip_extension(relative_path);
	let slug = slug.strip_prefix(ROOT_PREFIX).unwrap_or(slug);

	let slug = match slug.strip_suffix(INDEX_SEGMENT) {
		Some(parent) if parent.is_empty() || parent.ends_with('/') => parent,
		_ => slug,
	};

	slug.to_string()
}

/// Documents under `tutorials/` are never part of the docs site.
pub fn is_excluded_slug(slug: &str) -> bool {
	slug.starts_with(EXCLUDED_PREFIX)
}

/// The version pinned by a `.../versions/vX.Y.Z...` slug, without the `v`.
pub fn version_of(slug: &str) -> Option<&str> {
	slug.match_indices(VERSIONS_MARKER).find_map(|(index, marker)| {
		let rest = &slug[index + marker.len()..];
		let len = rest
			.find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
			.unwrap_or(rest.len());
		(len > 0).then(|| &rest[..len])
	})
}

/// Everything the assembler derives from the shape of a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugShape {
	pub article_type: ArticleType,
	pub version: Option<String>,
	pub is_compare: bool,
	pub is_client_lib_development_guide: bool,
}

impl SlugShape {
	pub fn of(slug: &str) -> Self {
		let article_type = if slug.starts_with(API_PREFIX) {
			ArticleType::ApiReference
		} else {
			ArticleType::Document
		};

		Self {
			article_type,
			version: version_of(slug).map(ToString::to_string),
			is_compare: slug.starts_with(COMPARE_PREFIX),
			is_client_lib_development_guide: slug.starts_with(CLIENT_LIB_GUIDE_PREFIX),
		}
	}

	pub fn is_version(&self) -> bool {
		self.version.is_some()
	}

	/// Version pages, comparison pages and the client library guide are not
	/// held to the `meta_description` rule.
	pub fn does_not_need_meta(&self) -> bool {
		self.is_version() || self.is_compare || self.is_client_lib_development_guide
	}
}
