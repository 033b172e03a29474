//! `docgraph_core` turns textile documentation sources into a typed node
//! graph ready for page rendering.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Raw document (path, content, bucket) -> Source node
//!   -> Slug derivation (tutorial pages are dropped here)
//!   -> Pre-parse normalisation
//!   -> Inline TOC extraction (emits an InlineToc node)
//!   -> Front matter extraction
//!   -> Partial tokenizer + content classification
//!   -> Meta allow-list and the meta_description check
//!   -> Content node, version node and breadcrumb path nodes
//! ```
//!
//! ## Modules
//!
//! - [`config`] loads `docgraph.toml`: bucket directories, node type names,
//!   the meta allow-list and the build mode.
//! - [`source`] reads both buckets from disk and drives the assembler over
//!   every document.
//! - [`registry`] owns node identity, digests and parent/child bookkeeping.
//!
//! ## Key Types
//!
//! - [`RawDocument`] is the input record of the pipeline. Its
//!   [`SourceNode`] is the parent of the document node built from it.
//! - [`ContentNode`], [`InlineTocNode`], [`VersionNode`] and [`PathNode`]
//!   are the emitted nodes.
//! - [`TocEntry`] is a parsed inline table of contents.
//! - [`TransformContext`] carries the registry and build settings into
//!   [`transform_document`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use docgraph_core::DocgraphConfig;
//! use docgraph_core::build_site;
//!
//! let root = Path::new(".");
//! let config = DocgraphConfig::load(root).unwrap().unwrap_or_default();
//! let registry = build_site(root, &config, config.environment()).unwrap();
//!
//! println!("{} node(s)", registry.len());
//! ```

pub use breadcrumbs::*;
pub use config::*;
pub use content::*;
pub use enhance::*;
pub use error::*;
pub use frontmatter::*;
pub use inline_toc::*;
pub use meta::*;
pub use node::*;
pub use registry::*;
pub use slug::*;
pub use source::*;
pub use tokens::*;
pub use transform::*;

mod breadcrumbs;
pub mod config;
mod content;
pub mod enhance;
#[allow(unused_assignments)]
mod error;
mod frontmatter;
mod inline_toc;
pub(crate) mod lexer;
mod meta;
mod node;
pub mod registry;
mod slug;
pub mod source;
pub(crate) mod tokens;
mod transform;

#[cfg(test)]
mod __fixtures;
