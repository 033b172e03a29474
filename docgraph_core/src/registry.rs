//! The node registry: identity, integrity digests and the site graph.
//!
//! Every node emitted by the assembler is handed to a [`NodeRegistry`]. The
//! registry issues deterministic ids from seed strings, hashes content and
//! records parent/child relationships. [`MemoryRegistry`] keeps the whole
//! graph in memory and is what the CLI serialises.

use std::collections::HashMap;
use std::collections::HashSet;

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::ContentDigest;
use crate::ContentSegment;
use crate::DocgraphError;
use crate::DocgraphResult;
use crate::Node;
use crate::NodeId;

const NODE_ID_NAMESPACE: &str = "docgraph-node:";

/// The host graph the assembler writes into.
pub trait NodeRegistry {
	/// Issue a stable id for `seed`. Equal seeds always give equal ids.
	fn create_node_id(&self, seed: &str) -> NodeId;

	/// Hash arbitrary bytes into a content digest.
	fn create_content_digest(&self, data: &[u8]) -> ContentDigest;

	/// Add `node` to the graph.
	///
	/// Registering a node whose id is already known is a no-op when the
	/// digests agree and a [`DocgraphError::ConflictingNode`] otherwise.
	fn register_node(&mut self, node: Node) -> DocgraphResult<()>;

	/// Record that `child` belongs to `parent`.
	fn register_relationship(&mut self, parent: &NodeId, child: &NodeId) -> DocgraphResult<()>;
}

/// Digest the JSON serialisation of `value`.
pub fn digest_json<R, T>(registry: &R, value: &T) -> DocgraphResult<ContentDigest>
where
	R: NodeRegistry + ?Sized,
	T: Serialize + ?Sized,
{
	let bytes = serde_json::to_vec(value)?;
	Ok(registry.create_content_digest(&bytes))
}

/// Digest a plain string by its raw bytes.
pub fn digest_str<R>(registry: &R, value: &str) -> ContentDigest
where
	R: NodeRegistry + ?Sized,
{
	registry.create_content_digest(value.as_bytes())
}

/// An edge of the site graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
	pub parent: NodeId,
	pub child: NodeId,
}

/// The serialisable form of a finished build.
#[derive(Debug, Clone, Serialize)]
pub struct SiteGraph {
	pub nodes: Vec<Node>,
	pub relationships: Vec<Relationship>,
}

/// In-memory [`NodeRegistry`]. Nodes keep their registration order.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
	nodes: Vec<Node>,
	index: HashMap<NodeId, usize>,
	relationships: Vec<Relationship>,
	seen_relationships: HashSet<Relationship>,
}

impl MemoryRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn relationships(&self) -> &[Relationship] {
		&self.relationships
	}

	pub fn get(&self, id: &NodeId) -> Option<&Node> {
		self.index.get(id).map(|position| &self.nodes[*position])
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Nodes whose `internal.type` is `node_type`.
	pub fn nodes_of_type<'a>(&'a self, node_type: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
		self.nodes
			.iter()
			.filter(move |node| node.internal().r#type == node_type)
	}

	/// Content lists of every partial content node, keyed by the name a
	/// partial directive uses to refer to it: the relative path without its
	/// extension.
	pub fn partials_index(&self) -> HashMap<String, Vec<ContentSegment>> {
		self.nodes
			.iter()
			.filter_map(Node::as_content)
			.filter_map(|node| {
				let relative_path = node.relative_path.as_deref()?;
				Some((
					crate::strip_extension(relative_path).to_string(),
					node.content_ordered_list.clone(),
				))
			})
			.collect()
	}

	pub fn into_graph(self) -> SiteGraph {
		SiteGraph {
			nodes: self.nodes,
			relationships: self.relationships,
		}
	}
}

impl NodeRegistry for MemoryRegistry {
	fn create_node_id(&self, seed: &str) -> NodeId {
		let hash = Sha256::new()
			.chain_update(NODE_ID_NAMESPACE)
			.chain_update(seed)
			.finalize();
		let hex = format!("{hash:x}");

		NodeId::new(format!(
			"{}-{}-{}-{}-{}",
			&hex[0..8],
			&hex[8..12],
			&hex[12..16],
			&hex[16..20],
			&hex[20..32]
		))
	}

	fn create_content_digest(&self, data: &[u8]) -> ContentDigest {
		ContentDigest::new(format!("{:x}", Sha256::digest(data)))
	}

	fn register_node(&mut self, mut node: Node) -> DocgraphResult<()> {
		let id = node.id().clone();

		if let Some(existing) = self.get(&id) {
			if existing.internal().content_digest == node.internal().content_digest {
				tracing::trace!(id = %id, "node already registered with the same content");
				return Ok(());
			}

			return Err(DocgraphError::ConflictingNode { id: id.to_string() });
		}

		// Relationships may be recorded before the parent itself arrives.
		for relationship in self.relationships.iter().filter(|rel| rel.parent == id) {
			if !node.children().contains(&relationship.child) {
				node.children_mut().push(relationship.child.clone());
			}
		}

		tracing::trace!(id = %id, node_type = %node.internal().r#type, "registered node");
		self.index.insert(id, self.nodes.len());
		self.nodes.push(node);

		Ok(())
	}

	fn register_relationship(&mut self, parent: &NodeId, child: &NodeId) -> DocgraphResult<()> {
		let relationship = Relationship {
			parent: parent.clone(),
			child: child.clone(),
		};

		if !self.seen_relationships.insert(relationship.clone()) {
			return Ok(());
		}

		if let Some(position) = self.index.get(parent) {
			let children = self.nodes[*position].children_mut();
			if !children.contains(child) {
				children.push(child.clone());
			}
		}

		self.relationships.push(relationship);

		Ok(())
	}
}
