use crate::DocgraphResult;
use crate::MEDIA_TYPE_PLAIN;
use crate::Node;
use crate::NodeId;
use crate::NodeInternals;
use crate::NodeRegistry;
use crate::PathNode;
use crate::digest_str;

/// Emit one [`PathNode`] per `/` separated segment of `path`.
///
/// For `docs/channels/publish` the links are `/docs`, `/docs/channels` and
/// `/docs/channels/publish`. Every node is parented to the previous one and
/// its id is derived from its link alone, so chains generated for different
/// documents share their common ancestors. The first segment has level 0,
/// every later segment level 1.
///
/// Returns the ids of the emitted nodes, root first.
pub fn generate_breadcrumbs<R>(path: &str, path_type: &str, registry: &mut R) -> DocgraphResult<Vec<NodeId>>
where
	R: NodeRegistry + ?Sized,
{
	let mut ids: Vec<NodeId> = Vec::new();
	let mut link = String::new();
	let mut level = 0;

	for (position, piece) in path.split('/').enumerate() {
		level = if level + position > 1 { 1 } else { level + position };
		link.push('/');
		link.push_str(piece);

		let id = registry.create_node_id(&format!("{link} >>> Path"));
		let node = PathNode {
			id: id.clone(),
			parent: ids.last().cloned(),
			children: Vec::new(),
			link: link.clone(),
			label: upper_first(piece),
			level,
			internal: NodeInternals {
				r#type: path_type.to_string(),
				content_digest: digest_str(registry, &link),
				media_type: MEDIA_TYPE_PLAIN.to_string(),
			},
		};

		tracing::trace!(link = %link, level, "emitting breadcrumb");
		registry.register_node(Node::Path(node))?;
		ids.push(id);
	}

	Ok(ids)
}

fn upper_first(text: &str) -> String {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
