use std::collections::HashMap;

use crate::Attributes;
use crate::ContentSegment;
use crate::DocgraphError;
use crate::DocgraphResult;
use crate::enhance::Enhancer;
use crate::lexer::RawSegment;
use crate::lexer::split_partials;

/// Split a document body around partial directives and tag every piece.
///
/// Literal text becomes [`crate::SegmentType::Html`] and directives become
/// [`crate::SegmentType::PartialReference`]. Joining the `data` of every
/// segment gives back `body` unchanged.
pub fn split_content(body: &str) -> Vec<ContentSegment> {
	classify_segments(&split_partials(body), None)
}

/// Build a node's ordered content list. When front matter was extracted its
/// attributes are handed to `enhancer` for every segment before tagging.
pub fn build_content_ordered_list(
	body: &str,
	attributes: Option<&Attributes>,
	enhancer: &dyn Enhancer,
) -> Vec<ContentSegment> {
	let segments = split_partials(body);
	classify_segments(&segments, attributes.map(|attributes| (attributes, enhancer)))
}

fn classify_segments(
	segments: &[RawSegment<'_>],
	enhancement: Option<(&Attributes, &dyn Enhancer)>,
) -> Vec<ContentSegment> {
	segments
		.iter()
		.map(|segment| {
			let (text, is_partial) = match segment {
				RawSegment::Literal(text) => (*text, false),
				RawSegment::Partial { directive, .. } => (*directive, true),
			};

			let data = match enhancement {
				Some((attributes, enhancer)) => enhancer.enhance(text, attributes),
				None => text.to_string(),
			};

			if is_partial {
				ContentSegment::partial(data)
			} else {
				ContentSegment::html(data)
			}
		})
		.collect()
}

/// Inline every partial reference in `list` with the content list of the
/// partial it names, recursively.
///
/// `partials` maps a partial name (its relative path without extension) to
/// its content list. Unknown names are left in place as references. A
/// partial that ends up including itself fails with
/// [`DocgraphError::PartialCycle`].
pub fn flatten_content_ordered_list(
	list: &[ContentSegment],
	partials: &HashMap<String, Vec<ContentSegment>>,
) -> DocgraphResult<Vec<ContentSegment>> {
	let mut output = Vec::with_capacity(list.len());
	let mut chain = Vec::new();
	flatten_into(list, partials, &mut chain, &mut output)?;

	Ok(output)
}

fn flatten_into(
	list: &[ContentSegment],
	partials: &HashMap<String, Vec<ContentSegment>>,
	chain: &mut Vec<String>,
	output: &mut Vec<ContentSegment>,
) -> DocgraphResult<()> {
	for segment in list {
		let Some(name) = segment.partial_name() else {
			output.push(segment.clone());
			continue;
		};

		let Some(partial) = partials.get(name) else {
			tracing::warn!(partial = name, "no partial found for reference, keeping directive");
			output.push(segment.clone());
			continue;
		};

		if chain.iter().any(|visited| visited == name) {
			let mut cycle = chain.clone();
			cycle.push(name.to_string());
			return Err(DocgraphError::PartialCycle { chain: cycle });
		}

		chain.push(name.to_string());
		flatten_into(partial, partials, chain, output)?;
		chain.pop();
	}

	Ok(())
}
