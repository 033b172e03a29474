use std::ops::Range;

use logos::Logos;

/// Raw tokens produced by logos for flat tokenization of a document body.
/// Every byte of the input belongs to exactly one token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[token("<%=")]
	DirectiveOpen,
	#[token("%>")]
	DirectiveClose,
	#[token("(")]
	ParenOpen,
	#[token(")")]
	ParenClose,
	#[token("'")]
	Quote,
	#[regex(r"[ \t\n\r\x0B\x0C]+")]
	Whitespace,
	#[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
	Ident,
	#[regex(r"[<%>]")]
	Symbol,
	#[regex(r"[^<%>'()A-Za-z_ \t\n\r\x0B\x0C]+")]
	Text,
}

const PARTIAL_KEYWORD: &str = "partial";
const VERSION_HELPER: &str = "partial_version";

/// A piece of a document body as produced by [`split_partials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawSegment<'a> {
	/// Literal content between directives. Never empty.
	Literal(&'a str),
	/// A complete partial directive, kept verbatim, and the quoted partial
	/// name inside it.
	Partial { directive: &'a str, name: &'a str },
}

/// States of the directive matcher, one per expected piece of
/// `<%= partial partial_version('name') ... %>`.
#[derive(Debug, Clone, Copy)]
enum DirectiveState {
	/// Just consumed `<%=`, whitespace must follow.
	AfterOpen,
	/// Expecting the `partial` keyword.
	Keyword,
	/// Whitespace between `partial` and the helper call.
	AfterKeyword,
	/// Expecting `partial_version`.
	Helper,
	/// Expecting `(`.
	CallOpen,
	/// Expecting the opening quote of the name.
	NameOpen,
	/// Inside the quoted name which started at the given byte offset.
	Name(usize),
	/// Expecting `)` after the closing quote.
	CallClose,
	/// Anything but `%` or `>` until `%>`.
	Trailer,
}

struct DirectiveMatch {
	span: Range<usize>,
	name: Range<usize>,
	/// Index of the first raw token after the directive.
	next_cursor: usize,
}

/// Walks the logos token stream, cutting the source into literal and
/// directive segments.
struct DirectiveWalker<'a> {
	source: &'a str,
	raw_tokens: Vec<(Result<RawToken, ()>, Range<usize>)>,
	cursor: usize,
	/// Byte offset where the pending literal segment starts.
	literal_start: usize,
	segments: Vec<RawSegment<'a>>,
}

impl<'a> DirectiveWalker<'a> {
	fn new(source: &'a str) -> Self {
		let raw_tokens: Vec<_> = RawToken::lexer(source).spanned().collect();

		Self {
			source,
			raw_tokens,
			cursor: 0,
			literal_start: 0,
			segments: vec![],
		}
	}

	fn slice(&self, index: usize) -> &'a str {
		let (_, span) = &self.raw_tokens[index];
		&self.source[span.clone()]
	}

	/// Push the literal between `literal_start` and `end`, skipping it when
	/// empty.
	fn push_literal(&mut self, end: usize) {
		if end > self.literal_start {
			self.segments
				.push(RawSegment::Literal(&self.source[self.literal_start..end]));
		}
	}

	fn process(&mut self) {
		while self.cursor < self.raw_tokens.len() {
			let is_open = matches!(self.raw_tokens[self.cursor].0, Ok(RawToken::DirectiveOpen));

			if is_open {
				if let Some(directive) = self.match_directive(self.cursor) {
					self.push_literal(directive.span.start);
					self.segments.push(RawSegment::Partial {
						directive: &self.source[directive.span.clone()],
						name: &self.source[directive.name],
					});
					self.literal_start = directive.span.end;
					self.cursor = directive.next_cursor;
					continue;
				}
			}

			self.cursor += 1;
		}

		self.push_literal(self.source.len());
	}

	/// Try to match a full directive starting at the `<%=` token at `open`.
	/// A failed attempt leaves the walker untouched so scanning resumes at
	/// the next token.
	fn match_directive(&self, open: usize) -> Option<DirectiveMatch> {
		let start = self.raw_tokens[open].1.start;
		let mut state = DirectiveState::AfterOpen;
		let mut name = 0..0;

		for index in (open + 1)..self.raw_tokens.len() {
			let (result, span) = &self.raw_tokens[index];
			let slice = self.slice(index);
			let token = result.ok();

			state = match (state, token) {
				(DirectiveState::AfterOpen, Some(RawToken::Whitespace)) => DirectiveState::Keyword,
				(DirectiveState::Keyword, Some(RawToken::Ident)) if slice == PARTIAL_KEYWORD => {
					DirectiveState::AfterKeyword
				}
				(DirectiveState::AfterKeyword, Some(RawToken::Whitespace)) => DirectiveState::Helper,
				(DirectiveState::Helper, Some(RawToken::Ident)) if slice == VERSION_HELPER => {
					DirectiveState::CallOpen
				}
				(DirectiveState::CallOpen, Some(RawToken::ParenOpen)) => DirectiveState::NameOpen,
				(DirectiveState::NameOpen, Some(RawToken::Quote)) => DirectiveState::Name(span.end),
				(DirectiveState::Name(name_start), Some(RawToken::Quote)) => {
					name = name_start..span.start;
					DirectiveState::CallClose
				}
				(DirectiveState::Name(_), Some(RawToken::ParenClose)) => return None,
				(DirectiveState::Name(name_start), _) => {
					if slice.contains(['\'', ')']) {
						return None;
					}
					DirectiveState::Name(name_start)
				}
				(DirectiveState::CallClose, Some(RawToken::ParenClose)) => DirectiveState::Trailer,
				(DirectiveState::Trailer, Some(RawToken::DirectiveClose)) => {
					return Some(DirectiveMatch {
						span: start..span.end,
						name,
						next_cursor: index + 1,
					});
				}
				(DirectiveState::Trailer, _) => {
					if slice.contains(['%', '>']) {
						return None;
					}
					DirectiveState::Trailer
				}
				_ => return None,
			};
		}

		None
	}
}

/// Split `content` around partial directives of the form
/// `<%= partial partial_version('name') %>`.
///
/// Directives are kept verbatim as their own segments and empty literals
/// are dropped, so concatenating every segment reproduces `content`
/// exactly. When no literal is empty the output alternates
/// literal, directive, literal, ... starting with a literal, which is the
/// parity the content classifier documents.
pub(crate) fn split_partials(content: &str) -> Vec<RawSegment<'_>> {
	let mut walker = DirectiveWalker::new(content);
	walker.process();
	walker.segments
}

/// The quoted name of `directive` when it is exactly one partial directive.
pub(crate) fn directive_name(directive: &str) -> Option<&str> {
	match split_partials(directive).as_slice() {
		[RawSegment::Partial { directive: whole, name }] if whole.len() == directive.len() => {
			Some(*name)
		}
		_ => None,
	}
}
