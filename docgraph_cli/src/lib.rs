use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use docgraph_core::BuildMode;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Turn textile documentation sources into a typed content node graph.",
	long_about = "docgraph reads the textile documents and partials of a documentation site, \
	              extracts front matter and inline tables of contents, splits content around \
	              partial directives and emits a graph of content, version and breadcrumb \
	              nodes.\n\nQuick start:\n  docgraph build    Print the node graph as JSON\n  \
	              docgraph check    Report every authoring error\n  docgraph inspect  Show the \
	              nodes built from one file"
)]
pub struct DocgraphCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Build mode. Overrides `NODE_ENV` and the `mode` set in
	/// `docgraph.toml`.
	#[arg(long, global = true, value_enum)]
	pub mode: Option<ModeArg>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Build the node graph for every document.
	///
	/// Sources both buckets, runs every document through the pipeline and
	/// prints the resulting nodes and relationships as JSON. The build stops
	/// at the first error.
	Build {
		/// Write the graph to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Print the JSON on a single line.
		#[arg(long, default_value_t = false)]
		compact: bool,
	},
	/// Run every document through the pipeline and report all errors.
	///
	/// Unlike `build`, checking continues after a failing document so every
	/// missing `meta_description` and malformed inline TOC is listed at
	/// once. Exits with a non-zero status code if any document fails.
	Check,
	/// Print the nodes built from a single document.
	///
	/// The bucket is inferred from the configured source directories.
	Inspect {
		/// The document to inspect.
		file: PathBuf,

		/// Replace partial references with the content of the partials they
		/// name.
		#[arg(long, default_value_t = false)]
		flatten: bool,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
	/// Local authoring build. Enables the `meta_description` check.
	Development,
	/// Production build.
	Production,
}

impl From<ModeArg> for BuildMode {
	fn from(mode: ModeArg) -> Self {
		match mode {
			ModeArg::Development => Self::Development,
			ModeArg::Production => Self::Production,
		}
	}
}
