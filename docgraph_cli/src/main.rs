use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use docgraph_cli::Commands;
use docgraph_cli::DocgraphCli;
use docgraph_core::AnyError;
use docgraph_core::AnyResult;
use docgraph_core::BuildEnvironment;
use docgraph_core::BuildMode;
use docgraph_core::ContentNode;
use docgraph_core::DocgraphConfig;
use docgraph_core::DocgraphError;
use docgraph_core::MemoryRegistry;
use docgraph_core::Node;
use docgraph_core::SourceBucket;
use docgraph_core::TransformContext;
use docgraph_core::TransformOutcome;
use docgraph_core::build_site;
use docgraph_core::check_site;
use docgraph_core::collect_documents;
use docgraph_core::flatten_content_ordered_list;
use docgraph_core::load_document;
use docgraph_core::register_source_node;
use docgraph_core::transform_document;
use owo_colors::OwoColorize;
use owo_colors::Style;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const NODE_ENV: &str = "NODE_ENV";
const EDITOR_WARNINGS_OFF: &str = "EDITOR_WARNINGS_OFF";

/// Styles terminal output, or leaves it plain when color is off.
#[derive(Debug, Clone, Copy)]
struct Painter {
	color: bool,
}

impl Painter {
	fn paint(self, text: impl Display, style: Style) -> String {
		if self.color {
			text.style(style).to_string()
		} else {
			text.to_string()
		}
	}

	fn success(self, text: impl Display) -> String {
		self.paint(text, Style::new().green())
	}

	fn failure(self, text: impl Display) -> String {
		self.paint(text, Style::new().red())
	}

	fn note(self, text: impl Display) -> String {
		self.paint(text, Style::new().yellow())
	}

	fn heading(self, text: impl Display) -> String {
		self.paint(text, Style::new().bold())
	}
}

fn main() -> ExitCode {
	let args = DocgraphCli::parse();
	let painter = Painter {
		color: !args.no_color && std::env::var_os("NO_COLOR").is_none(),
	};

	init_tracing(args.verbose, painter.color);
	init_diagnostics(painter.color);

	let result = match &args.command {
		Some(Commands::Build { output, compact }) => {
			run_build(&args, painter, output.as_deref(), *compact)
		}
		Some(Commands::Check) => run_check(&args, painter),
		Some(Commands::Inspect { file, flatten }) => run_inspect(&args, painter, file, *flatten),
		None => {
			eprintln!("No subcommand specified. Run `docgraph --help` for usage.");
			return ExitCode::from(1);
		}
	};

	result.unwrap_or_else(|error| {
		report_error(painter, error);
		ExitCode::from(2)
	})
}

fn init_tracing(verbose: bool, color: bool) {
	let default_filter = if verbose { "docgraph_core=debug" } else { "warn" };

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
		.with_writer(std::io::stderr)
		.with_ansi(color)
		.init();
}

fn init_diagnostics(color: bool) {
	let installed = miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(color)
				.unicode(color)
				.build(),
		)
	}));

	if installed.is_err() {
		tracing::debug!("diagnostic hook already installed");
	}
}

/// Pipeline errors render as diagnostics, anything else as a plain line.
fn report_error(painter: Painter, error: AnyError) {
	match error.downcast::<DocgraphError>() {
		Ok(error) => eprintln!("{:?}", miette::Report::new(*error)),
		Err(error) => eprintln!("{} {error}", painter.failure("error:")),
	}
}

fn resolve_root(args: &DocgraphCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> Result<DocgraphConfig, DocgraphError> {
	Ok(DocgraphConfig::load(root)?.unwrap_or_default())
}

/// `--mode` wins over `NODE_ENV`, which wins over the config file.
fn resolve_environment(args: &DocgraphCli, config: &DocgraphConfig) -> BuildEnvironment {
	let mut environment = config.environment();

	if let Some(mode) = args.mode {
		environment.mode = mode.into();
	} else if let Ok(value) = std::env::var(NODE_ENV) {
		environment.mode = BuildMode::from_env_value(&value);
	}

	if std::env::var(EDITOR_WARNINGS_OFF).is_ok_and(|value| value == "true") {
		environment.editor_warnings_off = true;
	}

	environment
}

fn run_build(
	args: &DocgraphCli,
	painter: Painter,
	output: Option<&Path>,
	compact: bool,
) -> AnyResult<ExitCode> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let environment = resolve_environment(args, &config);
	let registry = build_site(&root, &config, environment)?;

	let node_count = registry.len();
	let relationship_count = registry.relationships().len();
	let graph = registry.into_graph();
	let json = if compact {
		serde_json::to_string(&graph)?
	} else {
		serde_json::to_string_pretty(&graph)?
	};

	match output {
		Some(path) => {
			std::fs::write(path, format!("{json}\n"))?;
			eprintln!("Wrote {}", path.display());
		}
		None => println!("{json}"),
	}

	eprintln!(
		"{} {node_count} node(s), {relationship_count} relationship(s)",
		painter.success("Built")
	);

	Ok(ExitCode::SUCCESS)
}

fn run_check(args: &DocgraphCli, painter: Painter) -> AnyResult<ExitCode> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let environment = resolve_environment(args, &config);
	let report = check_site(&root, &config, environment)?;

	if report.is_ok() {
		println!(
			"Check passed: all {} document(s) passed.",
			report.documents
		);
		return Ok(ExitCode::SUCCESS);
	}

	let failed = report.errors.len();
	for failure in report.errors {
		eprintln!("{}", painter.heading(&failure.path));
		eprintln!("{:?}", miette::Report::new(failure.error));
	}

	println!(
		"{} {failed} of {} document(s) failed.",
		painter.failure("Check failed:"),
		report.documents
	);

	Ok(ExitCode::from(1))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectOutput<'a> {
	document: ContentNode,
	#[serde(skip_serializing_if = "Option::is_none")]
	inline_toc: Option<&'a Node>,
	#[serde(skip_serializing_if = "Option::is_none")]
	version: Option<&'a Node>,
}

fn run_inspect(
	args: &DocgraphCli,
	painter: Painter,
	file: &Path,
	flatten: bool,
) -> AnyResult<ExitCode> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let environment = resolve_environment(args, &config);
	let mut registry = MemoryRegistry::new();

	let Some(document) = load_document(&root, &config, &registry, file)? else {
		return Err(format!(
			"`{}` is not inside the documents or partials directory",
			file.display()
		)
		.into());
	};

	let outcome = {
		let mut ctx = TransformContext::from_config(&mut registry, &config, environment);
		register_source_node(&mut ctx, &document)?;
		transform_document(&mut ctx, &document)?
	};

	let emitted = match outcome {
		TransformOutcome::Emitted(emitted) => emitted,
		TransformOutcome::Excluded { slug } => {
			eprintln!(
				"{} `{slug}` is excluded from the site, no nodes were built",
				painter.note("note:")
			);
			return Ok(ExitCode::SUCCESS);
		}
	};

	let Some(mut document_node) = registry
		.get(&emitted.document)
		.and_then(Node::as_content)
		.cloned()
	else {
		return Err("the document node was not registered".into());
	};

	if flatten {
		let partials = load_partials(&root, &config, environment)?;
		document_node.content_ordered_list =
			flatten_content_ordered_list(&document_node.content_ordered_list, &partials.partials_index())?;
	}

	let output = InspectOutput {
		document: document_node,
		inline_toc: emitted.inline_toc.as_ref().and_then(|id| registry.get(id)),
		version: emitted.version.as_ref().and_then(|id| registry.get(id)),
	};
	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(ExitCode::SUCCESS)
}

/// Transform only the partials bucket so references can be inlined without
/// the rest of the site having to build.
fn load_partials(
	root: &Path,
	config: &DocgraphConfig,
	environment: BuildEnvironment,
) -> Result<MemoryRegistry, DocgraphError> {
	let mut registry = MemoryRegistry::new();
	let partials: Vec<_> = collect_documents(root, config, &registry)?
		.into_iter()
		.filter(|document| document.bucket == SourceBucket::Partials)
		.collect();

	let mut ctx = TransformContext::from_config(&mut registry, config, environment);
	for partial in &partials {
		register_source_node(&mut ctx, partial)?;
		transform_document(&mut ctx, partial)?;
	}

	Ok(registry)
}
