//! mdom - parse HTML or XML into a markup-dom page and print it back

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use markup_dom::{parse_file, NodeContent, NodeRef, PageKind, ParseOptions, PrintOptions};
use tracing::{debug, info, Level};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Parse markup into a typed node tree
#[derive(Parser)]
#[command(name = "mdom")]
#[command(version)]
#[command(about = "Parse HTML or XML into a typed node tree", long_about = None)]
struct Cli {
    /// Log parser and factory decisions (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Input file
    input: PathBuf,

    /// Parse as HTML (default: inferred from a .html/.htm extension)
    #[arg(long)]
    html: bool,

    /// Drop whitespace-only text nodes
    #[arg(long)]
    skip_whitespace: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print it back as markup
    #[command(visible_alias = "f")]
    Format {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (default: stdout)
        output: Option<PathBuf>,

        /// Start the output with an XML declaration
        #[arg(long)]
        xml_declaration: bool,
    },

    /// Parse a file and print its node tree
    #[command(visible_alias = "t")]
    Tree {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Format {
            input,
            output,
            xml_declaration,
        } => run_format(&input, output.as_deref(), xml_declaration),
        Commands::Tree { input } => run_tree(&input),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

/// Logs to stderr. `RUST_LOG` (target list syntax) takes precedence over
/// `--verbose`.
fn init_logging(verbose: bool) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| {
            let level = if verbose { Level::DEBUG } else { Level::WARN };
            Targets::new().with_default(level)
        });
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
}

fn page_kind(input: &InputArgs) -> PageKind {
    let html_extension = input
        .input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"));
    if input.html || html_extension {
        PageKind::Html
    } else {
        PageKind::Xml
    }
}

fn load(input: &InputArgs) -> markup_dom::Result<markup_dom::PageRef> {
    let kind = page_kind(input);
    let options = ParseOptions {
        skip_whitespace_text: input.skip_whitespace,
    };
    info!(input = %input.input.display(), ?kind, "parsing");
    let page = parse_file(&input.input, kind, options)?;
    debug!(
        children = page.document().borrow().child_count(),
        namespaces = page.namespaces().len(),
        "parsed"
    );
    Ok(page)
}

/// Parses the input and writes it back as markup.
fn run_format(
    input: &InputArgs,
    output_path: Option<&Path>,
    xml_declaration: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load(input)?;

    let mut output: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };

    page.write_xml(&mut output, PrintOptions { xml_declaration })?;
    Ok(())
}

/// Parses the input and prints one line per node.
fn run_tree(input: &InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let page = load(input)?;
    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());
    write_tree(page.document(), 0, &mut output)?;
    output.flush()?;
    Ok(())
}

fn write_tree<W: Write>(node: &NodeRef, depth: usize, out: &mut W) -> io::Result<()> {
    let inner = node.borrow();
    let pad = "  ".repeat(depth);
    match inner.content() {
        NodeContent::Document => writeln!(out, "{pad}#document")?,
        NodeContent::Element(element) => {
            write!(out, "{pad}<{}> {:?}", element.qualified_name(), element.class())?;
            if let Some(uri) = element.namespace_uri() {
                write!(out, " ns={uri}")?;
            }
            for (name, value) in element.attributes().iter() {
                write!(out, " {name}={value:?}")?;
            }
            writeln!(out)?;
        }
        NodeContent::ProcessingInstruction(pi) => {
            writeln!(out, "{pad}#pi {} {:?}", pi.target(), pi.data())?
        }
        content => writeln!(
            out,
            "{pad}{} {:?}",
            content.node_name(),
            content.node_value().unwrap_or_default()
        )?,
    }
    for child in inner.children() {
        write_tree(child, depth + 1, out)?;
    }
    Ok(())
}
