//! hub-typings command line.
//!
//! # Enabling Debug Logging
//!
//! Set the `HUB_TYPINGS_LOG` environment variable to enable tracing:
//!
//! ```bash
//! HUB_TYPINGS_LOG=debug hub-typings generate model.json
//! ```
//!
//! Log levels: error, warn, info, debug, trace

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hub_typings::config::CONFIG_FILE;
use hub_typings::prelude::{prelude_document, PRELUDE_NAME};
use hub_typings::report::report_document;
use hub_typings::{
    generate, is_hub_declaration, DirectoryProject, GenerationReport, HubTypingsConfig,
    MappingTable, MemoryProject, OutputSink, TypeCatalog, TypeDeclaration,
};

#[derive(Parser, Debug)]
#[command(
    name = "hub-typings",
    version,
    about = "Generate TypeScript typings for SignalR hubs"
)]
struct Cli {
    /// Enable verbose debug logging (or set HUB_TYPINGS_LOG=debug)
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate typings for the hubs of a model
    Generate {
        /// JSON model describing the declarations
        model: PathBuf,

        /// Only generate these hubs (full or simple name)
        #[arg(long = "hub", value_name = "NAME")]
        hubs: Vec<String>,

        /// Project root to write into (overrides output.root)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print the documents instead of writing them
        #[arg(long)]
        stdout: bool,

        /// Write a warnings report next to each hub document
        #[arg(long)]
        report: bool,
    },
    /// List the declarations of a model and whether they are hubs
    List {
        /// JSON model describing the declarations
        model: PathBuf,
    },
    /// Write only the signalR.d.ts prelude
    Prelude {
        /// Project root to write into (overrides output.root)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("HUB_TYPINGS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = HubTypingsConfig::load_from_path(&cli.config)?.unwrap_or_default();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Generate {
            model,
            hubs,
            out,
            stdout,
            report,
        } => run_generate(
            &config,
            &model,
            &hubs,
            out.as_deref(),
            stdout,
            report || config.output.report(),
        ),
        Command::List { model } => run_list(&config, &model),
        Command::Prelude { out } => run_prelude(&config, out.as_deref()),
    }
}

fn load_model(config: &HubTypingsConfig, table: &MappingTable, model: &Path) -> Result<TypeCatalog> {
    let mut catalog = TypeCatalog::load(model, table)
        .with_context(|| format!("failed to load model {}", model.display()))?;
    for name in config.hub_types().names() {
        catalog.add_known_type(name);
    }
    Ok(catalog)
}

fn project_root(config: &HubTypingsConfig, out: Option<&Path>) -> PathBuf {
    out.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(config.output.root()))
}

fn run_generate(
    config: &HubTypingsConfig,
    model: &Path,
    names: &[String],
    out: Option<&Path>,
    stdout: bool,
    write_report: bool,
) -> Result<()> {
    let table = config.mapping_table();
    let hub_types = config.hub_types();
    let options = config.generate_options();
    let catalog = load_model(config, &table, model)?;

    let selected: Vec<&TypeDeclaration> = if names.is_empty() {
        catalog
            .declarations()
            .filter(|decl| is_hub_declaration(decl, &catalog, &hub_types))
            .collect()
    } else {
        names
            .iter()
            .map(|name| {
                catalog
                    .get(name)
                    .with_context(|| format!("no declaration named `{name}` in the model"))
            })
            .collect::<Result<_>>()?
    };
    if selected.is_empty() {
        tracing::warn!(model = %model.display(), "model declares no hubs");
        return Ok(());
    }

    let mut memory = MemoryProject::new();
    let mut directory = DirectoryProject::new(project_root(config, out));
    let existing_prelude = if stdout {
        seed_prelude(&directory, &mut memory)?
    } else {
        None
    };
    let sink: &mut dyn OutputSink = if stdout { &mut memory } else { &mut directory };

    for decl in selected {
        let report = generate(decl, &catalog, &hub_types, &table, sink, &options)
            .with_context(|| format!("failed to generate typings for `{}`", decl.name))?;
        print_warnings(&report);
        if write_report {
            sink.add_document(report_document(&report))?;
        }
        if !stdout {
            eprintln!("wrote {}", report.document);
        }
    }

    if stdout {
        for doc in memory
            .documents()
            .filter(|doc| Some(doc.path()) != existing_prelude)
        {
            println!("// ==> {}\n{}", doc.path(), doc.text);
        }
    }
    Ok(())
}

/// Copy the project's prelude, if any, into the in-memory sink so a
/// printed run sees the same project state as a written one.
fn seed_prelude(
    directory: &DirectoryProject,
    memory: &mut MemoryProject,
) -> Result<Option<String>> {
    let Some(prelude) = directory.find(PRELUDE_NAME)? else {
        return Ok(None);
    };
    let path = prelude.path();
    tracing::debug!(%path, "using the project's prelude");
    memory.add_document(prelude)?;
    Ok(Some(path))
}

fn run_list(config: &HubTypingsConfig, model: &Path) -> Result<()> {
    let table = config.mapping_table();
    let hub_types = config.hub_types();
    let catalog = load_model(config, &table, model)?;

    for decl in catalog.declarations() {
        let kind = format!("{:?}", decl.kind).to_lowercase();
        if is_hub_declaration(decl, &catalog, &hub_types) {
            println!("{}\t{}\thub", decl.name, kind);
        } else {
            println!("{}\t{}", decl.name, kind);
        }
    }
    Ok(())
}

fn run_prelude(config: &HubTypingsConfig, out: Option<&Path>) -> Result<()> {
    let mut project = DirectoryProject::new(project_root(config, out));
    if let Some(existing) = project.find(PRELUDE_NAME)? {
        eprintln!("{} already exists", existing.path());
        return Ok(());
    }
    let doc = prelude_document(config.output.prelude_dir(), false);
    let path = doc.path();
    project.add_document(doc)?;
    eprintln!("wrote {path}");
    Ok(())
}

fn print_warnings(report: &GenerationReport) {
    if report.warnings.is_empty() {
        return;
    }
    let choice = if atty::is(atty::Stream::Stderr) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);
    for w in &report.warnings {
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = write!(stderr, "warning");
        let _ = stderr.reset();
        let _ = writeln!(stderr, "[{}]: {} (in {})", w.kind.label(), w.message, report.hub);
    }
}
