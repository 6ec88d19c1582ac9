use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sp_ast::PreprocOptions;
use sp_emit::{render_parse_tree, Preprocessor, SketchInput};
use sp_parser::parse_sketch;
use sp_parser::preprocess::{extract_imports, substitute_unicode, SourceProgram};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spp", about = "sketchpre: turn sketches into compilable Java")]
struct Cli {
    /// Log pipeline decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preprocess a sketch and write `<name>.java` into the output directory.
    Preprocess {
        /// Input .pde file.
        input: PathBuf,
        /// Output directory.
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        /// Sketch name (defaults to the input file stem).
        #[arg(short, long)]
        name: Option<String>,
        /// Code folder package to import as `pkg.*`; repeatable.
        #[arg(long = "code-folder")]
        code_folder: Vec<String>,
        /// JSON preferences file.
        #[arg(long)]
        prefs: Option<PathBuf>,
        /// Keep non-ASCII characters as they are.
        #[arg(long)]
        no_unicode: bool,
        /// Do not suffix float literals with `f`.
        #[arg(long)]
        no_float_suffix: bool,
        /// Also write parseTree.xml.
        #[arg(long)]
        parse_tree: bool,
    },
    /// Parse the sketch and report any syntax errors.
    Check {
        input: PathBuf,
        #[arg(long)]
        prefs: Option<PathBuf>,
    },
    /// Parse and dump the syntax tree (XML, or JSON with --json).
    Parse {
        input: PathBuf,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        prefs: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(prefs: Option<&Path>) -> Result<PreprocOptions> {
    let Some(path) = prefs else {
        return Ok(PreprocOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read preferences {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid preferences {}", path.display()))
}

/// Read a sketch and drop its imports, which the grammar does not accept.
/// Unicode is escaped as `preprocess` does, so error columns agree.
fn read_sketch(input: &Path, options: &PreprocOptions) -> Result<String> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let mut program = SourceProgram::new(format!("{source}\n"));
    let imports = extract_imports(&mut program);
    debug!(count = imports.len(), "skipped imports");
    let text = program.into_text();
    if options.substitute_unicode {
        return Ok(substitute_unicode(&text).into_owned());
    }
    Ok(text)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Preprocess {
            input,
            output_dir,
            name,
            code_folder,
            prefs,
            no_unicode,
            no_float_suffix,
            parse_tree,
        } => {
            let mut options = load_options(prefs.as_deref())?;
            options.substitute_unicode &= !no_unicode;
            options.substitute_floats &= !no_float_suffix;
            options.output_parse_tree |= parse_tree;

            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let name = match name {
                Some(name) => name,
                None => input
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .context("cannot derive a sketch name from the input path")?
                    .to_string(),
            };

            let output = Preprocessor::new(options)
                .preprocess(SketchInput {
                    source,
                    output_dir,
                    name,
                    code_folder_packages: code_folder,
                })
                .with_context(|| format!("failed to preprocess {}", input.display()))?;

            println!("{}", output.class_name);
            eprintln!(
                "Wrote {} ({} mode, body starts after line {})",
                output.path.display(),
                output.mode,
                output.header_offset
            );
        }
        Commands::Check { input, prefs } => {
            let options = load_options(prefs.as_deref())?;
            let program = read_sketch(&input, &options)?;
            let parsed = parse_sketch(&program, &options)
                .with_context(|| format!("syntax error in {}", input.display()))?;
            eprintln!("OK: {} ({} mode)", input.display(), parsed.mode());
        }
        Commands::Parse { input, json, prefs } => {
            let options = load_options(prefs.as_deref())?;
            let program = read_sketch(&input, &options)?;
            let parsed = parse_sketch(&program, &options)
                .with_context(|| format!("syntax error in {}", input.display()))?;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &parsed.tree)?;
                writeln!(out)?;
            } else {
                render_parse_tree(&parsed.tree, &parsed.tokens, &mut out)?;
            }
        }
    }

    Ok(())
}
