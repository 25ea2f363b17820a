use clap::Parser;
use nodeprint_core::{parse_bytes, FormattingOptions, NodeSerializer, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

#[derive(Parser)]
#[command(name = "nodeprint")]
#[command(version = VERSION)]
#[command(about = "Strip whitespace-only text nodes from XML and print it", long_about = None)]
struct Cli {
    /// XML file to read ("-" or nothing for stdin)
    input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leave out the <?xml ...?> declaration
    #[arg(long)]
    omit_declaration: bool,

    /// Indent nested elements by four spaces
    #[arg(short, long)]
    pretty: bool,

    /// JSON file with formatting options; flags given here turn options on
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = resolve_options(cli)?;
    debug!(?options, "formatting options");

    let bytes = read_input(cli.input.as_deref())?;
    let mut doc = parse_bytes(&bytes)?;
    let root = doc.root();

    let xml = NodeSerializer::new(options).serialize(&mut doc, root)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, format!("{}\n", xml))?;
            debug!(path = %path.display(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", xml)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn resolve_options(cli: &Cli) -> Result<FormattingOptions> {
    let base = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            serde_json::from_str::<FormattingOptions>(&text)?
        }
        None => FormattingOptions::default(),
    };

    Ok(base
        .omit_declaration(base.omit_declaration || cli.omit_declaration)
        .pretty_print(base.pretty_print || cli.pretty))
}

fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) if path != Path::new("-") => Ok(fs::read(path)?),
        _ => {
            let mut bytes = Vec::new();
            io::stdin().lock().read_to_end(&mut bytes)?;
            Ok(bytes)
        }
    }
}
