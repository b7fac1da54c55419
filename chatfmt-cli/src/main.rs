use std::path::PathBuf;
use std::process::ExitCode;

use chatfmt_core::{CleanOptions, OutputFormat, OutputTarget, RenderOptions, convert_file};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "chatfmt",
    version,
    about = "Convert a JSON conversation export into readable text, markdown, or HTML"
)]
struct Cli {
    /// Input JSON file containing a top-level `messages` array
    input: PathBuf,

    /// Include message timestamps (UTC) when present
    #[arg(short = 't', long)]
    timestamp: bool,

    /// Output format
    #[arg(
        short = 'o',
        long,
        value_enum,
        default_value_t = FormatArg::Text,
        alias = "output_format"
    )]
    output_format: FormatArg,

    /// Output file; defaults to <input>_formatted.<ext>, `-` writes to stdout
    #[arg(short = 'f', long, alias = "output_file")]
    output_file: Option<PathBuf>,

    /// Keep `{...}` spans instead of stripping them as leaked JSON payloads
    #[arg(long)]
    keep_braces: bool,

    /// Verbose logging on stderr (RUST_LOG takes precedence)
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Markdown,
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Markdown => Self::Markdown,
            FormatArg::Html => Self::Html,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(debug)
        .compact()
        .try_init();
}

fn run(cli: Cli) -> chatfmt_core::Result<()> {
    let options = RenderOptions {
        format: cli.output_format.into(),
        include_timestamps: cli.timestamp,
        clean: CleanOptions {
            strip_json_artifacts: !cli.keep_braces,
        },
    };

    let report = convert_file(&cli.input, cli.output_file.as_deref(), &options)?;

    if let OutputTarget::File(path) = &report.output {
        println!("Formatted conversation saved to {}", path.display());
    }

    Ok(())
}
