use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use brine_proto_compiler::error::ProtoError;
use brine_proto_compiler::{compile_unit, generate_cpp, CppOptions, DataModel, SourceKind};

#[derive(Parser)]
#[command(name = "bproto")]
#[command(about = "Compile proto3 schemas into C++ headers", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a C++ header from a `.proto` schema
    GenCpp {
        /// Input `.proto` file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.h` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include guard stem (defaults to the output file name, then the package)
        #[arg(long)]
        guard: Option<String>,

        /// Data model the field offsets are computed for
        #[arg(long, value_enum, default_value_t = ModelArg::Lp64)]
        data_model: ModelArg,
    },

    /// Parse a `.proto` schema and print its AST as JSON
    Parse {
        /// Input `.proto` file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModelArg {
    Lp64,
    Ilp32,
}

impl From<ModelArg> for DataModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Lp64  => DataModel::Lp64,
            ModelArg::Ilp32 => DataModel::Ilp32,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Guard stem taken from the output file name, without its extension.
fn guard_from_output(output: &Path) -> Option<String> {
    output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
}

fn run(command: &Commands) -> Result<(), ProtoError> {
    match command {
        Commands::GenCpp { input, output, guard, data_model } => {
            let kind = SourceKind::from_path(input)?;
            let text = fs::read_to_string(input).map_err(ProtoError::Io)?;
            let unit = compile_unit(&text, kind)?;

            let options = CppOptions {
                header_guard: guard.clone().or_else(|| output.as_deref().and_then(guard_from_output)),
                data_model:   (*data_model).into(),
            };
            let header = generate_cpp(&unit, &options);

            if let Some(out_path) = output {
                fs::write(out_path, &header).map_err(ProtoError::Io)?;
                info!("Generated {} → {}", input.display(), out_path.display());
            } else {
                print!("{}", header);
            }
            Ok(())
        }

        Commands::Parse { input } => {
            let kind = SourceKind::from_path(input)?;
            let text = fs::read_to_string(input).map_err(ProtoError::Io)?;
            let unit = compile_unit(&text, kind)?;
            let json = serde_json::to_string_pretty(&unit).map_err(|e| ProtoError::Io(e.into()))?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn main() -> Result<(), ProtoError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli.command)
}
