use clap::{Parser, Subcommand};
use cmds::generate::GenerateArgs;
use cmds::inspect::SummaryFormat;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cmds;

#[derive(Parser)]
#[command(name = "sbe-gen")]
#[command(about = "Flyweight code generator for SBE intermediate representations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate flyweight sources from an IR file */
    Generate {
        /* IR file (.yaml, .yml or .json) */
        #[arg(short = 'i', long = "ir", value_name = "FILE")]
        ir: PathBuf,

        /* Output directory for generated code */
        #[arg(
            short = 'o',
            long = "output",
            value_name = "DIR",
            default_value = "generated"
        )]
        output_dir: PathBuf,

        /* Path the generated code imports the codec runtime from */
        #[arg(long = "codec-crate", value_name = "PATH", default_value = "sbe_codec")]
        codec_crate: String,

        /* Package name written into unit headers instead of the IR's */
        #[arg(long = "package", value_name = "NAME")]
        package: Option<String>,

        /* Write a single include!-able file instead of one file per unit */
        #[arg(long = "bundle")]
        bundle: bool,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /* Summarise the messages and types of an IR file */
    Inspect {
        /* IR file (.yaml, .yml or .json) */
        #[arg(short = 'i', long = "ir", value_name = "FILE")]
        ir: PathBuf,

        /* Format of the printed summary */
        #[arg(long = "format", value_enum, default_value = "yaml")]
        format: SummaryFormat,
    },
}

fn init_tracing(verbose: bool) {
    /* RUST_LOG wins; -v only raises the default */
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            ir,
            output_dir,
            codec_crate,
            package,
            bundle,
            verbose,
        } => {
            init_tracing(verbose);
            cmds::generate::run(GenerateArgs {
                ir,
                output_dir,
                codec_crate,
                package,
                bundle,
            })?;
        }

        Commands::Inspect { ir, format } => {
            init_tracing(false);
            cmds::inspect::run(&ir, format)?;
        }
    }

    Ok(())
}
