use clap::{Parser, Subcommand};
use std::path::PathBuf;

use leafid_cli::Overrides;
use leafid_core::load_config;

mod commands;

use commands::{
    cmd_chat, cmd_check, cmd_classify, cmd_init, cmd_species_list, cmd_species_show,
};

#[derive(Parser)]
#[command(name = "leafid")]
#[command(version, about = "Medicinal plant leaf identifier", long_about = None)]
struct Cli {
    /// Configuration file (default: search ./config, ./ and ~/leafid)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the plant species in leaf photo(s)
    Classify {
        /// Input files or directories
        #[arg(value_name = "INPUTS", required = true)]
        inputs: Vec<PathBuf>,

        /// Scan directories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Classify even if the photo does not look like a leaf
        #[arg(long)]
        skip_validation: bool,

        /// ONNX model file
        #[arg(short, long, value_name = "FILE")]
        model: Option<PathBuf>,

        /// Labels file, one species per line (default: built-in catalog)
        #[arg(long, value_name = "FILE")]
        labels: Option<PathBuf>,

        /// Number of ranked predictions to show
        #[arg(short = 'k', long, value_name = "N")]
        top: Option<usize>,

        /// Leaf gate rule set: standard, lenient or strict
        #[arg(long, value_name = "NAME")]
        policy: Option<String>,

        /// Confidence (percent) below which a result is reported as unknown
        #[arg(long, value_name = "PERCENT")]
        unknown_threshold: Option<f32>,

        /// Print the spoken description for confident matches
        #[arg(long)]
        narrate: bool,

        /// Emit JSON
        #[arg(long)]
        json: bool,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,
    },

    /// Run only the leaf plausibility check
    Check {
        /// Input files or directories
        #[arg(value_name = "INPUTS", required = true)]
        inputs: Vec<PathBuf>,

        /// Scan directories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Leaf gate rule set: standard, lenient or strict
        #[arg(long, value_name = "NAME")]
        policy: Option<String>,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the species catalog
    Species {
        #[command(subcommand)]
        action: SpeciesAction,
    },

    /// Ask the plant assistant
    Chat {
        /// Question to answer; starts an interactive session if omitted
        #[arg(value_name = "QUESTION")]
        query: Option<String>,

        /// Forget previous questions before each new one
        #[arg(long)]
        auto_clear: bool,
    },

    /// Write the default configuration file
    Init {
        /// Destination (default: ~/leafid/leafid.yml)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum SpeciesAction {
    /// List every species in catalog order
    List {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Show botanical details for one species
    Show {
        /// Species identifier or common name
        #[arg(value_name = "NAME")]
        name: String,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let handle = load_config(cli.config.as_deref());
    handle.log_usage();

    let result = match cli.command {
        Commands::Classify {
            inputs,
            recursive,
            skip_validation,
            model,
            labels,
            top,
            policy,
            unknown_threshold,
            narrate,
            json,
            threads,
        } => cmd_classify(
            handle,
            inputs,
            recursive,
            skip_validation,
            Overrides {
                model,
                labels,
                top,
                policy,
                unknown_threshold,
            },
            json,
            narrate,
            threads,
        ),

        Commands::Check {
            inputs,
            recursive,
            policy,
            json,
        } => cmd_check(handle, inputs, recursive, policy, json),

        Commands::Species { action } => match action {
            SpeciesAction::List { json } => cmd_species_list(json),
            SpeciesAction::Show { name, json } => cmd_species_show(name, json),
        },

        Commands::Chat { query, auto_clear } => cmd_chat(query, auto_clear),

        Commands::Init { path, force } => cmd_init(path, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
