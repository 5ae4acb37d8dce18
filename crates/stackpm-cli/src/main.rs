mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{exit_code_for, EXIT_FAILURE};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "stackpm",
    version,
    about = "Manage Haskell Stack dependencies in project.cabal and stack.yaml"
)]
struct Cli {
    /// Project directory holding project.cabal and stack.yaml.
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Hoogle-compatible search endpoint (overrides config and STACKPM_SEARCH_URL).
    #[arg(long, global = true)]
    search_url: Option<String>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the package index.
    Search {
        /// Free-text query.
        query: String,
    },
    /// Show metadata for exactly one package.
    Info {
        /// Package name.
        name: String,
    },
    /// Add dependencies, pinning packages outside the resolver snapshot.
    Add {
        /// Packages as NAME or NAME@VERSION.
        #[arg(required = true)]
        packages: Vec<String>,
        /// Project name (accepted for compatibility; the scaffold is always 'project').
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove dependencies from both manifests.
    Remove {
        /// Package names.
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// List direct dependencies from project.cabal.
    ListSpecfile,
    /// List pinned extra-deps from stack.yaml.
    ListLockfile,
    /// Build the project's dependencies.
    Install {
        /// Build tool to run.
        #[arg(long, default_value = "stack", value_parser = ["stack", "mock"])]
        tool: String,
    },
    /// Refresh the lockfile (add and remove already keep it current).
    Lock,
    /// Infer dependencies from source imports.
    Guess,
    /// Print the directory where installed packages live.
    PackageDir,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("STACKPM_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Install { tool } = &cli.command {
        if tool == "stack" && std::env::var("STACKPM_SKIP_PREREQS").as_deref() != Ok("1") {
            let missing = stackpm_runtime::check_stack_prereqs();
            if !missing.is_empty() {
                eprintln!("error: {}", stackpm_runtime::format_missing(&missing));
                return ExitCode::from(EXIT_FAILURE);
            }
        }
    }

    let result = run(cli);

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(exit_code_for(&msg))
        }
    }
}

fn run(cli: Cli) -> Result<u8, String> {
    let project = cli.project.as_path();
    let search_url = cli.search_url.as_deref();
    let json = cli.json;

    match cli.command {
        Commands::Search { query } => {
            let backend = commands::online_backend(project, search_url)?;
            commands::search::run(&backend, &query, json)
        }
        Commands::Info { name } => {
            let backend = commands::online_backend(project, search_url)?;
            commands::info::run(&backend, &name, json)
        }
        Commands::Add { packages, name } => {
            let backend = commands::online_backend(project, search_url)?;
            commands::add::run(&backend, &packages, name.as_deref(), json)
        }
        Commands::Remove { packages } => {
            commands::remove::run(&commands::offline_backend(project), &packages, json)
        }
        Commands::ListSpecfile => {
            commands::list::run_specfile(&commands::offline_backend(project), json)
        }
        Commands::ListLockfile => {
            commands::list::run_lockfile(&commands::offline_backend(project), json)
        }
        Commands::Install { tool } => {
            let tool = stackpm_runtime::select_tool(&tool).map_err(|e| e.to_string())?;
            commands::install::run(&commands::tool_backend(project, tool), json)
        }
        Commands::Lock => commands::lock::run(&commands::offline_backend(project), json),
        Commands::Guess => commands::guess::run(&commands::offline_backend(project), json),
        Commands::PackageDir => {
            commands::package_dir::run(&commands::offline_backend(project), json)
        }
        Commands::Completions { shell } => {
            commands::completions::run::<Cli>(shell, &mut std::io::stdout())
        }
    }
}
