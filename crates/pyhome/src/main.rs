use std::{io, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use pyhome_core::{
    CORE_MARKER, DeployError, HomeError, HomeResolver, INTERPRETER_DIR, MARKER, MarkerContents,
    ProgramLocation, ResolvedHome, ResolverConfig, RuntimeLayout, copy_shared_libraries,
    link_runtime, write_marker,
};
use pyhome_runtime::{InterpreterProcess, RuntimeError, RuntimeInitializer};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pyhome", about = "Embedded Python runtime home discovery")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints the runtime home for an executable.
    Resolve {
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Print a JSON report instead of the bare path.
        #[arg(long)]
        json: bool,
    },
    /// Prints the runtime files found around an executable.
    Layout {
        #[command(flatten)]
        resolve: ResolveArgs,
    },
    /// Links a runtime distribution beside an executable.
    Link {
        /// Runtime distribution root.
        #[arg(long)]
        src: PathBuf,
        /// Link destination.
        #[arg(long, default_value = INTERPRETER_DIR)]
        dst: PathBuf,
        /// Directory receiving the shared libraries.
        #[arg(long, default_value = ".")]
        bin: PathBuf,
    },
    /// Writes a home marker file beside an executable.
    Mark {
        /// Home path stored in the marker.
        #[arg(long)]
        home: String,
        #[arg(long, default_value = ".")]
        bin: PathBuf,
        /// Write the core distribution marker.
        #[arg(long)]
        core: bool,
    },
    /// Initializes the runtime and prints its version.
    Version {
        #[command(flatten)]
        resolve: ResolveArgs,
    },
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Executable to resolve for; defaults to this program.
    #[arg(long)]
    exe: Option<PathBuf>,
    /// Ignore PYTHONHOME.
    #[arg(long)]
    isolated: bool,
    /// Co-located runtime directory, relative to the executable; repeatable.
    #[arg(long = "colocated", value_name = "DIR")]
    colocated: Vec<PathBuf>,
    /// Strip trailing whitespace from marker contents.
    #[arg(long)]
    trim: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Home(#[from] HomeError),
    #[error(transparent)]
    Deploy(#[from] DeployError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pyhome error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve { resolve, json } => {
            let (location, home) = resolve.resolve()?;
            if json {
                let report = home.report(location.bin_dir()?);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", home.path().display());
            }
            Ok(())
        }
        Command::Layout { resolve } => {
            let (location, home) = resolve.resolve()?;
            let bin = location.bin_dir()?;
            let layout = RuntimeLayout::host();
            println!("bin: {}", bin.display());
            println!("home: {}", home.path().display());
            println!("interpreter: {}", layout.interpreter_path(home.path()).display());
            for dir in layout.module_dirs(bin) {
                println!("modules: {}", dir.display());
            }
            Ok(())
        }
        Command::Link { src, dst, bin } => {
            let method = link_runtime(&src, &dst)?;
            let copied = copy_shared_libraries(&src, &bin)?;
            println!("{} ({method:?}), {} libraries copied", dst.display(), copied.len());
            Ok(())
        }
        Command::Mark { home, bin, core } => {
            let marker = if core { CORE_MARKER } else { MARKER };
            let path = write_marker(&bin, marker, &home)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Version { resolve } => {
            let (_, home) = resolve.resolve()?;
            let info = InterpreterProcess::default().initialize(home)?;
            println!("{}", info.version);
            Ok(())
        }
    }
}

/// `RUST_LOG` directives when set and valid, otherwise `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

impl ResolveArgs {
    fn config(&self) -> ResolverConfig {
        let config = if self.isolated {
            ResolverConfig::default()
        } else {
            ResolverConfig::from_env()
        };
        let contents = if self.trim {
            MarkerContents::TrimEnd
        } else {
            MarkerContents::Verbatim
        };
        config
            .with_colocated(self.colocated.clone())
            .with_marker_contents(contents)
    }

    fn resolve(&self) -> Result<(ProgramLocation, ResolvedHome), CliError> {
        let location = match &self.exe {
            Some(exe) => ProgramLocation::canonical(exe),
            None => ProgramLocation::current()?,
        };
        let home = HomeResolver::new(self.config()).resolve(&location)?;

        tracing::info!(
            exe = %location.exe().display(),
            home = %home.path().display(),
            source = ?home.source(),
            "resolved runtime home"
        );
        Ok((location, home))
    }
}
