use clap::{Parser, Subcommand};
use homepage::config;
use homepage::load::LoadError;
use homepage::output;
use homepage::pipeline::{self, BuildError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "homepage")]
#[command(about = "Render a research homepage from a single JSON data file")]
#[command(long_about = "\
Render a research homepage from a single JSON data file

Everything on the page comes from data/site.json. The page chrome comes
from templates/base.html. Each build deletes the output directory and
writes it again from scratch.

Project structure:

  .
  ├── homepage.toml            # Optional, overrides the paths below
  ├── data/site.json           # Profile, news, publications, projects, ...
  ├── templates/base.html      # Page shell with $title, $nav, $content, ...
  ├── static/assets/           # CSS, fonts, images → <output>/assets/
  ├── photos/                  # → <output>/assets/photos/
  └── docs/                    # Output (deleted and rebuilt)

Missing links become \"#\" and missing or unresolvable images become the
placeholder image. Each substitution prints a [warn] line.

Run 'homepage gen-config' to generate a documented homepage.toml.")]
#[command(version)]
struct Cli {
    /// Project root; every configured path resolves against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site into the output directory
    Build {
        /// Output directory (overrides paths.output)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load and normalize the data file without writing anything
    Check {
        /// Print the normalized document as JSON
        #[arg(long)]
        print: bool,
    },
    /// Print a stock homepage.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { output } => {
            let mut build_config = config::load_config(&cli.root)?;
            if let Some(dir) = output {
                build_config = build_config.with_output(dir);
            }
            match pipeline::build(&build_config, output::print_warning) {
                Ok(report) => output::print_build_report(&report),
                Err(err) => return missing_data_exit(err),
            }
        }
        Command::Check { print } => {
            let build_config = config::load_config(&cli.root)?;
            match pipeline::check(&build_config) {
                Ok(report) => {
                    if print {
                        println!("{}", serde_json::to_string_pretty(&report.data)?);
                    }
                    output::print_check_report(&report);
                }
                Err(err) => return missing_data_exit(err),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// A missing data file is reported and exits with status 1. Anything else
/// propagates.
fn missing_data_exit(err: BuildError) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match err {
        BuildError::Load(missing @ LoadError::Missing(_)) => {
            println!("{missing}");
            Ok(ExitCode::from(1))
        }
        other => Err(other.into()),
    }
}
