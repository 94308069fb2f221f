//! Command-line interface for fatex.
//!
//! Two subcommands mirror the two halves of the workflow: `fetch` pulls and
//! extracts the FontAwesome desktop distribution, `build` turns an
//! extracted distribution into the LaTeX package bundle.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fatex_tex::Mode;

use crate::fetch;
use crate::pipeline::{self, BuildConfig};

/// fatex - FontAwesome 6 LaTeX package generator
#[derive(Parser)]
#[command(name = "fatex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG is used when unset
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover, download, and extract the FontAwesome desktop distribution
    Fetch {
        /// Download page to scan for the desktop release link
        #[arg(long, value_name = "URL", default_value = fetch::DOWNLOAD_PAGE_URL)]
        url: String,

        /// Directory the distribution is extracted into
        #[arg(long, value_name = "DIR", default_value = "fontawesome")]
        dest: PathBuf,

        /// Fetch the pro distribution instead of free
        #[arg(long)]
        pro: bool,
    },

    /// Generate the LaTeX package bundle from an extracted distribution
    Build {
        /// Extracted FontAwesome distribution directory
        #[arg(long, value_name = "DIR", default_value = "fontawesome")]
        source: PathBuf,

        /// Directory the package bundle is written into
        #[arg(long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Include pro-only icons (requires the pro distribution fonts)
        #[arg(long)]
        pro: bool,

        /// Name of the emitted style file
        #[arg(long, value_name = "NAME", default_value = "fontawesome6.sty")]
        style_file: String,
    },
}

/// Initialize logging before any pipeline work runs.
///
/// Precedence: the `--log-level` flag, then `RUST_LOG`, then `info`.
pub fn init_logging(level: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    // try_init: tests may initialize more than once.
    let _ = builder.format_timestamp(None).try_init();
}

/// Parse arguments and run the selected subcommand.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Fetch { url, dest, pro } => {
            let release = fetch::run_fetch(&url, &dest, pro)?;
            println!(
                "Fetched FontAwesome {} into {}",
                release.version,
                dest.display()
            );
            Ok(())
        }
        Commands::Build {
            source,
            output,
            pro,
            style_file,
        } => {
            let config = BuildConfig {
                source_dir: source,
                output_dir: output,
                mode: if pro { Mode::Pro } else { Mode::Free },
                style_file,
            };
            let report = pipeline::run(&config)?;
            println!(
                "Wrote {} ({} icons, {} macros); copied {} bundle files",
                report.style_path.display(),
                report.icons,
                report.macros,
                report.copied
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_build_defaults() {
        let cli = Cli::try_parse_from(["fatex", "build"]).unwrap();
        match cli.command {
            Commands::Build {
                source,
                output,
                pro,
                style_file,
            } => {
                assert_eq!(source, PathBuf::from("fontawesome"));
                assert_eq!(output, PathBuf::from("output"));
                assert!(!pro);
                assert_eq!(style_file, "fontawesome6.sty");
            }
            Commands::Fetch { .. } => panic!("expected build subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_fetch_pro() {
        let cli = Cli::try_parse_from(["fatex", "fetch", "--pro", "--dest", "/tmp/fa"]).unwrap();
        match cli.command {
            Commands::Fetch { url, dest, pro } => {
                assert_eq!(url, fetch::DOWNLOAD_PAGE_URL);
                assert_eq!(dest, PathBuf::from("/tmp/fa"));
                assert!(pro);
            }
            Commands::Build { .. } => panic!("expected fetch subcommand"),
        }
    }

    #[test]
    fn test_cli_rejects_missing_subcommand() {
        assert!(Cli::try_parse_from(["fatex"]).is_err());
    }
}
