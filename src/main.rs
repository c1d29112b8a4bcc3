use clap::{ArgAction, Parser};
use derive_more::{Display, Error};
use exn::ResultExt;
use gum_assets::DescriptorIndex;
use gum_config::{Config, Overrides};
use gum_manifest::{Generator, RunSummary};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Stage a reference installation for the patch file server and write its
/// manifests.
#[derive(Debug, Parser)]
#[command(name = "gum", version, about)]
struct Cli {
    /// Reference installation to stage from
    #[arg(short, long, value_name = "PATH")]
    source: Option<PathBuf>,
    /// 32 hexadecimal digits keying the secure preloader content
    #[arg(short, long, value_name = "HEX32")]
    droid: Option<String>,
    /// Staging root for artifacts and manifests
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Artifacts to remove after staging, one relative path per line
    #[arg(short, long, value_name = "PATH")]
    blacklist: Option<PathBuf>,
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// More output; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    /// Only report warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            source: self.source.clone(),
            droid: self.droid.clone(),
            output: self.output.clone(),
            blacklist: self.blacklist.clone(),
        }
    }
}

#[derive(Debug, Display, Error)]
enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("manifest generation failed")]
    Generate,
}

fn run(cli: &Cli) -> Result<RunSummary, exn::Exn<ErrorKind>> {
    let config = Config::load(cli.config.as_deref(), cli.overrides()).or_raise(|| ErrorKind::Config)?;
    let droid = config.droid_key().or_raise(|| ErrorKind::Config)?;
    tracing::debug!(source = %config.source.display(), output = %config.output.display(), "Configuration loaded");
    Generator::new(DescriptorIndex, config.source, config.output, config.blacklist, droid)
        .run()
        .or_raise(|| ErrorKind::Generate)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.level()))
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(summary) => {
            for manifest in &summary.manifests {
                tracing::debug!(manifest = %manifest.name, records = manifest.records, "Shipped");
            }
            ExitCode::SUCCESS
        },
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}
