use std::path::PathBuf;

use clap::Parser;
use iori_mpd::{MpdResolver, ResolverConfig};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct MpdUrlsArgs {
    /// Url the manifest was retrieved from. Relative BaseURLs are resolved against it.
    ///
    /// Defaults to `root_url` of the config file, or http://test.test/test.mpd.
    #[clap(long, env = "MPD_ROOT_URL")]
    root_url: Option<String>,

    /// Resolver config in TOML format
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Keep the query of the base url on relative references without a query
    #[clap(long)]
    inherit_query: bool,

    /// Maximum number of urls emitted for one representation of one period
    #[clap(long)]
    max_segments: Option<usize>,

    /// Print JSON on a single line
    #[clap(long)]
    compact: bool,

    /// Debug output
    #[clap(short, long, alias = "debug")]
    verbose: bool,

    /// MPD file path
    manifest: PathBuf,
}

impl MpdUrlsArgs {
    fn config(&self) -> anyhow::Result<ResolverConfig> {
        let mut config = match &self.config {
            Some(path) => ResolverConfig::load(path)?,
            None => ResolverConfig::default(),
        };
        if let Some(root_url) = &self.root_url {
            config.root_url = root_url.clone();
        }
        if self.inherit_query {
            config.inherit_query = true;
        }
        if let Some(max_segments) = self.max_segments {
            config.max_segments = max_segments;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = MpdUrlsArgs::parse();

    let default_level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let resolver = MpdResolver::new(args.config()?)?;
    let manifest = std::fs::read(&args.manifest)?;
    tracing::info!(
        manifest = %args.manifest.display(),
        root_url = %resolver.root_url(),
        "Resolving segment urls"
    );

    let resolved = resolver.resolve(&manifest)?;
    for diagnostic in resolved.diagnostics.iter() {
        tracing::warn!(
            representation = %diagnostic.representation_id,
            period = diagnostic.period,
            "{}",
            diagnostic.error
        );
    }

    if resolved.segments.is_empty() {
        tracing::warn!("No representation found in manifest");
    }

    let output = if args.compact {
        serde_json::to_string(&resolved.segments)?
    } else {
        serde_json::to_string_pretty(&resolved.segments)?
    };
    println!("{output}");

    Ok(())
}
