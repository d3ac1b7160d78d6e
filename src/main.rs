use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use linkcard::{output::write_manifest, FetcherConfig, Post, RenderOptions, Translations};
use tracing_subscriber::EnvFilter;

/// Render scraped posts as light and dark SVG cards
#[derive(Parser, Debug)]
#[command(name = "linkcard", version, about)]
struct Cli {
    /// JSON file with one post record or an array of them
    #[arg(long)]
    posts: PathBuf,

    /// Directory the cards are written to (created if missing)
    #[arg(long, default_value = "cards")]
    out: PathBuf,

    /// Template root containing <variant>/<theme>.svg
    #[arg(long, default_value = "templates")]
    templates: PathBuf,

    /// Locale for labels and relative times
    #[arg(long, default_value = "en")]
    language: String,

    /// JSON file with label tables per locale
    #[arg(long)]
    translations: Option<PathBuf>,

    /// Maximum number of images shown in a gallery
    #[arg(long, default_value_t = 4)]
    max_images: usize,

    /// Write the list of rendered posts here
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Timeout per image request in milliseconds
    #[arg(long, default_value_t = 15000)]
    timeout_ms: u64,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // also routes `log` records from the library
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> anyhow::Result<usize> {
    if cli.max_images == 0 {
        bail!("--max-images must be at least 1");
    }

    let raw = std::fs::read_to_string(&cli.posts)
        .with_context(|| format!("reading {}", cli.posts.display()))?;
    let posts = Post::parse_many(&raw)?;
    let total = posts.len();

    let translations = match &cli.translations {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Translations::from_json(&json)?
        }
        None => Translations::default(),
    };
    let options = RenderOptions {
        language: cli.language,
        translations,
        max_gallery_images: cli.max_images,
    };

    let renderer = linkcard::new_renderer(FetcherConfig {
        timeout_ms: cli.timeout_ms,
        ..Default::default()
    })?;

    let results = renderer
        .render_batch(posts, &cli.out, &cli.templates, &options)
        .await;
    let failed = results.iter().filter(|r| r.is_err()).count();
    let entries: Vec<_> = results.into_iter().filter_map(Result::ok).collect();
    log::info!("rendered {} of {} posts", entries.len(), total);

    if let Some(path) = &cli.manifest {
        write_manifest(path, &entries)
            .await
            .with_context(|| format!("writing manifest {}", path.display()))?;
    }
    Ok(failed)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    match run(Cli::parse()).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            eprintln!("linkcard: {} post(s) failed to render", failed);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("linkcard: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
