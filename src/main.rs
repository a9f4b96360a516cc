use clap::Parser;
use diapositive::config::{self, SITE_CONFIG_FILE};
use diapositive::imaging::RustBackend;
use diapositive::render::HtmlTheme;
use diapositive::site::Site;
use diapositive::{logging, output};
use std::path::PathBuf;

const NAME: &str = env!("CARGO_PKG_NAME");

fn version_string() -> &'static str {
    let hash = env!("DIAPO_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{}+{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "diapo")]
#[command(about = "simple photo gallery generator")]
#[command(long_about = "\
simple photo gallery generator

Every directory inside PHOTODIR becomes an album; every image inside an
album becomes a photo page with a resized copy and a thumbnail.

  photos/
  ├── diapositive.toml      # Site config (base_url, [copyright] required)
  ├── Lisbon 2024/
  │   ├── album.toml        # Optional: title, cover
  │   ├── 001.jpg
  │   └── 002.jpg
  └── Dunes/
      └── dune.png")]
#[command(version = version_string())]
struct Cli {
    /// Input directory
    #[arg(value_name = "PHOTODIR")]
    indir: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "./_site")]
    outdir: PathBuf,

    /// Configuration file (default: <PHOTODIR>/diapositive.toml)
    #[arg(short = 'C', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show more verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show very verbose output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.debug);

    println!("{NAME} {}", version_string());

    let config_path = cli
        .config
        .unwrap_or_else(|| cli.indir.join(SITE_CONFIG_FILE));
    tracing::info!("using config file: {}", config_path.display());
    tracing::info!("using input directory: {}", cli.indir.display());
    tracing::info!("using output directory: {}", cli.outdir.display());

    let mut site = Site::load_config(&config_path)?;
    init_thread_pool(site.processing());

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::log_event(&event);
        }
    });

    let backend = RustBackend::new();
    let result = site
        .read_albums(&backend, &cli.indir, Some(&tx))
        .and_then(|()| site.write(&backend, &HtmlTheme, &cli.outdir, Some(&tx)));
    drop(tx);
    printer.join().ok();
    result?;

    tracing::info!("site built");
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
