use clap::{Parser, Subcommand};
use shotframe::composition::{CornerStyle, compute_layout};
use shotframe::config::{self, StudioConfig};
use shotframe::imaging::fingerprint;
use shotframe::library::DirectoryLibrary;
use shotframe::session::EditorSession;
use shotframe::source::FileSource;
use shotframe::{background, output};
use std::path::PathBuf;
use std::sync::Arc;

/// Composition settings shared by `preview` and `export`.
#[derive(clap::Args, Clone)]
struct CompositionArgs {
    /// Screenshot to frame (PNG, JPEG, TIFF, WebP)
    #[arg(long)]
    image: Option<PathBuf>,

    /// Background id or name (see `shotframe backgrounds`)
    #[arg(long, default_value = "gradient1")]
    background: String,

    /// Corner-radius setting; clamped to the profile range
    #[arg(long)]
    corner_radius: Option<f64>,

    /// Image scale; clamped to the profile range
    #[arg(long)]
    scale: Option<f64>,

    /// Use smooth (continuous) corners instead of circular ones
    #[arg(long)]
    smooth: bool,
}

#[derive(Parser)]
#[command(name = "shotframe")]
#[command(about = "Frame screenshots on gradient backgrounds")]
#[command(long_about = "\
Frame screenshots on gradient backgrounds

Places a screenshot on a square gradient or solid background, rounds its
corners, adds a soft shadow, and exports a 2000x2000 PNG.

The preview and the export share one layout: the corner radius and the
image frame scale with the canvas, so the export is an exact enlargement
of the preview.

Run 'shotframe gen-config' to generate a documented shotframe.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the background catalog
    Backgrounds {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the preview-size composition to a PNG
    Preview {
        #[command(flatten)]
        composition: CompositionArgs,
        /// Output file
        #[arg(long, default_value = "preview.png")]
        out: PathBuf,
    },
    /// Render the export-size composition and save it to a photo library directory
    Export {
        #[command(flatten)]
        composition: CompositionArgs,
        /// Photo library directory
        #[arg(long, default_value = "Photos")]
        library: PathBuf,
    },
    /// Print a stock shotframe.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Backgrounds { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(background::catalog())?);
            } else {
                output::print_backgrounds(background::catalog());
            }
        }
        Command::Preview { composition, out } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let session = build_session(config, &composition).await?;

            let bitmap = session.preview()?;
            bitmap.save(&out)?;

            let canvas = session.config().preview.canvas_size;
            print_summary(&session, canvas, &fingerprint(&bitmap))?;
            println!("==> Preview written to {}", out.display());
        }
        Command::Export {
            composition,
            library,
        } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let mut session = build_session(config, &composition).await?;

            let library = Arc::new(DirectoryLibrary::new(library));
            let result = session.begin_export(Arc::clone(&library))?.await?;
            output::print_export_result(&result);
            if !result.succeeded {
                std::process::exit(1);
            }
            println!("==> Library: {}", library.dir().display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Apply CLI settings to a fresh session, the same events the UI would send.
async fn build_session(
    config: StudioConfig,
    args: &CompositionArgs,
) -> Result<EditorSession, Box<dyn std::error::Error>> {
    let mut session = EditorSession::new(config);
    session.select_background(&args.background)?;
    if let Some(radius) = args.corner_radius {
        session.set_corner_radius(radius);
    }
    if let Some(scale) = args.scale {
        session.set_image_scale(scale);
    }
    if args.smooth {
        session.set_corner_style(CornerStyle::Smooth);
    }
    if let Some(path) = &args.image {
        if !session.pick_from(&FileSource::new(path)).await {
            eprintln!("No usable image at {}; showing placeholder", path.display());
        }
    }
    Ok(session)
}

fn print_summary(
    session: &EditorSession,
    canvas: u32,
    fingerprint: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = session.state();
    let layout = if state.has_source_image() {
        Some(compute_layout(
            canvas as f64,
            state,
            &session.config().composition,
        )?)
    } else {
        None
    };
    output::print_render(canvas, state, layout.as_ref(), fingerprint);
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. Users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
