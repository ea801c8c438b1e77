use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod animation;
mod config;
mod console;
mod constants;
mod controller;
mod error;
mod slide;
mod source;
mod state;
mod surface;
#[cfg(feature = "window")]
mod window;

use crate::config::{Overrides, Settings, SurfaceKind, load_settings};
use crate::console::ConsoleSurface;
use crate::constants::SHUTDOWN_GRACE;
use crate::controller::{load_page, shutdown};
use crate::source::HttpSource;

/// Fetches `<URL>0`, `<URL>1`, ... and cross-fades them one after another.
#[derive(Debug, Parser)]
#[command(name = "fadeshow", version)]
struct Args {
    /// Base URL; the slide index is appended to it
    url: Option<String>,

    /// Seconds each slide stays fully visible
    #[arg(long)]
    time: Option<f64>,

    /// Show error pages as-is instead of a short load error message
    #[arg(long)]
    debug: Option<bool>,

    /// Config file (default: /etc/fadeshow.toml, skipped if missing)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to render slides
    #[arg(long, value_enum)]
    surface: Option<SurfaceKind>,

    /// Seconds per fade
    #[arg(long)]
    animation: Option<f64>,

    /// Give up on a request after this many seconds
    #[arg(long)]
    request_timeout: Option<f64>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            delay_secs: self.time,
            debug: self.debug,
            animation_secs: self.animation,
            surface: self.surface,
            request_timeout_secs: self.request_timeout,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref(), |key| std::env::var(key).ok())?;
    settings.apply(args.overrides());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match settings.surface {
        SurfaceKind::Console => runtime.block_on(run_console(&settings)),
        SurfaceKind::Window => run_window(&runtime, &settings),
    }
}

async fn run_console(settings: &Settings) -> Result<()> {
    let url = settings.url()?;
    let source = HttpSource::new(settings.request_timeout()?)?;
    let (console, surface) = ConsoleSurface::spawn(settings.animation()?);

    info!(url, delay = settings.delay_secs, debug = settings.debug, "starting slideshow");
    let mut slideshow = load_page(url, surface, settings.delay_secs, source, settings.debug)?;

    tokio::select! {
        joined = &mut slideshow => joined.context("slideshow task failed")?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            info!("interrupted, stopping slideshow");
            console.close();
            shutdown(slideshow, Duration::from_secs_f32(SHUTDOWN_GRACE)).await;
        }
    }
    Ok(())
}

#[cfg(feature = "window")]
fn run_window(runtime: &Runtime, settings: &Settings) -> Result<()> {
    use crate::window::WindowSurface;

    let url = settings.url()?;
    let source = HttpSource::new(settings.request_timeout()?)?;
    let (window, surface) = WindowSurface::new(settings.animation()?);

    info!(url, delay = settings.delay_secs, debug = settings.debug, "starting slideshow");
    let slideshow = {
        let _guard = runtime.enter();
        load_page(url, surface, settings.delay_secs, source, settings.debug)?
    };

    // raylib wants the main thread; the controller runs on the runtime.
    window.run("Fade Slideshow")?;
    runtime.block_on(shutdown(slideshow, Duration::from_secs_f32(SHUTDOWN_GRACE)));
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run_window(_runtime: &Runtime, _settings: &Settings) -> Result<()> {
    anyhow::bail!("this build has no window surface; rebuild with `--features window`")
}
