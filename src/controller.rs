use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::animation::PlayState;
use crate::error::SlideshowError;
use crate::slide::{display_content, slide_url};
use crate::source::SlideSource;
use crate::state::{Advance, SlideshowState};
use crate::surface::{PhaseSignals, Surface};

/// Starts a slideshow of `url + 0`, `url + 1`, ... on `surface`, holding each
/// slide for `time` seconds between its fade-in and fade-out.
///
/// The loop runs on the current tokio runtime until the surface stops
/// delivering phase signals.
pub fn load_page<S, D>(
    url: impl Into<String>,
    surface: D,
    time: f64,
    source: S,
    debug: bool,
) -> Result<JoinHandle<()>, SlideshowError>
where
    S: SlideSource + 'static,
    D: Surface + 'static,
{
    let delay = delay_from_secs(time)?;
    let controller = SlideshowController::new(source, surface, url, delay, debug);
    Ok(tokio::spawn(controller.run()))
}

/// Stops a slideshow whose surface has been closed.
///
/// A controller waiting for a phase signal notices the close on its own; one
/// still waiting on a request never does, so after `grace` the task is
/// aborted.
pub async fn shutdown(mut slideshow: JoinHandle<()>, grace: Duration) {
    match timeout(grace, &mut slideshow).await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => error!(%error, "slideshow task failed"),
        Err(_) => {
            warn!("slideshow still busy after the surface closed, aborting");
            slideshow.abort();
            let _ = slideshow.await;
        }
    }
}

pub fn delay_from_secs(time: f64) -> Result<Duration, SlideshowError> {
    Duration::try_from_secs_f64(time).map_err(|_| SlideshowError::InvalidDelay(time))
}

pub struct SlideshowController<S, D> {
    source: S,
    surface: D,
    url: String,
    slide: u64,
    delay: Duration,
    debug: bool,
    state: SlideshowState,
    phases: Option<PhaseSignals>,
}

impl<S: SlideSource, D: Surface> SlideshowController<S, D> {
    pub fn new(source: S, surface: D, url: impl Into<String>, delay: Duration, debug: bool) -> Self {
        Self {
            source,
            surface,
            url: url.into(),
            slide: 0,
            delay,
            debug,
            state: SlideshowState::Init,
            phases: None,
        }
    }

    pub async fn run(mut self) {
        loop {
            let state = self.state;
            debug!(?state, slide = self.slide, "entering state");

            match state {
                SlideshowState::Init => self.init(),
                SlideshowState::Load => {
                    if !self.load().await {
                        self.stall().await;
                        return;
                    }
                }
                SlideshowState::FadeIn => self.surface.set_play_state(PlayState::Running),
                SlideshowState::Delay => {}
                SlideshowState::FadeOut => {
                    self.slide += 1;
                    self.surface.set_play_state(PlayState::Running);
                }
            }
            self.state = state.next();

            match state.advance() {
                Advance::Immediately => {}
                Advance::AfterDelay => tokio::time::sleep(self.delay).await,
                Advance::OnPhaseComplete => {
                    if !self.wait_phase().await {
                        info!(slide = self.slide, "surface closed, stopping slideshow");
                        return;
                    }
                }
            }
        }
    }

    fn init(&mut self) {
        self.phases = Some(self.surface.subscribe());
        self.surface.set_opacity(0.0);
    }

    /// Fetches the current slide onto the surface. Returns false when no
    /// response arrived at all.
    async fn load(&mut self) -> bool {
        let url = slide_url(&self.url, self.slide);
        info!(%url, slide = self.slide, "loading slide");

        match self.source.fetch(&url).await {
            Ok(response) => {
                if !response.is_ok() {
                    warn!(%url, status = response.status, status_text = %response.status_text, "slide failed to load");
                }
                let content = display_content(&response, self.debug);
                self.surface.set_content(&content);
                true
            }
            Err(error) => {
                error!(%error, "no response for slide, slideshow halted");
                false
            }
        }
    }

    /// Waits for the surface to finish an animation iteration, then pauses
    /// the animation. Returns false once the surface has gone away.
    async fn wait_phase(&mut self) -> bool {
        let Some(phases) = self.phases.as_mut() else {
            return false;
        };
        match phases.recv().await {
            Some(_) => {
                self.surface.set_play_state(PlayState::Paused);
                true
            }
            None => false,
        }
    }

    // Nothing ever moves the machine out of a failed load; signals are
    // drained until the surface closes.
    async fn stall(&mut self) {
        if let Some(phases) = self.phases.as_mut() {
            while phases.recv().await.is_some() {}
        }
    }
}
