use std::io::{self, Write};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::constants::FRAME_TIME;
use crate::slide::to_plain_text;
use crate::surface::{SharedStage, Stage, StageHandle, lock, shared_stage};

/// Headless surface: slides are printed to stdout as plain text while a
/// ticker task plays the fade animation in real time.
pub struct ConsoleSurface {
    stage: SharedStage,
    driver: JoinHandle<()>,
}

impl ConsoleSurface {
    pub fn spawn(iteration: Duration) -> (Self, StageHandle) {
        let stage = shared_stage(iteration);
        let driver = tokio::spawn(drive(stage.clone()));
        (Self { stage: stage.clone(), driver }, StageHandle::new(stage))
    }

    /// Stops the ticker and ends the phase stream.
    pub fn close(self) {
        self.driver.abort();
        lock(&self.stage).close();
    }
}

async fn drive(stage: SharedStage) {
    let mut ticker = interval(Duration::from_secs_f32(FRAME_TIME));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut shown_version = 0;
    let mut last_iteration = 0;

    loop {
        ticker.tick().await;
        let mut guard = lock(&stage);
        guard.tick(FRAME_TIME);

        if guard.animation.iteration() != last_iteration {
            last_iteration = guard.animation.iteration();
            debug!(iteration = last_iteration, opacity = guard.effective_opacity(), "fade iteration complete");
        }

        if guard.content_version != shown_version {
            shown_version = guard.content_version;
            let mut out = io::stdout().lock();
            if let Err(error) = render(&guard, &mut out) {
                warn!(%error, "failed to write slide to stdout");
            }
        }
    }
}

/// Writes the stage's current content as a framed block of text.
pub fn render(stage: &Stage, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "---- slide {} ----", stage.content_version)?;
    for line in to_plain_text(&stage.content) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::PlayState;
    use crate::surface::{PhaseComplete, Surface};

    #[test]
    fn renders_markup_as_text() {
        let mut stage = Stage::new(Duration::from_secs(1));
        stage.content = "<p>Hello</p><p>World &amp; all</p>".to_string();
        stage.content_version = 3;

        let mut out = Vec::new();
        render(&stage, &mut out).expect("render");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "---- slide 3 ----\nHello\nWorld & all\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn driver_signals_after_one_iteration() {
        let (console, mut surface) = ConsoleSurface::spawn(Duration::from_millis(500));
        let mut phases = surface.subscribe();
        surface.set_play_state(PlayState::Running);

        let started = tokio::time::Instant::now();
        assert_eq!(phases.recv().await, Some(PhaseComplete));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(450), "{elapsed:?}");
        assert!(elapsed <= Duration::from_millis(600), "{elapsed:?}");

        console.close();
        assert_eq!(phases.recv().await, None);
    }
}
