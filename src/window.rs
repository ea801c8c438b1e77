use std::time::Duration;

use anyhow::Result;
use raylib::prelude::*;
use tracing::info;

use crate::constants::*;
use crate::slide::to_plain_text;
use crate::surface::{SharedStage, StageHandle, lock, shared_stage};

/// A raylib window showing the current slide as text, faded by the stage's
/// animation. Must be driven from the main thread.
pub struct WindowSurface {
    stage: SharedStage,
}

impl WindowSurface {
    pub fn new(iteration: Duration) -> (Self, StageHandle) {
        let stage = shared_stage(iteration);
        (Self { stage: stage.clone() }, StageHandle::new(stage))
    }

    /// Renders until the window is closed, then closes the stage so the
    /// controller stops.
    pub fn run(self, title: &str) -> Result<()> {
        let (mut rl, thread) = raylib::init()
            .size(RENDER_WIDTH, RENDER_HEIGHT)
            .title(title)
            .vsync()
            .resizable()
            .build();
        rl.set_target_fps(FPS);
        rl.set_trace_log(TraceLogLevel::LOG_ERROR);

        let mut shown_version = 0;
        let mut lines: Vec<String> = Vec::new();

        while !rl.window_should_close() {
            let dt = rl.get_frame_time();

            let opacity = {
                let mut stage = lock(&self.stage);
                stage.tick(dt);
                if stage.content_version != shown_version {
                    shown_version = stage.content_version;
                    lines = to_plain_text(&stage.content);
                }
                stage.effective_opacity()
            };

            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::BLACK);

            let color = Color::new(255, 255, 255, (opacity.clamp(0.0, 1.0) * 255.0).round() as u8);
            for (i, line) in lines.iter().enumerate() {
                let y = MARGIN + i as i32 * (FONT_SIZE + LINE_SPACING);
                d.draw_text(line, MARGIN, y, FONT_SIZE, color);
            }
        }

        info!("window closed");
        lock(&self.stage).close();
        Ok(())
    }
}
