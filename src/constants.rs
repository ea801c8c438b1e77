#[cfg(feature = "window")]
pub const RENDER_WIDTH: i32 = 1280;           // Width of the slideshow window
#[cfg(feature = "window")]
pub const RENDER_HEIGHT: i32 = 720;           // Height of the slideshow window
pub const FPS: u32 = 60;                      // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32; // Time per frame (seconds)

#[cfg(feature = "window")]
pub const FONT_SIZE: i32 = 32;                // Text size for the window surface
#[cfg(feature = "window")]
pub const LINE_SPACING: i32 = 12;             // Extra pixels between rendered lines
#[cfg(feature = "window")]
pub const MARGIN: i32 = 40;                   // Left/top margin for rendered text

pub const ANIMATION_DURATION: f32 = 1.0;      // Length of one fade iteration (seconds)
pub const DISPLAY_DURATION: f64 = 5.0;        // Delay between fade-in and fade-out (seconds)
pub const SHUTDOWN_GRACE: f32 = 1.0;          // Wait for the controller to stop before aborting it (seconds)

pub const DEFAULT_CONFIG_PATH: &str = "/etc/fadeshow.toml";
pub const LOAD_ERROR_PREFIX: &str = "Load error: ";
