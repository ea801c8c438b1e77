/// Program counter of the slideshow controller.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlideshowState {
    Init,    // Subscribe to phase signals, hide the surface
    Load,    // Fetch the next fragment
    FadeIn,  // Animation running towards full opacity
    Delay,   // Slide fully visible, timer armed
    FadeOut, // Animation running towards transparency
}

/// What moves the controller out of a state once its work is done.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Advance {
    Immediately,
    OnPhaseComplete,
    AfterDelay,
}

impl SlideshowState {
    pub fn next(self) -> SlideshowState {
        match self {
            SlideshowState::Init => SlideshowState::Load,
            SlideshowState::Load => SlideshowState::FadeIn,
            SlideshowState::FadeIn => SlideshowState::Delay,
            SlideshowState::Delay => SlideshowState::FadeOut,
            SlideshowState::FadeOut => SlideshowState::Load,
        }
    }

    pub fn advance(self) -> Advance {
        match self {
            SlideshowState::Init | SlideshowState::Load => Advance::Immediately,
            SlideshowState::FadeIn | SlideshowState::FadeOut => Advance::OnPhaseComplete,
            SlideshowState::Delay => Advance::AfterDelay,
        }
    }
}
