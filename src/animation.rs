use std::time::Duration;

/// Mirrors `animation-play-state`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlayState {
    Running,
    Paused,
}

/// An infinite, alternating opacity animation.
///
/// Even iterations fade from 0 to 1, odd iterations fade back from 1 to 0.
/// Each time an iteration completes `advance` reports a boundary; the surface
/// turns that into a phase-complete signal for the controller.
pub struct Animation {
    duration: f32,
    animation_timer: f32,
    iteration: u64,
    pub play_state: PlayState,
}

impl Animation {
    pub fn new(iteration: Duration) -> Self {
        Self {
            duration: iteration.as_secs_f32(),
            animation_timer: 0.0,
            iteration: 0,
            play_state: PlayState::Paused,
        }
    }

    /// Moves the animation forward by `dt` seconds. Returns true when an
    /// iteration boundary was crossed.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.play_state == PlayState::Paused {
            return false;
        }

        // A zero-length animation completes an iteration on every frame.
        if self.duration <= 0.0 {
            self.iteration += 1;
            return true;
        }

        self.animation_timer += dt;
        if self.animation_timer >= self.duration {
            self.animation_timer -= self.duration;
            self.iteration += 1;
            // At most one boundary is reported per frame.
            if self.animation_timer >= self.duration {
                self.animation_timer = 0.0;
            }
            return true;
        }
        false
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.animation_timer / self.duration).clamp(0.0, 1.0)
    }

    pub fn opacity(&self) -> f32 {
        let t = self.progress();
        if self.iteration % 2 == 0 { t } else { 1.0 - t }
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_animation_does_not_move() {
        let mut animation = Animation::new(Duration::from_secs(1));
        assert!(!animation.advance(5.0));
        assert_eq!(animation.opacity(), 0.0);
        assert_eq!(animation.iteration(), 0);
    }

    #[test]
    fn fade_in_ends_visible_and_fade_out_ends_hidden() {
        let mut animation = Animation::new(Duration::from_millis(500));
        animation.play_state = PlayState::Running;

        assert!(!animation.advance(0.25));
        assert!((animation.opacity() - 0.5).abs() < 1e-6);

        assert!(animation.advance(0.25));
        assert_eq!(animation.iteration(), 1);
        assert_eq!(animation.opacity(), 1.0);

        assert!(!animation.advance(0.125));
        assert!((animation.opacity() - 0.75).abs() < 1e-6);

        assert!(animation.advance(0.375));
        assert_eq!(animation.iteration(), 2);
        assert_eq!(animation.opacity(), 0.0);
    }

    #[test]
    fn overshoot_carries_into_next_iteration() {
        let mut animation = Animation::new(Duration::from_secs(1));
        animation.play_state = PlayState::Running;
        assert!(animation.advance(1.25));
        assert!((animation.progress() - 0.25).abs() < 1e-6);
        assert!((animation.opacity() - 0.75).abs() < 1e-6);
    }
}
