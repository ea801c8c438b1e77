use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::animation::{Animation, PlayState};

/// Sent by a surface each time its fade animation completes an iteration.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PhaseComplete;

pub type PhaseSignals = mpsc::UnboundedReceiver<PhaseComplete>;

/// The element a slideshow renders into.
pub trait Surface: Send {
    /// Hands out the phase-complete stream; the controller subscribes once
    /// per run.
    fn subscribe(&mut self) -> PhaseSignals;
    fn set_content(&mut self, content: &str);
    fn set_opacity(&mut self, opacity: f32);
    fn set_play_state(&mut self, state: PlayState);
}

/// State shared between a surface handle and whatever drives its animation.
pub struct Stage {
    pub content: String,
    pub content_version: u64,
    pub opacity: f32,
    pub animation: Animation,
    phases: Option<mpsc::UnboundedSender<PhaseComplete>>,
}

impl Stage {
    pub fn new(iteration: Duration) -> Self {
        Self {
            content: String::new(),
            content_version: 0,
            opacity: 1.0,
            animation: Animation::new(iteration),
            phases: None,
        }
    }

    /// Advances the animation by `dt` seconds. At an iteration boundary the
    /// animation is paused on the spot and a completed phase is signalled.
    pub fn tick(&mut self, dt: f32) {
        if !self.animation.advance(dt) {
            return;
        }
        self.animation.play_state = PlayState::Paused;
        let closed = match &self.phases {
            Some(phases) => phases.send(PhaseComplete).is_err(),
            None => false,
        };
        if closed {
            // Subscriber is gone.
            self.phases = None;
        }
    }

    /// Opacity as rendered: the animation once it has started, otherwise the
    /// element's own opacity.
    pub fn effective_opacity(&self) -> f32 {
        if self.animation.play_state == PlayState::Running || self.animation.iteration() > 0 {
            self.animation.opacity()
        } else {
            self.opacity
        }
    }

    /// Drops the phase sender; the subscriber sees its stream end.
    pub fn close(&mut self) {
        self.phases = None;
    }
}

pub type SharedStage = Arc<Mutex<Stage>>;

pub fn shared_stage(iteration: Duration) -> SharedStage {
    Arc::new(Mutex::new(Stage::new(iteration)))
}

/// Locks a stage, recovering from a poisoned lock: stage fields are always
/// left consistent between statements.
pub fn lock(stage: &SharedStage) -> MutexGuard<'_, Stage> {
    stage.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Surface operations applied to a shared stage.
#[derive(Clone)]
pub struct StageHandle {
    stage: SharedStage,
}

impl StageHandle {
    pub fn new(stage: SharedStage) -> Self {
        Self { stage }
    }
}

impl Surface for StageHandle {
    /// Only the last subscriber receives signals.
    fn subscribe(&mut self) -> PhaseSignals {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.stage).phases = Some(tx);
        rx
    }

    fn set_content(&mut self, content: &str) {
        let mut stage = lock(&self.stage);
        stage.content = content.to_string();
        stage.content_version += 1;
    }

    fn set_opacity(&mut self, opacity: f32) {
        lock(&self.stage).opacity = opacity.clamp(0.0, 1.0);
    }

    fn set_play_state(&mut self, state: PlayState) {
        lock(&self.stage).animation.play_state = state;
    }
}
