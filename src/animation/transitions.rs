//! Declarative transitions.
//!
//! The map applies final values immediately and hands a [`Transition`]
//! describing the change to a [`TransitionPresenter`]. Presenters may tween
//! the change or ignore it; map state does not depend on them.

use crate::animation::interpolation::{EasingFunction, Interpolatable};
use crate::core::constants::FADE_IN_MS;
use crate::core::geo::Point;
use crate::layers::{path::PathId, style::Color};
use instant::Instant;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a transition animates
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionKind {
    /// Fill color of one region path
    Fill { path: PathId, from: Color, to: Color },
    /// Pan offset of the map canvas
    Pan { from: Point, to: Point },
    /// Canvas scale around `origin`
    Scale { from: f64, to: f64, origin: Point },
    /// Opacity of the whole scene
    Opacity { from: f64, to: f64 },
}

/// Interpolated value of a transition at some point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionValue {
    Fill(PathId, Color),
    Pan(Point),
    Scale(f64),
    Opacity(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub duration: Duration,
    pub easing: EasingFunction,
}

impl Transition {
    pub fn new(kind: TransitionKind, duration: Duration) -> Self {
        Self {
            kind,
            duration,
            easing: EasingFunction::Linear,
        }
    }

    pub fn fill(path: PathId, from: Color, to: Color, duration: Duration) -> Self {
        Self::new(TransitionKind::Fill { path, from, to }, duration)
    }

    pub fn pan(from: Point, to: Point, duration: Duration) -> Self {
        Self::new(TransitionKind::Pan { from, to }, duration)
    }

    pub fn scale(from: f64, to: f64, origin: Point, duration: Duration) -> Self {
        Self::new(TransitionKind::Scale { from, to, origin }, duration)
            .with_easing(EasingFunction::EaseOutCubic)
    }

    /// Scene fade-in run after every draw pass
    pub fn fade_in() -> Self {
        Self::new(
            TransitionKind::Opacity { from: 0.0, to: 1.0 },
            Duration::from_millis(FADE_IN_MS),
        )
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    /// The fill path this transition targets, if it is a fill transition
    pub fn target_path(&self) -> Option<PathId> {
        match self.kind {
            TransitionKind::Fill { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn value_at(&self, elapsed: Duration) -> TransitionValue {
        let t = if self.is_instant() {
            1.0
        } else {
            self.easing
                .apply(elapsed.as_secs_f64() / self.duration.as_secs_f64())
        };
        match &self.kind {
            TransitionKind::Fill { path, from, to } => TransitionValue::Fill(*path, from.lerp(to, t)),
            TransitionKind::Pan { from, to } => TransitionValue::Pan(from.lerp(to, t)),
            TransitionKind::Scale { from, to, .. } => TransitionValue::Scale(from.lerp(to, t)),
            TransitionKind::Opacity { from, to } => TransitionValue::Opacity(from.lerp(to, t)),
        }
    }

    pub fn final_value(&self) -> TransitionValue {
        self.value_at(self.duration)
    }
}

/// Receives the transitions a map produces. Implemented by the host UI.
pub trait TransitionPresenter: Send {
    fn present(&mut self, transition: Transition);
}

/// Presenter that shows final values without animating
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediatePresenter;

impl TransitionPresenter for ImmediatePresenter {
    fn present(&mut self, transition: Transition) {
        log::trace!("applied {:?} immediately", transition.kind);
    }
}

/// Presenter that keeps every transition it receives.
///
/// Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    log: Arc<Mutex<Vec<Transition>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<Transition> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Removes and returns all recorded transitions
    pub fn take(&self) -> Vec<Transition> {
        self.log
            .lock()
            .map(|mut log| std::mem::take(&mut *log))
            .unwrap_or_default()
    }
}

impl TransitionPresenter for RecordingPresenter {
    fn present(&mut self, transition: Transition) {
        if let Ok(mut log) = self.log.lock() {
            log.push(transition);
        }
    }
}

/// Time-driven interpolation between two values
#[derive(Debug, Clone)]
pub struct Tween<T: Interpolatable + Clone> {
    pub from: T,
    pub to: T,
    pub duration: Duration,
    pub easing: EasingFunction,
    start_time: Option<Instant>,
}

impl<T: Interpolatable + Clone> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration) -> Self {
        Self::with_easing(from, to, duration, EasingFunction::EaseInOutQuad)
    }

    pub fn with_easing(from: T, to: T, duration: Duration, easing: EasingFunction) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            start_time: None,
        }
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        self.start_time = None;
    }

    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.start_time
            .map(|start| Instant::now().duration_since(start) >= self.duration)
            .unwrap_or(false)
    }

    /// Progress (0.0 to 1.0) after `elapsed`
    pub fn progress_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, elapsed: Duration) -> T {
        let eased = self.easing.apply(self.progress_at(elapsed));
        self.from.lerp(&self.to, eased)
    }

    pub fn current_value(&self) -> T {
        match self.start_time {
            Some(start) => self.value_at(Instant::now().duration_since(start)),
            None => self.from.clone(),
        }
    }

    /// Advance the tween; returns `None` when it is not running
    pub fn update(&mut self) -> Option<T> {
        self.start_time?;
        if self.is_finished() {
            self.stop();
            Some(self.to.clone())
        } else {
            Some(self.current_value())
        }
    }

    /// Retarget from the current position
    pub fn change_target(&mut self, new_to: T) {
        if self.is_running() {
            self.from = self.current_value();
            self.to = new_to;
            self.start();
        } else {
            self.to = new_to;
        }
    }
}

impl Transition {
    /// Tween over the scalar channel of scale and opacity transitions; `None`
    /// for fill and pan, which are not scalar.
    pub fn scalar_tween(&self) -> Option<Tween<f64>> {
        let (from, to) = match self.kind {
            TransitionKind::Scale { from, to, .. } | TransitionKind::Opacity { from, to } => (from, to),
            _ => return None,
        };
        Some(Tween::with_easing(from, to, self.duration, self.easing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_transition_values() {
        let id = PathId::new(1, 0);
        let transition = Transition::fill(id, Color::BLACK, Color::rgb(200, 100, 0), Duration::from_millis(200));
        assert_eq!(transition.target_path(), Some(id));
        assert_eq!(
            transition.value_at(Duration::ZERO),
            TransitionValue::Fill(id, Color::BLACK)
        );
        assert_eq!(
            transition.value_at(Duration::from_millis(100)),
            TransitionValue::Fill(id, Color::rgb(100, 50, 0))
        );
        assert_eq!(
            transition.final_value(),
            TransitionValue::Fill(id, Color::rgb(200, 100, 0))
        );
    }

    #[test]
    fn test_instant_transition_jumps_to_end() {
        let transition = Transition::pan(Point::new(0.0, 0.0), Point::new(5.0, 5.0), Duration::ZERO);
        assert!(transition.is_instant());
        assert_eq!(
            transition.value_at(Duration::ZERO),
            TransitionValue::Pan(Point::new(5.0, 5.0))
        );
    }

    #[test]
    fn test_fade_in() {
        let fade = Transition::fade_in();
        assert_eq!(fade.duration, Duration::from_millis(500));
        assert_eq!(fade.value_at(Duration::ZERO), TransitionValue::Opacity(0.0));
        assert_eq!(fade.final_value(), TransitionValue::Opacity(1.0));
        assert!(fade.target_path().is_none());
    }

    #[test]
    fn test_recording_presenter_shares_log() {
        let recorder = RecordingPresenter::new();
        let mut boxed: Box<dyn TransitionPresenter> = Box::new(recorder.clone());
        boxed.present(Transition::fade_in());
        assert_eq!(recorder.transitions().len(), 1);
        assert_eq!(recorder.take().len(), 1);
        assert!(recorder.transitions().is_empty());
    }

    #[test]
    fn test_tween_sampling() {
        let tween = Tween::with_easing(0.0, 10.0, Duration::from_millis(100), EasingFunction::Linear);
        assert!(!tween.is_running());
        assert_eq!(tween.current_value(), 0.0);
        assert_eq!(tween.value_at(Duration::from_millis(50)), 5.0);
        assert_eq!(tween.value_at(Duration::from_millis(500)), 10.0);
    }

    #[test]
    fn test_tween_update_lifecycle() {
        let mut tween = Tween::new(1.0, 2.0, Duration::ZERO);
        assert!(tween.update().is_none());
        tween.start();
        assert_eq!(tween.update(), Some(2.0));
        assert!(!tween.is_running());
    }

    #[test]
    fn test_scalar_tween_from_scale() {
        let transition = Transition::scale(1.0, 1.3, Point::new(0.0, 0.0), Duration::from_millis(200));
        let tween = transition.scalar_tween().unwrap();
        assert_eq!(tween.from, 1.0);
        assert_eq!(tween.to, 1.3);
        assert_eq!(tween.easing, EasingFunction::EaseOutCubic);
    }

    #[test]
    fn test_scalar_tween_skips_pan_and_fill() {
        let pan = Transition::pan(Point::new(0.0, 0.0), Point::new(10.0, 5.0), Duration::from_millis(200));
        assert!(pan.scalar_tween().is_none());
        let fill = Transition::fill(PathId::new(1, 0), Color::BLACK, Color::RED, Duration::from_millis(200));
        assert!(fill.scalar_tween().is_none());
        assert!(Transition::fade_in().scalar_tween().is_some());
    }
}
