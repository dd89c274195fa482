//! Playback controls over a recorded step sequence.

use std::time::Duration;

use dsa_steps::Algorithm;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::Frame;

/// Tick interval at 1x speed.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Playback speed multiplier, clamped to `[Speed::MIN, Speed::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Speed(f64);

impl Speed {
    /// Slowest allowed multiplier
    pub const MIN: f64 = 0.25;
    /// Fastest allowed multiplier
    pub const MAX: f64 = 2.0;

    /// 0.25x speed
    pub const QUARTER: Speed = Speed(0.25);
    /// 0.5x speed
    pub const HALF: Speed = Speed(0.5);
    /// Normal speed (1x)
    pub const NORMAL: Speed = Speed(1.0);
    /// 2x speed
    pub const DOUBLE: Speed = Speed(2.0);

    /// Clamp a requested multiplier. NaN falls back to normal speed.
    pub fn new(multiplier: f64) -> Self {
        if multiplier.is_nan() {
            return Self::NORMAL;
        }
        Speed(multiplier.clamp(Self::MIN, Self::MAX))
    }

    /// Get the speed multiplier.
    pub fn multiplier(&self) -> f64 {
        self.0
    }

    /// Tick interval at this speed: `base / multiplier`, saturating at
    /// `Duration::MAX`.
    pub fn interval(&self, base: Duration) -> Duration {
        Duration::try_from_secs_f64(base.as_secs_f64() / self.0).unwrap_or(Duration::MAX)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl From<f64> for Speed {
    fn from(multiplier: f64) -> Self {
        Speed::new(multiplier)
    }
}

impl From<Speed> for f64 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Cursor before the first step
    Idle,
    /// Timer is advancing the cursor
    Playing,
    /// Stopped mid-sequence, cursor kept
    Paused,
    /// Every step has been applied
    Finished,
}

/// Playback controller for one algorithm run.
///
/// Owns the step sequence, the cursor and the view reached at the cursor.
/// The cursor is `None` before the first step and otherwise indexes the most
/// recently applied step.
#[derive(Debug)]
pub struct Playback<A: Algorithm> {
    algorithm: A,
    steps: Vec<A::Step>,
    view: A::View,
    cursor: Option<usize>,
    state: PlaybackState,
    speed: Speed,
    base_delay: Duration,
}

impl<A: Algorithm> Playback<A> {
    /// Validate the input and record its step sequence.
    pub fn new(algorithm: A) -> Result<Self> {
        algorithm.validate()?;
        let steps = algorithm.generate();
        let view = algorithm.initial_view();
        Ok(Self {
            algorithm,
            steps,
            view,
            cursor: None,
            state: PlaybackState::Idle,
            speed: Speed::NORMAL,
            base_delay: DEFAULT_BASE_DELAY,
        })
    }

    /// Override the 1x tick interval.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    pub fn steps(&self) -> &[A::Step] {
        &self.steps
    }

    /// Index of the most recently applied step.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of steps applied so far.
    pub fn applied(&self) -> usize {
        self.cursor.map_or(0, |c| c + 1)
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Current tick interval.
    pub fn interval(&self) -> Duration {
        self.speed.interval(self.base_delay)
    }

    /// View after the step at the cursor.
    pub fn view(&self) -> &A::View {
        &self.view
    }

    /// The step at the cursor (if any).
    pub fn current_step(&self) -> Option<&A::Step> {
        self.cursor.and_then(|c| self.steps.get(c))
    }

    /// True once no unapplied steps remain.
    pub fn is_exhausted(&self) -> bool {
        self.applied() >= self.steps.len()
    }

    /// Calculate progress as a fraction (0.0 - 1.0). Empty runs are complete.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            1.0
        } else {
            self.applied() as f64 / self.steps.len() as f64
        }
    }

    /// Start playback. Returns false when nothing started: already playing,
    /// or exhausted (which is reported as finished).
    pub fn play(&mut self) -> bool {
        if self.state == PlaybackState::Playing {
            return false;
        }
        if self.is_exhausted() {
            self.state = PlaybackState::Finished;
            return false;
        }
        self.state = PlaybackState::Playing;
        true
    }

    /// Pause playback, keeping the cursor.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop playback and return to the initial view.
    pub fn stop(&mut self) {
        self.cursor = None;
        self.view = self.algorithm.initial_view();
        self.state = PlaybackState::Idle;
    }

    /// Regenerate the step sequence and return to the initial view.
    pub fn reset(&mut self) {
        self.steps = self.algorithm.generate();
        self.stop();
    }

    /// Replace the input and start over. Invalid input leaves playback untouched.
    pub fn load(&mut self, algorithm: A) -> Result<()> {
        algorithm.validate()?;
        self.algorithm = algorithm;
        self.reset();
        Ok(())
    }

    /// Set playback speed; the new interval applies from the next tick.
    pub fn set_speed(&mut self, multiplier: f64) -> Speed {
        self.speed = Speed::new(multiplier);
        self.speed
    }

    /// Apply the next step while playing.
    pub fn tick(&mut self) -> Option<&A::Step> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let index = self.advance()?;
        self.steps.get(index)
    }

    /// Manually apply the next step. Pauses a running playback.
    pub fn step_forward(&mut self) -> Option<&A::Step> {
        self.pause();
        let index = self.advance()?;
        if self.state != PlaybackState::Finished {
            self.state = PlaybackState::Paused;
        }
        self.steps.get(index)
    }

    /// Undo the last applied step by replaying up to the one before it.
    pub fn step_backward(&mut self) -> bool {
        match self.cursor {
            Some(cursor) => {
                self.seek(cursor);
                true
            }
            None => false,
        }
    }

    /// Rebuild the view with exactly `applied` steps applied (clamped).
    pub fn seek(&mut self, applied: usize) {
        let applied = applied.min(self.steps.len());
        self.view = self.algorithm.replay(&self.steps[..applied]);
        self.cursor = applied.checked_sub(1);
        self.state = if applied == 0 {
            PlaybackState::Idle
        } else if applied == self.steps.len() {
            PlaybackState::Finished
        } else {
            PlaybackState::Paused
        };
    }

    fn advance(&mut self) -> Option<usize> {
        let next = self.applied();
        let Some(step) = self.steps.get(next) else {
            self.state = PlaybackState::Finished;
            return None;
        };
        self.algorithm.apply(&mut self.view, step);
        self.cursor = Some(next);
        if self.is_exhausted() {
            self.state = PlaybackState::Finished;
        }
        Some(next)
    }

    /// Which controls are currently usable.
    pub fn controls(&self) -> Controls {
        let playing = self.state == PlaybackState::Playing;
        let exhausted = self.is_exhausted();
        Controls {
            can_play: !playing && !exhausted,
            can_pause: playing,
            can_stop: playing || self.cursor.is_some(),
            can_reset: !playing,
            can_step_forward: !playing && !exhausted,
            can_step_backward: !playing && self.cursor.is_some(),
            min_speed: Speed::MIN,
            max_speed: Speed::MAX,
        }
    }

    /// Snapshot of the cursor position and view.
    pub fn frame(&self) -> Frame<A::Step, A::View> {
        Frame {
            algorithm: self.algorithm.name().to_string(),
            cursor: self.cursor,
            total_steps: self.steps.len(),
            state: self.state,
            step: self.current_step().cloned(),
            view: self.view.clone(),
        }
    }
}

/// Enabled/disabled flags for the playback buttons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub can_play: bool,
    pub can_pause: bool,
    pub can_stop: bool,
    pub can_reset: bool,
    pub can_step_forward: bool,
    pub can_step_backward: bool,
    pub min_speed: f64,
    pub max_speed: f64,
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub algorithm: String,
    pub cursor: Option<usize>,
    pub total_steps: usize,
    pub state: PlaybackState,
    pub speed: Speed,
    pub interval_ms: u64,
    pub progress: f64,
    pub controls: Controls,
}

impl<A: Algorithm> From<&Playback<A>> for PlaybackStatus {
    fn from(playback: &Playback<A>) -> Self {
        Self {
            algorithm: playback.algorithm.name().to_string(),
            cursor: playback.cursor,
            total_steps: playback.total_steps(),
            state: playback.state,
            speed: playback.speed,
            interval_ms: u64::try_from(playback.interval().as_millis()).unwrap_or(u64::MAX),
            progress: playback.progress(),
            controls: playback.controls(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsa_steps::{BinarySearch, Kmp, QuickSort};

    fn quick() -> Playback<QuickSort> {
        Playback::new(QuickSort::new(vec![5, 3, 8, 1])).unwrap()
    }

    #[test]
    fn playback_starts_idle() {
        let playback = quick();
        assert_eq!(playback.cursor(), None);
        assert_eq!(playback.applied(), 0);
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert_eq!(playback.view(), &playback.algorithm().initial_view());
    }

    #[test]
    fn tick_requires_playing() {
        let mut playback = quick();
        assert!(playback.tick().is_none());
        assert_eq!(playback.cursor(), None);

        assert!(playback.play());
        assert!(playback.tick().is_some());
        assert_eq!(playback.cursor(), Some(0));
    }

    #[test]
    fn play_while_playing_is_noop() {
        let mut playback = quick();
        assert!(playback.play());
        assert!(!playback.play());
        assert_eq!(playback.state(), PlaybackState::Playing);
    }

    #[test]
    fn playing_to_the_end_sorts() {
        let mut playback = quick();
        playback.play();
        while playback.tick().is_some() {}

        assert_eq!(playback.state(), PlaybackState::Finished);
        assert_eq!(playback.view().values, vec![1, 3, 5, 8]);
        assert!(playback.view().sorted.iter().all(|s| *s));
        assert_eq!(playback.cursor(), Some(playback.total_steps() - 1));
    }

    #[test]
    fn exhausted_playback_refuses_to_play() {
        let mut playback = quick();
        playback.seek(usize::MAX);
        assert_eq!(playback.state(), PlaybackState::Finished);
        assert!(!playback.play());
        assert!(!playback.controls().can_play);

        playback.reset();
        assert!(playback.controls().can_play);
    }

    #[test]
    fn pause_keeps_cursor() {
        let mut playback = quick();
        playback.play();
        playback.tick();
        playback.tick();
        playback.pause();
        assert_eq!(playback.state(), PlaybackState::Paused);
        assert_eq!(playback.cursor(), Some(1));
        assert!(playback.tick().is_none());
    }

    #[test]
    fn stop_returns_to_initial_view() {
        let mut playback = quick();
        playback.play();
        playback.tick();
        playback.stop();
        assert_eq!(playback.cursor(), None);
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert_eq!(playback.view().values, vec![5, 3, 8, 1]);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut playback = quick();
        playback.play();
        playback.tick();
        playback.tick();

        playback.reset();
        let first = playback.frame();
        playback.reset();
        playback.reset();
        assert_eq!(playback.frame(), first);
        assert_eq!(first.cursor, None);
        assert_eq!(first.state, PlaybackState::Idle);
    }

    #[test]
    fn view_matches_replay_at_every_cursor() {
        let mut playback = quick();
        playback.play();
        while playback.tick().is_some() {
            let replayed = playback.algorithm().replay(&playback.steps()[..playback.applied()]);
            assert_eq!(playback.view(), &replayed);
        }
    }

    #[test]
    fn step_forward_and_backward() {
        let mut playback = quick();
        playback.step_forward();
        playback.step_forward();
        assert_eq!(playback.cursor(), Some(1));
        assert_eq!(playback.state(), PlaybackState::Paused);

        let after_one = playback.algorithm().replay(&playback.steps()[..1]);
        assert!(playback.step_backward());
        assert_eq!(playback.cursor(), Some(0));
        assert_eq!(playback.view(), &after_one);

        assert!(playback.step_backward());
        assert_eq!(playback.cursor(), None);
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert!(!playback.step_backward());
    }

    #[test]
    fn step_forward_pauses_running_playback() {
        let mut playback = quick();
        playback.play();
        playback.step_forward();
        assert_eq!(playback.state(), PlaybackState::Paused);
    }

    #[test]
    fn seek_clamps_to_bounds() {
        let mut playback = quick();
        let total = playback.total_steps();

        playback.seek(3);
        assert_eq!(playback.applied(), 3);

        playback.seek(total + 100);
        assert_eq!(playback.applied(), total);

        playback.seek(0);
        assert_eq!(playback.cursor(), None);
    }

    #[test]
    fn empty_input_finishes_instantly() {
        let mut playback = Playback::new(QuickSort::new(Vec::new())).unwrap();
        assert_eq!(playback.total_steps(), 0);
        assert!(!playback.play());
        assert_eq!(playback.state(), PlaybackState::Finished);
        assert!(playback.tick().is_none());
        assert_eq!(playback.progress(), 1.0);
    }

    #[test]
    fn empty_search_is_single_terminal_step() {
        let mut playback = Playback::new(BinarySearch::new(Vec::new(), 1)).unwrap();
        assert_eq!(playback.total_steps(), 1);
        playback.play();
        playback.tick();
        assert_eq!(playback.state(), PlaybackState::Finished);
        assert!(playback.view().finished);
    }

    #[test]
    fn invalid_input_is_rejected() {
        let err = Playback::new(Kmp::new("abc", "")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: pattern must not be empty");
    }

    #[test]
    fn load_keeps_old_run_on_invalid_input() {
        let mut playback = Playback::new(Kmp::new("abab", "ab")).unwrap();
        let before = playback.total_steps();
        assert!(playback.load(Kmp::new("a", "abc")).is_err());
        assert_eq!(playback.total_steps(), before);
        assert_eq!(playback.algorithm().pattern, "ab");
    }

    #[test]
    fn speed_is_clamped() {
        assert_eq!(Speed::new(10.0), Speed::DOUBLE);
        assert_eq!(Speed::new(0.01), Speed::QUARTER);
        assert_eq!(Speed::new(f64::NAN), Speed::NORMAL);
        assert_eq!(Speed::new(0.5), Speed::HALF);
    }

    #[test]
    fn interval_scales_inversely_with_speed() {
        let mut playback = quick();
        assert_eq!(playback.interval(), Duration::from_millis(500));
        playback.set_speed(2.0);
        assert_eq!(playback.interval(), Duration::from_millis(250));
        playback.set_speed(0.25);
        assert_eq!(playback.interval(), Duration::from_millis(2000));
    }

    #[test]
    fn speed_deserializes_clamped() {
        let speed: Speed = serde_json::from_str("8.0").unwrap();
        assert_eq!(speed, Speed::DOUBLE);
        assert_eq!(serde_json::to_string(&Speed::HALF).unwrap(), "0.5");
    }

    #[test]
    fn controls_follow_state() {
        let mut playback = quick();
        let idle = playback.controls();
        assert!(idle.can_play && idle.can_reset && !idle.can_pause && !idle.can_step_backward);

        playback.play();
        let playing = playback.controls();
        assert!(!playing.can_play && !playing.can_reset && playing.can_pause);
        assert!(!playing.can_step_forward);
    }

    #[test]
    fn status_conversion() {
        let mut playback = quick();
        playback.seek(3);
        playback.set_speed(2.0);

        let status: PlaybackStatus = (&playback).into();
        assert_eq!(status.algorithm, "quick_sort");
        assert_eq!(status.cursor, Some(2));
        assert_eq!(status.total_steps, playback.total_steps());
        assert_eq!(status.speed, Speed::DOUBLE);
        assert_eq!(status.interval_ms, 250);
    }

    #[test]
    fn huge_base_delay_saturates() {
        let mut playback = quick().with_base_delay(Duration::MAX);
        playback.set_speed(0.25);
        assert_eq!(playback.interval(), Duration::MAX);
        assert_eq!(PlaybackStatus::from(&playback).interval_ms, u64::MAX);
    }
}
