//! Timer-driven step player.
//!
//! [`Player`] wraps a [`Playback`] with a background tokio task that applies
//! one step per tick. The task is owned by the player and stopped through a
//! [`CancellationSource`]; it checks its token under the playback lock
//! before every step, so nothing is applied after `pause`, `stop` or `reset`
//! returns.

use std::sync::Arc;

use dsa_steps::Algorithm;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cancel::{CancellationSource, CancellationToken};
use crate::error::Result;
use crate::frame::FrameOf;
use crate::playback::{Playback, PlaybackState, PlaybackStatus};

/// Handle to a running tick task.
struct Run {
    source: CancellationSource,
    handle: JoinHandle<()>,
}

impl Run {
    fn is_active(&self) -> bool {
        !self.source.is_cancelled() && !self.handle.is_finished()
    }

    fn cancel(self) {
        self.source.cancel();
    }
}

/// Async playback driver for one algorithm run.
pub struct Player<A: Algorithm> {
    playback: Arc<Mutex<Playback<A>>>,
    frames: watch::Sender<FrameOf<A>>,
    // Lock order: `run` before `playback`
    run: Mutex<Option<Run>>,
}

impl<A: Algorithm> Player<A> {
    pub fn new(playback: Playback<A>) -> Self {
        let (frames, _) = watch::channel(playback.frame());
        Self {
            playback: Arc::new(Mutex::new(playback)),
            frames,
            run: Mutex::new(None),
        }
    }

    /// Receive every frame the player publishes.
    pub fn subscribe(&self) -> watch::Receiver<FrameOf<A>> {
        self.frames.subscribe()
    }

    pub async fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(&*self.playback.lock().await)
    }

    pub async fn frame(&self) -> FrameOf<A> {
        self.playback.lock().await.frame()
    }

    /// Start ticking. A no-op while a tick task is already running.
    pub async fn play(&self) -> PlaybackStatus {
        let mut run = self.run.lock().await;
        let mut playback = self.playback.lock().await;

        if run.as_ref().is_some_and(Run::is_active) {
            return PlaybackStatus::from(&*playback);
        }
        playback.play();
        if playback.state() == PlaybackState::Playing {
            info!(algorithm = playback.algorithm().name(), "playback started");
            *run = Some(self.spawn_ticker());
        }
        self.publish(&playback);
        PlaybackStatus::from(&*playback)
    }

    pub async fn pause(&self) -> PlaybackStatus {
        self.control(|playback| playback.pause()).await
    }

    pub async fn stop(&self) -> PlaybackStatus {
        self.control(|playback| playback.stop()).await
    }

    pub async fn reset(&self) -> PlaybackStatus {
        self.control(|playback| playback.reset()).await
    }

    pub async fn step_forward(&self) -> PlaybackStatus {
        self.control(|playback| {
            playback.step_forward();
        })
        .await
    }

    pub async fn step_backward(&self) -> PlaybackStatus {
        self.control(|playback| {
            playback.step_backward();
        })
        .await
    }

    pub async fn seek(&self, applied: usize) -> PlaybackStatus {
        self.control(|playback| playback.seek(applied)).await
    }

    /// Replace the input. Invalid input leaves the current run untouched.
    pub async fn load(&self, algorithm: A) -> Result<PlaybackStatus> {
        algorithm.validate()?;
        let mut result = Ok(());
        let status = self
            .control(|playback| result = playback.load(algorithm))
            .await;
        result.map(|_| status)
    }

    /// Change speed. A running playback restarts its timer at the new interval.
    pub async fn set_speed(&self, multiplier: f64) -> PlaybackStatus {
        let mut run = self.run.lock().await;
        let mut playback = self.playback.lock().await;

        let speed = playback.set_speed(multiplier);
        debug!(speed = speed.multiplier(), "speed changed");
        if playback.state() == PlaybackState::Playing {
            if let Some(old) = run.take() {
                old.cancel();
            }
            *run = Some(self.spawn_ticker());
        }
        PlaybackStatus::from(&*playback)
    }

    /// Cancel any tick task, then apply `f` to the playback.
    async fn control<F>(&self, f: F) -> PlaybackStatus
    where
        F: FnOnce(&mut Playback<A>),
    {
        let mut run = self.run.lock().await;
        let mut playback = self.playback.lock().await;
        if let Some(old) = run.take() {
            old.cancel();
        }
        f(&mut playback);
        self.publish(&playback);
        PlaybackStatus::from(&*playback)
    }

    fn publish(&self, playback: &Playback<A>) {
        self.frames.send_replace(playback.frame());
    }

    fn spawn_ticker(&self) -> Run {
        let source = CancellationSource::new();
        let token = source.token();
        let playback = Arc::clone(&self.playback);
        let frames = self.frames.clone();
        let handle = tokio::spawn(tick_loop(playback, frames, token));
        Run { source, handle }
    }
}

impl<A: Algorithm> Drop for Player<A> {
    fn drop(&mut self) {
        if let Some(run) = self.run.get_mut().take() {
            run.cancel();
        }
    }
}

async fn tick_loop<A: Algorithm>(
    playback: Arc<Mutex<Playback<A>>>,
    frames: watch::Sender<FrameOf<A>>,
    token: CancellationToken,
) {
    loop {
        let interval = playback.lock().await.interval();
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        let mut playback = playback.lock().await;
        if token.is_cancelled() {
            break;
        }
        let applied = playback.tick().is_some();
        let frame = playback.frame();
        let still_playing = playback.state() == PlaybackState::Playing;
        if applied {
            debug!(cursor = ?frame.cursor, total = frame.total_steps, "tick");
        }
        // Published under the lock so a concurrent control's frame always lands last
        frames.send_replace(frame);
        drop(playback);

        if !applied || !still_playing {
            info!("playback finished");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use dsa_steps::{QuickSort, SortStep};

    fn player() -> Player<QuickSort> {
        let playback = Playback::new(QuickSort::new(vec![5, 3, 8, 1]))
            .unwrap()
            .with_base_delay(Duration::from_millis(100));
        Player::new(playback)
    }

    #[tokio::test(start_paused = true)]
    async fn plays_one_step_per_interval() {
        let player = player();
        player.play().await;

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(player.status().await.cursor, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn plays_to_completion() {
        let player = player();
        let total = player.status().await.total_steps;
        player.play().await;

        tokio::time::sleep(Duration::from_millis(100 * total as u64 + 50)).await;
        let frame = player.frame().await;
        assert_eq!(frame.state, PlaybackState::Finished);
        assert_eq!(frame.view.values, vec![1, 3, 5, 8]);
        assert!(frame.view.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_ticks() {
        let player = player();
        player.play().await;
        tokio::time::sleep(Duration::from_millis(250)).await;
        let paused = player.pause().await;
        assert_eq!(paused.state, PlaybackState::Paused);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(player.status().await.cursor, paused.cursor);
    }

    #[tokio::test(start_paused = true)]
    async fn play_twice_does_not_double_speed() {
        let player = player();
        player.play().await;
        player.play().await;

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(player.status().await.cursor, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_restarts_timer() {
        let player = player();
        player.play().await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(player.status().await.cursor, Some(0));

        let status = player.set_speed(2.0).await;
        assert_eq!(status.interval_ms, 50);
        tokio::time::sleep(Duration::from_millis(110)).await;
        assert_eq!(player.status().await.cursor, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_and_reset_return_to_idle() {
        let player = player();
        player.play().await;
        tokio::time::sleep(Duration::from_millis(250)).await;

        let stopped = player.stop().await;
        assert_eq!(stopped.cursor, None);
        assert_eq!(stopped.state, PlaybackState::Idle);

        player.play().await;
        tokio::time::sleep(Duration::from_millis(250)).await;
        let reset = player.reset().await;
        assert_eq!(reset.cursor, None);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(player.status().await.cursor, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cursor_is_monotonic_while_playing() {
        let player = player();
        let mut frames = player.subscribe();
        player.play().await;

        let mut last = None;
        while frames.changed().await.is_ok() {
            let frame = frames.borrow_and_update().clone();
            assert!(frame.cursor >= last);
            last = frame.cursor;
            if frame.is_terminal() {
                break;
            }
        }
        assert_eq!(last, Some(player.status().await.total_steps - 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn last_frame_after_stop_is_idle() {
        for _ in 0..50 {
            let playback = Playback::new(QuickSort::new(vec![9, 4, 7, 1, 8, 2, 6, 3]))
                .unwrap()
                .with_base_delay(Duration::from_micros(50));
            let player = Player::new(playback);
            let frames = player.subscribe();

            player.play().await;
            tokio::time::sleep(Duration::from_micros(200)).await;
            player.stop().await;
            tokio::time::sleep(Duration::from_millis(2)).await;

            let last = frames.borrow().clone();
            assert_eq!(last.state, PlaybackState::Idle);
            assert_eq!(last.cursor, None);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_applied_steps() {
        let player = player();
        let mut frames = player.subscribe();
        player.step_forward().await;

        frames.changed().await.unwrap();
        let frame = frames.borrow().clone();
        assert_eq!(frame.step, Some(SortStep::Partition { low: 0, high: 3 }));
    }

    #[tokio::test]
    async fn load_rejects_invalid_input_without_disturbing_run() {
        let player = player();
        player.step_forward().await;
        let before = player.status().await;

        // Over-long arrays fail validation
        let huge = QuickSort::new(vec![0; dsa_steps::MAX_INPUT_LEN + 1]);
        assert!(player.load(huge).await.is_err());
        assert_eq!(player.status().await.cursor, before.cursor);

        let status = player.load(QuickSort::new(vec![2, 1])).await.unwrap();
        assert_eq!(status.cursor, None);
        assert_eq!(status.state, PlaybackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_completes_instantly() {
        let player = Player::new(Playback::new(QuickSort::new(Vec::new())).unwrap());
        let status = player.play().await;
        assert_eq!(status.state, PlaybackState::Finished);
        assert!(!status.controls.can_play);
    }
}
