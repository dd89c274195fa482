//! Per-tick snapshots published to the presentation layer.

use dsa_steps::Algorithm;
use serde::{Deserialize, Serialize};

use crate::playback::PlaybackState;

/// The visualization state at one cursor position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame<S, V> {
    pub algorithm: String,
    /// Index of the most recently applied step
    pub cursor: Option<usize>,
    pub total_steps: usize,
    pub state: PlaybackState,
    /// The step that produced this frame
    pub step: Option<S>,
    pub view: V,
}

/// Frame type produced by a playback of `A`.
pub type FrameOf<A> = Frame<<A as Algorithm>::Step, <A as Algorithm>::View>;

impl<S, V> Frame<S, V> {
    /// Build a frame by replaying `steps[..applied]` onto the initial view.
    pub fn replayed<A>(algorithm: &A, steps: &[S], applied: usize, state: PlaybackState) -> Self
    where
        A: Algorithm<Step = S, View = V>,
        S: Clone,
    {
        let applied = applied.min(steps.len());
        let cursor = applied.checked_sub(1);
        Frame {
            algorithm: algorithm.name().to_string(),
            cursor,
            total_steps: steps.len(),
            state,
            step: cursor.and_then(|c| steps.get(c)).cloned(),
            view: algorithm.replay(&steps[..applied]),
        }
    }

    /// Number of steps applied to reach this frame.
    pub fn applied(&self) -> usize {
        self.cursor.map_or(0, |c| c + 1)
    }

    pub fn is_terminal(&self) -> bool {
        self.state == PlaybackState::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::Playback;
    use dsa_steps::{InputConfig, Kmp, Scenario, ScenarioKind};

    #[test]
    fn frame_serialization() {
        let scenario = Scenario::demo(ScenarioKind::QuickSort, &InputConfig::default());
        let mut playback = Playback::new(scenario).unwrap();
        playback.step_forward();

        let json = serde_json::to_string(&playback.frame()).unwrap();
        assert!(json.contains("\"algorithm\":\"quick_sort\""));
        assert!(json.contains("\"type\":\"Partition\""));
        assert!(json.contains("\"state\":\"paused\""));
    }

    #[test]
    fn replayed_frame_equals_played_frame() {
        let kmp = Kmp::new("ABABDABACDABABCABAB", "ABABCABAB");
        let mut playback = Playback::new(kmp.clone()).unwrap();
        for _ in 0..12 {
            playback.step_forward();
        }
        let replayed = Frame::replayed(&kmp, playback.steps(), 12, PlaybackState::Paused);
        assert_eq!(replayed, playback.frame());
        assert_eq!(replayed.applied(), 12);
    }

    #[test]
    fn final_frame_is_terminal() {
        let kmp = Kmp::new("ABABDABACDABABCABAB", "ABABCABAB");
        let steps = kmp.generate();
        let frame = Frame::replayed(&kmp, &steps, steps.len(), PlaybackState::Finished);
        assert!(frame.is_terminal());
        assert_eq!(frame.view.matches, vec![10]);
    }
}
