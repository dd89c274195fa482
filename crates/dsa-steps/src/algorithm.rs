//! The generator contract shared by every visualizer.

use std::fmt::Debug;

use serde::Serialize;

use crate::error::Result;

/// Largest array, text or operation list a visualizer will animate.
pub const MAX_INPUT_LEN: usize = 512;

/// A textbook algorithm recorded as a replayable step sequence.
///
/// The implementing type is the problem instance (array, graph, text and
/// pattern). [`generate`](Algorithm::generate) runs the algorithm once and
/// records every observable event; [`apply`](Algorithm::apply) replays one
/// of those events onto a view. Replaying the first `n` steps onto
/// [`initial_view`](Algorithm::initial_view) always yields the same view.
pub trait Algorithm: Clone + Debug + Send + Sync + 'static {
    /// One recorded event.
    type Step: Clone + Debug + Serialize + Send + Sync + 'static;
    /// Display-only state derived from replaying steps.
    type View: Clone + Debug + PartialEq + Serialize + Send + Sync + 'static;

    /// Short machine-readable name, e.g. `"quick_sort"`.
    fn name(&self) -> &'static str;

    /// Reject input that must not start a run.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Run the algorithm and record its steps. Pure and deterministic.
    fn generate(&self) -> Vec<Self::Step>;

    /// View before any step has been applied.
    fn initial_view(&self) -> Self::View;

    /// Apply a single step to a view.
    fn apply(&self, view: &mut Self::View, step: &Self::Step);

    /// Rebuild the view reached after applying `steps` in order.
    fn replay(&self, steps: &[Self::Step]) -> Self::View {
        let mut view = self.initial_view();
        for step in steps {
            self.apply(&mut view, step);
        }
        view
    }
}

/// Shared length guard used by `validate` implementations.
pub(crate) fn check_len(len: usize) -> Result<()> {
    if len > MAX_INPUT_LEN {
        return Err(crate::Error::InputTooLarge {
            len,
            max: MAX_INPUT_LEN,
        });
    }
    Ok(())
}
