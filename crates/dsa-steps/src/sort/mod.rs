//! Comparison sorts sharing one step vocabulary.
//!
//! Quicksort, merge sort and heap sort all record into [`SortStep`] and
//! replay onto [`SortView`], so a single array renderer serves all three.

mod heap;
mod merge;
mod quick;

pub use heap::HeapSort;
pub use merge::MergeSort;
pub use quick::QuickSort;

use serde::{Deserialize, Serialize};

/// Events recorded while sorting an array in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SortStep {
    /// Quicksort begins partitioning `low..=high`
    Partition { low: usize, high: usize },
    /// Element chosen as pivot
    Pivot { index: usize },
    /// Merge sort merges `low..=mid` with `mid+1..=high`
    Merge { low: usize, mid: usize, high: usize },
    /// Heap sort sifts `root` down within the first `size` elements
    Heapify { root: usize, size: usize },
    /// Two positions are compared
    Compare { i: usize, j: usize },
    /// Two positions exchange values
    Swap { i: usize, j: usize },
    /// A position is overwritten from the merge buffer
    Overwrite { index: usize, value: i64 },
    /// A position holds its final value
    MarkSorted { index: usize },
}

/// Display state for a sort in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortView {
    pub values: Vec<i64>,
    pub sorted: Vec<bool>,
    pub comparing: Option<(usize, usize)>,
    pub swapped: Option<(usize, usize)>,
    pub written: Option<usize>,
    pub pivot: Option<usize>,
    /// Active sub-range, inclusive
    pub range: Option<(usize, usize)>,
    pub message: String,
}

impl SortView {
    pub(crate) fn new(values: &[i64]) -> Self {
        Self {
            values: values.to_vec(),
            sorted: vec![false; values.len()],
            comparing: None,
            swapped: None,
            written: None,
            pivot: None,
            range: None,
            message: String::from("Ready"),
        }
    }

    /// True once every position has been marked sorted.
    pub fn is_complete(&self) -> bool {
        self.sorted.iter().all(|s| *s)
    }

    fn clear_highlights(&mut self) {
        self.comparing = None;
        self.swapped = None;
        self.written = None;
    }

    /// Apply one step. Out-of-range indices are ignored.
    pub(crate) fn apply(&mut self, step: &SortStep) {
        let len = self.values.len();
        match *step {
            SortStep::Partition { low, high } => {
                self.clear_highlights();
                self.pivot = None;
                self.range = Some((low, high));
                self.message = format!("Partitioning {low}..={high}");
            }
            SortStep::Pivot { index } => {
                self.pivot = Some(index);
                if let Some(value) = self.values.get(index) {
                    self.message = format!("Pivot is {value}");
                }
            }
            SortStep::Merge { low, mid, high } => {
                self.clear_highlights();
                self.range = Some((low, high));
                self.message = format!("Merging {low}..={mid} with {}..={high}", mid + 1);
            }
            SortStep::Heapify { root, size } => {
                self.clear_highlights();
                self.range = size.checked_sub(1).map(|last| (0, last));
                self.message = format!("Sifting down from {root} within heap of {size}");
            }
            SortStep::Compare { i, j } => {
                self.clear_highlights();
                self.comparing = Some((i, j));
                if let (Some(a), Some(b)) = (self.values.get(i), self.values.get(j)) {
                    self.message = format!("Comparing {a} and {b}");
                }
            }
            SortStep::Swap { i, j } => {
                self.clear_highlights();
                if i < len && j < len {
                    self.values.swap(i, j);
                    self.swapped = Some((i, j));
                    self.message = format!("Swapped positions {i} and {j}");
                    if self.pivot == Some(i) {
                        self.pivot = Some(j);
                    } else if self.pivot == Some(j) {
                        self.pivot = Some(i);
                    }
                }
            }
            SortStep::Overwrite { index, value } => {
                self.clear_highlights();
                if let Some(slot) = self.values.get_mut(index) {
                    *slot = value;
                    self.written = Some(index);
                    self.message = format!("Wrote {value} to position {index}");
                }
            }
            SortStep::MarkSorted { index } => {
                if let Some(flag) = self.sorted.get_mut(index) {
                    *flag = true;
                }
                if self.pivot == Some(index) {
                    self.pivot = None;
                }
                if self.is_complete() {
                    self.clear_highlights();
                    self.range = None;
                    self.pivot = None;
                    self.message = String::from("Sorted");
                }
            }
        }
    }
}
