//! Quicksort with Lomuto partitioning.

use serde::{Deserialize, Serialize};

use super::{SortStep, SortView};
use crate::algorithm::{check_len, Algorithm};
use crate::error::Result;

/// Quicksort problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickSort {
    pub values: Vec<i64>,
}

impl QuickSort {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }
}

fn quick_sort(values: &mut [i64], low: usize, high: usize, steps: &mut Vec<SortStep>) {
    if low == high {
        steps.push(SortStep::MarkSorted { index: low });
        return;
    }

    steps.push(SortStep::Partition { low, high });
    steps.push(SortStep::Pivot { index: high });
    let pivot = values[high];

    let mut store = low;
    for j in low..high {
        steps.push(SortStep::Compare { i: j, j: high });
        if values[j] < pivot {
            if store != j {
                values.swap(store, j);
                steps.push(SortStep::Swap { i: store, j });
            }
            store += 1;
        }
    }
    if store != high {
        values.swap(store, high);
        steps.push(SortStep::Swap { i: store, j: high });
    }
    steps.push(SortStep::MarkSorted { index: store });

    if store > low {
        quick_sort(values, low, store - 1, steps);
    }
    if store < high {
        quick_sort(values, store + 1, high, steps);
    }
}

impl Algorithm for QuickSort {
    type Step = SortStep;
    type View = SortView;

    fn name(&self) -> &'static str {
        "quick_sort"
    }

    fn validate(&self) -> Result<()> {
        check_len(self.values.len())
    }

    fn generate(&self) -> Vec<SortStep> {
        let mut steps = Vec::new();
        let mut values = self.values.clone();
        if let Some(last) = values.len().checked_sub(1) {
            quick_sort(&mut values, 0, last, &mut steps);
        }
        steps
    }

    fn initial_view(&self) -> SortView {
        SortView::new(&self.values)
    }

    fn apply(&self, view: &mut SortView, step: &SortStep) {
        view.apply(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::tests::assert_sorts;
    use proptest::prelude::*;

    #[test]
    fn sorts_small_array() {
        let sort = QuickSort::new(vec![5, 3, 8, 1]);
        let view = sort.replay(&sort.generate());
        assert_eq!(view.values, vec![1, 3, 5, 8]);
        assert!(view.sorted.iter().all(|s| *s));
    }

    #[test]
    fn first_partition_uses_last_pivot() {
        let steps = QuickSort::new(vec![5, 3, 8, 1]).generate();
        assert_eq!(steps[0], SortStep::Partition { low: 0, high: 3 });
        assert_eq!(steps[1], SortStep::Pivot { index: 3 });
    }

    #[test]
    fn each_index_marked_exactly_once() {
        let steps = QuickSort::new(vec![4, 4, 2, 9, 0, 4]).generate();
        let mut marks: Vec<usize> = steps
            .iter()
            .filter_map(|s| match s {
                SortStep::MarkSorted { index } => Some(*index),
                _ => None,
            })
            .collect();
        marks.sort_unstable();
        assert_eq!(marks, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_and_single() {
        assert!(QuickSort::new(Vec::new()).generate().is_empty());
        assert_eq!(
            QuickSort::new(vec![7]).generate(),
            vec![SortStep::MarkSorted { index: 0 }]
        );
    }

    proptest! {
        #[test]
        fn replay_sorts(values in prop::collection::vec(-100i64..100, 0..48)) {
            assert_sorts(&QuickSort::new(values.clone()), &values);
        }
    }
}
