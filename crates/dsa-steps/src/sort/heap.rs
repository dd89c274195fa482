//! In-place heap sort over a max-heap.

use serde::{Deserialize, Serialize};

use super::{SortStep, SortView};
use crate::algorithm::{check_len, Algorithm};
use crate::error::Result;

/// Heap sort problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapSort {
    pub values: Vec<i64>,
}

impl HeapSort {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }
}

fn sift_down(values: &mut [i64], mut root: usize, size: usize, steps: &mut Vec<SortStep>) {
    steps.push(SortStep::Heapify { root, size });
    loop {
        let mut largest = root;
        for child in [2 * root + 1, 2 * root + 2] {
            if child < size {
                steps.push(SortStep::Compare {
                    i: largest,
                    j: child,
                });
                if values[child] > values[largest] {
                    largest = child;
                }
            }
        }
        if largest == root {
            return;
        }
        values.swap(root, largest);
        steps.push(SortStep::Swap {
            i: root,
            j: largest,
        });
        root = largest;
    }
}

impl Algorithm for HeapSort {
    type Step = SortStep;
    type View = SortView;

    fn name(&self) -> &'static str {
        "heap_sort"
    }

    fn validate(&self) -> Result<()> {
        check_len(self.values.len())
    }

    fn generate(&self) -> Vec<SortStep> {
        let mut steps = Vec::new();
        let mut values = self.values.clone();
        let n = values.len();
        if n == 0 {
            return steps;
        }

        for root in (0..n / 2).rev() {
            sift_down(&mut values, root, n, &mut steps);
        }
        for end in (1..n).rev() {
            values.swap(0, end);
            steps.push(SortStep::Swap { i: 0, j: end });
            steps.push(SortStep::MarkSorted { index: end });
            sift_down(&mut values, 0, end, &mut steps);
        }
        steps.push(SortStep::MarkSorted { index: 0 });
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
    fn sorts_reverse_input() {
        let sort = HeapSort::new(vec![9, 7, 5, 3, 1]);
        let view = sort.replay(&sort.generate());
        assert_eq!(view.values, vec![1, 3, 5, 7, 9]);
        assert!(view.is_complete());
    }

    #[test]
    fn largest_settles_at_end_first() {
        let sort = HeapSort::new(vec![2, 8, 5, 1]);
        let steps = sort.generate();
        let first_mark = steps
            .iter()
            .position(|s| matches!(s, SortStep::MarkSorted { .. }))
            .expect("a mark step");
        let view = sort.replay(&steps[..=first_mark]);
        assert_eq!(view.values[3], 8);
        assert!(view.sorted[3]);
    }

    #[test]
    fn empty_and_single() {
        assert!(HeapSort::new(Vec::new()).generate().is_empty());
        assert_eq!(
            HeapSort::new(vec![1]).generate(),
            vec![SortStep::MarkSorted { index: 0 }]
        );
    }

    proptest! {
        #[test]
        fn replay_sorts(values in prop::collection::vec(-100i64..100, 0..48)) {
            assert_sorts(&HeapSort::new(values.clone()), &values);
        }
    }
}
