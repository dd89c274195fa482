//! Top-down merge sort.

use serde::{Deserialize, Serialize};

use super::{SortStep, SortView};
use crate::algorithm::{check_len, Algorithm};
use crate::error::Result;

/// Merge sort problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSort {
    pub values: Vec<i64>,
}

impl MergeSort {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }
}

fn merge_sort(values: &mut [i64], low: usize, high: usize, steps: &mut Vec<SortStep>) {
    if low >= high {
        return;
    }
    let mid = low + (high - low) / 2;
    merge_sort(values, low, mid, steps);
    merge_sort(values, mid + 1, high, steps);
    merge(values, low, mid, high, steps);
}

fn merge(values: &mut [i64], low: usize, mid: usize, high: usize, steps: &mut Vec<SortStep>) {
    steps.push(SortStep::Merge { low, mid, high });

    let left = values[low..=mid].to_vec();
    let right = values[mid + 1..=high].to_vec();
    let (mut a, mut b) = (0, 0);

    for k in low..=high {
        let take_left = if a < left.len() && b < right.len() {
            steps.push(SortStep::Compare {
                i: low + a,
                j: mid + 1 + b,
            });
            left[a] <= right[b]
        } else {
            a < left.len()
        };

        let value = if take_left {
            a += 1;
            left[a - 1]
        } else {
            b += 1;
            right[b - 1]
        };
        values[k] = value;
        steps.push(SortStep::Overwrite { index: k, value });
    }
}

impl Algorithm for MergeSort {
    type Step = SortStep;
    type View = SortView;

    fn name(&self) -> &'static str {
        "merge_sort"
    }

    fn validate(&self) -> Result<()> {
        check_len(self.values.len())
    }

    fn generate(&self) -> Vec<SortStep> {
        let mut steps = Vec::new();
        let mut values = self.values.clone();
        if let Some(last) = values.len().checked_sub(1) {
            merge_sort(&mut values, 0, last, &mut steps);
        }
        steps.extend((0..values.len()).map(|index| SortStep::MarkSorted { index }));
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
    fn sorts_with_duplicates() {
        let sort = MergeSort::new(vec![4, 1, 4, 2, 1]);
        let view = sort.replay(&sort.generate());
        assert_eq!(view.values, vec![1, 1, 2, 4, 4]);
    }

    #[test]
    fn merges_bottom_up() {
        let steps = MergeSort::new(vec![2, 1]).generate();
        assert_eq!(
            steps,
            vec![
                SortStep::Merge {
                    low: 0,
                    mid: 0,
                    high: 1,
                },
                SortStep::Compare { i: 0, j: 1 },
                SortStep::Overwrite { index: 0, value: 1 },
                SortStep::Overwrite { index: 1, value: 2 },
                SortStep::MarkSorted { index: 0 },
                SortStep::MarkSorted { index: 1 },
            ]
        );
    }

    #[test]
    fn single_element_is_immediately_terminal() {
        assert_eq!(
            MergeSort::new(vec![3]).generate(),
            vec![SortStep::MarkSorted { index: 0 }]
        );
        assert!(MergeSort::new(Vec::new()).generate().is_empty());
    }

    proptest! {
        #[test]
        fn replay_sorts(values in prop::collection::vec(-100i64..100, 0..48)) {
            assert_sorts(&MergeSort::new(values.clone()), &values);
        }
    }
}
