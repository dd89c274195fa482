//! Binary search over a sorted array.

use serde::{Deserialize, Serialize};

use crate::algorithm::{check_len, Algorithm};
use crate::error::{Error, Result};

/// Binary search problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySearch {
    pub values: Vec<i64>,
    pub target: i64,
}

impl BinarySearch {
    pub fn new(values: Vec<i64>, target: i64) -> Self {
        Self { values, target }
    }
}

/// Events recorded while narrowing the search range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchStep {
    /// The candidate range, inclusive on both ends
    Range { low: usize, high: usize },
    /// The midpoint being compared against the target
    Probe { mid: usize },
    /// Target found
    Found { index: usize },
    /// Range exhausted without finding the target
    NotFound,
}

/// Display state for binary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchView {
    pub values: Vec<i64>,
    pub target: i64,
    pub low: Option<usize>,
    pub high: Option<usize>,
    pub mid: Option<usize>,
    pub found: Option<usize>,
    pub finished: bool,
    pub message: String,
}

impl SearchView {
    /// Whether `index` lies outside the live range and is greyed out.
    pub fn is_eliminated(&self, index: usize) -> bool {
        match (self.low, self.high) {
            (Some(low), Some(high)) => index < low || index > high,
            _ => self.finished && self.found != Some(index),
        }
    }
}

impl Algorithm for BinarySearch {
    type Step = SearchStep;
    type View = SearchView;

    fn name(&self) -> &'static str {
        "binary_search"
    }

    fn validate(&self) -> Result<()> {
        check_len(self.values.len())?;
        match self.values.windows(2).position(|w| w[0] > w[1]) {
            Some(i) => Err(Error::Unsorted { index: i + 1 }),
            None => Ok(()),
        }
    }

    fn generate(&self) -> Vec<SearchStep> {
        let mut steps = Vec::new();
        let (mut low, mut high) = (0usize, self.values.len());

        while low < high {
            steps.push(SearchStep::Range {
                low,
                high: high - 1,
            });
            let mid = low + (high - low) / 2;
            steps.push(SearchStep::Probe { mid });
            match self.values[mid].cmp(&self.target) {
                std::cmp::Ordering::Equal => {
                    steps.push(SearchStep::Found { index: mid });
                    return steps;
                }
                std::cmp::Ordering::Less => low = mid + 1,
                std::cmp::Ordering::Greater => high = mid,
            }
        }

        steps.push(SearchStep::NotFound);
        steps
    }

    fn initial_view(&self) -> SearchView {
        SearchView {
            values: self.values.clone(),
            target: self.target,
            low: None,
            high: None,
            mid: None,
            found: None,
            finished: false,
            message: format!("Searching for {}", self.target),
        }
    }

    fn apply(&self, view: &mut SearchView, step: &SearchStep) {
        match step {
            SearchStep::Range { low, high } => {
                view.low = Some(*low);
                view.high = Some(*high);
                view.mid = None;
                view.message = format!("Searching indices {low}..={high}");
            }
            SearchStep::Probe { mid } => {
                view.mid = Some(*mid);
                let value = view.values.get(*mid).copied().unwrap_or_default();
                view.message = match value.cmp(&view.target) {
                    std::cmp::Ordering::Equal => format!("values[{mid}] = {value} equals target"),
                    std::cmp::Ordering::Less => {
                        format!("values[{mid}] = {value} < {}, discard left half", view.target)
                    }
                    std::cmp::Ordering::Greater => {
                        format!("values[{mid}] = {value} > {}, discard right half", view.target)
                    }
                };
            }
            SearchStep::Found { index } => {
                view.found = Some(*index);
                view.mid = Some(*index);
                view.low = Some(*index);
                view.high = Some(*index);
                view.finished = true;
                view.message = format!("Found {} at index {index}", view.target);
            }
            SearchStep::NotFound => {
                view.found = None;
                view.mid = None;
                view.low = None;
                view.high = None;
                view.finished = true;
                view.message = format!("{} is not in the array", view.target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::stepped_values;
    use proptest::prelude::*;

    #[test]
    fn finds_target_in_stepped_array() {
        let search = BinarySearch::new(stepped_values(15), 9);
        let steps = search.generate();

        assert_eq!(steps.last(), Some(&SearchStep::Found { index: 2 }));
        let view = search.replay(&steps);
        assert_eq!(view.found, Some(2));
        assert!(view.finished);
    }

    #[test]
    fn narrows_through_expected_midpoints() {
        let search = BinarySearch::new(stepped_values(15), 9);
        let probes: Vec<usize> = search
            .generate()
            .iter()
            .filter_map(|s| match s {
                SearchStep::Probe { mid } => Some(*mid),
                _ => None,
            })
            .collect();
        assert_eq!(probes, vec![7, 3, 1, 2]);
    }

    #[test]
    fn missing_target_ends_not_found() {
        let search = BinarySearch::new(stepped_values(15), 10);
        let steps = search.generate();
        assert_eq!(steps.last(), Some(&SearchStep::NotFound));
        assert_eq!(search.replay(&steps).found, None);
    }

    #[test]
    fn empty_input_is_immediately_terminal() {
        let search = BinarySearch::new(Vec::new(), 4);
        assert_eq!(search.generate(), vec![SearchStep::NotFound]);
    }

    #[test]
    fn single_element() {
        let search = BinarySearch::new(vec![7], 7);
        let steps = search.generate();
        assert_eq!(steps.last(), Some(&SearchStep::Found { index: 0 }));
    }

    #[test]
    fn rejects_unsorted_input() {
        let search = BinarySearch::new(vec![1, 5, 3], 3);
        assert_eq!(search.validate(), Err(Error::Unsorted { index: 2 }));
    }

    #[test]
    fn eliminated_indices_follow_range() {
        let search = BinarySearch::new(stepped_values(15), 9);
        let steps = search.generate();
        // After the second Range step the live range is 0..=6
        let view = search.replay(&steps[..3]);
        assert!(!view.is_eliminated(6));
        assert!(view.is_eliminated(7));
    }

    proptest! {
        #[test]
        fn agrees_with_std_binary_search(
            mut values in prop::collection::vec(-50i64..50, 0..40),
            target in -60i64..60,
        ) {
            values.sort_unstable();
            let search = BinarySearch::new(values.clone(), target);
            let view = search.replay(&search.generate());
            prop_assert!(view.finished);
            match view.found {
                Some(index) => prop_assert_eq!(values[index], target),
                None => prop_assert!(!values.contains(&target)),
            }
        }
    }
}
