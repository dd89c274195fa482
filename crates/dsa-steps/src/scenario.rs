//! One type that can host any visualizer.
//!
//! [`Scenario`] is the wire format a client sends to start a run. It
//! dispatches to the concrete generator and wraps its steps and views in
//! [`Step`] and [`View`], so a single player instance can switch algorithms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::error::Result;
use crate::graph::{Graph, GraphTraversal, TraversalStep, TraversalView};
use crate::hash_table::{HashStep, HashTable, HashView, DEFAULT_CAPACITY};
use crate::input::{stepped_values, InputConfig};
use crate::kmp::{Kmp, KmpStep, KmpView};
use crate::linked_list::{LinkedList, ListOperation, ListStep, ListView};
use crate::search::{BinarySearch, SearchStep, SearchView};
use crate::sort::{HeapSort, MergeSort, QuickSort, SortStep, SortView};

/// Every supported visualizer, tagged by `algorithm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum Scenario {
    BinarySearch(BinarySearch),
    QuickSort(QuickSort),
    MergeSort(MergeSort),
    HeapSort(HeapSort),
    Traversal(GraphTraversal),
    HashTable(HashTable),
    LinkedList(LinkedList),
    Kmp(Kmp),
}

/// Algorithm names accepted by [`Scenario::demo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    BinarySearch,
    QuickSort,
    MergeSort,
    HeapSort,
    Bfs,
    Dfs,
    HashTable,
    LinkedList,
    Kmp,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 9] = [
        ScenarioKind::BinarySearch,
        ScenarioKind::QuickSort,
        ScenarioKind::MergeSort,
        ScenarioKind::HeapSort,
        ScenarioKind::Bfs,
        ScenarioKind::Dfs,
        ScenarioKind::HashTable,
        ScenarioKind::LinkedList,
        ScenarioKind::Kmp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::BinarySearch => "binary_search",
            ScenarioKind::QuickSort => "quick_sort",
            ScenarioKind::MergeSort => "merge_sort",
            ScenarioKind::HeapSort => "heap_sort",
            ScenarioKind::Bfs => "bfs",
            ScenarioKind::Dfs => "dfs",
            ScenarioKind::HashTable => "hash_table",
            ScenarioKind::LinkedList => "linked_list",
            ScenarioKind::Kmp => "kmp",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ScenarioKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown algorithm '{s}'"))
    }
}

impl Scenario {
    /// Canonical demo instance for each visualizer.
    pub fn demo(kind: ScenarioKind, input: &InputConfig) -> Self {
        match kind {
            ScenarioKind::BinarySearch => {
                Scenario::BinarySearch(BinarySearch::new(stepped_values(15), 9))
            }
            ScenarioKind::QuickSort => Scenario::QuickSort(QuickSort::new(input.random_values())),
            ScenarioKind::MergeSort => Scenario::MergeSort(MergeSort::new(input.random_values())),
            ScenarioKind::HeapSort => Scenario::HeapSort(HeapSort::new(input.random_values())),
            ScenarioKind::Bfs => Scenario::Traversal(GraphTraversal::bfs(Graph::demo(), 0)),
            ScenarioKind::Dfs => Scenario::Traversal(GraphTraversal::dfs(Graph::demo(), 0)),
            ScenarioKind::HashTable => Scenario::HashTable(
                HashTable::new(DEFAULT_CAPACITY)
                    .insert("apple", "red")
                    .insert("banana", "yellow")
                    .insert("grape", "purple")
                    .insert("lime", "green")
                    .lookup("grape")
                    .delete("apple")
                    .lookup("cherry"),
            ),
            ScenarioKind::LinkedList => Scenario::LinkedList(LinkedList::new(
                vec![10, 20, 30],
                vec![
                    ListOperation::PushFront { value: 5 },
                    ListOperation::PushBack { value: 40 },
                    ListOperation::Insert {
                        index: 2,
                        value: 15,
                    },
                    ListOperation::Find { value: 30 },
                    ListOperation::Remove { value: 20 },
                ],
            )),
            ScenarioKind::Kmp => Scenario::Kmp(Kmp::new("ABABDABACDABABCABAB", "ABABCABAB")),
        }
    }
}

/// A step from any visualizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Step {
    Search(SearchStep),
    Sort(SortStep),
    Traversal(TraversalStep),
    Hash(HashStep),
    List(ListStep),
    Kmp(KmpStep),
}

/// A view from any visualizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum View {
    Search(SearchView),
    Sort(SortView),
    Traversal(TraversalView),
    Hash(HashView),
    List(ListView),
    Kmp(KmpView),
}

impl View {
    /// Human-readable status line of the wrapped view.
    pub fn message(&self) -> &str {
        match self {
            View::Search(v) => &v.message,
            View::Sort(v) => &v.message,
            View::Traversal(v) => &v.message,
            View::Hash(v) => &v.message,
            View::List(v) => &v.message,
            View::Kmp(v) => &v.message,
        }
    }
}

impl Algorithm for Scenario {
    type Step = Step;
    type View = View;

    fn name(&self) -> &'static str {
        match self {
            Scenario::BinarySearch(a) => a.name(),
            Scenario::QuickSort(a) => a.name(),
            Scenario::MergeSort(a) => a.name(),
            Scenario::HeapSort(a) => a.name(),
            Scenario::Traversal(a) => a.name(),
            Scenario::HashTable(a) => a.name(),
            Scenario::LinkedList(a) => a.name(),
            Scenario::Kmp(a) => a.name(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Scenario::BinarySearch(a) => a.validate(),
            Scenario::QuickSort(a) => a.validate(),
            Scenario::MergeSort(a) => a.validate(),
            Scenario::HeapSort(a) => a.validate(),
            Scenario::Traversal(a) => a.validate(),
            Scenario::HashTable(a) => a.validate(),
            Scenario::LinkedList(a) => a.validate(),
            Scenario::Kmp(a) => a.validate(),
        }
    }

    fn generate(&self) -> Vec<Step> {
        match self {
            Scenario::BinarySearch(a) => a.generate().into_iter().map(Step::Search).collect(),
            Scenario::QuickSort(a) => a.generate().into_iter().map(Step::Sort).collect(),
            Scenario::MergeSort(a) => a.generate().into_iter().map(Step::Sort).collect(),
            Scenario::HeapSort(a) => a.generate().into_iter().map(Step::Sort).collect(),
            Scenario::Traversal(a) => a.generate().into_iter().map(Step::Traversal).collect(),
            Scenario::HashTable(a) => a.generate().into_iter().map(Step::Hash).collect(),
            Scenario::LinkedList(a) => a.generate().into_iter().map(Step::List).collect(),
            Scenario::Kmp(a) => a.generate().into_iter().map(Step::Kmp).collect(),
        }
    }

    fn initial_view(&self) -> View {
        match self {
            Scenario::BinarySearch(a) => View::Search(a.initial_view()),
            Scenario::QuickSort(a) => View::Sort(a.initial_view()),
            Scenario::MergeSort(a) => View::Sort(a.initial_view()),
            Scenario::HeapSort(a) => View::Sort(a.initial_view()),
            Scenario::Traversal(a) => View::Traversal(a.initial_view()),
            Scenario::HashTable(a) => View::Hash(a.initial_view()),
            Scenario::LinkedList(a) => View::List(a.initial_view()),
            Scenario::Kmp(a) => View::Kmp(a.initial_view()),
        }
    }

    /// Steps from a different visualizer than the view are ignored.
    fn apply(&self, view: &mut View, step: &Step) {
        match (self, view, step) {
            (Scenario::BinarySearch(a), View::Search(v), Step::Search(s)) => a.apply(v, s),
            (Scenario::QuickSort(a), View::Sort(v), Step::Sort(s)) => a.apply(v, s),
            (Scenario::MergeSort(a), View::Sort(v), Step::Sort(s)) => a.apply(v, s),
            (Scenario::HeapSort(a), View::Sort(v), Step::Sort(s)) => a.apply(v, s),
            (Scenario::Traversal(a), View::Traversal(v), Step::Traversal(s)) => a.apply(v, s),
            (Scenario::HashTable(a), View::Hash(v), Step::Hash(s)) => a.apply(v, s),
            (Scenario::LinkedList(a), View::List(v), Step::List(s)) => a.apply(v, s),
            (Scenario::Kmp(a), View::Kmp(v), Step::Kmp(s)) => a.apply(v, s),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_demo_validates_and_terminates() {
        let input = InputConfig::default();
        for kind in ScenarioKind::ALL {
            let scenario = Scenario::demo(kind, &input);
            assert!(scenario.validate().is_ok(), "{kind} demo is valid");
            assert!(!scenario.generate().is_empty(), "{kind} demo has steps");
        }
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in ScenarioKind::ALL {
            assert_eq!(kind.as_str().parse::<ScenarioKind>(), Ok(kind));
        }
        assert!("bogo_sort".parse::<ScenarioKind>().is_err());
    }

    #[test]
    fn demo_names_match_kind() {
        let input = InputConfig::default();
        for kind in ScenarioKind::ALL {
            assert_eq!(Scenario::demo(kind, &input).name(), kind.as_str());
        }
    }

    #[test]
    fn scenario_json_is_tagged_by_algorithm() {
        let json = r#"{"algorithm":"quick_sort","values":[5,3,8,1]}"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario, Scenario::QuickSort(QuickSort::new(vec![5, 3, 8, 1])));

        let json = r#"{"algorithm":"hash_table","capacity":1,
            "operations":[{"op":"insert","key":"a","value":"1"},{"op":"lookup","key":"a"}]}"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.name(), "hash_table");
    }

    #[test]
    fn wrapped_replay_matches_inner() {
        let inner = QuickSort::new(vec![5, 3, 8, 1]);
        let scenario = Scenario::QuickSort(inner.clone());
        let wrapped = scenario.replay(&scenario.generate());
        assert_eq!(wrapped, View::Sort(inner.replay(&inner.generate())));
        assert_eq!(wrapped.message(), "Sorted");
    }

    #[test]
    fn mismatched_step_is_ignored() {
        let scenario = Scenario::QuickSort(QuickSort::new(vec![2, 1]));
        let mut view = scenario.initial_view();
        let before = view.clone();
        scenario.apply(&mut view, &Step::List(ListStep::Missing { value: 1 }));
        assert_eq!(view, before);
    }

    #[test]
    fn steps_serialize_with_type_tag() {
        let step = Step::Sort(SortStep::Swap { i: 0, j: 1 });
        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(json, r#"{"type":"Swap","i":0,"j":1}"#);
    }
}
