//! DSA Engine Step Generators
//!
//! Textbook algorithms recorded as replayable animation steps.
//!
//! # Model
//!
//! A generator runs its algorithm exactly once, eagerly, and records one
//! [`Algorithm::Step`] per observable event (comparison, swap, node visit,
//! chain probe). Nothing visible is mutated during generation. A player then
//! applies the steps one at a time to an [`Algorithm::View`].
//!
//! Replaying `steps[..n]` onto the initial view is deterministic, so any
//! cursor position can be rebuilt from scratch.
//!
//! # Visualizers
//!
//! - [`BinarySearch`]: range narrowing
//! - [`QuickSort`], [`MergeSort`], [`HeapSort`]: shared [`SortStep`] vocabulary
//! - [`GraphTraversal`]: BFS and DFS over [`Graph::demo`]
//! - [`HashTable`]: separate chaining
//! - [`LinkedList`]: singly linked insert, delete, find
//! - [`Kmp`]: LPS construction and search
//!
//! [`Scenario`] wraps all of them behind one type.

mod algorithm;
mod error;
mod graph;
mod hash_table;
mod input;
mod kmp;
mod linked_list;
mod scenario;
mod search;
mod sort;

pub use algorithm::{Algorithm, MAX_INPUT_LEN};
pub use error::{Error, Result};
pub use graph::{Graph, GraphTraversal, Strategy, TraversalStep, TraversalView};
pub use hash_table::{
    slot_for, HashOperation, HashStep, HashTable, HashView, LookupResult, DEFAULT_CAPACITY,
};
pub use input::{stepped_values, InputConfig};
pub use kmp::{Kmp, KmpPhase, KmpStep, KmpView};
pub use linked_list::{LinkedList, ListOperation, ListStep, ListView};
pub use scenario::{Scenario, ScenarioKind, Step, View};
pub use search::{BinarySearch, SearchStep, SearchView};
pub use sort::{HeapSort, MergeSort, QuickSort, SortStep, SortView};
