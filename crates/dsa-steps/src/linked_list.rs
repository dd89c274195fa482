//! Singly linked list insert, delete and traversal.

use serde::{Deserialize, Serialize};

use crate::algorithm::{check_len, Algorithm};
use crate::error::Result;

/// One list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListOperation {
    PushFront { value: i64 },
    PushBack { value: i64 },
    /// Insert before `index`; indices past the tail append
    Insert { index: usize, value: i64 },
    /// Unlink the first node holding `value`
    Remove { value: i64 },
    Find { value: i64 },
}

/// Linked list problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedList {
    pub initial: Vec<i64>,
    pub operations: Vec<ListOperation>,
}

impl LinkedList {
    pub fn new(initial: Vec<i64>, operations: Vec<ListOperation>) -> Self {
        Self {
            initial,
            operations,
        }
    }
}

/// Events recorded while walking and relinking the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ListStep {
    /// Traversal pointer moves to a node
    Visit { index: usize },
    /// New node linked in at `index`
    Link { index: usize, value: i64 },
    /// Node at `index` unlinked
    Unlink { index: usize },
    Found { index: usize },
    Missing { value: i64 },
}

/// Display state for the list; `nodes[0]` is the head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListView {
    pub nodes: Vec<i64>,
    pub current: Option<usize>,
    pub found: Option<usize>,
    pub message: String,
}

/// Walk from the head recording a visit per node until `stop` matches.
fn walk(
    nodes: &[i64],
    steps: &mut Vec<ListStep>,
    stop: impl Fn(usize, i64) -> bool,
) -> Option<usize> {
    for (index, &value) in nodes.iter().enumerate() {
        steps.push(ListStep::Visit { index });
        if stop(index, value) {
            return Some(index);
        }
    }
    None
}

impl Algorithm for LinkedList {
    type Step = ListStep;
    type View = ListView;

    fn name(&self) -> &'static str {
        "linked_list"
    }

    fn validate(&self) -> Result<()> {
        check_len(self.initial.len() + self.operations.len())
    }

    fn generate(&self) -> Vec<ListStep> {
        let mut steps = Vec::new();
        let mut nodes = self.initial.clone();

        for op in &self.operations {
            match *op {
                ListOperation::PushFront { value } => {
                    nodes.insert(0, value);
                    steps.push(ListStep::Link { index: 0, value });
                }
                ListOperation::PushBack { value } => {
                    walk(&nodes, &mut steps, |_, _| false);
                    nodes.push(value);
                    steps.push(ListStep::Link {
                        index: nodes.len() - 1,
                        value,
                    });
                }
                ListOperation::Insert { index, value } => {
                    let index = index.min(nodes.len());
                    // Stop at the predecessor of the insertion point
                    if index > 0 {
                        walk(&nodes, &mut steps, |i, _| i + 1 == index);
                    }
                    nodes.insert(index, value);
                    steps.push(ListStep::Link { index, value });
                }
                ListOperation::Remove { value } => {
                    match walk(&nodes, &mut steps, |_, v| v == value) {
                        Some(index) => {
                            nodes.remove(index);
                            steps.push(ListStep::Unlink { index });
                        }
                        None => steps.push(ListStep::Missing { value }),
                    }
                }
                ListOperation::Find { value } => match walk(&nodes, &mut steps, |_, v| v == value) {
                    Some(index) => steps.push(ListStep::Found { index }),
                    None => steps.push(ListStep::Missing { value }),
                },
            }
        }
        steps
    }

    fn initial_view(&self) -> ListView {
        ListView {
            nodes: self.initial.clone(),
            current: None,
            found: None,
            message: format!("List of {} nodes", self.initial.len()),
        }
    }

    fn apply(&self, view: &mut ListView, step: &ListStep) {
        match *step {
            ListStep::Visit { index } => {
                view.current = Some(index);
                view.found = None;
                if let Some(value) = view.nodes.get(index) {
                    view.message = format!("At node {index} ({value})");
                }
            }
            ListStep::Link { index, value } => {
                let at = index.min(view.nodes.len());
                view.nodes.insert(at, value);
                view.current = Some(at);
                view.found = None;
                view.message = if at == 0 {
                    format!("Linked {value} as new head")
                } else {
                    format!("Linked {value} after node {}", at - 1)
                };
            }
            ListStep::Unlink { index } => {
                if index < view.nodes.len() {
                    let value = view.nodes.remove(index);
                    view.message = format!("Unlinked {value}");
                }
                view.current = None;
                view.found = None;
            }
            ListStep::Found { index } => {
                view.current = Some(index);
                view.found = Some(index);
                view.message = format!("Found at node {index}");
            }
            ListStep::Missing { value } => {
                view.current = None;
                view.found = None;
                view.message = format!("{value} not in list");
            }
        }
    }
}
