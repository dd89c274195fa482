//! Breadth-first and depth-first traversal over a small undirected graph.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::algorithm::{check_len, Algorithm};
use crate::error::{Error, Result};

/// An undirected graph with labelled nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub labels: Vec<String>,
    pub edges: Vec<(usize, usize)>,
}

impl Graph {
    /// The seven-node graph used by the traversal demos.
    ///
    /// ```text
    ///         A
    ///        / \
    ///       B   C
    ///      / \   \
    ///     D   E - F
    ///     |
    ///     G
    /// ```
    pub fn demo() -> Self {
        Self {
            labels: ["A", "B", "C", "D", "E", "F", "G"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            edges: vec![(0, 1), (0, 2), (1, 3), (1, 4), (2, 5), (4, 5), (3, 6)],
        }
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Neighbours of `node` in ascending order, without duplicates.
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .edges
            .iter()
            .filter_map(|&(a, b)| {
                if a == node {
                    Some(b)
                } else if b == node {
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn label(&self, node: usize) -> &str {
        self.labels.get(node).map(String::as_str).unwrap_or("?")
    }
}

/// Frontier discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// FIFO queue
    BreadthFirst,
    /// LIFO stack
    DepthFirst,
}

/// Traversal problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphTraversal {
    pub graph: Graph,
    pub start: usize,
    pub strategy: Strategy,
}

impl GraphTraversal {
    pub fn bfs(graph: Graph, start: usize) -> Self {
        Self {
            graph,
            start,
            strategy: Strategy::BreadthFirst,
        }
    }

    pub fn dfs(graph: Graph, start: usize) -> Self {
        Self {
            graph,
            start,
            strategy: Strategy::DepthFirst,
        }
    }

    fn breadth_first(&self, steps: &mut Vec<TraversalStep>) {
        let mut discovered = vec![false; self.graph.node_count()];
        let mut queue = VecDeque::new();

        discovered[self.start] = true;
        queue.push_back(self.start);
        steps.push(TraversalStep::Enqueue { node: self.start });

        while let Some(node) = queue.pop_front() {
            steps.push(TraversalStep::Dequeue { node });
            steps.push(TraversalStep::Visit { node });
            for next in self.graph.neighbors(node) {
                steps.push(TraversalStep::Edge {
                    from: node,
                    to: next,
                });
                if !discovered[next] {
                    discovered[next] = true;
                    queue.push_back(next);
                    steps.push(TraversalStep::Enqueue { node: next });
                }
            }
        }
    }

    fn depth_first(&self, steps: &mut Vec<TraversalStep>) {
        let mut visited = vec![false; self.graph.node_count()];
        let mut stack = vec![self.start];
        steps.push(TraversalStep::Push { node: self.start });

        while let Some(node) = stack.pop() {
            steps.push(TraversalStep::Pop { node });
            if visited[node] {
                continue;
            }
            visited[node] = true;
            steps.push(TraversalStep::Visit { node });
            // Reverse push so the smallest neighbour is explored first
            for next in self.graph.neighbors(node).into_iter().rev() {
                if !visited[next] {
                    steps.push(TraversalStep::Edge {
                        from: node,
                        to: next,
                    });
                    stack.push(next);
                    steps.push(TraversalStep::Push { node: next });
                }
            }
        }
    }
}

/// Events recorded during a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TraversalStep {
    Enqueue { node: usize },
    Dequeue { node: usize },
    Push { node: usize },
    Pop { node: usize },
    Visit { node: usize },
    Edge { from: usize, to: usize },
}

/// Display state for a traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalView {
    pub strategy: Strategy,
    pub current: Option<usize>,
    /// Nodes in visit order
    pub visited: Vec<usize>,
    /// Queue front first, or stack bottom first
    pub frontier: Vec<usize>,
    /// Edges examined so far
    pub edges: Vec<(usize, usize)>,
    pub active_edge: Option<(usize, usize)>,
    pub message: String,
}

impl TraversalView {
    pub fn is_visited(&self, node: usize) -> bool {
        self.visited.contains(&node)
    }
}

impl Algorithm for GraphTraversal {
    type Step = TraversalStep;
    type View = TraversalView;

    fn name(&self) -> &'static str {
        match self.strategy {
            Strategy::BreadthFirst => "bfs",
            Strategy::DepthFirst => "dfs",
        }
    }

    fn validate(&self) -> Result<()> {
        let nodes = self.graph.node_count();
        check_len(nodes)?;
        check_len(self.graph.edges.len())?;
        if self.start >= nodes {
            return Err(Error::StartOutOfRange {
                start: self.start,
                nodes,
            });
        }
        if let Some(&(from, to)) = self
            .graph
            .edges
            .iter()
            .find(|(a, b)| *a >= nodes || *b >= nodes)
        {
            return Err(Error::EdgeOutOfRange { from, to, nodes });
        }
        Ok(())
    }

    fn generate(&self) -> Vec<TraversalStep> {
        let mut steps = Vec::new();
        if self.validate().is_err() {
            return steps;
        }
        match self.strategy {
            Strategy::BreadthFirst => self.breadth_first(&mut steps),
            Strategy::DepthFirst => self.depth_first(&mut steps),
        }
        steps
    }

    fn initial_view(&self) -> TraversalView {
        TraversalView {
            strategy: self.strategy,
            current: None,
            visited: Vec::new(),
            frontier: Vec::new(),
            edges: Vec::new(),
            active_edge: None,
            message: format!("Start at {}", self.graph.label(self.start)),
        }
    }

    fn apply(&self, view: &mut TraversalView, step: &TraversalStep) {
        let label = |n: usize| self.graph.label(n).to_string();
        match *step {
            TraversalStep::Enqueue { node } => {
                view.frontier.push(node);
                view.message = format!("Enqueue {}", label(node));
            }
            TraversalStep::Push { node } => {
                view.frontier.push(node);
                view.message = format!("Push {}", label(node));
            }
            TraversalStep::Dequeue { node } => {
                if view.frontier.first() == Some(&node) {
                    view.frontier.remove(0);
                }
                view.active_edge = None;
                view.message = format!("Dequeue {}", label(node));
            }
            TraversalStep::Pop { node } => {
                if view.frontier.last() == Some(&node) {
                    view.frontier.pop();
                }
                view.active_edge = None;
                view.message = if view.is_visited(node) {
                    format!("Pop {}, already visited", label(node))
                } else {
                    format!("Pop {}", label(node))
                };
            }
            TraversalStep::Visit { node } => {
                view.current = Some(node);
                if !view.is_visited(node) {
                    view.visited.push(node);
                }
                view.message = format!("Visit {}", label(node));
            }
            TraversalStep::Edge { from, to } => {
                view.edges.push((from, to));
                view.active_edge = Some((from, to));
                view.message = format!("Follow edge {} - {}", label(from), label(to));
            }
        }
    }
}
