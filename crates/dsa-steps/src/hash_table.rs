//! Hash table with separate chaining.
//!
//! Each slot holds a chain of entries. Position 0 of a chain is the slot's
//! primary entry; removing it promotes the next entry in the chain.

use serde::{Deserialize, Serialize};

use crate::algorithm::{check_len, Algorithm};
use crate::error::{Error, Result};

/// Slot count used by the demo table.
pub const DEFAULT_CAPACITY: usize = 7;

/// Sum of UTF-16 code units reduced to a slot index. Anagrams collide.
pub fn slot_for(key: &str, capacity: usize) -> usize {
    let capacity = capacity.max(1);
    key.encode_utf16()
        .fold(0, |slot, unit| (slot + usize::from(unit)) % capacity)
}

/// One table operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HashOperation {
    Insert { key: String, value: String },
    Lookup { key: String },
    Delete { key: String },
}

/// Hash table problem instance: a capacity and a script of operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashTable {
    pub capacity: usize,
    pub operations: Vec<HashOperation>,
}

impl HashTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            operations: Vec::new(),
        }
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.operations.push(HashOperation::Insert {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn lookup(mut self, key: impl Into<String>) -> Self {
        self.operations.push(HashOperation::Lookup { key: key.into() });
        self
    }

    pub fn delete(mut self, key: impl Into<String>) -> Self {
        self.operations.push(HashOperation::Delete { key: key.into() });
        self
    }
}

/// Events recorded while executing the operation script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HashStep {
    /// Key hashed to a slot
    Hash { key: String, slot: usize },
    /// Chain entry inspected
    Probe { slot: usize, position: usize },
    /// Insertion lands behind existing entries
    Collision { slot: usize, chain_len: usize },
    Insert { slot: usize, position: usize, key: String, value: String },
    Update { slot: usize, position: usize, value: String },
    Found { slot: usize, position: usize, value: String },
    Missing { key: String, slot: usize },
    Remove { slot: usize, position: usize },
}

/// Result of the most recent lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub key: String,
    pub value: Option<String>,
}

/// Display state for the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashView {
    pub buckets: Vec<Vec<(String, String)>>,
    pub active_slot: Option<usize>,
    pub active_position: Option<usize>,
    pub last_lookup: Option<LookupResult>,
    pub message: String,
}

impl HashView {
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value stored for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.buckets
            .iter()
            .flatten()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Walk the chain at `slot` recording a probe per entry; returns the match position.
fn probe_chain(
    buckets: &[Vec<(String, String)>],
    slot: usize,
    key: &str,
    steps: &mut Vec<HashStep>,
) -> Option<usize> {
    for (position, (k, _)) in buckets[slot].iter().enumerate() {
        steps.push(HashStep::Probe { slot, position });
        if k == key {
            return Some(position);
        }
    }
    None
}

impl Algorithm for HashTable {
    type Step = HashStep;
    type View = HashView;

    fn name(&self) -> &'static str {
        "hash_table"
    }

    fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        check_len(self.capacity)?;
        check_len(self.operations.len())
    }

    fn generate(&self) -> Vec<HashStep> {
        let mut steps = Vec::new();
        if self.capacity == 0 {
            return steps;
        }
        let mut buckets: Vec<Vec<(String, String)>> = vec![Vec::new(); self.capacity];

        for op in &self.operations {
            match op {
                HashOperation::Insert { key, value } => {
                    let slot = slot_for(key, self.capacity);
                    steps.push(HashStep::Hash {
                        key: key.clone(),
                        slot,
                    });
                    match probe_chain(&buckets, slot, key, &mut steps) {
                        Some(position) => {
                            buckets[slot][position].1 = value.clone();
                            steps.push(HashStep::Update {
                                slot,
                                position,
                                value: value.clone(),
                            });
                        }
                        None => {
                            let position = buckets[slot].len();
                            if position > 0 {
                                steps.push(HashStep::Collision {
                                    slot,
                                    chain_len: position,
                                });
                            }
                            buckets[slot].push((key.clone(), value.clone()));
                            steps.push(HashStep::Insert {
                                slot,
                                position,
                                key: key.clone(),
                                value: value.clone(),
                            });
                        }
                    }
                }
                HashOperation::Lookup { key } => {
                    let slot = slot_for(key, self.capacity);
                    steps.push(HashStep::Hash {
                        key: key.clone(),
                        slot,
                    });
                    match probe_chain(&buckets, slot, key, &mut steps) {
                        Some(position) => steps.push(HashStep::Found {
                            slot,
                            position,
                            value: buckets[slot][position].1.clone(),
                        }),
                        None => steps.push(HashStep::Missing {
                            key: key.clone(),
                            slot,
                        }),
                    }
                }
                HashOperation::Delete { key } => {
                    let slot = slot_for(key, self.capacity);
                    steps.push(HashStep::Hash {
                        key: key.clone(),
                        slot,
                    });
                    match probe_chain(&buckets, slot, key, &mut steps) {
                        Some(position) => {
                            buckets[slot].remove(position);
                            steps.push(HashStep::Remove { slot, position });
                        }
                        None => steps.push(HashStep::Missing {
                            key: key.clone(),
                            slot,
                        }),
                    }
                }
            }
        }
        steps
    }

    fn initial_view(&self) -> HashView {
        HashView {
            buckets: vec![Vec::new(); self.capacity],
            active_slot: None,
            active_position: None,
            last_lookup: None,
            message: format!("Empty table with {} slots", self.capacity),
        }
    }

    fn apply(&self, view: &mut HashView, step: &HashStep) {
        match step {
            HashStep::Hash { key, slot } => {
                view.active_slot = Some(*slot);
                view.active_position = None;
                view.message = format!("hash(\"{key}\") -> slot {slot}");
            }
            HashStep::Probe { slot, position } => {
                view.active_slot = Some(*slot);
                view.active_position = Some(*position);
                if let Some((k, _)) = view.buckets.get(*slot).and_then(|c| c.get(*position)) {
                    view.message = format!("Checking \"{k}\" in slot {slot}");
                }
            }
            HashStep::Collision { slot, chain_len } => {
                view.message =
                    format!("Collision in slot {slot}, chaining after {chain_len} entries");
            }
            HashStep::Insert {
                slot,
                position,
                key,
                value,
            } => {
                if let Some(chain) = view.buckets.get_mut(*slot) {
                    let at = (*position).min(chain.len());
                    chain.insert(at, (key.clone(), value.clone()));
                    view.active_slot = Some(*slot);
                    view.active_position = Some(at);
                    view.message = format!("Inserted \"{key}\" = \"{value}\"");
                }
            }
            HashStep::Update {
                slot,
                position,
                value,
            } => {
                if let Some(entry) = view
                    .buckets
                    .get_mut(*slot)
                    .and_then(|c| c.get_mut(*position))
                {
                    entry.1 = value.clone();
                    view.message = format!("Updated \"{}\" = \"{value}\"", entry.0);
                }
            }
            HashStep::Found {
                slot,
                position,
                value,
            } => {
                view.active_slot = Some(*slot);
                view.active_position = Some(*position);
                let key = view
                    .buckets
                    .get(*slot)
                    .and_then(|c| c.get(*position))
                    .map(|(k, _)| k.clone())
                    .unwrap_or_default();
                view.message = format!("Found \"{key}\" = \"{value}\"");
                view.last_lookup = Some(LookupResult {
                    key,
                    value: Some(value.clone()),
                });
            }
            HashStep::Missing { key, slot } => {
                view.active_slot = Some(*slot);
                view.active_position = None;
                view.message = format!("\"{key}\" not found");
                view.last_lookup = Some(LookupResult {
                    key: key.clone(),
                    value: None,
                });
            }
            HashStep::Remove { slot, position } => {
                if let Some(chain) = view.buckets.get_mut(*slot) {
                    if *position < chain.len() {
                        let (key, _) = chain.remove(*position);
                        view.message = format!("Removed \"{key}\"");
                    }
                }
                view.active_slot = Some(*slot);
                view.active_position = None;
            }
        }
    }
}
