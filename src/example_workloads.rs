//! Example Workloads
//!
//! Random sequences of heap operations, used to benchmark the heap and to check it against
//! the standard library's binary heap
//!

use crate::derivative::Derivative;
use crate::leftist_heap::*;
use crate::rand::{Rng, SeedableRng};
use crate::util::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Derivative, Clone, Serialize, Deserialize)]
#[derivative(Debug)]
#[serde(deny_unknown_fields)]
pub struct WorkloadConfig {
    /// smallest key that may be inserted
    #[serde(default = "workload_default_configs::min_key")]
    pub min_key: Key,
    /// largest key that may be inserted
    #[serde(default = "workload_default_configs::max_key")]
    pub max_key: Key,
    /// probability of each operation to be an insertion
    #[serde(default = "workload_default_configs::insert_ratio")]
    pub insert_ratio: f64,
    /// probability of each operation to be a merge with a freshly built heap
    #[serde(default = "workload_default_configs::merge_ratio")]
    pub merge_ratio: f64,
    /// probability of each operation to be a peek; the remaining operations extract
    #[serde(default = "workload_default_configs::peek_ratio")]
    pub peek_ratio: f64,
    /// the number of keys in the heap being merged in
    #[serde(default = "workload_default_configs::merge_size")]
    pub merge_size: usize,
}

pub mod workload_default_configs {
    use crate::util::*;

    pub fn min_key() -> Key {
        0
    }
    pub fn max_key() -> Key {
        1000
    }
    pub fn insert_ratio() -> f64 {
        0.55
    }
    pub fn merge_ratio() -> f64 {
        0.05
    }
    pub fn peek_ratio() -> f64 {
        0.1
    }
    pub fn merge_size() -> usize {
        16
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        serde_json::from_value(json!({})).expect("every field has a default")
    }
}

impl WorkloadConfig {
    pub fn new(config: serde_json::Value) -> Result<Self, String> {
        let config: Self = serde_json::from_value(config).map_err(|error| format!("invalid workload config: {error}"))?;
        config.sanity_check()?;
        Ok(config)
    }

    pub fn sanity_check(&self) -> Result<(), String> {
        if self.min_key > self.max_key {
            return Err(format!("min_key {} is larger than max_key {}", self.min_key, self.max_key));
        }
        for (name, ratio) in [
            ("insert_ratio", self.insert_ratio),
            ("merge_ratio", self.merge_ratio),
            ("peek_ratio", self.peek_ratio),
        ] {
            if !(0. ..=1.).contains(&ratio) {
                return Err(format!("{name} must be within [0, 1], got {ratio}"));
            }
        }
        let total = self.insert_ratio + self.merge_ratio + self.peek_ratio;
        if total > 1. {
            return Err(format!("the ratios sum up to {total} which exceeds 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeapOperation {
    Insert(Key),
    PeekMin,
    ExtractMin,
    /// build a separate heap from the keys and merge it in
    MergeWith(Vec<Key>),
}

/// the observable result of one operation; `None` for operations that return nothing
pub type OperationOutcome = Option<HeapResult<Key>>;

impl HeapOperation {
    pub fn apply(&self, heap: &mut LeftistHeap) -> OperationOutcome {
        match self {
            Self::Insert(key) => {
                heap.insert(*key);
                None
            }
            Self::PeekMin => Some(heap.peek_min()),
            Self::ExtractMin => Some(heap.extract_min()),
            Self::MergeWith(keys) => {
                let mut other = LeftistHeap::from_keys(keys);
                heap.merge_with(&mut other);
                debug_assert!(other.is_empty());
                None
            }
        }
    }
}

pub struct Workload {
    pub config: WorkloadConfig,
    pub seed: u64,
    pub operations: Vec<HeapOperation>,
}

impl Workload {
    pub fn generate(config: &WorkloadConfig, length: usize, seed: u64) -> Self {
        let mut rng = DeterministicRng::seed_from_u64(seed);
        let random_key = |rng: &mut DeterministicRng| rng.gen_range(config.min_key..=config.max_key);
        let mut operations = Vec::with_capacity(length);
        for _ in 0..length {
            let dice = rng.next_f64();
            let operation = if dice < config.insert_ratio {
                HeapOperation::Insert(random_key(&mut rng))
            } else if dice < config.insert_ratio + config.merge_ratio {
                HeapOperation::MergeWith((0..config.merge_size).map(|_| random_key(&mut rng)).collect())
            } else if dice < config.insert_ratio + config.merge_ratio + config.peek_ratio {
                HeapOperation::PeekMin
            } else {
                HeapOperation::ExtractMin
            };
            operations.push(operation);
        }
        Self {
            config: config.clone(),
            seed,
            operations,
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// run every operation on the heap and collect the outcomes
    pub fn execute(&self, heap: &mut LeftistHeap) -> Vec<OperationOutcome> {
        self.operations.iter().map(|operation| operation.apply(heap)).collect()
    }
}

/// the standard library's binary heap used as the ground truth
#[derive(Debug, Default)]
pub struct ReferenceHeap {
    heap: BinaryHeap<Reverse<Key>>,
}

impl ReferenceHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, operation: &HeapOperation) -> OperationOutcome {
        match operation {
            HeapOperation::Insert(key) => {
                self.heap.push(Reverse(*key));
                None
            }
            HeapOperation::PeekMin => Some(self.heap.peek().map(|Reverse(key)| *key).ok_or(EmptyHeapError::Peek)),
            HeapOperation::ExtractMin => Some(self.heap.pop().map(|Reverse(key)| key).ok_or(EmptyHeapError::Extract)),
            HeapOperation::MergeWith(keys) => {
                self.heap.extend(keys.iter().map(|key| Reverse(*key)));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// replay the workload on both heaps, optionally checking the invariants after every operation
pub fn verify_against_reference(workload: &Workload, check_invariants: bool) -> Result<(), String> {
    let mut heap = LeftistHeap::new();
    let mut reference = ReferenceHeap::new();
    for (index, operation) in workload.operations.iter().enumerate() {
        let outcome = operation.apply(&mut heap);
        let expected = reference.apply(operation);
        if outcome != expected {
            return Err(format!(
                "seed {}: operation #{index} {operation:?} returned {outcome:?}, expected {expected:?}",
                workload.seed
            ));
        }
        if check_invariants {
            heap.sanity_check()
                .map_err(|message| format!("seed {}: after operation #{index} {operation:?}: {message}", workload.seed))?;
        }
    }
    if heap.count_nodes() != reference.len() {
        return Err(format!(
            "seed {}: heap holds {} keys but the reference holds {}",
            workload.seed,
            heap.count_nodes(),
            reference.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn example_workloads_default_config() {
        // cargo test example_workloads_default_config -- --nocapture
        let config = WorkloadConfig::default();
        assert_eq!(config.min_key, 0);
        assert_eq!(config.max_key, 1000);
        config.sanity_check().unwrap();
        let config = WorkloadConfig::new(json!({ "max_key": 5, "merge_size": 3 })).unwrap();
        assert_eq!(config.max_key, 5);
        assert_eq!(config.merge_size, 3);
    }

    #[test_case(json!({ "min_key": 10, "max_key": 1 }); "inverted key range")]
    #[test_case(json!({ "insert_ratio": 1.5 }); "ratio above one")]
    #[test_case(json!({ "insert_ratio": 0.7, "peek_ratio": 0.7 }); "ratios sum above one")]
    #[test_case(json!({ "unknown_field": 1 }); "unknown field")]
    fn example_workloads_invalid_config(config: serde_json::Value) {
        assert!(WorkloadConfig::new(config).is_err());
    }

    #[test]
    fn example_workloads_deterministic() {
        // cargo test example_workloads_deterministic -- --nocapture
        let config = WorkloadConfig::default();
        let workload_1 = Workload::generate(&config, 200, 42);
        let workload_2 = Workload::generate(&config, 200, 42);
        assert_eq!(workload_1.operations, workload_2.operations);
        assert_eq!(workload_1.len(), 200);
        for operation in workload_1.operations.iter() {
            match operation {
                HeapOperation::Insert(key) => assert!((config.min_key..=config.max_key).contains(key)),
                HeapOperation::MergeWith(keys) => assert_eq!(keys.len(), config.merge_size),
                _ => {}
            }
        }
    }

    #[test_case(json!({}), 1000; "default mix")]
    #[test_case(json!({ "max_key": 3 }), 1000; "many duplicates")]
    #[test_case(json!({ "insert_ratio": 0.2, "merge_ratio": 0.3, "merge_size": 40 }), 500; "merge heavy")]
    #[test_case(json!({ "insert_ratio": 0.0, "merge_ratio": 0.0 }), 50; "always empty")]
    fn example_workloads_match_reference(config: serde_json::Value, length: usize) {
        let config = WorkloadConfig::new(config).unwrap();
        for seed in 0..10 {
            let workload = Workload::generate(&config, length, seed);
            verify_against_reference(&workload, true).unwrap();
        }
    }
}
