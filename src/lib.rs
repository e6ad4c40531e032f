//! Mergeable priority queue based on leftist trees.
//!
//! [`leftist_heap::LeftistHeap`] supports insertion, minimum lookup, minimum extraction and,
//! most importantly, merging two heaps in `O(log N)` time. [`pointers::LeftistHeapPtr`] shares a
//! heap between owners, and [`visualize::Visualizer`] records heap shapes as JSON snapshots.
//!

extern crate serde;
#[macro_use]
extern crate serde_json;
extern crate cfg_if;
extern crate chrono;
extern crate clap;
extern crate derivative;
extern crate itertools;
extern crate more_asserts;
extern crate parking_lot;
#[cfg(feature = "cli")]
extern crate pbr;
extern crate prettytable;
extern crate rand;
extern crate rand_xoshiro;
extern crate serde_variant;

#[cfg(feature = "cli")]
pub mod cli;
pub mod example_workloads;
pub mod leftist_heap;
pub mod pointers;
pub mod util;
pub mod visualize;
