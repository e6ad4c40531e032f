//! Visualizer
//!
//! This module records the shape of heaps as a sequence of JSON snapshots
//!

use crate::chrono::Local;
use crate::serde_json;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

pub trait HeapVisualizer {
    /// take a snapshot, set `abbrev` to true to save space
    fn snapshot(&self, abbrev: bool) -> serde_json::Value;
}

#[derive(Debug)]
pub struct Visualizer {
    /// save to file if applicable
    file: Option<File>,
    /// if waiting for the first snapshot
    empty_snapshot: bool,
    /// names of the snapshots
    pub snapshots: Vec<String>,
}

impl Visualizer {
    /// create a new visualizer with target filename; `None` keeps the snapshot names only
    pub fn new(mut filepath: Option<String>) -> std::io::Result<Self> {
        if cfg!(feature = "disable_visualizer") {
            filepath = None; // do not open file
        }
        let mut file = match filepath {
            Some(filepath) => {
                if let Some(folder) = std::path::Path::new(&filepath).parent() {
                    std::fs::create_dir_all(folder)?;
                }
                Some(File::create(filepath)?)
            }
            None => None,
        };
        if let Some(file) = file.as_mut() {
            file.set_len(0)?; // truncate the file
            file.seek(SeekFrom::Start(0))?; // move the cursor to the front
            file.write_all(format!("{{\"format\":\"leftist\",\"version\":\"{}\"", env!("CARGO_PKG_VERSION")).as_bytes())?;
            file.write_all(b",\"snapshots\":[]}")?;
            file.sync_all()?;
        }
        Ok(Self {
            file,
            empty_snapshot: true,
            snapshots: vec![],
        })
    }

    pub fn incremental_save(&mut self, name: String, value: serde_json::Value) -> std::io::Result<()> {
        self.snapshots.push(name.clone());
        if let Some(file) = self.file.as_mut() {
            file.seek(SeekFrom::End(-2))?; // move the cursor before the ending ]}
            if !self.empty_snapshot {
                file.write_all(b",")?;
            }
            self.empty_snapshot = false;
            file.write_all(json!((name, value)).to_string().as_bytes())?;
            file.write_all(b"]}")?;
            file.sync_all()?;
        }
        Ok(())
    }

    /// append a snapshot of a single heap
    pub fn snapshot(&mut self, name: String, heap: &impl HeapVisualizer) -> std::io::Result<()> {
        if cfg!(feature = "disable_visualizer") {
            return Ok(());
        }
        let value = json!({ "heaps": [heap.snapshot(true)] });
        self.incremental_save(name, value)
    }

    /// append a snapshot of several heaps side by side, in the given order
    pub fn snapshot_combined(&mut self, name: String, heaps: Vec<&dyn HeapVisualizer>) -> std::io::Result<()> {
        if cfg!(feature = "disable_visualizer") {
            return Ok(());
        }
        let values: Vec<serde_json::Value> = heaps.iter().map(|heap| heap.snapshot(true)).collect();
        self.incremental_save(name, json!({ "heaps": values }))
    }
}

const DEFAULT_VISUALIZE_DATA_FOLDER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/visualize/data/");

// only used locally, because this is compile time directory
pub fn visualize_data_folder() -> String {
    DEFAULT_VISUALIZE_DATA_FOLDER.to_string()
}

pub fn static_visualize_data_filename() -> String {
    "visualizer.json".to_string()
}

pub fn auto_visualize_data_filename() -> String {
    format!("{}.json", Local::now().format("%Y%m%d-%H-%M-%S%.3f"))
}

pub fn print_visualize_path(filename: String) {
    println!("visualizer data written to {}{}", visualize_data_folder(), filename);
}
