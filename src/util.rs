use crate::rand_xoshiro;
use crate::rand_xoshiro::rand_core::RngCore;
use std::fs::File;
use std::io::prelude::*;
use std::time::Instant;

cfg_if::cfg_if! {
    if #[cfg(feature="i32_key")] {
        pub type Key = i32;
    } else {
        pub type Key = i64;
    }
}

/// null path length; an absent node has npl -1
pub type Npl = i32;

pub type DeterministicRng = rand_xoshiro::Xoshiro256StarStar;

pub trait F64Rng {
    fn next_f64(&mut self) -> f64;
}

impl F64Rng for DeterministicRng {
    fn next_f64(&mut self) -> f64 {
        f64::from_bits(0x3FF << 52 | self.next_u64() >> 12) - 1.
    }
}

#[derive(Debug, Clone)]
pub struct BenchmarkProfilerEntry {
    /// how many heap operations are executed in this round
    pub operation_num: usize,
    /// the time of beginning a round
    begin_time: Option<Instant>,
    /// record additional events
    pub events: Vec<(String, f64)>,
    /// interval between calling [`Self::record_begin`] to calling [`Self::record_end`]
    pub round_time: Option<f64>,
}

impl BenchmarkProfilerEntry {
    pub fn new(operation_num: usize) -> Self {
        Self {
            operation_num,
            begin_time: None,
            events: vec![],
            round_time: None,
        }
    }
    /// record the beginning of a round
    pub fn record_begin(&mut self) {
        assert_eq!(self.begin_time, None, "do not call `record_begin` twice on the same entry");
        self.begin_time = Some(Instant::now());
    }
    /// record an intermediate event, the time is relative to the beginning
    pub fn record_event(&mut self, event_name: String) {
        let begin_time = self.begin_time.expect("`record_begin` must be called before `record_event`");
        self.events.push((event_name, begin_time.elapsed().as_secs_f64()));
    }
    /// record the ending of a round
    pub fn record_end(&mut self) {
        let begin_time = self.begin_time.expect("`record_begin` must be called before `record_end`");
        self.round_time = Some(begin_time.elapsed().as_secs_f64());
    }
    pub fn is_complete(&self) -> bool {
        self.round_time.is_some()
    }
}

pub struct BenchmarkProfiler {
    /// each record corresponds to a different random workload
    pub records: Vec<BenchmarkProfilerEntry>,
    /// summation of all round time
    pub sum_round_time: f64,
    /// operation count
    pub sum_operations: usize,
    /// the file to output the profiler results
    pub benchmark_profiler_output: Option<File>,
}

impl BenchmarkProfiler {
    pub fn new(workload_length: usize, detail_log_file: Option<String>) -> std::io::Result<Self> {
        let benchmark_profiler_output = match detail_log_file {
            Some(filename) => {
                let mut file = File::create(filename)?;
                file.write_all(json!({ "workload_length": workload_length }).to_string().as_bytes())?;
                file.write_all(b"\n")?;
                Some(file)
            }
            None => None,
        };
        Ok(Self {
            records: vec![],
            sum_round_time: 0.,
            sum_operations: 0,
            benchmark_profiler_output,
        })
    }
    /// record the beginning of a round
    pub fn begin(&mut self, operation_num: usize) {
        // sanity check last entry, if exists, is complete
        if let Some(last_entry) = self.records.last() {
            assert!(
                last_entry.is_complete(),
                "the last benchmark profiler entry is not complete, make sure to call `begin` and `end` in pairs"
            );
        }
        let mut entry = BenchmarkProfilerEntry::new(operation_num);
        entry.record_begin();
        self.records.push(entry);
    }
    pub fn event(&mut self, event_name: String) {
        let last_entry = self
            .records
            .last_mut()
            .expect("last entry not exists, call `begin` before `event`");
        last_entry.record_event(event_name);
    }
    /// record the ending of a round, `heap_profile` is attached to the detailed output if any
    pub fn end(&mut self, heap_profile: Option<serde_json::Value>) -> std::io::Result<()> {
        let last_entry = self
            .records
            .last_mut()
            .expect("last entry not exists, call `begin` before `end`");
        last_entry.record_end();
        let round_time = last_entry.round_time.unwrap_or_default();
        self.sum_round_time += round_time;
        self.sum_operations += last_entry.operation_num;
        if let Some(file) = self.benchmark_profiler_output.as_mut() {
            let mut events = serde_json::Map::new();
            for (event_name, time) in last_entry.events.iter() {
                events.insert(event_name.clone(), json!(time));
            }
            let mut value = json!({
                "round_time": round_time,
                "operation_num": last_entry.operation_num,
                "events": events,
            });
            if let (Some(heap_profile), Some(value_mut)) = (heap_profile, value.as_object_mut()) {
                value_mut.insert("heap_profile".to_string(), heap_profile);
            }
            file.write_all(value.to_string().as_bytes())?;
            file.write_all(b"\n")?;
        }
        Ok(())
    }
    /// average time of each round, 0 if no round has run
    pub fn average_round_time(&self) -> f64 {
        if self.records.is_empty() {
            return 0.;
        }
        self.sum_round_time / (self.records.len() as f64)
    }
    /// average time of each heap operation, 0 if no operation has run
    pub fn average_operation_time(&self) -> f64 {
        if self.sum_operations == 0 {
            return 0.;
        }
        self.sum_round_time / (self.sum_operations as f64)
    }
    /// print out a brief one-line statistics
    pub fn brief(&self) -> String {
        let per_round = self.average_round_time();
        let per_operation = self.average_operation_time();
        format!("round: {per_round:.3e}, operation: {per_operation:.3e},")
    }
}
