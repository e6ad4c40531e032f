use crate::example_workloads::*;
use crate::itertools::Itertools;
use crate::leftist_heap::*;
use crate::util::*;
use crate::visualize::*;
use clap::builder::{StringValueParser, TypedValueParser, ValueParser};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, Subcommand, ValueEnum};
use pbr::ProgressBar;
use prettytable::{row, Table};
use rand::rngs::SmallRng;
use rand::{thread_rng, Rng, RngCore, SeedableRng};
use serde::Serialize;
use serde_variant::to_variant_name;
use std::env;

const TEST_EACH_ROUNDS: usize = 100;

#[derive(Parser, Clone)]
#[clap(author = clap::crate_authors!(", "))]
#[clap(version = env!("CARGO_PKG_VERSION"))]
#[clap(about = "Mergeable priority queue based on leftist trees")]
#[clap(color = clap::ColorChoice::Auto)]
#[clap(propagate_version = true)]
#[clap(subcommand_required = true)]
#[clap(arg_required_else_help = true)]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// walk through insertion, extraction and merging on a small heap
    Demo {
        /// record every step to the default visualizer file at visualize/data/visualizer.json
        #[clap(long, action)]
        enable_visualizer: bool,
    },
    /// benchmark the speed (and also correctness if enabled) on random workloads
    Benchmark(BenchmarkParameters),
    /// built-in tests
    Test {
        #[clap(subcommand)]
        command: TestCommands,
    },
}

#[derive(Parser, Clone)]
pub struct BenchmarkParameters {
    /// the number of operations in each workload
    #[clap(value_parser)]
    length: usize,
    /// the configuration of the workload generator
    #[clap(long, default_value_t = json!({}), value_parser = ValueParser::new(SerdeJsonParser))]
    workload_config: serde_json::Value,
    /// the method to verify the correctness of the heap
    #[clap(long, value_enum, default_value_t = Verifier::None)]
    verifier: Verifier,
    /// the number of workloads to run
    #[clap(short = 'r', long, default_value_t = 1000)]
    total_rounds: usize,
    /// message on the progress bar
    #[clap(long, default_value_t = format!(""))]
    pb_message: String,
    /// use deterministic seed for debugging purpose (round number is the seed)
    #[clap(long, action)]
    use_deterministic_seed: bool,
    /// the benchmark profile output file path
    #[clap(long)]
    benchmark_profiler_output: Option<String>,
    /// only execute a single seed for debugging purposes
    #[clap(long, action)]
    single_seed: Option<u64>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum TestCommands {
    /// test common cases
    Common {
        /// print out the command to test
        #[clap(short = 'c', long, action)]
        print_command: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum Verifier {
    /// disable verifier
    None,
    /// compare every outcome with the standard library binary heap
    Reference,
    /// compare with the reference and also check the heap invariants after every operation
    StrictInvariant,
}

impl Verifier {
    pub fn verify(&self, workload: &Workload) -> Result<(), String> {
        match self {
            Self::None => Ok(()),
            Self::Reference => verify_against_reference(workload, false),
            Self::StrictInvariant => verify_against_reference(workload, true),
        }
    }
}

#[derive(Clone)]
struct SerdeJsonParser;
impl TypedValueParser for SerdeJsonParser {
    type Value = serde_json::Value;
    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let inner = StringValueParser::new();
        let val = inner.parse_ref(cmd, arg, value)?;
        match serde_json::from_str::<serde_json::Value>(&val) {
            Ok(vector) => Ok(vector),
            Err(error) => {
                let mut err = clap::Error::new(ErrorKind::ValueValidation).with_cmd(cmd);
                if let Some(arg) = arg {
                    err.insert(ContextKind::InvalidArg, ContextValue::String(arg.to_string()));
                }
                err.insert(
                    ContextKind::InvalidValue,
                    ContextValue::String(format!("should be like {{\"a\":1}}, parse error: {error}")),
                );
                Err(err)
            }
        }
    }
}

impl Cli {
    pub fn run(self) {
        match self.command {
            Commands::Demo { enable_visualizer } => {
                let mut visualizer = None;
                if enable_visualizer {
                    let filename = static_visualize_data_filename();
                    match Visualizer::new(Some(visualize_data_folder() + filename.as_str())) {
                        Ok(new_visualizer) => {
                            print_visualize_path(filename);
                            visualizer = Some(new_visualizer);
                        }
                        Err(error) => eprintln!("cannot open visualizer file: {error}"),
                    }
                }
                if let Err(error) = run_demo(visualizer.as_mut()) {
                    eprintln!("failed to write visualizer snapshot: {error}");
                }
            }
            Commands::Benchmark(parameters) => run_benchmark(parameters),
            Commands::Test { command } => match command {
                TestCommands::Common { print_command } => {
                    let mut parameters = vec![];
                    for length in [10, 100, 1000] {
                        for workload_config in [
                            json!({}),
                            json!({ "max_key": 3 }),
                            json!({ "insert_ratio": 0.2, "merge_ratio": 0.3, "merge_size": 40 }),
                        ] {
                            parameters.push(vec![
                                format!("{length}"),
                                format!("--workload-config"),
                                serde_json::to_string(&workload_config).unwrap_or_default(),
                                format!("--pb-message"),
                                format!("length {length} {workload_config}"),
                            ]);
                        }
                    }
                    let command_head = vec![format!(""), format!("benchmark")];
                    let command_tail = vec![
                        "--total-rounds".to_string(),
                        format!("{TEST_EACH_ROUNDS}"),
                        format!("--verifier"),
                        to_variant_name(&Verifier::StrictInvariant).unwrap_or("strict-invariant").to_string(),
                    ];
                    for parameter in parameters.iter() {
                        execute_in_cli(
                            command_head.iter().chain(parameter.iter()).chain(command_tail.iter()),
                            print_command,
                        );
                    }
                }
            },
        }
    }
}

/// the sample session: build a heap, drain it step by step, then merge two heaps
pub fn run_demo(mut visualizer: Option<&mut Visualizer>) -> std::io::Result<()> {
    let keys: Vec<Key> = vec![10, 5, 20, 3, 15, 2];
    println!("Inserting elements: {}", keys.iter().join(", "));
    let mut heap = LeftistHeap::from_keys(&keys);
    println!("\nTree structure after insertions:");
    heap.print_tree();
    if let Some(visualizer) = visualizer.as_mut() {
        visualizer.snapshot("inserted".to_string(), &heap)?;
    }
    if let Ok(min) = heap.peek_min() {
        println!("\nMin element: {min}");
    }

    println!("\nExtracting min elements:");
    while let Ok(key) = heap.extract_min() {
        println!("Extracted: {key}");
        if let Some(visualizer) = visualizer.as_mut() {
            visualizer.snapshot(format!("extracted {key}"), &heap)?;
        }
        match heap.peek_min() {
            Ok(min) => {
                println!("Current Tree Structure:");
                heap.print_tree();
                println!("Next Min: {min}");
            }
            Err(_) => println!("Tree is now empty."),
        }
        println!("----");
    }

    println!("\nTesting merge operation:");
    let mut heap_1 = LeftistHeap::from_keys(&[10, 20, 5]);
    println!("Tree 1:");
    heap_1.print_tree();
    let mut heap_2 = LeftistHeap::from_keys(&[15, 8, 25]);
    println!("\nTree 2:");
    heap_2.print_tree();
    if let Some(visualizer) = visualizer.as_mut() {
        visualizer.snapshot_combined("before merge".to_string(), vec![&heap_1, &heap_2])?;
    }

    heap_1.merge_with(&mut heap_2);
    println!("\nTree 1 after merging with Tree 2:");
    heap_1.print_tree();
    println!("\nTree 2 after being merged (should be empty):");
    heap_2.print_tree();
    if let Some(visualizer) = visualizer.as_mut() {
        visualizer.snapshot_combined("after merge".to_string(), vec![&heap_1, &heap_2])?;
    }

    println!("\nExtracting from merged tree:");
    while let Ok(key) = heap_1.extract_min() {
        println!("Extracted: {key}");
    }
    Ok(())
}

fn run_benchmark(parameters: BenchmarkParameters) {
    let BenchmarkParameters {
        length,
        workload_config,
        verifier,
        total_rounds,
        pb_message,
        use_deterministic_seed,
        benchmark_profiler_output,
        single_seed,
    } = parameters;
    let config = match WorkloadConfig::new(workload_config) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };

    // single seed mode, intended only execute a single failing round
    if let Some(seed) = single_seed {
        let workload = Workload::generate(&config, length, seed);
        let mut heap = LeftistHeap::new();
        for operation in workload.operations.iter() {
            let outcome = operation.apply(&mut heap);
            println!("{operation:?} => {outcome:?}");
        }
        heap.print_tree();
        if let Err(message) = verifier.verify(&workload) {
            panic!("{message}");
        }
        return;
    }

    // whether to disable progress bar, useful when running jobs in background
    let disable_progress_bar = env::var("DISABLE_PROGRESS_BAR").is_ok() || total_rounds == 0;
    let mut pb = if !disable_progress_bar {
        let mut pb = ProgressBar::on(std::io::stderr(), total_rounds as u64);
        pb.message(format!("{pb_message} ").as_str());
        Some(pb)
    } else {
        if !pb_message.is_empty() {
            print!("{pb_message} ");
        }
        None
    };

    let mut benchmark_profiler = match BenchmarkProfiler::new(length, benchmark_profiler_output) {
        Ok(benchmark_profiler) => benchmark_profiler,
        Err(error) => {
            eprintln!("cannot open benchmark profiler output: {error}");
            std::process::exit(1);
        }
    };
    let mut rng = SmallRng::seed_from_u64(thread_rng().gen::<u64>());
    let mut max_right_spine = 0;
    let mut max_node_num = 0;
    for round in 0..(total_rounds as u64) {
        if let Some(pb) = pb.as_mut() {
            pb.set(round);
        }
        let seed = if use_deterministic_seed { round } else { rng.next_u64() };
        let workload = Workload::generate(&config, length, seed);
        let mut heap = LeftistHeap::new();
        benchmark_profiler.begin(workload.len());
        workload.execute(&mut heap);
        benchmark_profiler.event("executed".to_string());
        max_right_spine = max_right_spine.max(heap.right_spine_length());
        max_node_num = max_node_num.max(heap.count_nodes());
        let heap_profile = json!({
            "seed": seed,
            "node_num": heap.count_nodes(),
            "right_spine": heap.right_spine_length(),
        });
        heap.clear();
        if let Err(message) = verifier.verify(&workload) {
            panic!("{message}");
        }
        benchmark_profiler.event("verified".to_string());
        if let Err(error) = benchmark_profiler.end(Some(heap_profile)) {
            eprintln!("cannot write benchmark profiler output: {error}");
        }
        if let Some(pb) = pb.as_mut() {
            if pb_message.is_empty() {
                pb.message(format!("{} ", benchmark_profiler.brief()).as_str());
            }
        }
    }
    if disable_progress_bar {
        // always print out brief
        println!("{}", benchmark_profiler.brief());
    } else {
        if let Some(pb) = pb.as_mut() {
            pb.finish()
        }
        println!();
    }

    let mut table = Table::new();
    table.add_row(row!["rounds", total_rounds]);
    table.add_row(row!["operations", benchmark_profiler.sum_operations]);
    table.add_row(row!["total time (s)", format!("{:.3e}", benchmark_profiler.sum_round_time)]);
    table.add_row(row!["time per operation (s)", format!("{:.3e}", benchmark_profiler.average_operation_time())]);
    table.add_row(row!["largest heap", max_node_num]);
    table.add_row(row!["longest right spine", max_right_spine]);
    table.printstd();
}

pub fn execute_in_cli<'a>(iter: impl Iterator<Item = &'a String> + Clone, print_command: bool) {
    if print_command {
        print!("[command]");
        for word in iter.clone() {
            if word.contains(char::is_whitespace) {
                print!("'{word}' ")
            } else {
                print!("{word} ")
            }
        }
        println!();
    }
    Cli::parse_from(iter).run();
}
