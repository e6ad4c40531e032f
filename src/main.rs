extern crate clap;

use crate::clap::Parser;
use leftist_heap::cli::*;

pub fn main() {
    Cli::parse().run();
}
