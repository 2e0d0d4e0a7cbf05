use crate::cli::run;

pub mod cli;
mod config;
pub mod domain;
pub mod store;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
