//! Binary entry point for `hetu-release`.

use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = hetu_release::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
