use env_logger::Env;
use log::info;
use netperf_stats::report_fatal;
use netperf_stats::parse::{convert, parse_cli};
use std::io::{stdin, stdout};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = parse_cli();
    info!(
        "converting stdin to csv with label {:?}, header {}",
        config.name, config.header
    );
    let stdin = stdin();
    let stdout = stdout();
    if let Err(e) = convert(&config, stdin.lock(), stdout.lock()) {
        report_fatal(&e, &mut std::io::stderr());
        std::process::exit(1);
    }
}
