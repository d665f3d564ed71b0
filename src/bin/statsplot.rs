use env_logger::Env;
use log::info;
use netperf_stats::chart::PlottersRenderer;
use netperf_stats::plot::{parse_cli, run};
use netperf_stats::{report_fatal, Result};

fn plot() -> Result<()> {
    let config = parse_cli()?;
    info!(
        "read data from {} and plot {} to {}",
        config
            .input
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| String::from("stdin")),
        config.stat,
        config
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| String::from("nothing")),
    );
    let input = config.open_input()?;
    let mut renderer = PlottersRenderer::new(config.output.clone());
    run(&config, input, &mut renderer)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = plot() {
        report_fatal(&e, &mut std::io::stderr());
        std::process::exit(1);
    }
}
