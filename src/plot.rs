use super::aggregate::{aggregate, read_table};
use super::chart::{Chart, ChartRenderer};
use super::{Result, DEFAULT_STAT, VERSION};
use clap::{App, Arg};
use log::info;
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

/// Settings of a statsplot run.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// csv table to read, stdin when None
    pub input: Option<PathBuf>,
    /// chart file to write, nothing is rendered when None
    pub output: Option<PathBuf>,
    pub stat: String,
    pub filter: Option<Regex>,
}

impl PlotConfig {
    /// Builds the config, compiling the label filter; empty strings mean "not set".
    pub fn new(input: &str, output: &str, stat: &str, filter: &str) -> Result<PlotConfig> {
        let filter = if filter.is_empty() {
            None
        } else {
            Some(Regex::new(filter)?)
        };
        Ok(PlotConfig {
            input: non_empty_path(input),
            output: non_empty_path(output),
            stat: stat.to_string(),
            filter,
        })
    }

    /// the configured input file or stdin
    pub fn open_input(&self) -> Result<Box<dyn Read>> {
        match &self.input {
            Some(p) => Ok(Box::new(BufReader::new(File::open(p)?))),
            None => Ok(Box::new(std::io::stdin())),
        }
    }
}

fn non_empty_path(p: &str) -> Option<PathBuf> {
    if p.is_empty() {
        None
    } else {
        Some(PathBuf::from(p))
    }
}

/// Takes the CLI arguments that control the plotting of the statistics.
pub fn parse_cli() -> Result<PlotConfig> {
    let arg_input = Arg::with_name("input")
        .help("input csv file, defaults to stdin if unspecified")
        .short("i")
        .long("input")
        .takes_value(true);
    let arg_output = Arg::with_name("output")
        .help("output chart file, svg or png according to the extension")
        .short("o")
        .long("output")
        .takes_value(true);
    let arg_stat = Arg::with_name("stat")
        .help("stat to plot, as named in the csv header")
        .short("s")
        .long("stat")
        .takes_value(true)
        .default_value(DEFAULT_STAT);
    let arg_filter = Arg::with_name("filter")
        .help("regular expression to filter labels by")
        .short("f")
        .long("filter")
        .takes_value(true);
    let cli_args = App::new("statsplot")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot one secnetperf statistic per label as a line chart")
        .arg(arg_input)
        .arg(arg_output)
        .arg(arg_stat)
        .arg(arg_filter)
        .get_matches();
    PlotConfig::new(
        cli_args.value_of("input").unwrap_or_default(),
        cli_args.value_of("output").unwrap_or_default(),
        cli_args.value_of("stat").unwrap_or(DEFAULT_STAT),
        cli_args.value_of("filter").unwrap_or_default(),
    )
}

/// Reads the table, groups the stat by label and hands the chart to the renderer.
pub fn run<R: Read, C: ChartRenderer>(config: &PlotConfig, input: R, renderer: &mut C) -> Result<Chart> {
    let rows = read_table(input)?;
    let series = aggregate(&rows, &config.stat, config.filter.as_ref())?;
    info!(
        "read {} row(s), plotting {} label(s) of {}",
        rows.len().saturating_sub(1),
        series.len(),
        config.stat
    );
    let chart = Chart::new(&config.stat, &series);
    renderer.render(&chart)?;
    Ok(chart)
}
