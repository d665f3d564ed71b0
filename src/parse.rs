use super::{Error, Result, COLUMNS, FIRST_STAT_COLUMN, LABEL_COLUMN, THROUGHPUT_COLUMN, VERSION};
use clap::{App, Arg};
use log::{debug, info};
use std::io::{BufRead, Write};

const CONN_PREFIX: &str = "[conn] ";
const RESULT_PREFIX: &str = "Result: ";
const RESULT_MIN_WORDS: usize = 8;
const RESULT_VALUE_WORD: usize = 4;
const RESULT_UNIT_WORD: usize = 5;
const RESULT_UNIT: &str = "kbps";

/// Settings of a statsparse run.
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    /// written into the label column of every row
    pub name: String,
    /// write the column names before any row
    pub header: bool,
}

/// Takes the CLI arguments that control the log conversion.
pub fn parse_cli() -> ParseConfig {
    let arg_name = Arg::with_name("name")
        .help("test name, written as the label of every row")
        .short("n")
        .long("name")
        .takes_value(true);
    let arg_header = Arg::with_name("header")
        .help("output header record")
        .long("header")
        .takes_value(false)
        .required(false);
    let cli_args = App::new("statsparse")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to convert secnetperf connection statistics from stdin to csv on stdout")
        .arg(arg_name)
        .arg(arg_header)
        .get_matches();
    ParseConfig {
        name: String::from(cli_args.value_of("name").unwrap_or_default()),
        header: cli_args.is_present("header"),
    }
}

/// The row being assembled from a `[conn]` line and its `Result:` line.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRecord {
    fields: Vec<String>,
    next_stat: usize,
}

impl ConnectionRecord {
    pub fn new() -> ConnectionRecord {
        ConnectionRecord {
            fields: vec![String::new(); COLUMNS.len()],
            next_stat: FIRST_STAT_COLUMN,
        }
    }

    /// true when no field holds any data
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|f| f.is_empty())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn set_label(&mut self, label: &str) {
        self.set(LABEL_COLUMN, label);
    }

    pub fn set_throughput(&mut self, throughput: &str) {
        self.set(THROUGHPUT_COLUMN, throughput);
    }

    /// Stores the value in the next free statistics column.
    /// Returns false, leaving the record untouched, once all of them are taken.
    pub fn push_stat(&mut self, value: &str) -> bool {
        if self.next_stat == COLUMNS.len() {
            return false;
        }
        self.set(self.next_stat, value);
        self.next_stat += 1;
        true
    }

    pub fn reset(&mut self) {
        for f in self.fields.iter_mut() {
            f.clear();
        }
        self.next_stat = FIRST_STAT_COLUMN;
    }

    fn set(&mut self, column: usize, value: &str) {
        let field = &mut self.fields[column];
        field.clear();
        field.push_str(value);
    }
}

impl Default for ConnectionRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of a `key=value` word, None for words without exactly one `=`.
fn stat_value(word: &str) -> Option<&str> {
    let mut split = word.split('=');
    match (split.next(), split.next(), split.next()) {
        (Some(_), Some(value), None) => Some(value),
        _ => None,
    }
}

/// Streams log lines into csv rows, one row per connection.
pub struct StatsParser<W: Write> {
    name: String,
    writer: csv::Writer<W>,
    record: ConnectionRecord,
    rows: usize,
}

impl<W: Write> StatsParser<W> {
    /// Wraps the output sink, writing the header right away if requested.
    pub fn new(config: &ParseConfig, out: W) -> Result<StatsParser<W>> {
        let mut writer = csv::Writer::from_writer(out);
        if config.header {
            writer.write_record(&COLUMNS)?;
            writer.flush()?;
        }
        Ok(StatsParser {
            name: config.name.clone(),
            writer,
            record: ConnectionRecord::new(),
            rows: 0,
        })
    }

    /// number of data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        if let Some(rest) = line.strip_prefix(CONN_PREFIX) {
            self.conn_line(line, rest)
        } else if let Some(rest) = line.strip_prefix(RESULT_PREFIX) {
            self.result_line(line, rest)
        } else {
            Ok(())
        }
    }

    /// Writes out the pending record, if any, and hands back the sink.
    pub fn finish(mut self) -> Result<W> {
        if !self.record.is_empty() {
            self.flush_record()?;
        }
        info!("wrote {} row(s)", self.rows);
        self.writer.into_inner().map_err(|e| Error::Io(e.into_error()))
    }

    fn conn_line(&mut self, line: &str, rest: &str) -> Result<()> {
        if !self.record.is_empty() {
            debug!("[conn] line without Result line, flushing the previous connection");
            self.flush_record()?;
        }
        self.record.set_label(&self.name);
        for value in rest.split_whitespace().filter_map(stat_value) {
            if !self.record.push_stat(value) {
                return Err(Error::TooManyFields(line.to_string()));
            }
        }
        Ok(())
    }

    fn result_line(&mut self, line: &str, rest: &str) -> Result<()> {
        let words: Vec<&str> = rest.split_whitespace().collect();
        if words.len() < RESULT_MIN_WORDS || words[RESULT_UNIT_WORD] != RESULT_UNIT {
            return Err(Error::MalformedResult(line.to_string()));
        }
        self.record.set_label(&self.name);
        self.record.set_throughput(words[RESULT_VALUE_WORD]);
        self.flush_record()
    }

    fn flush_record(&mut self) -> Result<()> {
        debug!("row: {:?}", self.record.fields());
        self.writer.write_record(self.record.fields())?;
        self.writer.flush()?;
        self.record.reset();
        self.rows += 1;
        Ok(())
    }
}

/// Converts the whole log read from `input` and returns the output sink.
pub fn convert<R: BufRead, W: Write>(config: &ParseConfig, input: R, out: W) -> Result<W> {
    let mut parser = StatsParser::new(config, out)?;
    for line in input.lines() {
        parser.feed_line(&line?)?;
    }
    parser.finish()
}
