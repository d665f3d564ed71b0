use super::{Error, Result, LABEL_COLUMN};
use csv::StringRecord;
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::Read;

/// Reads the whole csv table, header row included.
pub fn read_table<R: Read>(input: R) -> Result<Vec<StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(input);
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Values of the chosen stat grouped by label.
/// Labels iterate in ascending order, the values of each label keep the row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledSeries {
    values: BTreeMap<String, Vec<i64>>,
}

impl LabeledSeries {
    pub fn new() -> LabeledSeries {
        LabeledSeries::default()
    }

    pub fn push(&mut self, label: &str, value: i64) {
        self.values
            .entry(label.to_string())
            .or_insert_with(Vec::new)
            .push(value);
    }

    pub fn labels(&self) -> Vec<&str> {
        self.values.keys().map(|k| k.as_str()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&[i64]> {
        self.values.get(label).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// points of each label, x being the 1-based run number
    pub fn points(&self) -> Vec<(String, Vec<(f64, f64)>)> {
        self.iter()
            .map(|(label, values)| {
                let points = values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| ((i + 1) as f64, v as f64))
                    .collect();
                (label.to_string(), points)
            })
            .collect()
    }
}

/// Index of the header column named `stat`.
pub fn stat_index(header: &StringRecord, stat: &str) -> Result<usize> {
    header
        .iter()
        .position(|name| name == stat)
        .ok_or_else(|| Error::StatNotFound(stat.to_string()))
}

/// Groups the `stat` column of every data row by label.
/// Rows whose label does not match `filter` are skipped.
pub fn aggregate(rows: &[StringRecord], stat: &str, filter: Option<&Regex>) -> Result<LabeledSeries> {
    let (header, data) = rows.split_first().ok_or(Error::EmptyTable)?;
    let column = stat_index(header, stat)?;
    let mut series = LabeledSeries::new();
    for row in data {
        let label = row.get(LABEL_COLUMN).unwrap_or_default();
        if let Some(re) = filter {
            if !re.is_match(label) {
                debug!("skipping label {}", label);
                continue;
            }
        }
        let raw = row.get(column).unwrap_or_default();
        let value = raw.parse::<i64>().map_err(|source| Error::InvalidValue {
            value: raw.to_string(),
            source,
        })?;
        series.push(label, value);
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "label,Throughput(kbps),RTT(us)\nb,10,1\na,20,2\na,30,3\nb,40,4\n";

    fn table(s: &str) -> Vec<StringRecord> {
        read_table(s.as_bytes()).unwrap()
    }

    #[test]
    fn groups_by_label_in_row_order() {
        let series = aggregate(&table(TABLE), "Throughput(kbps)", None).unwrap();
        assert_eq!(series.labels(), vec!["a", "b"]);
        assert_eq!(series.get("a"), Some(&[20, 30][..]));
        assert_eq!(series.get("b"), Some(&[10, 40][..]));
    }

    #[test]
    fn points_are_numbered_from_one() {
        let series = aggregate(&table(TABLE), "Throughput(kbps)", None).unwrap();
        assert_eq!(
            series.points(),
            vec![
                ("a".to_string(), vec![(1., 20.), (2., 30.)]),
                ("b".to_string(), vec![(1., 10.), (2., 40.)]),
            ]
        );
    }

    #[test]
    fn other_columns_can_be_selected() {
        let series = aggregate(&table(TABLE), "RTT(us)", None).unwrap();
        assert_eq!(series.get("b"), Some(&[1, 4][..]));
    }

    #[test]
    fn filter_keeps_matching_labels() {
        let re = Regex::new("^a$").unwrap();
        let series = aggregate(&table(TABLE), "Throughput(kbps)", Some(&re)).unwrap();
        assert_eq!(series.labels(), vec!["a"]);
    }

    #[test]
    fn filter_matching_nothing_is_not_an_error() {
        let re = Regex::new("zzz").unwrap();
        let series = aggregate(&table(TABLE), "Throughput(kbps)", Some(&re)).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn missing_stat_is_fatal() {
        match aggregate(&table(TABLE), "Latency", None) {
            Err(Error::StatNotFound(stat)) => assert_eq!(stat, "Latency"),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn missing_stat_is_reported_before_bad_rows() {
        let rows = table("label,x\na,not-a-number\n");
        assert!(matches!(aggregate(&rows, "y", None), Err(Error::StatNotFound(_))));
    }

    #[test]
    fn duplicate_stat_name_uses_first_column() {
        let rows = table("label,x,x\na,1,2\n");
        assert_eq!(stat_index(&rows[0], "x").unwrap(), 1);
        let series = aggregate(&rows, "x", None).unwrap();
        assert_eq!(series.get("a"), Some(&[1][..]));
    }

    #[test]
    fn empty_table_is_fatal() {
        assert!(matches!(aggregate(&table(""), "x", None), Err(Error::EmptyTable)));
    }

    #[test]
    fn header_only_gives_no_series() {
        let series = aggregate(&table("label,x\n"), "x", None).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn non_integer_value_is_fatal() {
        let rows = table("label,x\na,1.5\n");
        match aggregate(&rows, "x", None) {
            Err(Error::InvalidValue { value, .. }) => assert_eq!(value, "1.5"),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn empty_value_is_fatal() {
        let rows = table("label,x\na,\n");
        assert!(matches!(aggregate(&rows, "x", None), Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn filtered_rows_are_not_parsed() {
        let re = Regex::new("a").unwrap();
        let rows = table("label,x\na,1\nb,oops\n");
        let series = aggregate(&rows, "x", Some(&re)).unwrap();
        assert_eq!(series.get("a"), Some(&[1][..]));
    }

    #[test]
    fn ragged_table_is_a_read_error() {
        assert!(matches!(read_table("a,b\n1\n".as_bytes()), Err(Error::Csv(_))));
    }
}
