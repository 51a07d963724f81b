//! Converts frequent-itemset mining output into the raw JSON dataset.
//!
//! Every input file holds one time interval. Each line is one itemset:
//! `id,"label" id,"label" ... (percentage,frequencyId)`.

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Interval, RawNode, RawSubgraph};

static FREQUENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*([^,()\s]+)\s*,\s*([^()\s]+)\s*\)\s*$").unwrap());
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"([^\s,"]+),"([^"]*)""#).unwrap());

/// Parses one itemset line. `line_no` is only used for error reporting.
pub fn parse_itemset_line(line: &str, line_no: usize) -> Result<RawSubgraph> {
    let line = line.trim();
    let Some(frequency) = FREQUENCY_RE.captures(line) else {
        return Err(Error::Ingest {
            line: line_no,
            reason: "missing trailing `(percentage,frequencyId)`".to_string(),
        });
    };
    let Some(whole) = frequency.get(0) else {
        return Err(Error::Ingest {
            line: line_no,
            reason: "missing trailing `(percentage,frequencyId)`".to_string(),
        });
    };
    let percentage: f32 = frequency[1].parse().map_err(|_| Error::Ingest {
        line: line_no,
        reason: format!("`{}` is not a percentage", &frequency[1]),
    })?;
    let percentage = (percentage * 100.0).round() / 100.0;
    let frequency_id = &frequency[2];

    let items = &line[..whole.start()];
    let mut itemset = Vec::new();
    let mut consumed = 0;
    for caps in ATTRIBUTE_RE.captures_iter(items) {
        let Some(token) = caps.get(0) else { continue };
        if !items[consumed..token.start()].trim().is_empty() {
            return Err(unexpected(line_no, &items[consumed..token.start()]));
        }
        consumed = token.end();
        itemset.push(RawNode::attribute(&caps[1], &caps[2]));
    }
    if !items[consumed..].trim().is_empty() {
        return Err(unexpected(line_no, &items[consumed..]));
    }
    if itemset.is_empty() {
        return Err(Error::Ingest {
            line: line_no,
            reason: "itemset has no attributes".to_string(),
        });
    }

    itemset.push(RawNode::frequency(
        frequency_id,
        vec![Interval::new(percentage, Some(frequency_id))],
    ));
    Ok(itemset)
}

fn unexpected(line_no: usize, text: &str) -> Error {
    Error::Ingest {
        line: line_no,
        reason: format!("unexpected text `{}`", text.trim()),
    }
}

fn attribute_ids(itemset: &RawSubgraph) -> HashSet<String> {
    itemset
        .iter()
        .filter(|node| node.intervals.is_none())
        .filter_map(|node| node.id.as_ref().map(|id| id.key()))
        .collect()
}

fn padding_interval() -> Interval {
    Interval {
        percentage: 0.0,
        label: None,
    }
}

/// Accumulates intervals into one dataset, matching itemsets across intervals
/// by their attribute id set.
#[derive(Debug, Default)]
pub struct Converter {
    itemsets: Vec<RawSubgraph>,
    keys: Vec<HashSet<String>>,
    intervals: usize,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intervals(&self) -> usize {
        self.intervals
    }

    /// Adds the next interval. Itemsets first seen after interval 0 and itemsets
    /// missing from earlier intervals are padded with zero-percentage entries, so
    /// interval `i` always sits at index `i`. A bad line rejects the whole
    /// interval and leaves the converter unchanged.
    pub fn push_interval<'a, I>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let step = self.intervals;
        let parsed = lines
            .into_iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| parse_itemset_line(line, idx + 1).map(|itemset| (idx, itemset)))
            .collect::<Result<Vec<_>>>()?;

        for (idx, itemset) in parsed {
            let key = attribute_ids(&itemset);
            let Some(interval) = itemset
                .last()
                .and_then(|node| node.intervals.as_ref())
                .and_then(|intervals| intervals.first())
                .cloned()
            else {
                continue;
            };

            match self.keys.iter().position(|existing| *existing == key) {
                Some(pos) => {
                    let Some(intervals) = self.itemsets[pos]
                        .last_mut()
                        .and_then(|node| node.intervals.as_mut())
                    else {
                        continue;
                    };
                    if intervals.len() > step {
                        warn!(line = idx + 1, step, "itemset listed twice in one interval; keeping the first");
                        continue;
                    }
                    intervals.resize_with(step, padding_interval);
                    intervals.push(interval);
                }
                None => {
                    let mut itemset = itemset;
                    if step > 0 {
                        info!(line = idx + 1, step, "new itemset found after the first interval");
                        if let Some(intervals) =
                            itemset.last_mut().and_then(|node| node.intervals.as_mut())
                        {
                            let mut padded: Vec<Interval> =
                                std::iter::repeat_with(padding_interval).take(step).collect();
                            padded.append(intervals);
                            *intervals = padded;
                        }
                    }
                    self.keys.push(key);
                    self.itemsets.push(itemset);
                }
            }
        }
        self.intervals += 1;
        debug!(step, itemsets = self.itemsets.len(), "ingested interval");
        Ok(())
    }

    pub fn finish(self) -> Vec<RawSubgraph> {
        self.itemsets
    }
}

/// Reads every file of `dir` in file-name order, one interval per file.
pub fn convert_dir(dir: &Path) -> anyhow::Result<Vec<RawSubgraph>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("cannot read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut converter = Converter::new();
    for file in &files {
        let contents = std::fs::read_to_string(file)
            .with_context(|| format!("cannot read {}", file.display()))?;
        converter
            .push_interval(contents.lines())
            .with_context(|| format!("in {}", file.display()))?;
    }
    info!(
        intervals = converter.intervals(),
        files = files.len(),
        "converted itemset files"
    );
    Ok(converter.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawId;

    #[test]
    fn parses_attributes_and_frequency() {
        let itemset = parse_itemset_line(r#"5,"Milk" 7,"Whole Bread" (12.345,f9)"#, 1).unwrap();
        assert_eq!(itemset.len(), 3);
        assert_eq!(itemset[0].id, Some(RawId::from("5")));
        assert_eq!(itemset[0].label.as_deref(), Some("Milk"));
        assert_eq!(itemset[1].label.as_deref(), Some("Whole Bread"));
        let frequency = &itemset[2];
        assert_eq!(frequency.id, Some(RawId::from("f9")));
        let intervals = frequency.intervals.as_ref().unwrap();
        assert_eq!(intervals[0].percentage, 12.35);
        assert_eq!(intervals[0].label.as_deref(), Some("f9"));
    }

    #[test]
    fn rejects_lines_without_frequency() {
        assert!(matches!(
            parse_itemset_line(r#"5,"Milk""#, 3),
            Err(Error::Ingest { line: 3, .. })
        ));
        assert!(matches!(
            parse_itemset_line(r#"5,"Milk" garbage (1.0,f)"#, 4),
            Err(Error::Ingest { line: 4, .. })
        ));
    }

    #[test]
    fn merges_intervals_by_attribute_set() {
        let mut converter = Converter::new();
        converter
            .push_interval([r#"1,"A" 2,"B" (10,x)"#, r#"3,"C" (4,y)"#])
            .unwrap();
        converter
            .push_interval([r#"2,"B" 1,"A" (20,x)"#, "", r#"4,"D" (7,z)"#])
            .unwrap();
        converter.push_interval([r#"3,"C" (5,y)"#]).unwrap();
        let data = converter.finish();
        assert_eq!(data.len(), 3);

        let percentages = |itemset: &RawSubgraph| -> Vec<f32> {
            itemset
                .last()
                .and_then(|node| node.intervals.as_ref())
                .unwrap()
                .iter()
                .map(|interval| interval.percentage)
                .collect()
        };
        assert_eq!(percentages(&data[0]), vec![10.0, 20.0]);
        // "y" was missing in interval 1
        assert_eq!(percentages(&data[1]), vec![4.0, 0.0, 5.0]);
        // "z" first appeared in interval 1
        assert_eq!(percentages(&data[2]), vec![0.0, 7.0]);
        let padded = data[2].last().unwrap().intervals.as_ref().unwrap();
        assert_eq!(padded[0].label, None);
    }

    #[test]
    fn bad_line_leaves_interval_untouched() {
        let mut converter = Converter::new();
        converter.push_interval([r#"1,"A" (10,x)"#]).unwrap();
        let err = converter
            .push_interval([r#"1,"A" (30,x)"#, r#"2,"B" (5,y)"#, "not an itemset"])
            .unwrap_err();
        assert!(matches!(err, Error::Ingest { line: 3, .. }));
        assert_eq!(converter.intervals(), 1);

        converter
            .push_interval([r#"1,"A" (20,x)"#, r#"2,"B" (5,y)"#])
            .unwrap();
        let data = converter.finish();
        assert_eq!(data.len(), 2);
        let x: Vec<f32> = data[0]
            .last()
            .and_then(|node| node.intervals.as_ref())
            .unwrap()
            .iter()
            .map(|interval| interval.percentage)
            .collect();
        assert_eq!(x, vec![10.0, 20.0]);
    }
}
