use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity key as it appears in input files. Both `"5"` and `5` are accepted
/// and compare equal once turned into a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Text(text) => f.write_str(text),
            RawId::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for RawId {
    fn from(value: &str) -> Self {
        RawId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub percentage: f32,
    #[serde(default)]
    pub label: Option<String>,
}

impl Interval {
    pub fn new(percentage: f32, label: Option<&str>) -> Self {
        Self {
            percentage,
            label: label.map(str::to_string),
        }
    }
}

/// One element of a raw subgraph record. Attribute records carry `id` and
/// `label`; the trailing frequency record carries `intervals`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RawId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervals: Option<Vec<Interval>>,
}

impl RawNode {
    pub fn attribute(id: &str, label: &str) -> Self {
        Self {
            kind: Some("attribute".to_string()),
            id: Some(RawId::from(id)),
            label: Some(label.to_string()),
            intervals: None,
        }
    }

    pub fn frequency(id: &str, intervals: Vec<Interval>) -> Self {
        Self {
            kind: Some("frequency".to_string()),
            id: Some(RawId::from(id)),
            label: None,
            intervals: Some(intervals),
        }
    }
}

pub type RawSubgraph = Vec<RawNode>;

pub fn parse_raw_dataset(input: &str) -> serde_json::Result<Vec<RawSubgraph>> {
    serde_json::from_str(input)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: String,
    pub label: String,
    pub number_of_links: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    pub id: String,
    pub label: String,
    pub intervals: Vec<Interval>,
}

/// A frequency with the attributes it links to. `attributes` holds indices
/// into [`Dataset::attributes`], so equal ids share one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    pub frequency: Frequency,
    pub attributes: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub attributes: Vec<Attribute>,
    pub subgraphs: Vec<Subgraph>,
}

impl Dataset {
    pub fn attributes_of<'a>(&'a self, subgraph: &'a Subgraph) -> impl Iterator<Item = &'a Attribute> {
        subgraph.attributes.iter().map(move |&idx| &self.attributes[idx])
    }

    pub fn is_empty(&self) -> bool {
        self.subgraphs.is_empty()
    }
}
