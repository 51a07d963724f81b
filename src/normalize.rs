use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Attribute, Dataset, Frequency, RawNode, RawSubgraph, Subgraph};

/// Builds the shared attribute table and the subgraph records from raw input.
///
/// The last element of every raw subgraph is its frequency; everything before
/// it is an attribute. Attributes with equal ids collapse into one record whose
/// `number_of_links` counts every reference.
pub fn normalize(raw: &[RawSubgraph]) -> Result<Dataset> {
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();
    let mut subgraphs = Vec::with_capacity(raw.len());

    for (idx, record) in raw.iter().enumerate() {
        let Some((last, items)) = record.split_last() else {
            return Err(Error::malformed(idx, "subgraph is empty"));
        };
        let frequency = convert_frequency(idx, last)?;

        let mut members = Vec::with_capacity(items.len());
        for item in items {
            let Some(raw_id) = item.id.as_ref() else {
                return Err(Error::malformed(idx, "attribute record has no id"));
            };
            let id = raw_id.key();
            let slot = match by_id.get(&id) {
                Some(&slot) => {
                    attributes[slot].number_of_links += 1;
                    slot
                }
                None => {
                    let slot = attributes.len();
                    attributes.push(Attribute {
                        label: item.label.clone().unwrap_or_else(|| id.clone()),
                        id: id.clone(),
                        number_of_links: 1,
                    });
                    by_id.insert(id, slot);
                    slot
                }
            };
            members.push(slot);
        }

        subgraphs.push(Subgraph {
            frequency,
            attributes: members,
        });
    }

    debug!(
        subgraphs = subgraphs.len(),
        attributes = attributes.len(),
        "normalized dataset"
    );

    Ok(Dataset {
        attributes,
        subgraphs,
    })
}

fn convert_frequency(idx: usize, node: &RawNode) -> Result<Frequency> {
    let Some(intervals) = node.intervals.as_ref() else {
        return Err(Error::malformed(
            idx,
            "last element is not a frequency record (missing `intervals`)",
        ));
    };
    let id = node.id.as_ref().map(|id| id.key());
    let label = node.label.clone().or_else(|| id.clone());
    let Some(label) = label else {
        return Err(Error::malformed(idx, "frequency record has neither id nor label"));
    };
    Ok(Frequency {
        id: id.unwrap_or_else(|| label.clone()),
        label,
        intervals: intervals.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interval, RawNode, parse_raw_dataset};

    fn freq(id: &str, percentage: f32) -> RawNode {
        RawNode::frequency(id, vec![Interval::new(percentage, Some(id))])
    }

    #[test]
    fn shares_attribute_records_between_subgraphs() {
        let raw = vec![
            vec![
                RawNode::attribute("5", "Milk"),
                RawNode::attribute("7", "Bread"),
                freq("f1", 20.0),
            ],
            vec![RawNode::attribute("5", "Milk"), freq("f2", 12.5)],
        ];
        let dataset = normalize(&raw).unwrap();
        assert_eq!(dataset.attributes.len(), 2);
        assert_eq!(dataset.attributes[0].id, "5");
        assert_eq!(dataset.attributes[0].number_of_links, 2);
        assert_eq!(dataset.attributes[1].number_of_links, 1);
        assert_eq!(dataset.subgraphs[0].attributes, vec![0, 1]);
        assert_eq!(dataset.subgraphs[1].attributes, vec![0]);
    }

    #[test]
    fn numeric_and_string_ids_are_the_same_key() {
        let input = r#"[
            [{"id": 5, "label": "Milk"}, {"id": "a", "intervals": [{"percentage": 10}]}],
            [{"id": "5", "label": "Milk"}, {"id": "b", "intervals": [{"percentage": 11}]}]
        ]"#;
        let raw = parse_raw_dataset(input).unwrap();
        let dataset = normalize(&raw).unwrap();
        assert_eq!(dataset.attributes.len(), 1);
        assert_eq!(dataset.attributes[0].number_of_links, 2);
    }

    #[test]
    fn frequency_label_falls_back_to_id() {
        let raw = vec![vec![RawNode::attribute("1", "Eggs"), freq("42", 3.0)]];
        let dataset = normalize(&raw).unwrap();
        assert_eq!(dataset.subgraphs[0].frequency.label, "42");
        assert_eq!(dataset.subgraphs[0].frequency.id, "42");
    }

    #[test]
    fn renormalizing_is_deterministic() {
        let raw = vec![
            vec![RawNode::attribute("1", "A"), RawNode::attribute("2", "B"), freq("x", 1.0)],
            vec![RawNode::attribute("2", "B"), RawNode::attribute("3", "C"), freq("y", 2.0)],
        ];
        assert_eq!(normalize(&raw).unwrap(), normalize(&raw).unwrap());
    }

    #[test]
    fn rejects_empty_subgraph() {
        let raw = vec![vec![freq("x", 1.0)], vec![]];
        assert_eq!(
            normalize(&raw).unwrap_err(),
            Error::MalformedInput {
                subgraph: 1,
                reason: "subgraph is empty".to_string()
            }
        );
    }

    #[test]
    fn rejects_missing_frequency_record() {
        let raw = vec![vec![RawNode::attribute("1", "A"), RawNode::attribute("2", "B")]];
        assert!(matches!(
            normalize(&raw),
            Err(Error::MalformedInput { subgraph: 0, .. })
        ));
    }

    #[test]
    fn frequencies_may_share_a_label() {
        let mut first = freq("f1", 1.0);
        first.label = Some("coffee".to_string());
        let mut second = freq("f2", 2.0);
        second.label = Some("coffee".to_string());
        let raw = vec![
            vec![RawNode::attribute("1", "A"), first],
            vec![RawNode::attribute("2", "B"), second],
        ];
        let dataset = normalize(&raw).unwrap();
        assert_eq!(dataset.subgraphs.len(), 2);
        assert_eq!(dataset.subgraphs[0].frequency.label, "coffee");
        assert_eq!(dataset.subgraphs[1].frequency.id, "f2");
    }
}
