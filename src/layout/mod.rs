mod grouping;
mod placement;
pub(crate) mod types;
pub use grouping::{
    Comparison, LayoutPlan, SubgraphGroup, compare_all_subgraphs, count_equal_attributes,
    group_subgraphs, partition_attributes, plan_layout,
};
pub use placement::Columns;
pub use types::*;

use placement::{centered_stack_top, max_radius};

use crate::config::{LayoutConfig, RenderConfig};
use crate::error::{Error, Result};
use crate::model::{Attribute, Dataset};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Lays out `dataset` on a `width` x `height` canvas with the default
/// geometry. `normalize` maps a support percentage to a circle radius.
pub fn layout<F>(dataset: &Dataset, width: f32, height: f32, normalize: F) -> Result<LayoutResult>
where
    F: Fn(f32) -> f32,
{
    layout_with_config(dataset, width, height, &LayoutConfig::default(), normalize)
}

/// Lays out `dataset` using the canvas size from `render` and the geometry and
/// radius curve from `config`.
pub fn compute_layout(
    dataset: &Dataset,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> Result<LayoutResult> {
    let curve = config.radius;
    layout_with_config(dataset, render.width, render.height, config, |p| {
        curve.radius(p)
    })
}

pub fn layout_with_config<F>(
    dataset: &Dataset,
    width: f32,
    height: f32,
    config: &LayoutConfig,
    normalize: F,
) -> Result<LayoutResult>
where
    F: Fn(f32) -> f32,
{
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }
    if let Some(subgraph) = dataset
        .subgraphs
        .iter()
        .find(|subgraph| subgraph.frequency.intervals.is_empty())
    {
        return Err(Error::InconsistentIntervals {
            frequency: subgraph.frequency.id.clone(),
        });
    }

    let plan = plan_layout(dataset);
    let radius = max_radius(dataset, &plan.frequencies, &normalize);
    let columns = Columns::new(width, radius, config);
    debug!(radius, ?columns, "computed column geometry");

    let mut nodes: Vec<Node> = Vec::with_capacity(dataset.attributes.len() + plan.frequencies.len());
    let mut attribute_nodes: HashMap<usize, usize> = HashMap::new();
    let mut frequency_nodes: Vec<(usize, usize)> = Vec::with_capacity(plan.frequencies.len());

    let mut y = 0.0_f32;
    let mut in_band = 0;
    for (idx, (&subgraph_idx, singles)) in plan
        .frequencies
        .iter()
        .zip(&plan.single_linked)
        .enumerate()
    {
        let (frequency_x, attribute_x) = columns.side(idx);
        if in_band == 2 {
            in_band = 0;
            y += 2.0 * radius + config.frequency_padding;
        }
        in_band += 1;

        let mut attr_y = centered_stack_top(y, singles.len(), config);
        for &attr in singles {
            attribute_nodes.insert(attr, nodes.len());
            nodes.push(attribute_node(&dataset.attributes[attr], attribute_x, attr_y));
            attr_y += config.attribute_step();
        }

        let frequency = &dataset.subgraphs[subgraph_idx].frequency;
        frequency_nodes.push((subgraph_idx, nodes.len()));
        nodes.push(Node::Frequency(FrequencyNode {
            id: frequency.id.clone(),
            label: frequency.label.clone(),
            intervals: frequency.intervals.clone(),
            x: frequency_x,
            y,
        }));
    }

    let mut shared_y = 0.0_f32;
    for &attr in &plan.multi_linked {
        attribute_nodes.insert(attr, nodes.len());
        nodes.push(attribute_node(&dataset.attributes[attr], columns.column3, shared_y));
        shared_y += config.attribute_step();
    }

    let last_y = lowest_edge(&nodes, radius, config);
    let translation = (height - last_y) / 2.0;
    for node in &mut nodes {
        node.translate_y(translation);
    }
    debug!(last_y, translation, "centered hypergraph vertically");

    let mut links = Vec::new();
    for &(subgraph_idx, source) in &frequency_nodes {
        for attr in &dataset.subgraphs[subgraph_idx].attributes {
            match attribute_nodes.get(attr) {
                Some(&target) => links.push(Link { source, target }),
                None => warn!(
                    attribute = %dataset.attributes[*attr].id,
                    "attribute was not placed; skipping link"
                ),
            }
        }
    }

    let steps = dataset
        .subgraphs
        .iter()
        .map(|subgraph| subgraph.frequency.intervals.len())
        .max()
        .unwrap_or(0);

    Ok(LayoutResult {
        width,
        height,
        radius,
        steps,
        nodes,
        links,
    })
}

fn attribute_node(attribute: &Attribute, x: f32, y: f32) -> Node {
    Node::Attribute(AttributeNode {
        id: attribute.id.clone(),
        label: attribute.label.clone(),
        number_of_links: attribute.number_of_links,
        x,
        y,
    })
}

/// Lowest occupied y: attribute bottoms and frequency circle bottoms.
fn lowest_edge(nodes: &[Node], radius: f32, config: &LayoutConfig) -> f32 {
    nodes
        .iter()
        .map(|node| match node {
            Node::Frequency(frequency) => frequency.y + radius,
            Node::Attribute(attribute) => attribute.y + config.attribute_height,
        })
        .fold(f32::NEG_INFINITY, f32::max)
}
