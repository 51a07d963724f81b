use serde::{Deserialize, Serialize};

use crate::model::Interval;

/// A frequency circle. `x`/`y` is the circle center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyNode {
    pub id: String,
    pub label: String,
    pub intervals: Vec<Interval>,
    pub x: f32,
    pub y: f32,
}

impl FrequencyNode {
    pub fn percentage_at(&self, step: usize) -> Option<f32> {
        self.intervals.get(step).map(|interval| interval.percentage)
    }
}

/// An attribute rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeNode {
    pub id: String,
    pub label: String,
    pub number_of_links: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Frequency,
    Attribute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Frequency(FrequencyNode),
    Attribute(AttributeNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Frequency(_) => NodeKind::Frequency,
            Node::Attribute(_) => NodeKind::Attribute,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Node::Frequency(node) => &node.id,
            Node::Attribute(node) => &node.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Node::Frequency(node) => &node.label,
            Node::Attribute(node) => &node.label,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        match self {
            Node::Frequency(node) => (node.x, node.y),
            Node::Attribute(node) => (node.x, node.y),
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        match self {
            Node::Frequency(node) => {
                node.x = x;
                node.y = y;
            }
            Node::Attribute(node) => {
                node.x = x;
                node.y = y;
            }
        }
    }

    pub(crate) fn translate_y(&mut self, dy: f32) {
        let (x, y) = self.position();
        self.set_position(x, y + dy);
    }

    pub fn as_frequency(&self) -> Option<&FrequencyNode> {
        match self {
            Node::Frequency(node) => Some(node),
            Node::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&AttributeNode> {
        match self {
            Node::Attribute(node) => Some(node),
            Node::Frequency(_) => None,
        }
    }
}

/// Edge from a frequency node to one of its attributes, as indices into
/// [`LayoutResult::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub width: f32,
    pub height: f32,
    /// Largest frequency radius over every interval.
    pub radius: f32,
    /// Longest interval sequence; valid step indices are `0..steps`.
    pub steps: usize,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl LayoutResult {
    pub fn frequencies(&self) -> impl Iterator<Item = (usize, &FrequencyNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| node.as_frequency().map(|f| (idx, f)))
    }

    pub fn attributes(&self) -> impl Iterator<Item = (usize, &AttributeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| node.as_attribute().map(|a| (idx, a)))
    }

    pub fn find(&self, kind: NodeKind, id: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.kind() == kind && node.id() == id)
    }

    pub fn links_from(&self, source: usize) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |link| link.source == source)
    }

    pub fn in_degree(&self, target: usize) -> usize {
        self.links.iter().filter(|link| link.target == target).count()
    }
}
