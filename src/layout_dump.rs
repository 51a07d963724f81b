use crate::layout::{LayoutResult, Node};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Flat, renderer-friendly snapshot: links carry node ids next to the node
/// indices so the file can be read without resolving indices.
///
/// Ids are unique per node `type` only. A frequency and an attribute may both
/// be `"5"`, so key nodes by `(type, id)` or by index, never by `id` alone.
#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub steps: usize,
    pub nodes: &'a [Node],
    pub links: Vec<LinkDump<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDump<'a> {
    pub source: usize,
    pub target: usize,
    pub source_id: &'a str,
    pub target_id: &'a str,
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a LayoutResult) -> Self {
        let links = layout
            .links
            .iter()
            .map(|link| LinkDump {
                source: link.source,
                target: link.target,
                source_id: layout.nodes[link.source].id(),
                target_id: layout.nodes[link.target].id(),
            })
            .collect();
        LayoutDump {
            width: layout.width,
            height: layout.height,
            radius: layout.radius,
            steps: layout.steps,
            nodes: &layout.nodes,
            links,
        }
    }
}

pub fn layout_to_json(layout: &LayoutResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&LayoutDump::from_layout(layout))
}

pub fn write_layout_dump(path: &Path, layout: &LayoutResult) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
