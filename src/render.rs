use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{LayoutResult, Node};
use crate::playback::Visibility;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Draws a static snapshot of `layout` at animation `step`. Nodes hidden in
/// `visibility` are kept in the document with zero opacity so a browser can
/// fade them back in.
pub fn render_svg(
    layout: &LayoutResult,
    visibility: &Visibility,
    step: usize,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    let mut svg = String::new();
    let width = layout.width.max(200.0);
    let height = layout.height.max(200.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    // No z-index in SVG: links go first so nodes paint over them.
    svg.push_str("<g class=\"links\">");
    for (idx, link) in layout.links.iter().enumerate() {
        let (x1, y1) = node_center(&layout.nodes[link.source], config);
        let (x2, y2) = node_center(&layout.nodes[link.target], config);
        svg.push_str(&format!(
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"1\" opacity=\"{}\"/>",
            theme.line_color,
            opacity(visibility.is_link_visible(layout, idx)),
        ));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for (idx, node) in layout.nodes.iter().enumerate() {
        let alpha = opacity(visibility.is_visible(idx));
        match node {
            Node::Frequency(frequency) => {
                let percentage = frequency
                    .percentage_at(step)
                    .or_else(|| frequency.percentage_at(0))
                    .unwrap_or(0.0);
                let radius = config.radius.radius(percentage).max(0.0);
                svg.push_str(&format!(
                    "<g class=\"frequency\" opacity=\"{alpha}\"><circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius:.2}\" fill=\"{}\"/>",
                    frequency.x, frequency.y, theme.frequency_color
                ));
                svg.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{percentage:.2}%</text>",
                    frequency.x - 15.0,
                    frequency.y - 10.0,
                    escape_xml(&theme.font_family),
                    theme.font_size,
                    theme.text_color,
                ));
                svg.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">({})</text></g>",
                    frequency.x - 25.0,
                    frequency.y + 10.0,
                    escape_xml(&theme.font_family),
                    theme.font_size,
                    theme.text_color,
                    escape_xml(&frequency.label),
                ));
            }
            Node::Attribute(attribute) => {
                svg.push_str(&format!(
                    "<g class=\"attribute\" opacity=\"{alpha}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
                    attribute.x,
                    attribute.y,
                    config.attribute_width,
                    config.attribute_height,
                    theme.attribute_color,
                ));
                svg.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text></g>",
                    attribute.x + 5.0,
                    attribute.y + 28.0,
                    escape_xml(&theme.font_family),
                    theme.font_size,
                    theme.attribute_text_color,
                    escape_xml(&attribute.label),
                ));
            }
        }
    }
    svg.push_str("</g>");
    svg.push_str("</svg>");
    svg
}

fn node_center(node: &Node, config: &LayoutConfig) -> (f32, f32) {
    match node {
        Node::Frequency(frequency) => (frequency.x, frequency.y),
        Node::Attribute(attribute) => (
            attribute.x + config.attribute_width / 2.0,
            attribute.y + config.attribute_height / 2.0,
        ),
    }
}

fn opacity(visible: bool) -> &'static str {
    if visible { "1" } else { "0" }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use crate::model::{Interval, RawNode};
    use crate::normalize::normalize;

    fn sample() -> LayoutResult {
        let raw = vec![
            vec![
                RawNode::attribute("1", "Milk & Honey"),
                RawNode::frequency(
                    "a",
                    vec![Interval::new(12.5, None), Interval::new(1.0, None)],
                ),
            ],
            vec![
                RawNode::attribute("2", "Bread"),
                RawNode::frequency("b", vec![Interval::new(30.0, None)]),
            ],
        ];
        layout(&normalize(&raw).unwrap(), 1200.0, 800.0, |p| p * 2.0).unwrap()
    }

    #[test]
    fn render_svg_basic() {
        let layout = sample();
        let visibility = Visibility::new(&layout);
        let svg = render_svg(&layout, &visibility, 0, &Theme::classic(), &LayoutConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Milk &amp; Honey"));
        assert!(svg.contains("12.50%"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<line").count(), 2);
        assert!(!svg.contains("opacity=\"0\""));
    }

    #[test]
    fn hidden_nodes_render_transparent() {
        let layout = sample();
        let visibility = Visibility::at_step(&layout, 1, 5.0);
        let svg = render_svg(&layout, &visibility, 1, &Theme::classic(), &LayoutConfig::default());
        // frequency "a", its attribute and its link fade out
        assert_eq!(svg.matches("opacity=\"0\"").count(), 3);
        assert!(svg.contains("1.00%"));
        // "b" has no data at step 1 and falls back to its first interval
        assert!(svg.contains("30.00%"));
    }
}
