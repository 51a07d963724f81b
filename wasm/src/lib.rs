use hypergraph_layout::layout_dump::layout_to_json;
use hypergraph_layout::{
    LayoutConfig, RadiusCurve, RenderConfig, compute_layout, normalize, parse_raw_dataset,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HypergraphLayoutOptions {
    width: Option<f32>,
    height: Option<f32>,
    attribute_width: Option<f32>,
    attribute_height: Option<f32>,
    radius: Option<RadiusCurve>,
}

fn build_configs(options: HypergraphLayoutOptions) -> (LayoutConfig, RenderConfig) {
    let mut layout = LayoutConfig::default();
    let mut render = RenderConfig::default();
    if let Some(width) = options.width {
        render.width = width;
    }
    if let Some(height) = options.height {
        render.height = height;
    }
    if let Some(attribute_width) = options.attribute_width {
        layout.attribute_width = attribute_width;
    }
    if let Some(attribute_height) = options.attribute_height {
        layout.attribute_height = attribute_height;
    }
    if let Some(radius) = options.radius {
        layout.radius = radius;
    }
    (layout, render)
}

fn layout_dataset(data: &str, options: HypergraphLayoutOptions) -> Result<String, String> {
    let raw = parse_raw_dataset(data).map_err(|error| error.to_string())?;
    let dataset = normalize(&raw).map_err(|error| error.to_string())?;
    let (layout, render) = build_configs(options);
    let result = compute_layout(&dataset, &layout, &render).map_err(|error| error.to_string())?;
    layout_to_json(&result).map_err(|error| error.to_string())
}

/// Lays out a raw dataset and returns the nodes and links as JSON.
#[wasm_bindgen]
pub fn layout_json(data: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<HypergraphLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        HypergraphLayoutOptions::default()
    };
    layout_dataset(data, options).map_err(|error| JsValue::from_str(&error))
}
