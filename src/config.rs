use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maps a support percentage to a frequency circle radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RadiusCurve {
    Linear { factor: f32 },
    Power { exponent: f32, scale: f32 },
}

impl RadiusCurve {
    pub fn radius(&self, percentage: f32) -> f32 {
        match *self {
            RadiusCurve::Linear { factor } => percentage * factor,
            RadiusCurve::Power { exponent, scale } => percentage.powf(exponent) * scale,
        }
    }
}

impl Default for RadiusCurve {
    fn default() -> Self {
        RadiusCurve::Linear { factor: 2.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub attribute_width: f32,
    pub attribute_height: f32,
    pub attribute_padding: f32,
    pub frequency_padding: f32,
    pub radius: RadiusCurve,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            attribute_width: 120.0,
            attribute_height: 45.0,
            attribute_padding: 15.0,
            frequency_padding: 50.0,
            radius: RadiusCurve::default(),
        }
    }
}

impl LayoutConfig {
    /// Height of `count` attributes stacked with padding between them.
    pub fn stack_height(&self, count: usize) -> f32 {
        let count = count as f32;
        count * self.attribute_height + (count - 1.0) * self.attribute_padding
    }

    pub fn attribute_step(&self) -> f32 {
        self.attribute_height + self.attribute_padding
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    pub threshold: f32,
    pub velocity_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            threshold: 5.0,
            velocity_ms: 2500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub playback: PlaybackConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
            playback: PlaybackConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
    playback: Option<PlaybackConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    frequency_color: Option<String>,
    attribute_color: Option<String>,
    text_color: Option<String>,
    attribute_text_color: Option<String>,
    line_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    attribute_width: Option<f32>,
    attribute_height: Option<f32>,
    attribute_padding: Option<f32>,
    frequency_padding: Option<f32>,
    radius: Option<RadiusCurve>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PlaybackConfigFile {
    threshold: Option<NumberOrString>,
    velocity_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON (or JSON5) config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "dark" {
            config.theme = Theme::dark();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.frequency_color {
            config.theme.frequency_color = v;
        }
        if let Some(v) = vars.attribute_color {
            config.theme.attribute_color = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.attribute_text_color {
            config.theme.attribute_text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v.clone();
            config.render.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.attribute_width {
            config.layout.attribute_width = v;
        }
        if let Some(v) = layout.attribute_height {
            config.layout.attribute_height = v;
        }
        if let Some(v) = layout.attribute_padding {
            config.layout.attribute_padding = v;
        }
        if let Some(v) = layout.frequency_padding {
            config.layout.frequency_padding = v;
        }
        if let Some(v) = layout.radius {
            config.layout.radius = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    if let Some(playback) = parsed.playback {
        if let Some(v) = playback.threshold.as_ref().and_then(NumberOrString::as_f32) {
            config.playback.threshold = v;
        }
        if let Some(v) = playback.velocity_ms {
            config.playback.velocity_ms = v;
        }
    }

    Ok(config)
}
