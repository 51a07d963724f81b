#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod normalize;
pub mod playback;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, PlaybackConfig, RadiusCurve, RenderConfig, load_config};
pub use error::{Error, Result};
pub use layout::{LayoutResult, Link, Node, NodeKind, compute_layout, layout};
pub use model::{Dataset, RawSubgraph, parse_raw_dataset};
pub use normalize::normalize;
pub use playback::{Playback, Visibility};
pub use render::render_svg;
pub use theme::Theme;
