use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub frequency_color: String,
    pub attribute_color: String,
    pub text_color: String,
    pub attribute_text_color: String,
    pub line_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            frequency_color: "#3498db".to_string(),
            attribute_color: "#e74c3c".to_string(),
            text_color: "#1C2430".to_string(),
            attribute_text_color: "#FFFFFF".to_string(),
            line_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            frequency_color: "#2E86C1".to_string(),
            attribute_color: "#C0392B".to_string(),
            text_color: "#ECF0F1".to_string(),
            attribute_text_color: "#FDFEFE".to_string(),
            line_color: "#7A8AA6".to_string(),
            background: "#1B1F27".to_string(),
        }
    }
}
