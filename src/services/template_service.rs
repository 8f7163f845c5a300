use std::collections::HashMap;

use serde::Serialize;
use tera::{Context, Tera};

use crate::assets::{AssetLoader, POSTER_TEMPLATE};

/// Error type for template rendering
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("Template not found: {0}")]
    NotFound(String),
}

/// Renders the poster SVG template with Tera
pub struct TemplateService {
    tera: Tera,
}

impl TemplateService {
    /// Load the poster template (external override or embedded)
    pub fn new(loader: &AssetLoader) -> Result<Self, TemplateError> {
        let source = loader
            .read_template(POSTER_TEMPLATE)
            .map_err(|e| TemplateError::NotFound(format!("{POSTER_TEMPLATE}: {e}")))?;
        Self::from_source(&source)
    }

    /// Build from template text
    pub fn from_source(source: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".svg"]);
        tera.add_raw_template(POSTER_TEMPLATE, source)?;
        Self::register_filters(&mut tera);
        tracing::debug!(template = POSTER_TEMPLATE, "Template service initialized");
        Ok(Self { tera })
    }

    fn register_filters(tera: &mut Tera) {
        // [r, g, b] -> "rgb(r,g,b)"
        tera.register_filter(
            "rgb",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let channels = tera::try_get_value!("rgb", "value", Vec<u8>, value);
                match channels.as_slice() {
                    [r, g, b] => Ok(tera::Value::String(format!("rgb({r},{g},{b})"))),
                    _ => Err(tera::Error::msg(format!(
                        "rgb filter expects 3 channels, got {}",
                        channels.len()
                    ))),
                }
            },
        );
    }

    /// Render the poster template for `scene`
    pub fn render<T: Serialize>(&self, scene: &T) -> Result<String, TemplateError> {
        let context = Context::from_serialize(scene)?;
        Ok(self.tera.render(POSTER_TEMPLATE, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rgb_filter() {
        let service = TemplateService::from_source(r#"<rect fill="{{ c | rgb }}"/>"#).unwrap();
        let svg = service.render(&json!({ "c": [10, 20, 30] })).unwrap();
        assert_eq!(svg, r#"<rect fill="rgb(10,20,30)"/>"#);
    }

    #[test]
    fn test_rgb_filter_rejects_wrong_length() {
        let service = TemplateService::from_source(r#"{{ c | rgb }}"#).unwrap();
        assert!(service.render(&json!({ "c": [1, 2] })).is_err());
    }

    #[test]
    fn test_text_is_escaped() {
        let service = TemplateService::from_source("<text>{{ t }}</text>").unwrap();
        let svg = service.render(&json!({ "t": "Simon & Garfunkel <Live>" })).unwrap();
        assert_eq!(svg, "<text>Simon &amp; Garfunkel &lt;Live&gt;</text>");
    }

    #[test]
    fn test_embedded_template_loads() {
        let loader = AssetLoader::new(None, None, None);
        assert!(TemplateService::new(&loader).is_ok());
    }

    #[test]
    fn test_invalid_template() {
        assert!(matches!(
            TemplateService::from_source("{% if %}"),
            Err(TemplateError::Tera(_))
        ));
    }
}
