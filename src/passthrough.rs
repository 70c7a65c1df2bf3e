use crate::error::Result;
use crate::Renderer;

/// Returns bodies that are already in the negotiated format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PassthroughRenderer {
    media_type: &'static str,
    format: &'static str,
}

impl PassthroughRenderer {
    pub const fn new(media_type: &'static str, format: &'static str) -> Self {
        PassthroughRenderer { media_type, format }
    }

    pub const fn n3() -> Self {
        PassthroughRenderer::new("text/n3", "n3")
    }

    pub const fn geojson() -> Self {
        PassthroughRenderer::new("application/json", "geojson")
    }
}

impl Renderer for PassthroughRenderer {
    type Input = str;

    fn media_type(&self) -> &'static str {
        self.media_type
    }

    fn format(&self) -> &'static str {
        self.format
    }

    fn render(&self, data: Option<&str>) -> Result<String> {
        Ok(data.unwrap_or_default().to_string())
    }
}
