use folio_style::PageSize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// The maximum number of physical pages a document may open.
    ///
    /// A page grantor refuses further requests once this many pages exist; the
    /// content that asked for the page is then truncated or hidden as its
    /// overflow policy dictates. This bounds runaway layouts (for example a
    /// child taller than any page with splitting forced on).
    ///
    /// Defaults to `10000`.
    pub max_pages: usize,

    /// Slack, in points, allowed when deciding whether a child fits the remaining space.
    ///
    /// Defaults to `0.01`.
    pub fit_tolerance: f32,

    /// Resolution used to convert image pixels to points when the image carries none.
    ///
    /// Defaults to `96`.
    pub image_dpi: f32,

    /// Paper size for pages that do not declare one.
    pub default_page_size: PageSize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_pages: 10000,
            fit_tolerance: 0.01,
            image_dpi: 96.0,
            default_page_size: PageSize::A4,
        }
    }
}
