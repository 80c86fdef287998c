use crate::error::FolioError;
use crate::source::DocumentSource;
use crate::stylesheet::Stylesheet;
use folio_layout::{
    DocumentDriver, DocumentLayout, DocumentTree, FixedMetrics, LayoutConfig, LayoutContext,
    Measurer,
};
use std::path::Path;

/// Entry point: lays out document trees with one configuration and stylesheet.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayouter {
    config: LayoutConfig,
    stylesheet: Stylesheet,
}

impl DocumentLayouter {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            stylesheet: Stylesheet::default(),
        }
    }

    /// Reads a [`LayoutConfig`] from JSON; missing keys keep their defaults.
    pub fn from_config_json(json: &str) -> Result<Self, FolioError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    /// Lays `tree` out with average-advance text metrics.
    pub fn layout(&self, tree: &mut DocumentTree) -> Result<DocumentLayout, FolioError> {
        let mut metrics = FixedMetrics::default();
        self.layout_with(tree, &mut metrics)
    }

    pub fn layout_with(
        &self,
        tree: &mut DocumentTree,
        measurer: &mut dyn Measurer,
    ) -> Result<DocumentLayout, FolioError> {
        let root = tree
            .root()
            .ok_or_else(|| FolioError::Source("document tree is empty".to_string()))?;
        let mut ctx = LayoutContext::new(&self.config, &self.stylesheet, measurer);
        let layout = DocumentDriver::new(tree, root)?.run(&mut ctx)?;
        log::info!("Laid out {} nodes on {} pages.", tree.len(), layout.page_count());
        Ok(layout)
    }

    /// Builds and lays out a JSON document source. Classes declared in the
    /// source's stylesheet override this layouter's classes of the same name.
    pub fn layout_json(&self, json: &str) -> Result<(DocumentTree, DocumentLayout), FolioError> {
        let source = DocumentSource::from_json(json)?;
        let mut tree = source.build_tree()?;
        let mut merged = self.stylesheet.clone();
        merged.styles.extend(source.stylesheet.styles);
        let layouter = Self {
            config: self.config,
            stylesheet: merged,
        };
        let layout = layouter.layout(&mut tree)?;
        Ok((tree, layout))
    }

    pub fn layout_file(&self, path: impl AsRef<Path>) -> Result<(DocumentTree, DocumentLayout), FolioError> {
        let json = std::fs::read_to_string(path)?;
        self.layout_json(&json)
    }
}
