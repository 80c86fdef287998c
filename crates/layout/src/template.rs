//! Header and footer templates.

use crate::LayoutError;
use crate::tree::DocumentTree;
use std::fmt;
use std::sync::Arc;

/// Produces a fresh fragment tree each time a page needs a header or footer.
///
/// `occurrence` is the global page index the fragment is instantiated for.
pub trait Template {
    fn instantiate(&self, occurrence: usize) -> Result<DocumentTree, LayoutError>;
}

impl<F> Template for F
where
    F: Fn(usize) -> Result<DocumentTree, LayoutError>,
{
    fn instantiate(&self, occurrence: usize) -> Result<DocumentTree, LayoutError> {
        self(occurrence)
    }
}

/// A template that clones the same prototype fragment for every page.
#[derive(Debug, Clone)]
pub struct StaticTemplate(pub DocumentTree);

impl Template for StaticTemplate {
    fn instantiate(&self, _occurrence: usize) -> Result<DocumentTree, LayoutError> {
        let mut tree = self.0.clone();
        tree.clear_arrangements();
        Ok(tree)
    }
}

/// Shared handle to a template, cheap to clone into node kinds.
#[derive(Clone)]
pub struct TemplateRef(Arc<dyn Template + Send + Sync>);

impl TemplateRef {
    pub fn new(template: impl Template + Send + Sync + 'static) -> Self {
        Self(Arc::new(template))
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(usize) -> Result<DocumentTree, LayoutError> + Send + Sync + 'static,
    {
        Self::new(f)
    }

    pub fn instantiate(&self, occurrence: usize) -> Result<DocumentTree, LayoutError> {
        self.0.instantiate(occurrence)
    }
}

impl fmt::Debug for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TemplateRef").finish_non_exhaustive()
    }
}
