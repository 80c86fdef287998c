//! Registry of the physical pages opened during one layout pass.

use crate::tree::DocumentTree;
use folio_types::NodeId;
use folio_types::geometry::{Rect, Size};
use std::collections::BTreeMap;

/// A header or footer fragment laid out for one page.
#[derive(Debug, Clone)]
pub struct PageRegion {
    pub tree: DocumentTree,
    pub root: NodeId,
    /// Outer rectangle the fragment claims on the page.
    pub rect: Rect,
}

#[derive(Debug, Clone)]
pub struct PageInfo {
    pub index: usize,
    /// The page or section node that opened this page.
    pub owner: NodeId,
    pub size: Size,
    pub page_rect: Rect,
    /// Inside the page margins and padding.
    pub content_rect: Rect,
    /// The content rect minus header and footer.
    pub body_rect: Rect,
    pub number: usize,
    pub label: String,
    pub header: Option<PageRegion>,
    pub footer: Option<PageRegion>,
}

#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    pages: BTreeMap<usize, PageInfo>,
}

impl PageRegistry {
    pub fn register(&mut self, info: PageInfo) {
        if self.pages.contains_key(&info.index) {
            log::warn!("Page {} registered twice; keeping the latest.", info.index);
        }
        self.pages.insert(info.index, info);
    }

    pub fn get(&self, index: usize) -> Option<&PageInfo> {
        self.pages.get(&index)
    }

    pub fn body_rect(&self, index: usize) -> Option<Rect> {
        self.pages.get(&index).map(|p| p.body_rect)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.pages.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageInfo> {
        self.pages.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PageInfo> {
        self.pages.values_mut()
    }

    pub fn into_vec(self) -> Vec<PageInfo> {
        self.pages.into_values().collect()
    }
}
