//! The contract shared by every engine: the layout context, the engine
//! trait, and the page-request negotiation that travels up the engine chain.

use crate::LayoutError;
use crate::config::LayoutConfig;
use crate::measure::Measurer;
use crate::pages::PageRegistry;
use crate::style::{ComputedStyle, StyleResolver};
use crate::tree::LayoutNode;
use folio_types::NodeId;
use folio_types::geometry::{Point, Rect, Size};
use std::sync::Arc;

/// Everything an engine needs besides the tree: configuration, the style
/// service and its stack, measurement, and the registry of opened pages.
pub struct LayoutContext<'a> {
    pub config: &'a LayoutConfig,
    resolver: &'a dyn StyleResolver,
    measurer: &'a mut dyn Measurer,
    root_style: Arc<ComputedStyle>,
    style_stack: Vec<Arc<ComputedStyle>>,
    pages: PageRegistry,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        config: &'a LayoutConfig,
        resolver: &'a dyn StyleResolver,
        measurer: &'a mut dyn Measurer,
    ) -> Self {
        let root_style = ComputedStyle {
            page: crate::style::PageStyle {
                size: config.default_page_size,
                ..Default::default()
            },
            ..Default::default()
        };
        Self {
            config,
            resolver,
            measurer,
            root_style: Arc::new(root_style),
            style_stack: Vec::new(),
            pages: PageRegistry::default(),
        }
    }

    /// The style of the node currently being laid out.
    pub fn current_style(&self) -> Arc<ComputedStyle> {
        self.style_stack.last().unwrap_or(&self.root_style).clone()
    }

    /// Cascades `node`'s declarations onto the current style.
    pub fn resolve_full_style(&self, node: &LayoutNode) -> Arc<ComputedStyle> {
        let parent = self.style_stack.last().unwrap_or(&self.root_style);
        Arc::new(self.resolver.resolve_full_style(node, parent))
    }

    /// Runs `f` with `style` pushed on the style stack.
    pub fn with_style<R>(&mut self, style: Arc<ComputedStyle>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.style_stack.push(style);
        let out = f(self);
        self.style_stack.pop();
        out
    }

    /// Runs `f` inside a measurement scope owned by `owner`. The scope is
    /// released whether or not `f` succeeds.
    pub fn with_measure_scope<R>(
        &mut self,
        owner: NodeId,
        f: impl FnOnce(&mut Self) -> Result<R, LayoutError>,
    ) -> Result<R, LayoutError> {
        self.measurer.acquire(owner);
        let out = f(self);
        self.measurer.release(owner);
        out
    }

    pub fn measurer(&mut self) -> &mut dyn Measurer {
        &mut *self.measurer
    }

    pub fn pages(&self) -> &PageRegistry {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut PageRegistry {
        &mut self.pages
    }

    pub fn take_pages(&mut self) -> PageRegistry {
        std::mem::take(&mut self.pages)
    }
}

/// The space offered to an engine: a start page, an absolute content origin
/// on that page and the width/height available from there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutArea {
    pub page_index: usize,
    pub origin: Point,
    pub available: Size,
    /// Nothing has been placed above this area on its page.
    pub at_page_top: bool,
}

/// The part of an engine's content that landed on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSegment {
    pub page_index: usize,
    /// Absolute content origin on that page.
    pub origin: Point,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    /// Every child was placed, displayed or truncated by policy.
    Complete,
    /// A refused page stopped placement; later children were cleared.
    Halted,
    /// The component refused to split and asks its parent to move it whole.
    Relocate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    /// Content size on the last page. Width is the maximum over all pages.
    pub size: Size,
    pub segments: Vec<PageSegment>,
    pub last_page: usize,
    pub status: LayoutStatus,
}

impl LayoutOutcome {
    pub fn spans_pages(&self) -> bool {
        self.segments.len() > 1
    }
}

/// A layout engine bound to one root node.
pub trait Engine {
    fn layout(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        parent: &mut dyn PageNegotiator,
        area: LayoutArea,
    ) -> Result<LayoutOutcome, LayoutError>;

    fn last_page_index(&self) -> usize;
}

/// A page request and, once answered, the responder's decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    pub page_index: usize,
    pub required: Size,
    pub granted: bool,
    pub new_page_index: Option<usize>,
    /// Body area of the granted page.
    pub available: Option<Rect>,
}

impl PageRequest {
    pub fn new(page_index: usize, required: Size) -> Self {
        Self {
            page_index,
            required,
            granted: false,
            new_page_index: None,
            available: None,
        }
    }

    pub fn grant(self, new_page_index: usize, available: Rect) -> Self {
        Self {
            granted: true,
            new_page_index: Some(new_page_index),
            available: Some(available),
            ..self
        }
    }

    pub fn reject(self) -> Self {
        Self {
            granted: false,
            new_page_index: None,
            available: None,
            ..self
        }
    }
}

/// The upward link an engine hands to its children.
pub trait PageNegotiator {
    /// Whether the component currently being laid out may be split across pages.
    fn can_split_current_component(&self) -> bool;

    /// Asks for a new page. Only page grantors answer with `granted = true`.
    fn request_page(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        request: PageRequest,
    ) -> Result<PageRequest, LayoutError>;
}

/// An intermediate engine's link: answers split queries from its own
/// component's policy, falling back to its parent, and forwards page requests.
pub struct EngineLink<'p> {
    component_splits: bool,
    parent: &'p mut dyn PageNegotiator,
}

impl<'p> EngineLink<'p> {
    pub fn new(component_splits: bool, parent: &'p mut dyn PageNegotiator) -> Self {
        Self {
            component_splits,
            parent,
        }
    }

    pub fn component_splits(&self) -> bool {
        self.component_splits
    }

    pub fn parent_can_split(&self) -> bool {
        self.parent.can_split_current_component()
    }
}

impl PageNegotiator for EngineLink<'_> {
    fn can_split_current_component(&self) -> bool {
        self.component_splits || self.parent.can_split_current_component()
    }

    fn request_page(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        request: PageRequest,
    ) -> Result<PageRequest, LayoutError> {
        log::trace!("Forwarding page request from page {}.", request.page_index);
        self.parent.request_page(ctx, request)
    }
}

/// A link that never splits and refuses every page request. Used for content
/// that must stay on its page: headers, footers, table cell measurement,
/// absolutely positioned children.
#[derive(Debug, Clone, Copy)]
pub struct RejectPages {
    reason: &'static str,
}

impl RejectPages {
    pub fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

impl PageNegotiator for RejectPages {
    fn can_split_current_component(&self) -> bool {
        false
    }

    fn request_page(
        &mut self,
        _ctx: &mut LayoutContext<'_>,
        request: PageRequest,
    ) -> Result<PageRequest, LayoutError> {
        log::debug!("Page request from page {} refused: {}.", request.page_index, self.reason);
        Ok(request.reject())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Measuring,
    AwaitingPageDecision,
    Granted,
    Rejected,
}

/// A granted page: its index and body area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGrant {
    pub page_index: usize,
    pub area: Rect,
}

/// One page-request round trip.
#[derive(Debug)]
pub struct Negotiation {
    state: NegotiationState,
}

impl Default for Negotiation {
    fn default() -> Self {
        Self::new()
    }
}

impl Negotiation {
    pub fn new() -> Self {
        Self {
            state: NegotiationState::Measuring,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn begin(&mut self, request: PageRequest) -> Result<PageRequest, LayoutError> {
        if self.state != NegotiationState::Measuring {
            return Err(LayoutError::Negotiation(format!(
                "cannot request a page while {:?}",
                self.state
            )));
        }
        self.state = NegotiationState::AwaitingPageDecision;
        log::trace!("Negotiation: Measuring -> AwaitingPageDecision (page {}).", request.page_index);
        Ok(request)
    }

    pub fn resolve(&mut self, reply: &PageRequest) -> Result<NegotiationState, LayoutError> {
        if self.state != NegotiationState::AwaitingPageDecision {
            return Err(LayoutError::Negotiation(format!(
                "cannot resolve a negotiation that is {:?}",
                self.state
            )));
        }
        self.state = if reply.granted {
            NegotiationState::Granted
        } else {
            NegotiationState::Rejected
        };
        log::trace!("Negotiation: AwaitingPageDecision -> {:?}.", self.state);
        Ok(self.state)
    }

    /// Sends `request` through `link` and returns the granted page, if any.
    pub fn run(
        link: &mut dyn PageNegotiator,
        ctx: &mut LayoutContext<'_>,
        request: PageRequest,
    ) -> Result<Option<PageGrant>, LayoutError> {
        let mut negotiation = Negotiation::new();
        let request = negotiation.begin(request)?;
        let reply = link.request_page(ctx, request)?;
        match negotiation.resolve(&reply)? {
            NegotiationState::Granted => match (reply.new_page_index, reply.available) {
                (Some(page_index), Some(area)) => Ok(Some(PageGrant { page_index, area })),
                _ => Err(LayoutError::Negotiation(
                    "granted reply carries no page".to_string(),
                )),
            },
            _ => Ok(None),
        }
    }
}
