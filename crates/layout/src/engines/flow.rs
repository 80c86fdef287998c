//! Generic box-model flow layout for any container.
//!
//! Children are placed one after another down a vertical cursor, margins
//! outside and padding inside. When a flow child does not fit the space left
//! on the page its overflow policy decides: ask the ancestor chain for a new
//! page and retry, hide the child, or stop placing children altogether.

use super::engine_for;
use crate::LayoutError;
use crate::algorithms::pagination::check_child_fit;
use crate::arrangement::Arrangement;
use crate::interface::{
    Engine, EngineLink, LayoutArea, LayoutContext, LayoutOutcome, LayoutStatus, Negotiation,
    PageGrant, PageNegotiator, PageRequest, PageSegment, RejectPages,
};
use crate::measure::MeasuredContent;
use crate::node_kind::{Capability, EngineKind, ImageContent};
use crate::style::{ComputedStyle, PositionOptions};
use crate::tree::DocumentTree;
use folio_style::{LayoutMode, OverflowAction, PositionMode};
use folio_types::NodeId;
use folio_types::geometry::{Point, Rect, Size};
use std::sync::Arc;

pub struct FlowEngine<'t> {
    tree: &'t mut DocumentTree,
    root: NodeId,
    last_page: usize,
}

/// State for laying out one child. A fresh frame is built per child.
struct LayoutFrame {
    node: NodeId,
    style: Arc<ComputedStyle>,
    options: PositionOptions,
    split_used: bool,
}

/// What a child's placement means for the rest of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildStep {
    Continue,
    Halt,
    Relocate,
}

struct Measured {
    content: Size,
    nested: Option<LayoutOutcome>,
}

#[derive(Debug, Clone, Copy)]
struct LineRun {
    index: usize,
    top: f32,
    x: f32,
    height: f32,
}

/// Running position of one container across the pages it touches.
struct FlowCursor {
    page_index: usize,
    origin: Point,
    available: Size,
    cursor: f32,
    max_width: f32,
    page_height: f32,
    segments: Vec<PageSegment>,
    line: Option<LineRun>,
    next_line: usize,
    at_page_top: bool,
    started_at_top: bool,
    halted: bool,
}

impl FlowCursor {
    fn new(area: LayoutArea) -> Self {
        Self {
            page_index: area.page_index,
            origin: area.origin,
            available: area.available,
            cursor: 0.0,
            max_width: 0.0,
            page_height: 0.0,
            segments: Vec::new(),
            line: None,
            next_line: 0,
            at_page_top: area.at_page_top,
            started_at_top: area.at_page_top,
            halted: false,
        }
    }

    /// Nothing placed yet on the current page, and the area starts at the page top.
    fn is_fresh(&self, tolerance: f32) -> bool {
        self.at_page_top && self.cursor <= tolerance && self.line.is_none()
    }

    fn close_line(&mut self) {
        if let Some(line) = self.line.take() {
            self.cursor = line.top + line.height;
        }
    }

    /// Where the next inline item would start: (x, top).
    fn line_slot(&self) -> (f32, f32) {
        self.line.map_or((0.0, self.cursor), |l| (l.x, l.top))
    }

    fn current_segment(&self) -> PageSegment {
        PageSegment {
            page_index: self.page_index,
            origin: self.origin,
            size: Size::new(self.max_width, self.page_height),
        }
    }

    fn begin_page(&mut self, grant: PageGrant) {
        self.close_line();
        self.segments.push(self.current_segment());
        self.page_index = grant.page_index;
        self.origin = Point::new(self.origin.x, grant.area.y);
        self.available = Size::new(self.available.width, grant.area.height);
        self.cursor = 0.0;
        self.page_height = 0.0;
        self.at_page_top = true;
    }

    fn finish(mut self, status: LayoutStatus) -> LayoutOutcome {
        self.close_line();
        self.segments.push(self.current_segment());
        LayoutOutcome {
            size: Size::new(self.max_width, self.page_height),
            segments: self.segments,
            last_page: self.page_index,
            status,
        }
    }
}

impl<'t> FlowEngine<'t> {
    pub fn new(tree: &'t mut DocumentTree, root: NodeId) -> Self {
        Self {
            tree,
            root,
            last_page: 0,
        }
    }

    fn flow_children(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        link: &mut EngineLink<'_>,
        state: &mut FlowCursor,
        children: &[NodeId],
        in_invisible: bool,
    ) -> Result<Option<LayoutStatus>, LayoutError> {
        for &child in children {
            if state.halted {
                self.tree.clear_subtree(child);
                continue;
            }
            let node = self.tree.node(child);
            if !node.visible {
                continue;
            }
            let style = ctx.resolve_full_style(node);
            let step = ctx.with_style(style.clone(), |ctx| {
                let frame = LayoutFrame {
                    node: child,
                    options: PositionOptions::resolve(&style, state.available),
                    style,
                    split_used: false,
                };
                self.layout_child(ctx, link, state, frame, in_invisible)
            })?;
            match step {
                ChildStep::Continue => {}
                ChildStep::Halt => state.halted = true,
                ChildStep::Relocate => return Ok(Some(LayoutStatus::Relocate)),
            }
        }
        Ok(None)
    }

    fn layout_child(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        link: &mut EngineLink<'_>,
        state: &mut FlowCursor,
        frame: LayoutFrame,
        in_invisible: bool,
    ) -> Result<ChildStep, LayoutError> {
        let kind = &self.tree.node(frame.node).kind;
        match kind.capability() {
            Capability::InvisibleContainer => {
                let children = self.tree.children(frame.node).to_vec();
                return Ok(match self.flow_children(ctx, link, state, &children, true)? {
                    Some(_) => ChildStep::Relocate,
                    None => ChildStep::Continue,
                });
            }
            Capability::PageBreak => return self.page_break(ctx, link, state, &frame, in_invisible),
            Capability::None => {
                return Err(LayoutError::UnsupportedNode {
                    node: frame.node,
                    kind: kind.as_str(),
                    reason: "node has no layout capability",
                });
            }
            Capability::NestedLayout(EngineKind::Page | EngineKind::Section) => {
                return Err(LayoutError::UnsupportedNode {
                    node: frame.node,
                    kind: kind.as_str(),
                    reason: "pages may only appear directly under a document",
                });
            }
            _ => {}
        }
        match frame.options.mode {
            PositionMode::Flow => self.place_in_flow(ctx, link, state, frame),
            PositionMode::Relative | PositionMode::Absolute => self.place_positioned(ctx, state, frame),
        }
    }

    /// Runs the child's capability at `area` and returns its content size.
    fn measure(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        link: &mut dyn PageNegotiator,
        frame: &LayoutFrame,
        area: LayoutArea,
    ) -> Result<Measured, LayoutError> {
        let node = frame.node;
        match self.tree.node(node).kind.capability() {
            Capability::NestedLayout(_) => {
                let mut engine = engine_for(&mut *self.tree, node)?;
                let outcome = engine.layout(ctx, link, area)?;
                Ok(Measured {
                    content: outcome.size,
                    nested: Some(outcome),
                })
            }
            Capability::Text(text) => {
                let block = ctx.measurer().measure_text(text, &frame.style, area.available)?;
                let content = block.size;
                self.tree.set_measured(node, MeasuredContent::Text(block));
                Ok(Measured { content, nested: None })
            }
            Capability::VectorPath(path) => {
                let block = ctx.measurer().create_path(path, &frame.style, area.available)?;
                let content = block.size;
                self.tree.set_measured(node, MeasuredContent::Path(block));
                Ok(Measured { content, nested: None })
            }
            Capability::Image(image) => Ok(Measured {
                content: image_content_size(image, ctx.config.image_dpi, &frame.options, area.available),
                nested: None,
            }),
            Capability::InvisibleContainer | Capability::PageBreak | Capability::None => Ok(Measured {
                content: Size::zero(),
                nested: None,
            }),
        }
    }

    fn place_in_flow(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        link: &mut EngineLink<'_>,
        state: &mut FlowCursor,
        mut frame: LayoutFrame,
    ) -> Result<ChildStep, LayoutError> {
        let tolerance = ctx.config.fit_tolerance;
        let inline = frame.options.layout_mode == LayoutMode::Inline;
        if !inline {
            state.close_line();
        }
        let margins = frame.options.margins;
        let padding = frame.options.padding;

        loop {
            let (x, top) = if inline { state.line_slot() } else { (0.0, state.cursor) };
            let offered = Size::new(state.available.width, (state.available.height - top).max(0.0));
            let border_origin = Point::new(
                state.origin.x + x + margins.left,
                state.origin.y + top + margins.top,
            );
            let area = LayoutArea {
                page_index: state.page_index,
                origin: border_origin.offset(padding.left, padding.top),
                available: frame.options.content_available(offered),
                at_page_top: state.is_fresh(tolerance),
            };
            let measured = self.measure(ctx, link, &frame, area)?;
            let border = frame.options.border_size(measured.content, offered);
            let outer = frame.options.outer_size(border);
            let status = measured.nested.as_ref().map(|o| o.status);
            let relocate = status == Some(LayoutStatus::Relocate);
            // A nested engine that lost a page request stops this flow too.
            let placed = if status == Some(LayoutStatus::Halted) {
                ChildStep::Halt
            } else {
                ChildStep::Continue
            };

            if let Some(outcome) = measured.nested.as_ref().filter(|_| !relocate) {
                if outcome.spans_pages() || outcome.last_page != state.page_index {
                    self.place_spanning(ctx, state, &frame, outcome, offered.width);
                    return Ok(placed);
                }
            }

            // Inline items wrap to a fresh line when the current one is full.
            let (x, top, line) = if inline {
                let wraps = state
                    .line
                    .is_some_and(|l| l.x > 0.0 && l.x + outer.width > state.available.width + tolerance);
                if wraps {
                    state.close_line();
                    let (nx, ntop) = state.line_slot();
                    for child in self.tree.children(frame.node).to_vec() {
                        self.tree.translate_subtree(child, nx - x, ntop - top, state.page_index);
                    }
                    (nx, ntop, true)
                } else {
                    (x, top, true)
                }
            } else {
                (x, top, false)
            };

            let fits = !relocate
                && !check_child_fit(top, outer.height, state.available.height, tolerance).should_break;
            if fits || (frame.split_used && !relocate) {
                let rect = Rect::from_origin_size(
                    Point::new(state.origin.x + x + margins.left, state.origin.y + top + margins.top),
                    border,
                );
                self.record_flow(state, &frame, rect, outer, line);
                return Ok(placed);
            }

            match frame.style.overflow {
                OverflowAction::NewPage if !frame.split_used => {
                    if !link.component_splits()
                        && link.parent_can_split()
                        && state.segments.is_empty()
                        && !state.started_at_top
                    {
                        log::debug!(
                            "{} keeps together; asking to move it off page {}.",
                            self.root,
                            state.page_index
                        );
                        self.tree.clear_subtree(frame.node);
                        return Ok(ChildStep::Relocate);
                    }
                    if link.can_split_current_component() {
                        let request = PageRequest::new(state.page_index, outer);
                        if let Some(grant) = Negotiation::run(link, ctx, request)? {
                            log::trace!(
                                "{} moves from page {} to page {}.",
                                frame.node,
                                state.page_index,
                                grant.page_index
                            );
                            self.tree.clear_subtree(frame.node);
                            state.begin_page(grant);
                            frame.split_used = true;
                            continue;
                        }
                    }
                    log::warn!(
                        "No page for {} on page {}; stopping layout of {}.",
                        frame.node,
                        state.page_index,
                        self.root
                    );
                    self.tree.clear_subtree(frame.node);
                    return Ok(ChildStep::Halt);
                }
                OverflowAction::Truncate => {
                    log::warn!("{} does not fit on page {}; truncated.", frame.node, state.page_index);
                    self.tree.clear_descendants(frame.node);
                    let rect = Rect::from_origin_size(
                        Point::new(state.origin.x + x + margins.left, state.origin.y + top + margins.top),
                        border,
                    );
                    let arrangement = Arrangement::from_border_rect(
                        state.page_index,
                        rect,
                        frame.style.clone(),
                        PositionMode::Flow,
                    )
                    .hidden();
                    self.tree.push_arrangement(frame.node, arrangement);
                    return Ok(ChildStep::Continue);
                }
                _ => {
                    log::warn!(
                        "{} overflows page {} and may not move; stopping layout of {}.",
                        frame.node,
                        state.page_index,
                        self.root
                    );
                    self.tree.clear_subtree(frame.node);
                    return Ok(ChildStep::Halt);
                }
            }
        }
    }

    fn record_flow(&mut self, state: &mut FlowCursor, frame: &LayoutFrame, rect: Rect, outer: Size, inline: bool) {
        let mut arrangement =
            Arrangement::from_border_rect(state.page_index, rect, frame.style.clone(), PositionMode::Flow);
        if inline {
            if state.line.is_none() {
                state.line = Some(LineRun {
                    index: state.next_line,
                    top: state.cursor,
                    x: 0.0,
                    height: 0.0,
                });
                state.next_line += 1;
            }
            if let Some(line) = state.line.as_mut() {
                arrangement = arrangement.on_line(line.index);
                line.x += outer.width;
                line.height = line.height.max(outer.height);
                state.max_width = state.max_width.max(line.x);
                state.page_height = state.page_height.max(line.top + line.height);
            }
        } else {
            state.cursor += outer.height;
            state.max_width = state.max_width.max(outer.width);
            state.page_height = state.page_height.max(state.cursor);
        }
        log::trace!("Placed {} at {:?} on page {}.", frame.node, rect, state.page_index);
        self.tree.push_arrangement(frame.node, arrangement);
    }

    /// Records one arrangement per page for a child that spans pages and
    /// moves this container onto the child's last page.
    fn place_spanning(
        &mut self,
        ctx: &LayoutContext<'_>,
        state: &mut FlowCursor,
        frame: &LayoutFrame,
        outcome: &LayoutOutcome,
        offered_width: f32,
    ) {
        let options = &frame.options;
        let width = options.border_width(outcome.size.width, offered_width);
        let count = outcome.segments.len();
        for (i, segment) in outcome.segments.iter().enumerate() {
            let top = if i == 0 { options.padding.top } else { 0.0 };
            let bottom = if i + 1 == count { options.padding.bottom } else { 0.0 };
            let rect = Rect::new(
                segment.origin.x - options.padding.left,
                segment.origin.y - top,
                width,
                top + segment.size.height + bottom,
            );
            let arrangement =
                Arrangement::from_border_rect(segment.page_index, rect, frame.style.clone(), PositionMode::Flow);
            self.tree.push_arrangement(frame.node, arrangement);
        }

        let outer_width = width + options.margins.horizontal();
        state.max_width = state.max_width.max(outer_width);
        let Some(last) = outcome.segments.last() else {
            return;
        };

        state.close_line();
        for segment in &outcome.segments {
            if segment.page_index != state.page_index {
                state.segments.push(state.current_segment());
                let body = ctx.pages().body_rect(segment.page_index);
                state.page_index = segment.page_index;
                state.origin = Point::new(state.origin.x, body.map_or(segment.origin.y, |b| b.y));
                state.available = Size::new(
                    state.available.width,
                    body.map_or(state.available.height, |b| b.bottom() - state.origin.y),
                );
                state.page_height = 0.0;
            }
            let bottom = segment.origin.y + segment.size.height - state.origin.y;
            state.page_height = state.page_height.max(bottom);
        }
        state.at_page_top = false;
        state.cursor = last.origin.y + last.size.height + options.padding.bottom + options.margins.bottom
            - state.origin.y;
        state.page_height = state.page_height.max(state.cursor);
        log::trace!("{} spans {} pages; continuing on page {}.", frame.node, count, state.page_index);
    }

    /// Relative children sit at X/Y inside the container, absolute children at
    /// X/Y on the page. Neither moves the cursor.
    fn place_positioned(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        state: &mut FlowCursor,
        frame: LayoutFrame,
    ) -> Result<ChildStep, LayoutError> {
        let options = frame.options;
        let base = match options.mode {
            PositionMode::Absolute => Point::zero(),
            _ => state.origin,
        };
        let border_origin = base.offset(
            options.x.unwrap_or(0.0) + options.margins.left,
            options.y.unwrap_or(0.0) + options.margins.top,
        );
        let offered = state.available;
        let area = LayoutArea {
            page_index: state.page_index,
            origin: border_origin.offset(options.padding.left, options.padding.top),
            available: options.content_available(offered),
            at_page_top: false,
        };
        let mut positioned = RejectPages::new("positioned content stays on its page");
        let measured = self.measure(ctx, &mut positioned, &frame, area)?;
        let border = options.border_size(measured.content, offered);
        let rect = Rect::from_origin_size(border_origin, border);
        let arrangement = Arrangement::from_border_rect(state.page_index, rect, frame.style.clone(), options.mode);
        self.tree.push_arrangement(frame.node, arrangement);

        let right = rect.right() + options.margins.right - state.origin.x;
        let bottom = rect.bottom() + options.margins.bottom - state.origin.y;
        state.max_width = state.max_width.max(right.max(0.0));
        state.page_height = state.page_height.max(bottom.max(0.0));
        log::trace!("Positioned {} ({:?}) at {:?}.", frame.node, options.mode, rect);
        Ok(ChildStep::Continue)
    }

    fn page_break(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        link: &mut EngineLink<'_>,
        state: &mut FlowCursor,
        frame: &LayoutFrame,
        in_invisible: bool,
    ) -> Result<ChildStep, LayoutError> {
        if in_invisible {
            log::warn!("Page break {} inside an invisible container ignored.", frame.node);
            return Ok(ChildStep::Continue);
        }
        if frame.options.mode != PositionMode::Flow {
            log::warn!("Page break {} on a positioned node ignored.", frame.node);
            return Ok(ChildStep::Continue);
        }
        state.close_line();
        if state.is_fresh(ctx.config.fit_tolerance) {
            log::trace!("Page break {} at the top of page {} consumed.", frame.node, state.page_index);
            return Ok(ChildStep::Continue);
        }
        match Negotiation::run(link, ctx, PageRequest::new(state.page_index, Size::zero()))? {
            Some(grant) => {
                state.begin_page(grant);
                Ok(ChildStep::Continue)
            }
            None => {
                log::warn!("Page break {} refused on page {}.", frame.node, state.page_index);
                Ok(ChildStep::Halt)
            }
        }
    }
}

impl Engine for FlowEngine<'_> {
    fn layout(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        parent: &mut dyn PageNegotiator,
        area: LayoutArea,
    ) -> Result<LayoutOutcome, LayoutError> {
        let root = self.root;
        ctx.with_measure_scope(root, |ctx| {
            let style = ctx.current_style();
            let mut link = EngineLink::new(style.overflow_split.allows_split(), parent);
            let mut state = FlowCursor::new(area);
            let children = self.tree.children(root).to_vec();
            let relocate = self.flow_children(ctx, &mut link, &mut state, &children, false)?;
            let status = match relocate {
                Some(status) => status,
                None if state.halted => LayoutStatus::Halted,
                None => LayoutStatus::Complete,
            };
            let outcome = state.finish(status);
            self.last_page = outcome.last_page;
            log::trace!(
                "Flow {} finished on page {} ({:?}, {} segments).",
                root,
                outcome.last_page,
                outcome.status,
                outcome.segments.len()
            );
            Ok(outcome)
        })
    }

    fn last_page_index(&self) -> usize {
        self.last_page
    }
}

/// Content size of an image: explicit sizes keep the aspect ratio, otherwise
/// the natural size shrinks to fit the available width.
fn image_content_size(image: &ImageContent, dpi: f32, options: &PositionOptions, available: Size) -> Size {
    let intrinsic = image.intrinsic_size(dpi);
    let ratio = image.aspect_ratio();
    let padding = options.padding;
    match (options.width, options.height) {
        (Some(w), Some(h)) => Size::new(
            (w - padding.horizontal()).max(0.0),
            (h - padding.vertical()).max(0.0),
        ),
        (Some(w), None) => {
            let width = (w - padding.horizontal()).max(0.0);
            Size::new(width, width * ratio)
        }
        (None, Some(h)) => {
            let height = (h - padding.vertical()).max(0.0);
            let width = if ratio > 0.0 { height / ratio } else { 0.0 };
            Size::new(width, height)
        }
        (None, None) if intrinsic.width > available.width => {
            Size::new(available.width, available.width * ratio)
        }
        (None, None) => intrinsic,
    }
}
