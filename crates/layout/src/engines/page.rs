//! Page layout: paper, numbering, header/footer regions and the page grantor.

use super::flow::FlowEngine;
use crate::LayoutError;
use crate::arrangement::Arrangement;
use crate::interface::{
    Engine, LayoutArea, LayoutContext, LayoutOutcome, PageNegotiator, PageRequest, RejectPages,
};
use crate::node_kind::{Capability, EngineKind, NodeKind, PageTemplates};
use crate::pages::{PageInfo, PageRegion};
use crate::style::{ComputedStyle, PositionOptions};
use crate::template::TemplateRef;
use crate::tree::DocumentTree;
use folio_style::{OverflowAction, PositionMode};
use folio_types::NodeId;
use folio_types::geometry::{Point, Rect, Size};
use std::sync::Arc;

/// Lays out one page node and every overflow page its content asks for.
pub struct PageEngine<'t> {
    tree: &'t mut DocumentTree,
    root: NodeId,
    templates: PageTemplates,
    continuation: Option<PageTemplates>,
    last_page: usize,
}

impl<'t> PageEngine<'t> {
    pub fn new(tree: &'t mut DocumentTree, root: NodeId) -> Result<Self, LayoutError> {
        let templates = match &tree.node(root).kind {
            NodeKind::Page(templates) => templates.clone(),
            other => {
                return Err(LayoutError::UnsupportedNode {
                    node: root,
                    kind: other.as_str(),
                    reason: "page engine needs a page node",
                });
            }
        };
        Ok(Self::with_templates(tree, root, templates, None))
    }

    /// A page engine whose pages after the first use `continuation`, when it
    /// declares anything, in place of `templates`.
    pub fn with_templates(
        tree: &'t mut DocumentTree,
        root: NodeId,
        templates: PageTemplates,
        continuation: Option<PageTemplates>,
    ) -> Self {
        Self {
            tree,
            root,
            templates,
            continuation,
            last_page: 0,
        }
    }
}

/// The canonical answer to page requests: opens the next physical page.
struct PageGrantor {
    owner: NodeId,
    style: Arc<ComputedStyle>,
    templates: PageTemplates,
    continuation: Option<PageTemplates>,
    first_page: usize,
    last_opened: usize,
    opened: Vec<usize>,
}

impl PageGrantor {
    fn templates_for(&self, index: usize) -> PageTemplates {
        match &self.continuation {
            Some(continuation) if index > self.first_page => continuation.or(&self.templates),
            _ => self.templates.clone(),
        }
    }

    /// Registers page `index` and returns its body rect.
    fn open_page(&mut self, ctx: &mut LayoutContext<'_>, index: usize) -> Result<Rect, LayoutError> {
        let page = &self.style.page;
        let (width, height) = page.size.oriented_pt(page.orientation);
        let page_rect = Rect::new(0.0, 0.0, width, height);
        let (m, p) = (self.style.margin, self.style.padding);
        let content_rect = page_rect
            .deflate(m.top, m.right, m.bottom, m.left)
            .deflate(p.top, p.right, p.bottom, p.left);

        let number = match page.number_start {
            Some(start) => start + (index - self.first_page),
            None => index + 1,
        };
        let label = page.number_style.format(number);

        let templates = self.templates_for(index);
        let style = self.style.clone();
        let (header, footer) = ctx.with_style(style, |ctx| -> Result<_, LayoutError> {
            let header = templates
                .header
                .as_ref()
                .map(|t| layout_region(ctx, t, index, content_rect, false))
                .transpose()?;
            let footer = templates
                .footer
                .as_ref()
                .map(|t| layout_region(ctx, t, index, content_rect, true))
                .transpose()?;
            Ok((header, footer))
        })?;

        let top = header.as_ref().map_or(0.0, |r| r.rect.height);
        let bottom = footer.as_ref().map_or(0.0, |r| r.rect.height);
        let body_rect = content_rect.deflate(top, 0.0, bottom, 0.0);
        if body_rect.height <= 0.0 {
            log::warn!(
                "Header and footer leave no body on page {} ({} pt content height).",
                index,
                content_rect.height
            );
        }
        log::debug!(
            "Opened page {} ('{}') for {}: body {:?}.",
            index,
            label,
            self.owner,
            body_rect
        );
        ctx.pages_mut().register(PageInfo {
            index,
            owner: self.owner,
            size: Size::new(width, height),
            page_rect,
            content_rect,
            body_rect,
            number,
            label,
            header,
            footer,
        });
        self.last_opened = index;
        self.opened.push(index);
        Ok(body_rect)
    }
}

impl PageNegotiator for PageGrantor {
    fn can_split_current_component(&self) -> bool {
        self.style.overflow == OverflowAction::NewPage && self.style.overflow_split.allows_split()
    }

    fn request_page(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        request: PageRequest,
    ) -> Result<PageRequest, LayoutError> {
        if self.style.overflow != OverflowAction::NewPage {
            log::warn!(
                "Page {} of {} does not overflow onto new pages; request refused.",
                request.page_index,
                self.owner
            );
            return Ok(request.reject());
        }
        if ctx.pages().len() >= ctx.config.max_pages {
            log::warn!("Page limit of {} reached; request refused.", ctx.config.max_pages);
            return Ok(request.reject());
        }
        let index = self.last_opened + 1;
        let body = self.open_page(ctx, index)?;
        Ok(request.grant(index, body))
    }
}

/// Instantiates a header or footer and lays it out inside `content_rect`,
/// at its top or (for footers) its bottom.
fn layout_region(
    ctx: &mut LayoutContext<'_>,
    template: &TemplateRef,
    page_index: usize,
    content_rect: Rect,
    at_bottom: bool,
) -> Result<PageRegion, LayoutError> {
    let mut tree = template.instantiate(page_index)?;
    let root = tree
        .root()
        .ok_or_else(|| LayoutError::Template("template produced an empty tree".into()))?;
    let node = tree.node(root);
    if !matches!(node.kind.capability(), Capability::NestedLayout(EngineKind::Flow)) {
        return Err(LayoutError::Template(format!(
            "template root must be a panel, found {}",
            node.kind.as_str()
        )));
    }
    let style = ctx.resolve_full_style(node);
    ctx.with_style(style.clone(), |ctx| {
        let offered = content_rect.size();
        let options = PositionOptions::resolve(&style, offered);
        let border_origin = content_rect.origin().offset(options.margins.left, options.margins.top);
        let area = LayoutArea {
            page_index,
            origin: border_origin.offset(options.padding.left, options.padding.top),
            available: options.content_available(offered),
            at_page_top: true,
        };
        let mut refuse = RejectPages::new("headers and footers stay on their page");
        let outcome = FlowEngine::new(&mut tree, root).layout(ctx, &mut refuse, area)?;
        let border = options.border_size(outcome.size, offered);
        let rect = Rect::from_origin_size(border_origin, border);
        tree.push_arrangement(
            root,
            Arrangement::from_border_rect(page_index, rect, style.clone(), PositionMode::Flow),
        );
        let outer = options.outer_size(border);
        let mut claimed = Rect::from_origin_size(content_rect.origin(), outer);
        if at_bottom {
            let dy = content_rect.bottom() - outer.height - content_rect.y;
            tree.translate_subtree(root, 0.0, dy, page_index);
            claimed = claimed.translate(0.0, dy);
        }
        Ok(PageRegion {
            tree,
            root,
            rect: claimed,
        })
    })
}

impl Engine for PageEngine<'_> {
    fn layout(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        _parent: &mut dyn PageNegotiator,
        area: LayoutArea,
    ) -> Result<LayoutOutcome, LayoutError> {
        let root = self.root;
        ctx.with_measure_scope(root, |ctx| {
            let style = ctx.current_style();
            let mut grantor = PageGrantor {
                owner: root,
                style: style.clone(),
                templates: self.templates.clone(),
                continuation: self.continuation.clone(),
                first_page: area.page_index,
                last_opened: area.page_index,
                opened: Vec::new(),
            };
            let body = grantor.open_page(ctx, area.page_index)?;
            let body_area = LayoutArea {
                page_index: area.page_index,
                origin: Point::new(body.x, body.y),
                available: body.size(),
                at_page_top: true,
            };
            let outcome = FlowEngine::new(&mut *self.tree, root).layout(ctx, &mut grantor, body_area)?;

            let margins = style.margin;
            for &index in &grantor.opened {
                let Some(info) = ctx.pages().get(index) else {
                    continue;
                };
                let border = info
                    .page_rect
                    .deflate(margins.top, margins.right, margins.bottom, margins.left);
                let mut arrangement =
                    Arrangement::from_border_rect(index, border, style.clone(), PositionMode::Flow);
                arrangement.content_rect = info.body_rect;
                self.tree.push_arrangement(root, arrangement);
            }

            self.last_page = outcome.last_page.max(grantor.last_opened);
            log::debug!(
                "Page {} laid out over pages {}..={} ({:?}).",
                root,
                area.page_index,
                self.last_page,
                outcome.status
            );
            Ok(LayoutOutcome {
                last_page: self.last_page,
                ..outcome
            })
        })
    }

    fn last_page_index(&self) -> usize {
        self.last_page
    }
}
