//! The per-message cell: avatar, accessory labels, content container, and
//! tap routing composed behind the configure/layout/reuse contract the
//! hosting list drives.

use std::rc::Weak;
use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::{Offset, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::core::message::{Coordinate, Message, MessageContent};
use crate::core::snapshot::{
    spawn_snapshot_fetch, Annotation, MapSnapshotProvider, SnapshotOptions, SnapshotOutcome,
};
use crate::ui::avatar::{Avatar, AvatarView};
use crate::ui::container::MessageContainer;
use crate::ui::hit::{CellTap, HitRouter, TapRoutingPolicy};
use crate::ui::label::{AccessoryLabel, LabelInsets};
use crate::ui::style::MessageStyle;

/// Template identifier handed to the hosting list's reuse pool.
pub const REUSE_IDENTIFIER: &str = "burble.cell.message";

/// Identity of a cell within its hosting list, passed back on every
/// delegate callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub usize);

/// Outbound tap callbacks. All default to no-ops so hosts implement only
/// what they care about. The cell holds the delegate weakly and never
/// extends its lifetime.
pub trait MessageCellDelegate {
    fn did_tap_message(&self, _cell: CellId) {}
    fn did_tap_avatar(&self, _cell: CellId) {}
    fn did_tap_top_label(&self, _cell: CellId) {}
    fn did_tap_bottom_label(&self, _cell: CellId) {}
}

/// How `configure` treats the delegate slot on repeated calls.
///
/// `FirstWriterWins` assigns only while no live delegate is held (a dead
/// weak handle counts as unset); `AlwaysReplace` assigns on every
/// configure. Hosts that hand out per-screen delegates want the former,
/// hosts that rebind on every pass want the latter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelegateAssignment {
    #[default]
    FirstWriterWins,
    AlwaysReplace,
}

/// Per-cell geometry computed by the hosting list's layout pass. All
/// frames share the cell's local coordinate space and are applied
/// atomically by [`MessageCell::apply_layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellLayoutAttributes {
    pub avatar_frame: Rect,
    pub top_label_frame: Rect,
    pub bottom_label_frame: Rect,
    pub content_frame: Rect,
    pub label_insets: LabelInsets,
    pub label_style: Style,
}

impl Default for CellLayoutAttributes {
    fn default() -> Self {
        Self {
            avatar_frame: Rect::default(),
            top_label_frame: Rect::default(),
            bottom_label_frame: Rect::default(),
            content_frame: Rect::default(),
            label_insets: LabelInsets::default(),
            label_style: Style::default(),
        }
    }
}

pub struct MessageCell {
    id: CellId,
    layout: CellLayoutAttributes,
    avatar: AvatarView,
    top_label: AccessoryLabel,
    bottom_label: AccessoryLabel,
    container: MessageContainer,
    router: HitRouter,
    delegate: Option<Weak<dyn MessageCellDelegate>>,
    assignment: DelegateAssignment,
    content_hook: Option<Box<dyn Fn(Position) -> bool>>,
}

impl MessageCell {
    pub fn new(id: CellId) -> Self {
        Self {
            id,
            layout: CellLayoutAttributes::default(),
            avatar: AvatarView::default(),
            top_label: AccessoryLabel::default(),
            bottom_label: AccessoryLabel::default(),
            container: MessageContainer::new(),
            router: HitRouter::default(),
            delegate: None,
            assignment: DelegateAssignment::default(),
            content_hook: None,
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn container(&self) -> &MessageContainer {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut MessageContainer {
        &mut self.container
    }

    pub fn top_label(&self) -> &AccessoryLabel {
        &self.top_label
    }

    pub fn bottom_label(&self) -> &AccessoryLabel {
        &self.bottom_label
    }

    pub fn set_routing_policy(&mut self, policy: TapRoutingPolicy) {
        self.router.set_policy(policy);
    }

    pub fn set_delegate_assignment(&mut self, assignment: DelegateAssignment) {
        self.assignment = assignment;
    }

    /// Install the inner-content hook: a richer content widget claims the
    /// (content-local) point and the message tap is suppressed. The
    /// default declines every point.
    pub fn set_content_hook(&mut self, hook: Box<dyn Fn(Position) -> bool>) {
        self.content_hook = Some(hook);
    }

    /// Apply a geometry snapshot atomically: sub-region frames, label
    /// metrics, and the hit-routing registry all move together.
    pub fn apply_layout(&mut self, attributes: &CellLayoutAttributes) {
        self.layout = attributes.clone();
        self.container.set_frame(attributes.content_frame);
        self.container.label.set_insets(attributes.label_insets);
        self.container.label.set_style(attributes.label_style);
        self.top_label.set_style(attributes.label_style);
        self.bottom_label.set_style(attributes.label_style);
        self.router.rebuild(
            attributes.content_frame,
            attributes.avatar_frame,
            attributes.top_label_frame,
            attributes.bottom_label_frame,
        );
    }

    pub fn layout(&self) -> &CellLayoutAttributes {
        &self.layout
    }

    /// The single configure contract the hosting list calls per message:
    /// style and background feed the paint mapping, the message feeds
    /// visibility and data, and the delegate slot follows the configured
    /// assignment policy.
    pub fn configure(
        &mut self,
        message: &Message,
        style: MessageStyle,
        background: Color,
        delegate: Weak<dyn MessageCellDelegate>,
    ) {
        self.container.set_background(background);
        self.container.set_style(style);
        self.container.configure_visible_views(message);
        self.container.configure_data(message);
        self.assign_delegate(message, delegate);
    }

    fn assign_delegate(&mut self, message: &Message, delegate: Weak<dyn MessageCellDelegate>) {
        let assign = match self.assignment {
            DelegateAssignment::AlwaysReplace => true,
            DelegateAssignment::FirstWriterWins => !self.has_live_delegate(),
        };
        if !assign {
            return;
        }
        // The label delegate serves embedded interactive spans, which only
        // exist for text-like content.
        match message.content {
            MessageContent::Text(_)
            | MessageContent::AttributedText(_)
            | MessageContent::Emoji(_) => {
                self.container.label.set_delegate(delegate.clone());
            }
            MessageContent::Photo(_)
            | MessageContent::Video { .. }
            | MessageContent::Location(_) => {}
        }
        self.delegate = Some(delegate);
    }

    pub fn has_live_delegate(&self) -> bool {
        self.delegate
            .as_ref()
            .is_some_and(|delegate| delegate.upgrade().is_some())
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
        self.container.label.clear_delegate();
    }

    pub fn configure_avatar(&mut self, avatar: Avatar) {
        self.avatar.set(avatar);
    }

    /// Set both accessory labels from host-supplied rich text.
    pub fn configure_accessory_labels(
        &mut self,
        top: Option<ratatui::text::Line<'static>>,
        bottom: Option<ratatui::text::Line<'static>>,
    ) {
        if let Some(top) = top {
            self.top_label.set_rich_text(top);
        }
        if let Some(bottom) = bottom {
            self.bottom_label.set_rich_text(bottom);
        }
    }

    /// Recycle hook: clears both accessory labels (plain and rich text
    /// together). Style and delegate are intentionally left in place; the
    /// next configure call re-supplies them.
    pub fn prepare_for_reuse(&mut self) {
        self.top_label.clear();
        self.bottom_label.clear();
    }

    /// Kick off the asynchronous map-snapshot fetch for a location
    /// message. The busy indicator starts before the request is issued;
    /// the outcome arrives on `tx` and is applied with
    /// [`apply_snapshot_outcome`](Self::apply_snapshot_outcome).
    pub fn configure_location(
        &mut self,
        coordinate: Coordinate,
        provider: Arc<dyn MapSnapshotProvider>,
        options: SnapshotOptions,
        annotation: Option<Annotation>,
        tx: &UnboundedSender<SnapshotOutcome>,
    ) {
        let generation = self.container.media.begin_fetch();
        debug!(cell = self.id.0, generation, "requesting map snapshot");
        spawn_snapshot_fetch(
            provider,
            self.id,
            generation,
            coordinate,
            options,
            annotation,
            tx.clone(),
        );
    }

    /// Apply a snapshot completion. Outcomes addressed to another cell or
    /// carrying a stale generation are dropped; the matching completion
    /// releases the busy indicator on every path. Returns whether the
    /// outcome was applied.
    pub fn apply_snapshot_outcome(&mut self, outcome: SnapshotOutcome) -> bool {
        if outcome.cell != self.id {
            return false;
        }
        self.container
            .media
            .finish_fetch(outcome.generation, outcome.image)
    }

    /// Route a pointer-up (cell-local coordinates) to at most one tap and
    /// dispatch it to the delegate if one is still alive. Returns the tap
    /// for hosts that dispatch themselves.
    pub fn handle_mouse_up(&self, point: Position) -> Option<CellTap> {
        let decline = |_: Position| false;
        let hook: &dyn Fn(Position) -> bool = match &self.content_hook {
            Some(hook) => hook.as_ref(),
            None => &decline,
        };
        let tap = self.router.resolve(point, hook)?;
        debug!(cell = self.id.0, ?tap, "routed pointer-up");
        if let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) {
            match tap {
                CellTap::Message => delegate.did_tap_message(self.id),
                CellTap::Avatar => delegate.did_tap_avatar(self.id),
                CellTap::TopLabel => delegate.did_tap_top_label(self.id),
                CellTap::BottomLabel => delegate.did_tap_bottom_label(self.id),
            }
        }
        Some(tap)
    }
}

impl Widget for &MessageCell {
    /// Draw the whole cell with its local origin at `area`'s top-left.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let origin = Position::new(area.x, area.y);
        let offset = Offset {
            x: i32::from(area.x),
            y: i32::from(area.y),
        };
        self.container.render(origin, buf);
        self.avatar.render(self.layout.avatar_frame.offset(offset), buf);
        self.top_label
            .render(self.layout.top_label_frame.offset(offset), buf);
        self.bottom_label
            .render(self.layout.bottom_label_frame.offset(offset), buf);
    }
}
