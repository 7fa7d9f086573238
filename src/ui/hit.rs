//! Pointer-up routing over the cell's named regions.
//!
//! The registry is an ordered list rebuilt from each geometry snapshot;
//! the order is the priority contract: content first, then avatar, top
//! label, bottom label. Resolution walks the list once, first match wins,
//! with the inner-content hook able to claim a point inside the content
//! frame before a message tap is emitted.

use ratatui::layout::{Position, Rect};
use tracing::debug;

/// Named rectangular sub-regions of a cell, in routing-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRegion {
    Content,
    Avatar,
    TopLabel,
    BottomLabel,
}

/// The single semantic event a pointer-up resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTap {
    Message,
    Avatar,
    TopLabel,
    BottomLabel,
}

/// Which regions participate in routing. `ContentOnly` is the policy for
/// hosts that only care about message taps; avatar and label rectangles
/// are ignored rather than removed, so the registry stays uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TapRoutingPolicy {
    #[default]
    AllRegions,
    ContentOnly,
}

#[derive(Debug, Clone, Default)]
pub struct HitRouter {
    regions: Vec<(CellRegion, Rect)>,
    policy: TapRoutingPolicy,
}

impl HitRouter {
    pub fn new(policy: TapRoutingPolicy) -> Self {
        Self {
            regions: Vec::new(),
            policy,
        }
    }

    pub fn set_policy(&mut self, policy: TapRoutingPolicy) {
        self.policy = policy;
    }

    pub fn policy(&self) -> TapRoutingPolicy {
        self.policy
    }

    /// Rebuild the registry from a fresh geometry snapshot. Called once
    /// per layout pass; the registry is read-only during resolution.
    pub fn rebuild(&mut self, content: Rect, avatar: Rect, top_label: Rect, bottom_label: Rect) {
        self.regions.clear();
        self.regions.push((CellRegion::Content, content));
        self.regions.push((CellRegion::Avatar, avatar));
        self.regions.push((CellRegion::TopLabel, top_label));
        self.regions.push((CellRegion::BottomLabel, bottom_label));
    }

    pub fn regions(&self) -> &[(CellRegion, Rect)] {
        &self.regions
    }

    /// Resolve a pointer-up at `point` (cell-local coordinates) to at most
    /// one tap. `content_claims` is the inner-content hook, given the
    /// point localized to the content frame; when it claims the point no
    /// message tap is emitted and resolution falls through to the
    /// remaining regions.
    pub fn resolve(
        &self,
        point: Position,
        content_claims: &dyn Fn(Position) -> bool,
    ) -> Option<CellTap> {
        for (region, rect) in &self.regions {
            if !rect.contains(point) {
                continue;
            }
            match region {
                CellRegion::Content => {
                    let local = Position::new(point.x - rect.x, point.y - rect.y);
                    if content_claims(local) {
                        debug!(?point, "inner content claimed pointer-up");
                        continue;
                    }
                    return Some(CellTap::Message);
                }
                CellRegion::Avatar if self.policy == TapRoutingPolicy::AllRegions => {
                    return Some(CellTap::Avatar);
                }
                CellRegion::TopLabel if self.policy == TapRoutingPolicy::AllRegions => {
                    return Some(CellTap::TopLabel);
                }
                CellRegion::BottomLabel if self.policy == TapRoutingPolicy::AllRegions => {
                    return Some(CellTap::BottomLabel);
                }
                _ => {}
            }
        }
        None
    }
}

/// The default inner-content hook: declines every point, so plain content
/// always routes message taps.
pub fn decline_all(_point: Position) -> bool {
    false
}
