//! Pin modes and the owner-drag pin session.
//!
//! When a drag starts on the owner frame, every owner-pinned frame that
//! overlaps the owner at that instant is linked with its offset to the
//! owner's origin. Frames that do not overlap get [`PinLink::Unrelated`] and
//! stay put for the whole session, even if the owner later moves over them.

use std::fmt;

use chrome_anim::FrameId;
use chrome_geom::{Point, RectPx};
use serde::Serialize;

/// How a frame is pinned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PinMode {
    /// Normal stacking.
    #[default]
    None,
    /// Always on top, independent of any owner.
    Screen,
    /// Always on top and follows the owner frame while it is dragged.
    Owner,
}

impl PinMode {
    /// True for both pinned modes.
    pub fn always_on_top(self) -> bool {
        !matches!(self, Self::None)
    }

    /// True when the frame follows the owner.
    pub fn follows_owner(self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Mode selected by the next click on the pin button.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Screen,
            Self::Screen => Self::Owner,
            Self::Owner => Self::None,
        }
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Screen => "screen",
            Self::Owner => "owner",
        };
        f.write_str(s)
    }
}

/// Relation of a pinned frame to the owner for one drag session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinLink {
    /// Keep this offset from the owner's origin.
    Follow {
        /// Horizontal offset.
        dx: i32,
        /// Vertical offset.
        dy: i32,
    },
    /// Did not overlap at session start; never moved this session.
    Unrelated,
}

/// Links computed at the start of one owner drag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinSession {
    /// Owner being dragged.
    owner: FrameId,
    /// Link for every owner-pinned frame seen at session start.
    links: Vec<(FrameId, PinLink)>,
}

impl PinSession {
    /// Compute links for `candidates` (owner-pinned frames with their bounds).
    pub fn plan(
        owner: FrameId,
        owner_bounds: RectPx,
        candidates: impl IntoIterator<Item = (FrameId, RectPx)>,
    ) -> Self {
        let origin = owner_bounds.origin();
        let links = candidates
            .into_iter()
            .filter(|(id, _)| *id != owner)
            .map(|(id, bounds)| {
                let link = if bounds.overlaps(&owner_bounds) {
                    let (dx, dy) = origin.delta_to(bounds.origin());
                    PinLink::Follow { dx, dy }
                } else {
                    PinLink::Unrelated
                };
                (id, link)
            })
            .collect();
        Self { owner, links }
    }

    /// Owner frame.
    pub fn owner(&self) -> FrameId {
        self.owner
    }

    /// Link recorded for `id`, if it was a candidate.
    pub fn link(&self, id: FrameId) -> Option<PinLink> {
        self.links.iter().find(|(f, _)| *f == id).map(|(_, l)| *l)
    }

    /// Number of frames that follow the owner this session.
    pub fn followers(&self) -> usize {
        self.links
            .iter()
            .filter(|(_, l)| matches!(l, PinLink::Follow { .. }))
            .count()
    }

    /// Target origins for followers when the owner is at `owner_origin`.
    pub fn targets(&self, owner_origin: Point) -> Vec<(FrameId, Point)> {
        self.links
            .iter()
            .filter_map(|(id, link)| match link {
                PinLink::Follow { dx, dy } => Some((*id, owner_origin.offset(*dx, *dy))),
                PinLink::Unrelated => None,
            })
            .collect()
    }
}
