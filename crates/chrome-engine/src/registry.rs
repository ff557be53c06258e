//! Registry of live frames, the pin owner, and the current pin session.
//!
//! The registry holds weak handles only; frames remove themselves during
//! dispose. Its lock is never held while a frame lock is taken.

use std::{
    collections::BTreeMap,
    sync::{
        Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use chrome_anim::FrameId;
use chrome_geom::{Point, RectPx};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    context::FrameKind,
    frame::{FrameChrome, FrameInner},
    pin::{PinLink, PinSession},
};

/// Registry contents.
#[derive(Default)]
struct RegistryState {
    /// Frames by id.
    frames: BTreeMap<FrameId, Weak<FrameInner>>,
    /// Pin owner: the first console frame shown.
    owner: Option<FrameId>,
    /// Links of the owner drag in progress.
    session: Option<PinSession>,
}

/// Live frames of one shell.
pub struct FrameRegistry {
    /// Contents.
    state: Mutex<RegistryState>,
    /// Next frame id.
    next_id: AtomicU64,
}

impl FrameRegistry {
    /// Empty registry.
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocate a fresh frame id.
    pub(crate) fn allocate_id(&self) -> FrameId {
        FrameId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Track a newly built frame.
    pub(crate) fn insert(&self, id: FrameId, frame: Weak<FrameInner>) {
        self.state.lock().frames.insert(id, frame);
    }

    /// Make `id` the owner if it is a console and no owner exists.
    ///
    /// Returns `true` when `id` is the owner afterwards.
    pub(crate) fn claim_owner(&self, id: FrameId, kind: FrameKind) -> bool {
        let mut st = self.state.lock();
        if st.owner.is_none() && kind == FrameKind::Console {
            st.owner = Some(id);
            debug!(frame = %id, "pin_owner_claimed");
        }
        st.owner == Some(id)
    }

    /// Forget a disposed frame.
    pub(crate) fn remove(&self, id: FrameId) {
        let mut st = self.state.lock();
        st.frames.remove(&id);
        if st.owner == Some(id) {
            st.owner = None;
            st.session = None;
            debug!(frame = %id, "pin_owner_released");
        }
    }

    /// Current pin owner.
    pub fn owner(&self) -> Option<FrameId> {
        self.state.lock().owner
    }

    /// Number of live frames.
    pub fn len(&self) -> usize {
        self.frames().len()
    }

    /// True when no frame is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of live frames in creation order.
    pub fn ids(&self) -> Vec<FrameId> {
        self.frames().iter().map(FrameChrome::id).collect()
    }

    /// Live frame with `id`.
    pub fn get(&self, id: FrameId) -> Option<FrameChrome> {
        let weak = self.state.lock().frames.get(&id).cloned()?;
        weak.upgrade().map(FrameChrome::from_inner)
    }

    /// All live frames in creation order.
    pub fn frames(&self) -> Vec<FrameChrome> {
        let weak: Vec<Weak<FrameInner>> = self.state.lock().frames.values().cloned().collect();
        weak.iter()
            .filter_map(Weak::upgrade)
            .map(FrameChrome::from_inner)
            .collect()
    }

    /// Start an owner drag session, linking overlapping owner-pinned frames.
    pub(crate) fn begin_pin_session(&self, owner: FrameId, owner_bounds: RectPx) {
        let candidates: Vec<(FrameId, RectPx)> = self
            .frames()
            .into_iter()
            .filter(|f| f.id() != owner && f.is_open() && f.pin_mode().follows_owner())
            .map(|f| (f.id(), f.bounds()))
            .collect();
        let session = PinSession::plan(owner, owner_bounds, candidates);
        trace!(
            frame = %owner,
            followers = session.followers(),
            "pin_session_start"
        );
        let mut st = self.state.lock();
        if st.owner == Some(owner) {
            st.session = Some(session);
        }
    }

    /// Follower origins for the owner at `owner_origin`.
    pub(crate) fn pin_targets(&self, owner: FrameId, owner_origin: Point) -> Vec<(FrameId, Point)> {
        let st = self.state.lock();
        st.session
            .as_ref()
            .filter(|s| s.owner() == owner)
            .map(|s| s.targets(owner_origin))
            .unwrap_or_default()
    }

    /// End the owner drag session of `owner`.
    pub(crate) fn end_pin_session(&self, owner: FrameId) {
        let mut st = self.state.lock();
        if st.session.as_ref().is_some_and(|s| s.owner() == owner) {
            st.session = None;
            trace!(frame = %owner, "pin_session_end");
        }
    }

    /// Link of `id` in the session in progress.
    pub fn pin_link(&self, id: FrameId) -> Option<PinLink> {
        self.state.lock().session.as_ref().and_then(|s| s.link(id))
    }
}
