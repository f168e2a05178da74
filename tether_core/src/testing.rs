// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for the backend contract.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kurbo::Size;

use crate::backend::{Presenter, Renderable, Visuals};
use crate::entity::{Anchor, EntityId};

/// A renderable of constant size that counts visual syncs.
#[derive(Debug)]
pub(crate) struct FixedSize {
    size: Size,
    synced: AtomicUsize,
}

impl FixedSize {
    pub(crate) fn synced(&self) -> usize {
        self.synced.load(Ordering::Relaxed)
    }
}

impl Renderable for FixedSize {
    fn size(&self) -> Size {
        self.size
    }

    fn sync_visuals(&self) {
        self.synced.fetch_add(1, Ordering::Relaxed);
    }
}

pub(crate) fn fixed(width: f64, height: f64) -> Arc<FixedSize> {
    Arc::new(FixedSize {
        size: Size::new(width, height),
        synced: AtomicUsize::new(0),
    })
}

#[derive(Debug, Default)]
struct Record {
    parent: Option<Anchor>,
    visuals: Option<Visuals>,
    applied: usize,
    detached: usize,
}

/// A presenter that records what it was told.
#[derive(Debug, Default)]
pub(crate) struct RecordingPresenter {
    records: HashMap<EntityId, Record>,
}

impl RecordingPresenter {
    pub(crate) fn parent_of(&self, id: EntityId) -> Option<Anchor> {
        self.records.get(&id).and_then(|r| r.parent)
    }

    pub(crate) fn visuals_of(&self, id: EntityId) -> Option<Visuals> {
        self.records.get(&id).and_then(|r| r.visuals)
    }

    pub(crate) fn apply_count(&self, id: EntityId) -> usize {
        self.records.get(&id).map_or(0, |r| r.applied)
    }

    pub(crate) fn detach_count(&self, id: EntityId) -> usize {
        self.records.get(&id).map_or(0, |r| r.detached)
    }
}

impl Presenter for RecordingPresenter {
    fn parent(&self, id: EntityId) -> Option<Anchor> {
        self.parent_of(id)
    }

    fn attach(&mut self, id: EntityId, parent: Anchor) {
        let record = self.records.entry(id).or_default();
        assert!(record.parent.is_none(), "attach while attached");
        record.parent = Some(parent);
    }

    fn detach(&mut self, id: EntityId) {
        let record = self.records.entry(id).or_default();
        record.parent = None;
        record.detached += 1;
    }

    fn apply(&mut self, id: EntityId, visuals: &Visuals) {
        let record = self.records.entry(id).or_default();
        record.visuals = Some(*visuals);
        record.applied += 1;
    }
}
