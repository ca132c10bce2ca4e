// src/board.rs
//
// The complaint collection a presenter holds for one viewer: loaded once
// through the viewer's fetch shape, narrowed by the current search, and
// patched in place when a remote write succeeds.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DeskError, Result};
use crate::models::{Complaint, ComplaintStatus};
use crate::policy::{self, Actions, Viewer};
use crate::search;
use crate::store::ComplaintStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardRow {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub actions: Actions,
}

/// What a list screen renders: visible rows plus the empty-state flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub query: String,
    pub total: usize,
    pub empty: bool,
    pub rows: Vec<BoardRow>,
}

/// Index-level difference between two visible lists, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListPatch {
    /// Positions in the old list that are gone.
    pub removed: Vec<usize>,
    /// Positions in the new list that are new.
    pub inserted: Vec<usize>,
    /// Positions in the new list whose content changed.
    pub changed: Vec<usize>,
}

impl ListPatch {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty() && self.changed.is_empty()
    }
}

pub fn diff(old: &[Complaint], new: &[Complaint]) -> ListPatch {
    let old_by_id: HashMap<&str, &Complaint> = old.iter().map(|c| (c.id.as_str(), c)).collect();
    let new_ids: HashMap<&str, ()> = new.iter().map(|c| (c.id.as_str(), ())).collect();

    let removed = old
        .iter()
        .enumerate()
        .filter(|(_, c)| !new_ids.contains_key(c.id.as_str()))
        .map(|(i, _)| i)
        .collect();

    let mut inserted = Vec::new();
    let mut changed = Vec::new();
    for (i, c) in new.iter().enumerate() {
        match old_by_id.get(c.id.as_str()) {
            None => inserted.push(i),
            Some(prev) if *prev != c => changed.push(i),
            Some(_) => {}
        }
    }

    ListPatch { removed, inserted, changed }
}

pub struct ComplaintBoard {
    store: Arc<dyn ComplaintStore>,
    viewer: Viewer,
    held: Vec<Complaint>,
    query: String,
    visible: Vec<Complaint>,
}

impl ComplaintBoard {
    pub fn new(store: Arc<dyn ComplaintStore>, viewer: Viewer) -> Self {
        Self { store, viewer, held: Vec::new(), query: String::new(), visible: Vec::new() }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Fetches with the viewer's query shape and applies inclusion. A failed
    /// fetch keeps whatever was held before.
    pub async fn load(&mut self) -> Result<ListPatch> {
        let shape = self.viewer.fetch_shape();
        let fetched = self.store.fetch(&shape).await.map_err(|e| {
            warn!(viewer = self.viewer.email(), error = %e, "complaint fetch failed");
            e
        })?;
        let fetched_len = fetched.len();
        let included = policy::retain_included(&self.viewer, fetched);
        debug!(
            viewer = self.viewer.email(),
            role = self.viewer.role_name(),
            fetched = fetched_len,
            included = included.len(),
            "complaints loaded"
        );
        Ok(self.replace(included))
    }

    /// Swaps the held collection wholesale and re-runs the current query.
    pub fn replace(&mut self, collection: Vec<Complaint>) -> ListPatch {
        self.held = collection;
        self.refresh()
    }

    /// Stores `query` and recomputes the visible rows.
    pub fn search(&mut self, query: &str) -> ListPatch {
        self.query = query.to_string();
        self.refresh()
    }

    fn refresh(&mut self) -> ListPatch {
        let next = search::filter_complaints(&self.held, &self.query);
        let patch = diff(&self.visible, &next);
        self.visible = next;
        patch
    }

    pub fn view(&self) -> BoardView {
        let rows: Vec<BoardRow> = self
            .visible
            .iter()
            .map(|c| BoardRow { complaint: c.clone(), actions: policy::actions_for(&self.viewer, c) })
            .collect();
        BoardView { query: self.query.clone(), total: self.held.len(), empty: rows.is_empty(), rows }
    }

    /// Held complaint by id; the board never reaches past its own collection.
    pub fn find(&self, id: &str) -> Result<&Complaint> {
        self.held
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DeskError::not_found("complaint", id))
    }

    pub fn actions(&self, id: &str) -> Result<Actions> {
        Ok(policy::actions_for(&self.viewer, self.find(id)?))
    }

    /// Writes `{status, remarks}` remotely, then mirrors it locally.
    pub async fn update_status(
        &mut self,
        id: &str,
        status: ComplaintStatus,
        remarks: &str,
    ) -> Result<Complaint> {
        if !self.actions(id)?.update {
            return Err(DeskError::forbidden("update complaint status"));
        }
        let remarks = remarks.trim();
        self.store.update_status(id, status, remarks).await?;

        let held = self
            .held
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DeskError::not_found("complaint", id))?;
        held.status = Some(status.as_str().to_string());
        held.remarks = Some(remarks.to_string());
        let updated = held.clone();
        self.refresh();
        Ok(updated)
    }

    /// Deletes remotely, then drops exactly that record from the board.
    pub async fn remove(&mut self, id: &str) -> Result<()> {
        if !self.actions(id)?.remove {
            return Err(DeskError::forbidden("remove complaint"));
        }
        self.store.delete(id).await?;
        self.held.retain(|c| c.id != id);
        self.refresh();
        Ok(())
    }
}
