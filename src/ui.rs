// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Save status shared between the board and the background save task.
//!
//! Only one save may be outstanding at a time; the trigger is refused while `saving` is set.

use crate::api::SaveTarget;
use crate::model::RouteId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { target: SaveTarget, route_id: Option<RouteId> },
    Failed { target: SaveTarget, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveState {
    rev: u64,
    saving: bool,
    dirty: bool,
    target: SaveTarget,
    last: Option<SaveOutcome>,
}

impl SaveState {
    pub fn new(target: SaveTarget) -> Self {
        Self { target, ..Self::default() }
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    /// True when the partition changed since the last successful save.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn target(&self) -> SaveTarget {
        self.target
    }

    pub fn last(&self) -> Option<&SaveOutcome> {
        self.last.as_ref()
    }

    pub fn mark_dirty(&mut self) {
        if !self.dirty {
            self.dirty = true;
            self.bump();
        }
    }

    /// Claims the save slot. Returns the target to save to, or `None` while a save is in flight.
    pub fn begin(&mut self) -> Option<SaveTarget> {
        if self.saving {
            return None;
        }
        self.saving = true;
        self.bump();
        Some(self.target)
    }

    /// Records the result of the save started by [`SaveState::begin`].
    ///
    /// Edits made while the save was in flight keep the state dirty only if `edited_during_save`.
    pub fn finish(
        &mut self,
        result: Result<Option<RouteId>, String>,
        edited_during_save: bool,
    ) -> &SaveOutcome {
        let target = self.target;
        self.saving = false;
        let outcome = match result {
            Ok(route_id) => {
                self.target = target.after_save(route_id);
                self.dirty = edited_during_save;
                SaveOutcome::Saved { target, route_id }
            }
            Err(message) => SaveOutcome::Failed { target, message },
        };
        self.bump();
        self.last.insert(outcome)
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}
