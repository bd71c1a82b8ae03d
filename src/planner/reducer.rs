// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{ContainerKey, OrderId};

use super::partition::Partition;
use super::target::{DropTarget, InsertSide, PointerGeometry, Resolved};

/// Input from a drag-and-drop controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start {
        active: OrderId,
    },
    /// Hover update. `over` is `None` while the pointer is outside every target.
    Over {
        active: OrderId,
        over: Option<DropTarget>,
        pointer: Option<PointerGeometry>,
    },
    /// Release. `over` is `None` when released outside every target.
    End {
        active: OrderId,
        over: Option<DropTarget>,
        pointer: Option<PointerGeometry>,
    },
    Cancel,
}

/// What an event did to the planner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started {
        order_id: OrderId,
    },
    Moved {
        order_id: OrderId,
        from: ContainerKey,
        to: ContainerKey,
        index: usize,
    },
    Reordered {
        order_id: OrderId,
        container: ContainerKey,
        from_index: usize,
        to_index: usize,
    },
    /// Drag ended without changing the partition.
    Released {
        order_id: OrderId,
    },
    Cancelled,
    Ignored,
}

impl Transition {
    pub fn changed_partition(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Reordered { .. })
    }
}

/// Partition plus the transient drag session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerState {
    partition: Partition,
    active: Option<OrderId>,
}

impl PlannerState {
    pub fn new(partition: Partition) -> Self {
        Self { partition, active: None }
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub(crate) fn partition_mut(&mut self) -> &mut Partition {
        &mut self.partition
    }

    /// The order currently being dragged, if any.
    pub fn active(&self) -> Option<OrderId> {
        self.active
    }

    /// Applies one controller event.
    ///
    /// `Over` and `End` only act on the recorded session: events naming another order, or
    /// arriving with no session, are ignored. A `Start` during a session is ignored as well.
    pub fn apply(&mut self, event: DragEvent) -> Transition {
        match event {
            DragEvent::Start { .. } if self.active.is_some() => Transition::Ignored,
            DragEvent::Start { active } => self.start(active),
            DragEvent::Over { active, .. } | DragEvent::End { active, .. }
                if self.active != Some(active) =>
            {
                tracing::trace!(%active, session = ?self.active, "drag event outside its session");
                Transition::Ignored
            }
            DragEvent::Over { active, over, pointer } => self.hover(active, over, pointer),
            DragEvent::End { active, over, pointer } => {
                let transition = self.release(active, over, pointer);
                self.active = None;
                transition
            }
            DragEvent::Cancel => match self.active.take() {
                Some(_) => Transition::Cancelled,
                None => Transition::Ignored,
            },
        }
    }

    fn start(&mut self, active: OrderId) -> Transition {
        if self.partition.locate(active).is_none() {
            return Transition::Ignored;
        }
        self.active = Some(active);
        Transition::Started { order_id: active }
    }

    fn hover(
        &mut self,
        active: OrderId,
        over: Option<DropTarget>,
        pointer: Option<PointerGeometry>,
    ) -> Transition {
        let Some(over) = over else {
            return Transition::Ignored;
        };
        if over == DropTarget::Order(active) {
            return Transition::Ignored;
        }
        let Some(from) = self.partition.locate(active) else {
            return Transition::Ignored;
        };
        let resolved = self.partition.resolve(over);
        match resolved.container() {
            Some(to) if to != from => self.move_across(active, from, to, resolved, pointer),
            _ => Transition::Ignored,
        }
    }

    fn release(
        &mut self,
        active: OrderId,
        over: Option<DropTarget>,
        pointer: Option<PointerGeometry>,
    ) -> Transition {
        let released = Transition::Released { order_id: active };
        let (Some(from), Some(over)) = (self.partition.locate(active), over) else {
            return released;
        };
        let resolved = self.partition.resolve(over);
        match resolved.container() {
            Some(to) if to == from => self.reorder_within(active, from, resolved),
            Some(to) => self.move_across(active, from, to, resolved, pointer),
            None => released,
        }
    }

    fn move_across(
        &mut self,
        active: OrderId,
        from: ContainerKey,
        to: ContainerKey,
        resolved: Resolved,
        pointer: Option<PointerGeometry>,
    ) -> Transition {
        let destination = self.partition.orders_in(to);
        let index = match resolved {
            Resolved::Order { order_id, .. } => {
                let over_index = destination
                    .iter()
                    .position(|id| *id == order_id)
                    .unwrap_or(destination.len());
                match pointer.map(|geometry| geometry.side()) {
                    Some(InsertSide::After) => over_index + 1,
                    Some(InsertSide::Before) | None => over_index,
                }
            }
            Resolved::Container(_) | Resolved::NotFound => destination.len(),
        };

        match self.partition.move_to(active, to, index) {
            Ok(index) => Transition::Moved { order_id: active, from, to, index },
            Err(err) => {
                tracing::warn!(%err, "drag move rejected");
                Transition::Ignored
            }
        }
    }

    fn reorder_within(
        &mut self,
        active: OrderId,
        container: ContainerKey,
        resolved: Resolved,
    ) -> Transition {
        let released = Transition::Released { order_id: active };
        let orders = self.partition.orders_in(container);
        let Some(from_index) = orders.iter().position(|id| *id == active) else {
            return released;
        };
        let to_index = match resolved {
            Resolved::Order { order_id, .. } => {
                match orders.iter().position(|id| *id == order_id) {
                    Some(index) => index,
                    None => return released,
                }
            }
            Resolved::Container(_) | Resolved::NotFound => orders.len().saturating_sub(1),
        };
        if from_index == to_index {
            return released;
        }

        match self.partition.reorder(container, from_index, to_index) {
            Ok(()) => Transition::Reordered { order_id: active, container, from_index, to_index },
            Err(err) => {
                tracing::warn!(%err, "drag reorder rejected");
                released
            }
        }
    }
}

/// Pure reducer form of [`PlannerState::apply`]: returns the next state, leaves `state` untouched.
pub fn reduce(state: &PlannerState, event: DragEvent) -> PlannerState {
    let mut next = state.clone();
    next.apply(event);
    next
}
