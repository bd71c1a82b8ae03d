// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use crate::model::{ContainerKey, OrderId, ParseContainerKeyError};

/// What a drag controller reports the pointer is over.
///
/// Drag controllers address whole columns and single cards through one id namespace; the tag
/// makes the two roles explicit so resolution never has to guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropTarget {
    Container(ContainerKey),
    Order(OrderId),
}

impl From<ContainerKey> for DropTarget {
    fn from(key: ContainerKey) -> Self {
        Self::Container(key)
    }
}

impl From<OrderId> for DropTarget {
    fn from(order_id: OrderId) -> Self {
        Self::Order(order_id)
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container(key) => key.fmt(f),
            Self::Order(order_id) => order_id.fmt(f),
        }
    }
}

/// Parses a raw controller id: bare integers name cards, anything else must be a container key.
impl FromStr for DropTarget {
    type Err = ParseContainerKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(order_id) = s.parse::<OrderId>() {
            return Ok(Self::Order(order_id));
        }
        s.parse::<ContainerKey>().map(Self::Container)
    }
}

/// Result of resolving a [`DropTarget`] against the current partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Container(ContainerKey),
    Order { order_id: OrderId, container: ContainerKey },
    NotFound,
}

impl Resolved {
    pub fn container(self) -> Option<ContainerKey> {
        match self {
            Self::Container(key) | Self::Order { container: key, .. } => Some(key),
            Self::NotFound => None,
        }
    }
}

/// Vertical geometry of a hover: where the pointer is, and the box of the card it is over.
///
/// Units are whatever the controller measures in (terminal rows, CSS pixels); only the comparison
/// against the card's midpoint matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGeometry {
    pub pointer_y: f64,
    pub over_top: f64,
    pub over_height: f64,
}

impl PointerGeometry {
    pub fn new(pointer_y: f64, over_top: f64, over_height: f64) -> Self {
        Self { pointer_y, over_top, over_height }
    }

    pub fn side(&self) -> InsertSide {
        if self.pointer_y > self.over_top + self.over_height / 2.0 {
            InsertSide::After
        } else {
            InsertSide::Before
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertSide {
    Before,
    After,
}
