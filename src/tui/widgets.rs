// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Stateless board widgets. Both render purely from their inputs; hit-testing reuses the same
//! slot geometry through [`PlannerColumn::card_slots`].

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Modifier,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::planner::ContainerLoad;

use super::theme::{CardState, TuiTheme};

/// Rows per card. The pointer midpoint between them decides before/after on hover.
pub(crate) const CARD_HEIGHT: u16 = 2;

const DASHED: border::Set = border::Set {
    top_left: "┌",
    top_right: "┐",
    bottom_left: "└",
    bottom_right: "┘",
    vertical_left: "┆",
    vertical_right: "┆",
    horizontal_top: "┄",
    horizontal_bottom: "┄",
};

/// One order: customer name over its demand.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderCard<'a> {
    name: &'a str,
    demand: u32,
    state: CardState,
    theme: &'a TuiTheme,
}

impl<'a> OrderCard<'a> {
    pub(crate) fn new(name: &'a str, demand: u32, theme: &'a TuiTheme) -> Self {
        Self { name, demand, state: CardState::Normal, theme }
    }

    pub(crate) fn state(mut self, state: CardState) -> Self {
        self.state = state;
        self
    }
}

impl Widget for OrderCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let style = self.theme.card_style(self.state);
        buf.set_style(area, style);

        let name = Line::from(vec![
            Span::raw(" "),
            Span::styled(self.name, style.add_modifier(Modifier::BOLD)),
        ]);
        buf.set_line(area.x, area.y, &name, area.width);

        if area.height > 1 {
            let mut digits = itoa::Buffer::new();
            let demand = Line::from(vec![
                Span::raw(" "),
                Span::styled(digits.format(self.demand), style),
                Span::styled("kg", style.add_modifier(Modifier::DIM)),
            ]);
            buf.set_line(area.x, area.y + 1, &demand, area.width);
        }
    }
}

/// One container: title, optional load readout, and its cards in sequence.
#[derive(Debug, Clone)]
pub(crate) struct PlannerColumn<'a> {
    title: &'a str,
    load: Option<ContainerLoad>,
    cards: Vec<OrderCard<'a>>,
    focused: bool,
    scroll: usize,
    theme: &'a TuiTheme,
}

impl<'a> PlannerColumn<'a> {
    pub(crate) fn new(title: &'a str, theme: &'a TuiTheme) -> Self {
        Self { title, load: None, cards: Vec::new(), focused: false, scroll: 0, theme }
    }

    /// Shows `load / capacity kg` in the title bar.
    pub(crate) fn load(mut self, load: ContainerLoad) -> Self {
        self.load = Some(load);
        self
    }

    pub(crate) fn cards(mut self, cards: Vec<OrderCard<'a>>) -> Self {
        self.cards = cards;
        self
    }

    pub(crate) fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Index of the first visible card.
    pub(crate) fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// The card list area inside the border; this is the column's drop target.
    pub(crate) fn inner(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    /// How many cards fit into `inner`.
    pub(crate) fn capacity(inner: Rect) -> usize {
        usize::from(inner.height / CARD_HEIGHT)
    }

    /// `(card index, rect)` for every visible card, given `count` cards and a scroll offset.
    pub(crate) fn card_slots(inner: Rect, count: usize, scroll: usize) -> Vec<(usize, Rect)> {
        let visible = Self::capacity(inner);
        (scroll..count)
            .take(visible)
            .enumerate()
            .map(|(row, index)| {
                let y = inner.y + (row as u16) * CARD_HEIGHT;
                (index, Rect::new(inner.x, y, inner.width, CARD_HEIGHT))
            })
            .collect()
    }

    fn readout(&self) -> Option<Line<'static>> {
        let load = self.load?;
        let mut digits = itoa::Buffer::new();
        let mut text = String::with_capacity(16);
        text.push(' ');
        text.push_str(digits.format(load.load));
        if let Some(capacity) = load.capacity {
            text.push_str(" / ");
            text.push_str(digits.format(capacity));
        }
        text.push_str(" kg ");
        Some(Line::styled(text, self.theme.readout_style(load.is_over_limit())).right_aligned())
    }
}

impl Widget for PlannerColumn<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let over_limit = self.load.is_some_and(|load| load.is_over_limit());
        let border_style = self.theme.column_border_style(self.focused, over_limit);

        let inner = Self::inner(area);
        let count = self.cards.len();
        let slots = Self::card_slots(inner, count, self.scroll);
        let hidden = count.saturating_sub(self.scroll + slots.len());

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Line::from(format!(" {} ", self.title)).style(border_style));
        if let Some(readout) = self.readout() {
            block = block.title(readout);
        }
        if hidden > 0 {
            let mut digits = itoa::Buffer::new();
            let more = format!(" +{} more ", digits.format(hidden));
            block = block.title_bottom(Line::styled(more, self.theme.placeholder_style()).right_aligned());
        }
        block.render(area, buf);

        if self.cards.is_empty() {
            render_placeholder(inner, buf, self.theme);
            return;
        }
        for (index, slot) in slots {
            self.cards[index].render(slot, buf);
        }
    }
}

fn render_placeholder(inner: Rect, buf: &mut Buffer, theme: &TuiTheme) {
    if inner.height < 3 || inner.width < 4 {
        return;
    }
    let slot = Rect::new(inner.x, inner.y, inner.width, 3);
    Paragraph::new("drop here")
        .alignment(Alignment::Center)
        .style(theme.placeholder_style())
        .block(Block::default().borders(Borders::ALL).border_set(DASHED))
        .render(slot, buf);
}
