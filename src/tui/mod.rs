// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The planning board (ratatui + crossterm). Keyboard and mouse input become drag events for the
//! [`Planner`]; saves and order reloads run as tasks on the tokio runtime and report back over a
//! channel that the UI loop drains every tick.

mod search;
mod theme;
mod widgets;

use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::api::{OrderSource, SaveTarget, SolutionSink};
use crate::model::{ContainerKey, Order, OrderFilter, OrderId, RouteId};
use crate::planner::{DragEvent, DropTarget, Planner, PointerGeometry, Transition};
use crate::ui::{SaveOutcome, SaveState};

use search::{candidates_from_planner, ranked_search_results, SearchCandidate};
use theme::{CardState, TuiTheme};
use widgets::{OrderCard, PlannerColumn, CARD_HEIGHT};

const TICK: Duration = Duration::from_millis(250);
const TOAST_TTL: Duration = Duration::from_secs(3);
const MIN_COLUMN_WIDTH: u16 = 24;
const OVERLAY_WIDTH: u16 = 26;
const HELP_LINES: &[(&str, &str)] = &[
    ("h/l ←/→", "move between columns"),
    ("j/k ↑/↓", "move between cards"),
    ("space", "pick up / drop the card"),
    ("esc", "cancel the drag"),
    ("mouse", "drag cards between columns"),
    ("s", "save the solution"),
    ("r", "reload orders"),
    ("/", "search orders (n/N next/prev)"),
    ("?", "toggle help"),
    ("q", "quit"),
];

/// Everything the board talks to outside the planner.
pub struct Collaborators {
    /// Shown in the header, e.g. the backend url or snapshot path.
    pub label: String,
    pub orders: Arc<dyn OrderSource>,
    pub sink: Arc<dyn SolutionSink>,
    pub filter: OrderFilter,
    pub target: SaveTarget,
}

/// Runs the board until the user quits.
///
/// Blocks the calling thread; call it from a blocking task so `runtime` keeps driving the spawned
/// save and reload tasks.
pub fn run(planner: Planner, collaborators: Collaborators, runtime: Handle) -> io::Result<()> {
    let theme = TuiTheme::from_env().unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring theme override");
        TuiTheme::default()
    });
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(planner, collaborators, runtime, theme);

    while !app.should_quit {
        app.poll_tasks();
        app.expire_toast(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    tracing::info!(dirty = app.save.dirty(), "board closed");
    Ok(())
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SearchMode {
    #[default]
    Inactive,
    Editing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Cursor {
    column: usize,
    card: usize,
}

/// Screen geometry of one rendered column, kept from the last draw for mouse hit-testing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnHit {
    column: usize,
    key: ContainerKey,
    area: Rect,
    cards: Vec<(OrderId, Rect)>,
}

#[derive(Debug)]
enum TaskResult {
    Saved(Result<Option<RouteId>, String>),
    Reloaded(Result<Vec<Order>, String>),
}

struct App {
    planner: Planner,
    save: SaveState,
    edited_during_save: bool,
    reloading: bool,
    label: String,
    orders: Arc<dyn OrderSource>,
    sink: Arc<dyn SolutionSink>,
    filter: OrderFilter,
    runtime: Handle,
    tasks_tx: mpsc::UnboundedSender<TaskResult>,
    tasks_rx: mpsc::UnboundedReceiver<TaskResult>,
    theme: TuiTheme,
    cursor: Cursor,
    first_column: usize,
    hits: Vec<ColumnHit>,
    mouse_drag: bool,
    pointer: Option<(u16, u16)>,
    hover_anchor: Option<DropTarget>,
    search_mode: SearchMode,
    search_query: String,
    search_candidates: Vec<SearchCandidate>,
    search_results: Vec<OrderId>,
    search_result_index: usize,
    show_help: bool,
    toast: Option<Toast>,
    quit_armed: bool,
    should_quit: bool,
}

impl App {
    fn new(planner: Planner, collaborators: Collaborators, runtime: Handle, theme: TuiTheme) -> Self {
        let (tasks_tx, tasks_rx) = mpsc::unbounded_channel();
        let Collaborators { label, orders, sink, filter, target } = collaborators;
        Self {
            planner,
            save: SaveState::new(target),
            edited_during_save: false,
            reloading: false,
            label,
            orders,
            sink,
            filter,
            runtime,
            tasks_tx,
            tasks_rx,
            theme,
            cursor: Cursor::default(),
            first_column: 0,
            hits: Vec::new(),
            mouse_drag: false,
            pointer: None,
            hover_anchor: None,
            search_mode: SearchMode::Inactive,
            search_query: String::new(),
            search_candidates: Vec::new(),
            search_results: Vec::new(),
            search_result_index: 0,
            show_help: false,
            toast: None,
            quit_armed: false,
            should_quit: false,
        }
    }

    fn column_count(&self) -> usize {
        self.planner.partition().containers().len()
    }

    fn column_key(&self, column: usize) -> Option<ContainerKey> {
        self.planner.partition().containers().get(column).map(|container| container.key())
    }

    fn column_orders(&self, column: usize) -> &[OrderId] {
        self.planner
            .partition()
            .containers()
            .get(column)
            .map(|container| container.orders())
            .unwrap_or(&[])
    }

    fn cursor_order(&self) -> Option<OrderId> {
        self.column_orders(self.cursor.column).get(self.cursor.card).copied()
    }

    fn clamp_cursor(&mut self) {
        let columns = self.column_count();
        self.cursor.column = self.cursor.column.min(columns.saturating_sub(1));
        let cards = self.column_orders(self.cursor.column).len();
        self.cursor.card = self.cursor.card.min(cards.saturating_sub(1));
    }

    /// Moves the cursor onto `order_id` wherever it currently sits.
    fn focus_order(&mut self, order_id: OrderId) {
        let position = self.planner.partition().containers().iter().enumerate().find_map(
            |(column, container)| container.position(order_id).map(|card| (column, card)),
        );
        if let Some((column, card)) = position {
            self.cursor = Cursor { column, card };
        }
    }

    fn dispatch(&mut self, event: DragEvent) -> Transition {
        let transition = self.planner.dispatch(event);
        if transition.changed_partition() {
            self.note_partition_change();
        }
        match transition {
            Transition::Started { order_id }
            | Transition::Moved { order_id, .. }
            | Transition::Reordered { order_id, .. }
            | Transition::Released { order_id } => self.focus_order(order_id),
            Transition::Cancelled | Transition::Ignored => self.clamp_cursor(),
        }
        transition
    }

    fn note_partition_change(&mut self) {
        self.save.mark_dirty();
        if self.save.saving() {
            self.edited_during_save = true;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if code != KeyCode::Char('q') {
            self.quit_armed = false;
        }

        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return self.request_quit(),
                _ => {}
            }
            return false;
        }

        match self.search_mode {
            SearchMode::Editing => {
                self.handle_search_edit_key(code);
                return false;
            }
            SearchMode::Results if code == KeyCode::Esc => {
                self.clear_search();
                return false;
            }
            SearchMode::Results | SearchMode::Inactive => {}
        }

        match code {
            KeyCode::Char('q') => return self.request_quit(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('/') => self.enter_search_mode(),
            KeyCode::Char('n') => self.search_step(1),
            KeyCode::Char('N') => self.search_step(-1),
            KeyCode::Char('s') => self.request_save(),
            KeyCode::Char('r') => self.request_reload(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_pick(),
            KeyCode::Esc => self.cancel_drag(),
            KeyCode::Left | KeyCode::Char('h') => self.move_column(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_column(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_card(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_card(1),
            KeyCode::Home | KeyCode::Char('g') => self.cursor.card = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor.card = self.column_orders(self.cursor.column).len().saturating_sub(1);
            }
            _ => {}
        }

        false
    }

    /// Quitting with unsaved edits or a save in flight needs a second `q`.
    fn request_quit(&mut self) -> bool {
        if self.quit_armed || !(self.save.dirty() || self.save.saving()) {
            return true;
        }
        self.quit_armed = true;
        let reason = if self.save.saving() { "A save is in flight" } else { "Unsaved changes" };
        self.set_toast(format!("{reason}; press q again to quit"));
        false
    }

    fn move_column(&mut self, delta: isize) {
        let columns = self.column_count();
        if columns == 0 {
            return;
        }
        let target = self.cursor.column.saturating_add_signed(delta).min(columns - 1);
        if target == self.cursor.column {
            return;
        }

        let Some(active) = self.planner.state().active() else {
            self.cursor.column = target;
            self.clamp_cursor();
            return;
        };
        let Some(key) = self.column_key(target) else {
            return;
        };
        let over = match self.column_orders(target).get(self.cursor.card) {
            Some(&order_id) => DropTarget::Order(order_id),
            None => DropTarget::Container(key),
        };
        if self.dispatch(DragEvent::Over { active, over: Some(over), pointer: None })
            == Transition::Ignored
        {
            self.cursor.column = target;
        }
    }

    fn move_card(&mut self, delta: isize) {
        let cards = self.column_orders(self.cursor.column).len();
        if cards == 0 {
            return;
        }
        self.cursor.card = self.cursor.card.saturating_add_signed(delta).min(cards - 1);
    }

    /// Space: pick up the card under the cursor, or drop the held card at the cursor.
    fn toggle_pick(&mut self) {
        match self.planner.state().active() {
            None => {
                if let Some(order_id) = self.cursor_order() {
                    self.mouse_drag = false;
                    self.dispatch(DragEvent::Start { active: order_id });
                }
            }
            Some(active) => {
                let over = match (self.cursor_order(), self.column_key(self.cursor.column)) {
                    (Some(order_id), _) => Some(DropTarget::Order(order_id)),
                    (None, Some(key)) => Some(DropTarget::Container(key)),
                    (None, None) => None,
                };
                self.dispatch(DragEvent::End { active, over, pointer: None });
            }
        }
    }

    fn cancel_drag(&mut self) {
        if self.planner.state().active().is_some() {
            self.mouse_drag = false;
            self.pointer = None;
            self.dispatch(DragEvent::Cancel);
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.show_help || self.search_mode == SearchMode::Editing {
            return;
        }
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(order_id) = self.card_at(x, y) {
                    if self.planner.state().active().is_some() {
                        self.dispatch(DragEvent::Cancel);
                    }
                    self.mouse_drag = true;
                    self.pointer = Some((x, y));
                    self.hover_anchor = None;
                    self.dispatch(DragEvent::Start { active: order_id });
                } else if let Some(column) = self.column_at(x, y) {
                    self.cursor.column = column;
                    self.clamp_cursor();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(active) = self.planner.state().active().filter(|_| self.mouse_drag) else {
                    return;
                };
                self.pointer = Some((x, y));
                let (over, pointer) = self.target_at(x, y);
                if over != self.hover_anchor {
                    self.hover_anchor = None;
                }
                if let Transition::Moved { .. } = self.dispatch(DragEvent::Over { active, over, pointer }) {
                    self.hover_anchor = over;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if !self.mouse_drag {
                    return;
                }
                self.mouse_drag = false;
                self.pointer = None;
                let anchor = self.hover_anchor.take();
                let Some(active) = self.planner.state().active() else {
                    return;
                };
                match self.target_at(x, y) {
                    // Still over the target that pulled the card in: settle where it landed.
                    (Some(over), _) if Some(over) == anchor => {
                        let over = Some(DropTarget::Order(active));
                        self.dispatch(DragEvent::End { active, over, pointer: None });
                    }
                    (Some(over), pointer) => {
                        self.dispatch(DragEvent::End { active, over: Some(over), pointer });
                    }
                    (None, _) => {
                        self.dispatch(DragEvent::Cancel);
                    }
                }
            }
            MouseEventKind::ScrollDown => self.move_card(1),
            MouseEventKind::ScrollUp => self.move_card(-1),
            _ => {}
        }
    }

    fn card_at(&self, x: u16, y: u16) -> Option<OrderId> {
        let position = Position::new(x, y);
        self.hits
            .iter()
            .flat_map(|hit| hit.cards.iter())
            .find(|(_, rect)| rect.contains(position))
            .map(|(order_id, _)| *order_id)
    }

    fn column_at(&self, x: u16, y: u16) -> Option<usize> {
        let position = Position::new(x, y);
        self.hits.iter().find(|hit| hit.area.contains(position)).map(|hit| hit.column)
    }

    /// Drop target under the pointer. Cards report their geometry; the pointer sits at the cell
    /// centre, so the upper row of a two-row card resolves to "before" and the lower to "after".
    fn target_at(&self, x: u16, y: u16) -> (Option<DropTarget>, Option<PointerGeometry>) {
        let position = Position::new(x, y);
        let Some(hit) = self.hits.iter().find(|hit| hit.area.contains(position)) else {
            return (None, None);
        };
        match hit.cards.iter().find(|(_, rect)| rect.contains(position)) {
            Some((order_id, rect)) => (
                Some(DropTarget::Order(*order_id)),
                Some(PointerGeometry::new(
                    f64::from(y) + 0.5,
                    f64::from(rect.y),
                    f64::from(rect.height),
                )),
            ),
            None => (Some(DropTarget::Container(hit.key)), None),
        }
    }

    fn request_save(&mut self) {
        let Some(target) = self.save.begin() else {
            self.set_toast("A save is already in flight");
            return;
        };
        self.edited_during_save = false;
        let solution = self.planner.solution();
        tracing::info!(%target, vehicles = solution.vehicles.len(), "saving solution");

        let sink = Arc::clone(&self.sink);
        let tx = self.tasks_tx.clone();
        self.runtime.spawn(async move {
            let result = sink.save_solution(target, &solution).await;
            if let Err(err) = &result {
                tracing::warn!(%err, %target, "save failed");
            }
            let _ = tx.send(TaskResult::Saved(result.map_err(|err| err.to_string())));
        });
        self.set_toast(format!("Saving to {target}…"));
    }

    fn request_reload(&mut self) {
        if self.reloading {
            return;
        }
        self.reloading = true;
        let orders = Arc::clone(&self.orders);
        let filter = self.filter.clone();
        let tx = self.tasks_tx.clone();
        self.runtime.spawn(async move {
            let result = orders.orders(&filter).await;
            if let Err(err) = &result {
                tracing::warn!(%err, "order reload failed");
            }
            let _ = tx.send(TaskResult::Reloaded(result.map_err(|err| err.to_string())));
        });
        self.set_toast("Reloading orders…");
    }

    fn poll_tasks(&mut self) {
        while let Ok(result) = self.tasks_rx.try_recv() {
            self.apply_task(result);
        }
    }

    fn apply_task(&mut self, result: TaskResult) {
        match result {
            TaskResult::Saved(result) => {
                let outcome = self.save.finish(result, self.edited_during_save).clone();
                self.edited_during_save = false;
                let message = match outcome {
                    SaveOutcome::Saved { route_id: Some(route_id), .. } => {
                        format!("Saved route {route_id}")
                    }
                    SaveOutcome::Saved { route_id: None, .. } => "Saved".to_owned(),
                    SaveOutcome::Failed { message, .. } => format!("Save failed: {message}"),
                };
                self.set_toast(message);
            }
            TaskResult::Reloaded(Ok(orders)) => {
                self.reloading = false;
                let count = orders.len();
                let before = self.planner.partition().clone();
                self.planner.replace_orders(orders);
                if before != *self.planner.partition() {
                    self.note_partition_change();
                }
                if self.planner.state().active().is_none() {
                    self.mouse_drag = false;
                    self.pointer = None;
                }
                self.clamp_cursor();
                if self.search_mode != SearchMode::Inactive {
                    self.search_candidates = candidates_from_planner(&self.planner);
                    self.update_search_results();
                }
                self.set_toast(format!("Reloaded {count} orders"));
            }
            TaskResult::Reloaded(Err(message)) => {
                self.reloading = false;
                self.set_toast(format!("Reload failed: {message}"));
            }
        }
    }

    fn enter_search_mode(&mut self) {
        self.search_mode = SearchMode::Editing;
        self.search_query.clear();
        self.search_results.clear();
        self.search_result_index = 0;
        self.search_candidates = candidates_from_planner(&self.planner);
    }

    fn handle_search_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.clear_search(),
            KeyCode::Enter => {
                self.search_mode = if self.search_results.len() > 1 {
                    SearchMode::Results
                } else {
                    SearchMode::Inactive
                };
            }
            KeyCode::Backspace => {
                self.search_query.pop();
                self.update_search_results();
            }
            KeyCode::Char(ch) => {
                self.search_query.push(ch);
                self.update_search_results();
            }
            _ => {}
        }
    }

    fn clear_search(&mut self) {
        self.search_mode = SearchMode::Inactive;
        self.search_query.clear();
        self.search_candidates.clear();
        self.search_results.clear();
        self.search_result_index = 0;
    }

    fn update_search_results(&mut self) {
        self.search_results = ranked_search_results(&self.search_candidates, &self.search_query);
        self.search_result_index = 0;
        self.jump_to_search_result();
    }

    fn search_step(&mut self, delta: isize) {
        let len = self.search_results.len();
        if len <= 1 {
            return;
        }
        self.search_result_index = (self.search_result_index as isize + delta).rem_euclid(len as isize) as usize;
        self.jump_to_search_result();
    }

    fn jump_to_search_result(&mut self) {
        if let Some(&order_id) = self.search_results.get(self.search_result_index) {
            self.focus_order(order_id);
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_TTL });
    }

    fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    fn save_status(&self) -> String {
        let target = self.save.target();
        if self.save.saving() {
            return format!("saving to {target}…");
        }
        if self.save.dirty() {
            return format!("unsaved · next save: {target}");
        }
        match self.save.last() {
            Some(SaveOutcome::Saved { route_id: Some(route_id), .. }) => format!("saved · route {route_id}"),
            Some(SaveOutcome::Saved { route_id: None, .. }) => "saved".to_owned(),
            Some(SaveOutcome::Failed { .. }) => "save failed".to_owned(),
            None => format!("next save: {target}"),
        }
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let [header_area, board_area, footer_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .areas(frame.area());

    frame.render_widget(header_line(app), header_area);
    draw_board(frame, app, board_area);
    draw_overlay(frame, app, board_area);
    frame.render_widget(footer_line(app), footer_area);

    if app.show_help {
        draw_help(frame, app, board_area);
    }
}

fn header_line(app: &App) -> Paragraph<'static> {
    let unassigned = app.planner.partition().orders_in(ContainerKey::Unassigned).len();
    let mut digits = itoa::Buffer::new();
    let mut spans = vec![
        Span::styled(" routedesk ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("· {} ", app.label), app.theme.footer_label_style()),
        Span::raw(format!("· {} orders ", digits.format(app.planner.index().len()))),
        Span::raw(format!("· {} unassigned ", digits.format(unassigned))),
    ];
    let status_style = match app.save.last() {
        Some(SaveOutcome::Failed { .. }) if !app.save.saving() => app.theme.error_style(),
        _ => app.theme.footer_label_style(),
    };
    spans.push(Span::styled(format!("· {}", app.save_status()), status_style));
    Paragraph::new(Line::from(spans))
}

fn draw_board(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let columns = app.column_count();
    if columns == 0 || area.is_empty() {
        app.hits.clear();
        return;
    }

    let per_view = usize::from((area.width / MIN_COLUMN_WIDTH).max(1)).min(columns);
    if app.cursor.column < app.first_column {
        app.first_column = app.cursor.column;
    } else if app.cursor.column >= app.first_column + per_view {
        app.first_column = app.cursor.column + 1 - per_view;
    }
    app.first_column = app.first_column.min(columns - per_view);

    let areas = Layout::horizontal(vec![Constraint::Ratio(1, per_view as u32); per_view]).split(area);
    let active = app.planner.state().active();
    let mut hits = Vec::with_capacity(per_view);

    for (slot, &column_area) in areas.iter().enumerate() {
        let column = app.first_column + slot;
        let Some(key) = app.column_key(column) else {
            continue;
        };
        let orders = app.column_orders(column);
        let inner = PlannerColumn::inner(column_area);
        let focused = column == app.cursor.column;
        let scroll = if focused {
            app.cursor.card.saturating_sub(PlannerColumn::capacity(inner).saturating_sub(1))
        } else {
            0
        };

        let cards = orders
            .iter()
            .enumerate()
            .map(|(index, &order_id)| {
                let card = match app.planner.order(order_id) {
                    Some(order) => OrderCard::new(order.customer_name.as_str(), order.demand, &app.theme),
                    None => OrderCard::new("?", 0, &app.theme),
                };
                let state = if Some(order_id) == active {
                    CardState::Lifted
                } else if focused && index == app.cursor.card {
                    CardState::Cursor
                } else {
                    CardState::Normal
                };
                card.state(state)
            })
            .collect::<Vec<_>>();

        let title = app.planner.title(key);
        let mut widget = PlannerColumn::new(title.as_str(), &app.theme)
            .cards(cards)
            .focused(focused)
            .scroll(scroll);
        if !key.is_unassigned() {
            widget = widget.load(app.planner.container_load(key));
        }
        frame.render_widget(widget, column_area);

        hits.push(ColumnHit {
            column,
            key,
            area: column_area,
            cards: PlannerColumn::card_slots(inner, orders.len(), scroll)
                .into_iter()
                .map(|(index, rect)| (orders[index], rect))
                .collect(),
        });
    }

    app.hits = hits;
}

/// Floating copy of the dragged card: under the mouse pointer, or beside the cursor for keyboard
/// drags.
fn draw_overlay(frame: &mut Frame<'_>, app: &App, board: Rect) {
    let Some(order) = app.planner.active_order() else {
        return;
    };
    let anchor = match app.pointer {
        Some((x, y)) => Some((x.saturating_add(1), y)),
        None => app
            .hits
            .iter()
            .find(|hit| hit.column == app.cursor.column)
            .and_then(|hit| hit.cards.iter().find(|(id, _)| Some(*id) == app.cursor_order()))
            .map(|(_, rect)| (rect.x.saturating_add(2), rect.y.saturating_add(1))),
    };
    let Some((x, y)) = anchor else {
        return;
    };

    let width = OVERLAY_WIDTH.min(board.width);
    let height = (CARD_HEIGHT + 2).min(board.height);
    let x = x.min(board.right().saturating_sub(width)).max(board.x);
    let y = y.min(board.bottom().saturating_sub(height)).max(board.y);
    let area = Rect::new(x, y, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.accent()));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    frame.render_widget(
        OrderCard::new(order.customer_name.as_str(), order.demand, &app.theme).state(CardState::Overlay),
        inner,
    );
}

fn footer_line(app: &App) -> Paragraph<'static> {
    if app.search_mode != SearchMode::Inactive {
        let mut text = format!("/{}", app.search_query);
        if !app.search_results.is_empty() {
            text.push_str(&format!(
                "  ({}/{})",
                app.search_result_index + 1,
                app.search_results.len()
            ));
        } else if !app.search_query.is_empty() {
            text.push_str("  (no match)");
        }
        return Paragraph::new(text);
    }
    if let Some(toast) = &app.toast {
        return Paragraph::new(Line::from(format!(" {}", toast.message)));
    }

    let hints: &[(&str, &str)] = if app.planner.state().active().is_some() {
        &[("h/l", "move"), ("j/k", "aim"), ("space", "drop"), ("esc", "cancel")]
    } else {
        &[("space", "pick"), ("s", "save"), ("r", "reload"), ("/", "search"), ("?", "help"), ("q", "quit")]
    };
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {key}"), app.theme.footer_key_style()));
        spans.push(Span::styled(format!(" {label} "), app.theme.footer_label_style()));
    }
    Paragraph::new(Line::from(spans))
}

fn draw_help(frame: &mut Frame<'_>, app: &App, board: Rect) {
    let width = 46.min(board.width);
    let height = (HELP_LINES.len() as u16 + 2).min(board.height);
    let area = Rect::new(
        board.x + (board.width - width) / 2,
        board.y + (board.height - height) / 2,
        width,
        height,
    );
    let lines = HELP_LINES
        .iter()
        .map(|(key, label)| {
            Line::from(vec![
                Span::styled(format!(" {key:<9}"), app.theme.footer_key_style()),
                Span::raw(*label),
            ])
        })
        .collect::<Vec<_>>();
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" keys ")),
        area,
    );
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
