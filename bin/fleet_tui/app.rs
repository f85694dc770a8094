/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io;
use std::time::Duration;
use std::time::Instant;

use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use fleet_overview::aggregate::OverviewTree;
use fleet_overview::client::FleetApi;
use fleet_overview::client::HttpFleetApi;
use fleet_overview::model::Deployment;
use fleet_overview::model::NodeKind;
use fleet_overview::model::Server;
use fleet_overview::model::Stack;
use fleet_overview::intent::Intent;
use fleet_overview::source::ServiceSource;
use fleet_overview::view::OverviewView;
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::format;
use crate::render::ui;
use crate::theme::Theme;
use crate::Args;

// Navigation

/// Navigation cursor over a bounded list.
///
/// Invariant: `pos < len` (or `pos == 0` when `len == 0`).
/// Movement methods return `true` when the position changes.
#[derive(Debug, Clone)]
pub(crate) struct Cursor {
    pos: usize,
    len: usize,
}

impl Cursor {
    pub(crate) fn new(len: usize) -> Self {
        Self { pos: 0, len }
    }

    /// Move up (decrement). Returns true if position changed.
    pub(crate) fn move_up(&mut self) -> bool {
        if self.pos > 0 {
            self.pos -= 1;
            true
        } else {
            false
        }
    }

    /// Move down (increment). Returns true if position changed.
    pub(crate) fn move_down(&mut self) -> bool {
        if self.pos + 1 < self.len {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Jump to start. Returns true if position changed.
    pub(crate) fn home(&mut self) -> bool {
        if self.pos != 0 {
            self.pos = 0;
            true
        } else {
            false
        }
    }

    /// Jump to end. Returns true if position changed.
    pub(crate) fn end(&mut self) -> bool {
        let new_pos = self.len.saturating_sub(1);
        if self.pos != new_pos {
            self.pos = new_pos;
            true
        } else {
            false
        }
    }

    /// Page down by `amount`. Returns true if position changed.
    pub(crate) fn page_down(&mut self, amount: usize) -> bool {
        let new_pos = (self.pos + amount).min(self.len.saturating_sub(1));
        if self.pos != new_pos {
            self.pos = new_pos;
            true
        } else {
            false
        }
    }

    /// Page up by `amount`. Returns true if position changed.
    pub(crate) fn page_up(&mut self, amount: usize) -> bool {
        let new_pos = self.pos.saturating_sub(amount);
        if self.pos != new_pos {
            self.pos = new_pos;
            true
        } else {
            false
        }
    }

    /// Update length and clamp position to remain valid.
    pub(crate) fn update_len(&mut self, new_len: usize) {
        self.len = new_len;
        if new_len == 0 {
            self.pos = 0;
        } else {
            self.pos = self.pos.min(new_len - 1);
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[allow(dead_code)] // used by tests
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

// Flattened view

/// One visible row of the flattened overview tree.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub(crate) kind: NodeKind,
    /// Identity fed back to `on_toggle`; `None` for leaf rows.
    pub(crate) toggle_id: Option<String>,
    /// Pre-formatted row text (name, state badge, ports, tags).
    pub(crate) text: String,
    pub(crate) intent: Intent,
    pub(crate) depth: usize,
    pub(crate) has_children: bool,
    pub(crate) expanded: bool,
}

/// Flatten the snapshot into on-screen rows, top to bottom.
///
/// Children appear only under expanded parents; the ordering is the
/// snapshot's ordering, which is the upstream ordering.
pub(crate) fn flatten_tree(tree: &OverviewTree) -> Vec<Row> {
    let mut rows = Vec::new();
    for server in &tree.servers {
        rows.push(Row {
            kind: NodeKind::Server,
            toggle_id: Some(server.id.clone()),
            text: format::server_label(server),
            intent: Intent::None,
            depth: 0,
            has_children: server.has_children,
            expanded: server.expanded,
        });
        if !server.expanded {
            continue;
        }
        for stack in &server.stacks {
            rows.push(Row {
                kind: NodeKind::Stack,
                toggle_id: Some(stack.id.clone()),
                text: format::stack_label(stack),
                intent: stack.intent,
                depth: 1,
                has_children: stack.has_services,
                expanded: stack.expanded,
            });
            if !stack.expanded {
                continue;
            }
            for svc in &stack.services {
                rows.push(Row {
                    kind: NodeKind::Service,
                    // Services without a container have nothing to reveal.
                    toggle_id: svc
                        .has_container
                        .then(|| svc.key.clone()),
                    text: format::service_label(svc),
                    intent: svc
                        .container
                        .as_ref()
                        .map(|c| c.intent)
                        .unwrap_or(Intent::None),
                    depth: 2,
                    has_children: svc.has_container,
                    expanded: svc.expanded,
                });
                if let (true, Some(container)) = (svc.expanded, svc.container.as_ref()) {
                    rows.push(Row {
                        kind: NodeKind::Container,
                        toggle_id: None,
                        text: format::container_label(container),
                        intent: container.intent,
                        depth: 3,
                        has_children: false,
                        expanded: false,
                    });
                }
            }
        }
        for deployment in &server.deployments {
            rows.push(Row {
                kind: NodeKind::Deployment,
                toggle_id: None,
                text: format::deployment_label(deployment),
                intent: deployment.intent,
                depth: 1,
                has_children: false,
                expanded: false,
            });
        }
    }
    rows
}

/// Check whether a later row at the same depth exists (for tree
/// connector rendering: `├─` vs `└─`).
pub(crate) fn has_sibling_after(rows: &[Row], idx: usize, depth: usize) -> bool {
    for row in &rows[idx + 1..] {
        if row.depth < depth {
            return false;
        }
        if row.depth == depth {
            return true;
        }
    }
    false
}

/// Result of handling a key event.
pub(crate) enum KeyResult {
    /// Nothing changed.
    None,
    /// Selection moved; no data work needed.
    SelectionChanged,
    /// Expansion or filter changed; reconcile service polling now so a
    /// freshly expanded stack fetches immediately.
    StateChanged,
    /// Full root-list refresh requested.
    NeedsRefresh,
}

// Application state

/// Runtime state for the fleet TUI.
///
/// Owns the HTTP client, the latest root-list snapshots, the
/// aggregation view state, and the service polling source. The
/// rendered tree is a pure projection recomputed after every change.
pub(crate) struct App {
    api: HttpFleetApi,
    /// Tag pre-filter forwarded to the server list query.
    tags: Vec<String>,
    /// Set when the user requests exit (`q` / `Ctrl-C`).
    pub(crate) should_quit: bool,

    /// Last known root lists; `None` before the first successful
    /// fetch, retained across later failures.
    servers: Option<Vec<Server>>,
    stacks: Option<Vec<Stack>>,
    deployments: Option<Vec<Deployment>>,

    /// Search term + expansion stores (the aggregation core's inputs).
    view: OverviewView,
    /// Per-stack service data with its polling schedule.
    services: ServiceSource,
    /// Latest aggregation snapshot.
    pub(crate) tree: OverviewTree,

    /// Navigation cursor over visible rows.
    pub(crate) cursor: Cursor,
    /// Scroll offset for the tree (top visible row).
    pub(crate) tree_scroll_offset: usize,
    /// Height of the tree viewport in rows (updated during rendering).
    pub(crate) tree_viewport_height: usize,

    /// Whether keystrokes currently edit the search term.
    pub(crate) search_active: bool,

    /// Timestamp string for the last successful refresh (local time).
    pub(crate) last_refresh: String,
    /// Human-readable refresh interval (e.g. "30s").
    pub(crate) refresh_interval_label: String,
    /// Top-level connection/refresh error surfaced in the header.
    pub(crate) error: Option<String>,

    /// Visual presentation (colors + labels).
    pub(crate) theme: Theme,
}

impl App {
    /// Construct a TUI app instance targeting the given fleet API
    /// address.
    pub(crate) fn new(addr: &str, tags: Vec<String>) -> Self {
        Self {
            api: HttpFleetApi::new(addr),
            tags,
            should_quit: false,
            servers: None,
            stacks: None,
            deployments: None,
            view: OverviewView::new(),
            services: ServiceSource::default(),
            tree: OverviewTree::default(),
            cursor: Cursor::new(0),
            tree_scroll_offset: 0,
            tree_viewport_height: 20, // Default, updated during rendering
            search_active: false,
            last_refresh: String::new(),
            refresh_interval_label: String::new(),
            error: None,
            theme: Theme::default(),
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// Tag pre-filter in effect for the server list.
    pub(crate) fn tags(&self) -> &[String] {
        &self.tags
    }

    pub(crate) fn query(&self) -> &str {
        self.view.query()
    }

    /// Current visible rows (pure projection of the snapshot).
    pub(crate) fn visible_rows(&self) -> Vec<Row> {
        flatten_tree(&self.tree)
    }

    /// Rebuild the snapshot from current inputs and keep the cursor
    /// valid.
    fn recompute(&mut self) {
        self.tree = self.view.snapshot(
            self.servers.as_deref().unwrap_or(&[]),
            self.stacks.as_deref().unwrap_or(&[]),
            self.deployments.as_deref().unwrap_or(&[]),
            &self.services,
        );
        let len = self.visible_rows().len();
        self.cursor.update_len(len);
    }

    /// Refresh the root lists (servers, stacks, deployments).
    ///
    /// Each list is replaced only on success; a failure keeps the last
    /// known list, logs, and surfaces one header error.
    pub(crate) async fn refresh(&mut self) {
        self.error = None;

        match self.api.list_servers(&self.tags).await {
            Ok(list) => self.servers = Some(list),
            Err(err) => {
                tracing::warn!(error = %err, "server list fetch failed");
                self.error = Some(format!("Failed to list servers: {}", err));
            }
        }
        match self.api.list_stacks().await {
            Ok(list) => self.stacks = Some(list),
            Err(err) => {
                tracing::warn!(error = %err, "stack list fetch failed");
                self.error
                    .get_or_insert_with(|| format!("Failed to list stacks: {}", err));
            }
        }
        match self.api.list_deployments().await {
            Ok(list) => self.deployments = Some(list),
            Err(err) => {
                tracing::warn!(error = %err, "deployment list fetch failed");
                self.error
                    .get_or_insert_with(|| format!("Failed to list deployments: {}", err));
            }
        }

        if self.error.is_none() {
            self.last_refresh = chrono::Local::now().format("%H:%M:%S").to_string();
        }
        self.recompute();
    }

    /// One service-polling pass: reconcile the schedule with the
    /// snapshot's active set and perform the owed fetches serially.
    pub(crate) async fn poll_services(&mut self) {
        let owed = self.services.due(&self.tree.active_stacks, Instant::now());
        if owed.is_empty() {
            return;
        }
        for stack_id in &owed {
            let result = self.api.list_stack_services(stack_id).await;
            self.services.record(stack_id, result, Instant::now());
        }
        self.recompute();
    }

    /// Adjust scroll offset to keep the cursor inside the viewport.
    pub(crate) fn ensure_cursor_visible(&mut self) {
        let pos = self.cursor.pos();
        if pos < self.tree_scroll_offset {
            self.tree_scroll_offset = pos;
        } else if pos >= self.tree_scroll_offset + self.tree_viewport_height {
            self.tree_scroll_offset = pos.saturating_sub(self.tree_viewport_height - 1);
        }
    }

    /// Toggle the currently selected row, if it is toggleable.
    ///
    /// Stacks accept toggles even before their first service fetch
    /// (the affordance appears once data lands); other kinds require a
    /// toggle identity.
    fn toggle_selected(&mut self) -> KeyResult {
        let rows = self.visible_rows();
        let row = match rows.get(self.cursor.pos()) {
            Some(row) => row,
            None => return KeyResult::None,
        };
        let id = match &row.toggle_id {
            Some(id) => id.clone(),
            None => return KeyResult::None,
        };
        self.view.on_toggle(row.kind, &id);
        self.recompute();
        KeyResult::StateChanged
    }

    /// Handle a single keypress and update in-memory UI state.
    ///
    /// In search mode, printable keys edit the query; otherwise keys
    /// navigate and toggle. Every mutation is applied (and the
    /// snapshot recomputed) before this returns, so no event is lost.
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> KeyResult {
        if self.search_active {
            return self.on_search_key(key);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Char('/') => {
                self.search_active = true;
                KeyResult::None
            }
            KeyCode::Esc => {
                if self.query().is_empty() {
                    KeyResult::None
                } else {
                    self.view.on_search_change("");
                    self.recompute();
                    KeyResult::StateChanged
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.cursor.move_up() {
                    self.ensure_cursor_visible();
                    KeyResult::SelectionChanged
                } else {
                    KeyResult::None
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor.move_down() {
                    self.ensure_cursor_visible();
                    KeyResult::SelectionChanged
                } else {
                    KeyResult::None
                }
            }
            KeyCode::Home | KeyCode::Char('g') => {
                if self.cursor.home() {
                    self.ensure_cursor_visible();
                    KeyResult::SelectionChanged
                } else {
                    KeyResult::None
                }
            }
            KeyCode::End | KeyCode::Char('G') => {
                if self.cursor.end() {
                    self.ensure_cursor_visible();
                    KeyResult::SelectionChanged
                } else {
                    KeyResult::None
                }
            }
            KeyCode::PageDown => {
                if self.cursor.page_down(10) {
                    self.ensure_cursor_visible();
                    KeyResult::SelectionChanged
                } else {
                    KeyResult::None
                }
            }
            KeyCode::PageUp => {
                if self.cursor.page_up(10) {
                    self.ensure_cursor_visible();
                    KeyResult::SelectionChanged
                } else {
                    KeyResult::None
                }
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.cursor.page_down(10) {
                    self.ensure_cursor_visible();
                    KeyResult::SelectionChanged
                } else {
                    KeyResult::None
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.cursor.page_up(10) {
                    self.ensure_cursor_visible();
                    KeyResult::SelectionChanged
                } else {
                    KeyResult::None
                }
            }
            KeyCode::Tab | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('c') => {
                self.view.collapse_all();
                self.recompute();
                KeyResult::StateChanged
            }
            KeyCode::Char('r') => KeyResult::NeedsRefresh,
            _ => KeyResult::None,
        }
    }

    /// Key handling while the search line is focused.
    fn on_search_key(&mut self, key: KeyEvent) -> KeyResult {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.search_active = false;
                KeyResult::None
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Backspace => {
                let mut query = self.query().to_string();
                if query.pop().is_some() {
                    self.view.on_search_change(&query);
                    self.recompute();
                    KeyResult::StateChanged
                } else {
                    KeyResult::None
                }
            }
            KeyCode::Char(c) => {
                let mut query = self.query().to_string();
                query.push(c);
                self.view.on_search_change(&query);
                self.recompute();
                KeyResult::StateChanged
            }
            _ => KeyResult::None,
        }
    }
}

/// Drive the main event loop for the fleet TUI.
///
/// Refreshes root lists on `--refresh-ms`, runs the service polling
/// scheduler once a second, renders each tick, and processes keyboard
/// input until the user exits. All fetches are serial; expansion and
/// filter changes trigger an immediate polling pass so newly active
/// stacks fetch without waiting for the next scheduler tick.
pub(crate) async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    args: &Args,
    mut app: App,
) -> io::Result<()> {
    let mut refresh_interval = tokio::time::interval(Duration::from_millis(args.refresh_ms));
    app.refresh_interval_label = if args.refresh_ms >= 1000 && args.refresh_ms % 1000 == 0 {
        format!("{}s", args.refresh_ms / 1000)
    } else {
        format!("{}ms", args.refresh_ms)
    };
    let mut poll_interval = tokio::time::interval(Duration::from_secs(1));
    let mut events = EventStream::new();

    loop {
        // Update viewport height before rendering. The body area is
        // terminal height minus header (3 rows) and footer (2 rows).
        let terminal_size = terminal.size()?;
        app.tree_viewport_height = terminal_size.height.saturating_sub(5) as usize;

        terminal.draw(|frame| ui(frame, &app))?;

        tokio::select! {
            _ = refresh_interval.tick() => {
                app.refresh().await;
            }
            _ = poll_interval.tick() => {
                app.poll_services().await;
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        match app.on_key(key) {
                            KeyResult::StateChanged => {
                                app.poll_services().await;
                            }
                            KeyResult::NeedsRefresh => {
                                app.refresh().await;
                            }
                            KeyResult::SelectionChanged | KeyResult::None => {}
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => {}
                    _ => {}
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
