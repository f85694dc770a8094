/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;

use crate::app::has_sibling_after;
use crate::app::App;

/// Render the overview tree.
///
/// Each row carries indentation/connectors, an expand affordance only
/// when filtered children exist, and severity coloring; the selected
/// row is highlighted. Rows are exactly the aggregator's visible
/// projection — nothing is recomputed here.
pub(crate) fn render_tree(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let rows = app.visible_rows();

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(vis_idx, row)| {
            let indent = "  ".repeat(row.depth);

            // Tree connector
            let connector = if row.depth == 0 {
                ""
            } else if has_sibling_after(&rows, vis_idx, row.depth) {
                "├─ "
            } else {
                "└─ "
            };

            // Expand affordance only when matching children exist.
            let fold = if row.has_children {
                if row.expanded {
                    "▼ "
                } else {
                    "▶ "
                }
            } else {
                "  "
            };

            // Style precedence: selected > severity > node kind.
            let style = if vis_idx == app.cursor.pos() {
                app.theme
                    .scheme
                    .stat_selection
                    .add_modifier(Modifier::BOLD)
            } else {
                app.theme
                    .scheme
                    .intent_style(row.intent)
                    .unwrap_or_else(|| app.theme.scheme.kind_style(row.kind))
            };

            let marker = if vis_idx == app.cursor.pos() {
                app.theme.labels.selection_caret
            } else {
                "  "
            };

            ListItem::new(Line::from(Span::styled(
                format!("{}{}{}{}{}", marker, indent, connector, fold, row.text),
                style,
            )))
        })
        .collect();

    let block = Block::default()
        .title(app.theme.labels.pane_fleet)
        .borders(Borders::ALL)
        .border_style(app.theme.scheme.border);

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default());
    let mut list_state = ListState::default()
        .with_selected(Some(app.cursor.pos()))
        .with_offset(app.tree_scroll_offset);
    frame.render_stateful_widget(list, area, &mut list_state);
}
