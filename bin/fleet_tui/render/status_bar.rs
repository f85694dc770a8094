/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;

use crate::app::App;

/// Render the top status/header bar.
///
/// Line 1: app identity, API URL, last refresh, refresh cadence.
/// Line 2: the search line (always visible so the active filter is
/// never a mystery), or the connection error when one is pending.
pub(crate) fn render_header(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let l = &app.theme.labels;
    let s = &app.theme.scheme;

    let mut line1_spans = vec![
        Span::styled(l.app_name, s.app_name),
        Span::styled(l.separator, s.stat_label),
        Span::styled(app.base_url().to_string(), s.stat_url),
    ];
    if !app.tags().is_empty() {
        line1_spans.extend(vec![
            Span::styled(l.separator, s.stat_label),
            Span::styled(l.tags_label, s.stat_label),
            Span::styled(app.tags().join(","), s.info),
        ]);
    }
    if !app.last_refresh.is_empty() {
        line1_spans.extend(vec![
            Span::styled(l.separator, s.stat_label),
            Span::styled(app.last_refresh.clone(), s.stat_timing),
        ]);
    }
    if !app.refresh_interval_label.is_empty() {
        line1_spans.extend(vec![
            Span::styled(l.separator, s.stat_label),
            Span::styled(l.refresh_icon, s.stat_timing),
            Span::styled(app.refresh_interval_label.clone(), s.stat_timing),
        ]);
    }

    let line2 = if let Some(err) = &app.error {
        Line::from(Span::styled(format!("ERROR: {}", err), s.error))
    } else {
        let mut spans = vec![Span::styled(l.search_prompt, s.stat_label)];
        spans.push(Span::styled(app.query().to_string(), s.search_text));
        if app.search_active {
            spans.push(Span::styled("█", s.search_text));
        }
        if app.query().is_empty() && !app.search_active {
            spans.push(Span::styled("(press / to filter)", s.stat_label));
        }
        Line::from(spans)
    };

    let header = Paragraph::new(vec![Line::from(line1_spans), line2]).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(s.border),
    );
    frame.render_widget(header, area);
}

/// Render the bottom help bar showing the keyboard shortcuts, with the
/// current selection context on the same line when one exists.
pub(crate) fn render_footer(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let l = &app.theme.labels;
    let s = &app.theme.scheme;

    let rows = app.visible_rows();
    let selection = rows.get(app.cursor.pos());

    let mut spans = Vec::new();
    if let Some(row) = selection {
        spans.extend(vec![
            Span::styled(l.selection_caret, s.stat_selection),
            Span::styled(row.kind.label(), s.kind_style(row.kind)),
            Span::styled(l.separator, s.stat_label),
        ]);
    } else {
        spans.extend(vec![
            Span::styled(l.no_selection, s.info),
            Span::styled(l.separator, s.stat_label),
        ]);
    }
    spans.push(Span::styled(l.footer_help_text, s.footer_help));

    let footer = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::TOP).border_style(s.border));
    frame.render_widget(footer, area);
}
