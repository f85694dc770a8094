/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Top-level frame layout: header, tree pane, footer.

mod status_bar;
mod tree_pane;

use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;

use crate::app::App;

/// Render one frame.
pub(crate) fn ui(frame: &mut ratatui::Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header (2 lines + border)
            Constraint::Min(1),    // tree
            Constraint::Length(2), // footer (1 line + border)
        ])
        .split(frame.area());

    status_bar::render_header(frame, chunks[0], app);
    tree_pane::render_tree(frame, chunks[1], app);
    status_bar::render_footer(frame, chunks[2], app);
}
