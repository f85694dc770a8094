/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use fleet_overview::intent::Intent;
use fleet_overview::model::NodeKind;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Color scheme for the TUI.
///
/// Colors carry consistent meaning across the interface:
/// - **Green / Yellow / Red**: severity (good / warning / critical)
/// - **Cyan**: app identity and servers
/// - **Magenta**: selection/focus
/// - **Gray**: secondary info (URLs, labels, borders)
pub(crate) struct ColorScheme {
    // UI chrome
    pub(crate) app_name: Style,
    pub(crate) border: Style,
    pub(crate) footer_help: Style,

    // Node kinds (tree rendering, used when no severity applies)
    pub(crate) node_server: Style,
    pub(crate) node_stack: Style,
    pub(crate) node_deployment: Style,
    pub(crate) node_service: Style,
    pub(crate) node_container: Style,

    // Severity
    pub(crate) intent_good: Style,
    pub(crate) intent_warning: Style,
    pub(crate) intent_critical: Style,
    pub(crate) intent_unknown: Style,

    // Semantic states
    pub(crate) error: Style,
    pub(crate) info: Style,

    // Header stat categories
    pub(crate) stat_timing: Style,
    pub(crate) stat_selection: Style,
    pub(crate) stat_url: Style,
    pub(crate) stat_label: Style,
    pub(crate) search_text: Style,
}

impl ColorScheme {
    /// Default color scheme.
    fn default() -> Self {
        Self {
            app_name: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::Gray),
            footer_help: Style::default().fg(Color::DarkGray),

            node_server: Style::default().fg(Color::Cyan),
            node_stack: Style::default().fg(Color::LightBlue),
            node_deployment: Style::default().fg(Color::Blue),
            node_service: Style::default().fg(Color::White),
            node_container: Style::default().fg(Color::Gray),

            intent_good: Style::default().fg(Color::Green),
            intent_warning: Style::default().fg(Color::Yellow),
            intent_critical: Style::default().fg(Color::Red),
            intent_unknown: Style::default().fg(Color::DarkGray),

            error: Style::default().fg(Color::Red),
            info: Style::default().fg(Color::Cyan),

            stat_timing: Style::default().fg(Color::Yellow),
            stat_selection: Style::default().fg(Color::Magenta),
            stat_url: Style::default().fg(Color::DarkGray),
            stat_label: Style::default().fg(Color::Gray),
            search_text: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Style for a node kind when no severity color applies.
    pub(crate) fn kind_style(&self, kind: NodeKind) -> Style {
        match kind {
            NodeKind::Server => self.node_server,
            NodeKind::Stack => self.node_stack,
            NodeKind::Deployment => self.node_deployment,
            NodeKind::Service => self.node_service,
            NodeKind::Container => self.node_container,
        }
    }

    /// Severity color, or `None` when the kind color should be used.
    pub(crate) fn intent_style(&self, intent: Intent) -> Option<Style> {
        match intent {
            Intent::None => None,
            Intent::Good => Some(self.intent_good),
            Intent::Warning => Some(self.intent_warning),
            Intent::Critical => Some(self.intent_critical),
            Intent::Unknown => Some(self.intent_unknown),
        }
    }
}

/// All user-visible text in the TUI, gathered into one struct so the
/// wording lives in one place.
pub(crate) struct Labels {
    pub(crate) app_name: &'static str,
    pub(crate) separator: &'static str,
    pub(crate) selection_caret: &'static str,
    pub(crate) refresh_icon: &'static str,
    pub(crate) no_selection: &'static str,
    pub(crate) search_prompt: &'static str,
    pub(crate) tags_label: &'static str,
    pub(crate) pane_fleet: &'static str,
    pub(crate) footer_help_text: &'static str,
}

impl Labels {
    fn en() -> Self {
        Self {
            app_name: "fleet-tui",
            separator: " • ",
            selection_caret: "▸ ",
            refresh_icon: "⟳ ",
            no_selection: "No selection",
            search_prompt: "search: ",
            tags_label: "tags: ",
            pane_fleet: "Fleet",
            footer_help_text:
                " q quit • ↑/↓ move • Tab/Enter expand/collapse • / search • Esc clear • c collapse all • r refresh",
        }
    }
}

/// Visual presentation bundle: colors plus labels.
pub(crate) struct Theme {
    pub(crate) scheme: ColorScheme,
    pub(crate) labels: Labels,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            scheme: ColorScheme::default(),
            labels: Labels::en(),
        }
    }
}
