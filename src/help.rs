//! Help line for the timer's key bindings.
//!
//! Shows a one-line summary by default and a column layout when
//! `show_all` is set. `?` toggles between the two.

use crate::key;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Something that can list its bindings for help rendering.
pub trait KeyMap {
    /// Bindings shown in the one-line help.
    fn short_help(&self) -> Vec<&key::Binding>;
    /// Bindings grouped into columns for the full help.
    fn full_help(&self) -> Vec<Vec<&key::Binding>>;
}

/// Styles for the help line.
#[derive(Debug, Clone)]
pub struct Styles {
    pub ellipsis: Style,
    pub key: Style,
    pub desc: Style,
    pub separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        let key_style = Style::new().foreground(AdaptiveColor {
            Light: "#909090",
            Dark: "#626262",
        });
        let desc_style = Style::new().foreground(AdaptiveColor {
            Light: "#B2B2B2",
            Dark: "#4A4A4A",
        });
        let sep_style = Style::new().foreground(AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        });

        Self {
            ellipsis: sep_style.clone(),
            key: key_style,
            desc: desc_style,
            separator: sep_style,
        }
    }
}

/// The help line.
#[derive(Debug, Clone)]
pub struct Model {
    /// Show the full multi-column help instead of the short line.
    pub show_all: bool,
    /// Maximum width in cells; 0 means unlimited.
    pub width: usize,
    /// Separator between entries in the short help.
    pub short_separator: String,
    /// Separator between columns in the full help.
    pub full_separator: String,
    /// Shown when the short help is cut to fit `width`.
    pub ellipsis: String,
    /// Styles for keys, descriptions and separators.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// Short help, unlimited width.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the help to `width` cells.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Switches between short and full help.
    pub fn toggle(&mut self) {
        self.show_all = !self.show_all;
    }

    /// Renders the help for `keymap` in the current mode.
    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        if self.show_all {
            self.full_help_view(keymap.full_help())
        } else {
            self.short_help_view(keymap.short_help())
        }
    }

    fn entry(&self, binding: &key::Binding) -> String {
        let help = binding.help();
        format!(
            "{} {}",
            self.styles.key.clone().inline(true).render(&help.key),
            self.styles.desc.clone().inline(true).render(&help.desc)
        )
    }

    /// One line of bindings, cut with the ellipsis to fit the width.
    pub fn short_help_view(&self, bindings: Vec<&key::Binding>) -> String {
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.short_separator);

        let mut builder = String::new();
        let mut total_width = 0;
        for kb in bindings.iter().filter(|b| b.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };
            let item = format!("{}{}", sep, self.entry(kb));
            let item_width = lipgloss::width_visible(&item);

            if let Some(tail) = self.overflow_tail(total_width, item_width) {
                builder.push_str(&tail);
                break;
            }
            total_width += item_width;
            builder.push_str(&item);
        }
        builder
    }

    /// Bindings in columns, one column per group.
    pub fn full_help_view(&self, groups: Vec<Vec<&key::Binding>>) -> String {
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.full_separator);

        let mut columns = Vec::new();
        let mut total_width = 0;
        for group in groups.iter() {
            let rows: Vec<String> = group
                .iter()
                .filter(|b| b.enabled())
                .map(|b| self.entry(b))
                .collect();
            if rows.is_empty() {
                continue;
            }
            let column = rows.join("\n");
            let width = column
                .lines()
                .map(lipgloss::width_visible)
                .max()
                .unwrap_or(0);

            if let Some(tail) = self.overflow_tail(total_width, width) {
                columns.push(tail);
                break;
            }
            total_width += width + lipgloss::width_visible(&separator);
            columns.push(column);
        }

        let mut parts = Vec::new();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                parts.push(separator.as_str());
            }
            parts.push(column.as_str());
        }
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    fn overflow_tail(&self, total_width: usize, item_width: usize) -> Option<String> {
        if self.width == 0 || total_width + item_width <= self.width {
            return None;
        }
        let tail = format!(
            " {}",
            self.styles
                .ellipsis
                .clone()
                .inline(true)
                .render(&self.ellipsis)
        );
        if total_width + lipgloss::width_visible(&tail) < self.width {
            Some(tail)
        } else {
            Some(String::new())
        }
    }
}
