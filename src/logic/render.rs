//! Text rendering of a bracket tree with box-drawing connectors.
//!
//! ```text
//!  1 ┐
//!    ├─ ??? ┐
//!  4 ┘      │  ┏━━━━━┓
//!           ├──┨ ??? ┃
//!  2 ┐      │  ┗━━━━━┛
//!    ├─ ??? ┘
//!  3 ┘
//! ```

use crate::logic::bracket::BracketTree;
use std::collections::HashSet;
use std::fmt::Display;
use unicode_width::UnicodeWidthStr;

const BOLD: &str = "\x1b[1m";
const END: &str = "\x1b[0m";

/// Renders bracket trees. Names can be rewritten and highlighted (bold).
pub struct BracketRenderer<'a> {
    placeholder: String,
    transform: Option<Box<dyn Fn(&str) -> String + 'a>>,
    highlight: HashSet<String>,
}

impl Default for BracketRenderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// One output row. `width` counts visible columns only (escape codes excluded).
#[derive(Clone, Debug, Default)]
struct Line {
    text: String,
    width: usize,
}

impl Line {
    fn push(&mut self, s: &str) {
        self.text.push_str(s);
        self.width += s.width();
    }

    fn push_styled(&mut self, s: &str, visible: usize, bold: bool) {
        if bold {
            self.text.push_str(BOLD);
            self.text.push_str(s);
            self.text.push_str(END);
        } else {
            self.text.push_str(s);
        }
        self.width += visible;
    }

    fn push_fill(&mut self, fill: char, count: usize) {
        self.text.extend(std::iter::repeat(fill).take(count));
        self.width += count;
    }

    /// Right-justify to `width` with spaces.
    fn pad_left(&mut self, width: usize) {
        if self.width < width {
            let pad = width - self.width;
            self.text.insert_str(0, &" ".repeat(pad));
            self.width = width;
        }
    }

    /// Left-justify to `width` with `fill`.
    fn pad_right(&mut self, width: usize, fill: char) {
        if self.width < width {
            self.push_fill(fill, width - self.width);
        }
    }
}

/// Rendered subtree: its rows, the widest row, and the row its connector attaches to.
struct Block {
    lines: Vec<Line>,
    width: usize,
    anchor: usize,
}

struct Label {
    text: String,
    width: usize,
    bold: bool,
}

impl<'a> BracketRenderer<'a> {
    pub fn new() -> Self {
        Self {
            placeholder: "???".to_string(),
            transform: None,
            highlight: HashSet::new(),
        }
    }

    /// Text shown for matches without a winner.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Rewrite every team name before layout (e.g. truncate or annotate).
    pub fn with_name_transform(mut self, transform: impl Fn(&str) -> String + 'a) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Names (after transformation) printed in bold.
    pub fn with_highlight<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlight = names.into_iter().map(Into::into).collect();
        self
    }

    /// Render the whole tree, rows joined by newlines, no trailing newline.
    pub fn render<T: Display>(&self, tree: &BracketTree<T>) -> String {
        let widths = self.col_widths(tree);
        let block = self.render_block(tree, &widths, 0);
        block
            .lines
            .into_iter()
            .map(|line| line.text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Widest label per depth, root first.
    pub fn col_widths<T: Display>(&self, tree: &BracketTree<T>) -> Vec<usize> {
        match tree {
            BracketTree::TeamLeaf(team) => vec![self.team_label(team).width],
            BracketTree::Bye(inner) => {
                let mut widths = vec![0];
                widths.extend(self.col_widths(inner));
                widths
            }
            BracketTree::MatchNode {
                left,
                winner,
                right,
            } => {
                let mut widths = vec![self.winner_label(winner.as_ref()).width];
                widths.extend(merge_widths(self.col_widths(left), self.col_widths(right)));
                widths
            }
        }
    }

    fn team_label<T: Display>(&self, team: &T) -> Label {
        let name = team.to_string();
        let text = match &self.transform {
            Some(transform) => transform(&name),
            None => name,
        };
        Label {
            width: text.width(),
            bold: self.highlight.contains(&text),
            text,
        }
    }

    fn winner_label<T: Display>(&self, winner: Option<&T>) -> Label {
        match winner {
            Some(team) => self.team_label(team),
            None => Label {
                text: self.placeholder.clone(),
                width: self.placeholder.width(),
                bold: false,
            },
        }
    }

    fn render_block<T: Display>(
        &self,
        tree: &BracketTree<T>,
        widths: &[usize],
        depth: usize,
    ) -> Block {
        let col = widths.get(depth).copied().unwrap_or(0);
        match tree {
            BracketTree::TeamLeaf(team) => {
                let label = self.team_label(team);
                let mut line = Line::default();
                line.push(" ");
                line.push_styled(&label.text, label.width, label.bold);
                line.push(" ");
                line.pad_right(col + 2, '─');
                let width = line.width;
                Block {
                    lines: vec![line],
                    width,
                    anchor: 0,
                }
            }
            BracketTree::Bye(inner) => {
                let mut block = self.render_block(inner, widths, depth + 1);
                // Same width a match at this depth would take.
                let extension = col + if depth == 0 { 7 } else { 4 };
                let width = block.width;
                let line = &mut block.lines[block.anchor];
                line.pad_right(width, '─');
                line.push_fill('─', extension);
                block.width = width + extension;
                block
            }
            BracketTree::MatchNode {
                left,
                winner,
                right,
            } => {
                let upper = self.render_block(left, widths, depth + 1);
                let lower = self.render_block(right, widths, depth + 1);
                let label = self.winner_label(winner.as_ref());
                self.join(upper, &label, lower, col, depth == 0)
            }
        }
    }

    /// Stack two child blocks around the connector row carrying `label`.
    fn join(&self, upper: Block, label: &Label, lower: Block, col: usize, root: bool) -> Block {
        let indent = upper.width.max(lower.width);
        let fill = col.saturating_sub(label.width);

        let mut middle = Line::default();
        if root {
            middle.push("├──┨ ");
            middle.push_styled(&label.text, label.width, label.bold);
            middle.push_fill(' ', fill);
            middle.push(" ┃");
        } else {
            middle.push("├─ ");
            middle.push_styled(&label.text, label.width, label.bold);
            middle.push(" ");
            middle.push_fill('─', fill);
        }
        let width = indent + middle.width;
        middle.pad_left(width);

        let border = if root { "━".repeat(col) } else { String::new() };
        let mut lines = Vec::with_capacity(upper.lines.len() + lower.lines.len() + 1);

        let upper_last = upper.lines.len() - 1;
        for (idx, mut line) in upper.lines.into_iter().enumerate() {
            if idx == upper.anchor {
                line.pad_left(indent);
                line.push("┐");
            } else if idx > upper.anchor {
                line.pad_right(indent, ' ');
                line.push("│");
            }
            if root && idx == upper_last {
                line.push(&format!("  ┏━{}━┓", border));
            }
            lines.push(line);
        }

        let anchor = lines.len();
        lines.push(middle);

        for (idx, mut line) in lower.lines.into_iter().enumerate() {
            if idx == lower.anchor {
                line.pad_left(indent);
                line.push("┘");
            } else if idx < lower.anchor {
                line.pad_right(indent, ' ');
                line.push("│");
            }
            if root && idx == 0 {
                line.push(&format!("  ┗━{}━┛", border));
            }
            lines.push(line);
        }

        Block {
            lines,
            width,
            anchor,
        }
    }
}

fn merge_widths(left: Vec<usize>, right: Vec<usize>) -> Vec<usize> {
    let len = left.len().max(right.len());
    (0..len)
        .map(|i| {
            let l = left.get(i).copied().unwrap_or(0);
            let r = right.get(i).copied().unwrap_or(0);
            l.max(r)
        })
        .collect()
}

/// Render with default settings.
pub fn print_tree<T: Display>(tree: &BracketTree<T>) -> String {
    BracketRenderer::new().render(tree)
}
