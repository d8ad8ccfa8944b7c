use colored::Colorize;
use shapediff_diff::Changeset;

use crate::config::RenderConfig;

/// One line per leaf change: `path: old -> new`.
pub fn render_text(changeset: &Changeset, config: &RenderConfig) -> String {
    let mut lines = Vec::new();
    for (path, leaf) in changeset.paths() {
        let path = path.join(&config.path_separator);
        let old = leaf.old().to_string();
        let new = leaf.new_value().to_string();
        let mut line = if config.color {
            format!("{}: {} -> {}", path.bold(), old.red(), new.green())
        } else {
            format!("{path}: {old} -> {new}")
        };
        if leaf.is_type_change() {
            let note = format!(
                " ({} -> {})",
                leaf.old().category(),
                leaf.new_value().category()
            );
            if config.color {
                line.push_str(&note.dimmed().to_string());
            } else {
                line.push_str(&note);
            }
        }
        lines.push(line);
    }

    if config.show_summary {
        let summary = match changeset.leaf_count() {
            0 => "No changes.".to_string(),
            1 => "1 change.".to_string(),
            n => format!("{n} changes."),
        };
        lines.push(summary);
    }
    lines.join("\n")
}
