//! Plain text rendering of update lists

use appdb_client::IgnoreEntry;
use appdb_updates::{ResultPartition, Section};
use std::fmt::Write;

pub const NO_UPDATES: &str = "No updates found";

/// Render both update lists, skipping empty ones
pub fn render_partition(partition: &ResultPartition, badge: Option<usize>) -> String {
    if partition.is_empty() {
        return format!("{}\n", NO_UPDATES);
    }

    let mut out = String::new();
    for section in [Section::Updateable, Section::NonUpdateable] {
        let apps = partition.section(section);
        if apps.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", section.label(apps.len()));
        for app in apps {
            let _ = writeln!(
                out,
                "  [{}] {}  {} -> {}",
                app.track_id,
                partition.display_name(app),
                app.version_old,
                app.version_new
            );
        }
    }

    if let Some(badge) = badge {
        let _ = writeln!(out, "\nBadge: {}", badge);
    }
    out
}

/// Render the ignore list
pub fn render_ignored(entries: &[IgnoreEntry]) -> String {
    if entries.is_empty() {
        return "No ignored apps\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "[{}] {} ({})",
            entry.track_id,
            entry.name,
            entry.source.label()
        );
    }
    out
}
