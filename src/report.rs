//! Plain-text rendering of a record's diff, used by `--print`.

use std::fmt::Write;

use crate::diff::{FieldDiffEntry, FileStatus, RecordDetail, NO_DATA};

pub const CHANGE_MARKER: &str = "→";

pub fn render(detail: &RecordDetail) -> String {
    let record = &detail.record;
    let diff = &detail.diff;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "History #{} · {} · {} {}",
        record.id,
        record.action_kind.title(),
        record.target_kind.title(),
        record.target_id
    );
    let _ = writeln!(out, "{}", record.summary());
    if let Some(at) = record.recorded_at {
        let _ = writeln!(out, "Recorded {}", at.format("%d/%m/%Y %H:%M UTC"));
    }

    if let Some(ref notice) = diff.notice {
        let _ = writeln!(out, "\nNote: {}; showing the recorded values.", notice);
    }

    let _ = writeln!(out, "\nFields");
    for entry in &diff.fields {
        write_field(&mut out, entry, 1);
    }

    if record.has_files() {
        let _ = writeln!(out, "\nFiles");
        if diff.files.is_empty() {
            let _ = writeln!(out, "  {}", diff.empty_files_message());
        }
        for status in [FileStatus::Removed, FileStatus::Added, FileStatus::Kept] {
            let mut files = diff.files_with_status(status).peekable();
            if files.peek().is_none() {
                continue;
            }
            let _ = writeln!(out, "  {}", status.heading());
            for file in files {
                let name = detail.file_name(&file.file_id);
                if name == file.file_id.as_str() {
                    let _ = writeln!(out, "    {} {}", status.symbol(), name);
                } else {
                    let _ = writeln!(out, "    {} {} ({})", status.symbol(), name, file.file_id);
                }
            }
        }
    }

    out
}

fn write_field(out: &mut String, entry: &FieldDiffEntry, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = match entry {
        FieldDiffEntry::Plain { label, value, .. } => writeln!(out, "{}{}: {}", indent, label, value),
        FieldDiffEntry::Changed { label, old, new, .. } => writeln!(
            out,
            "{}{}: {} {} {}",
            indent, label, old, CHANGE_MARKER, new
        ),
        FieldDiffEntry::Group { label, entries, .. } => {
            let _ = writeln!(out, "{}{}:", indent, label);
            for child in entries {
                write_field(out, child, depth + 1);
            }
            Ok(())
        }
        FieldDiffEntry::NoData => writeln!(out, "{}{}", indent, NO_DATA),
    };
}
