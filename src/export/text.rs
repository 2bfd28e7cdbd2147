use std::fmt::Write;

use crate::models::result::{Mode, TaggedResult};

pub fn human_readable_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn mode_heading(mode: Mode) -> &'static str {
    match mode {
        Mode::SingleThreaded => "Single-threaded",
        Mode::MultiThreaded => "Multi-threaded",
        // Scans are only ever tagged with the single strategy that ran.
        Mode::Both => "Untagged",
    }
}

/// Console block for one tagged result.
pub fn render_result(tagged: &TaggedResult) -> String {
    let r = &tagged.result;
    let mut out = String::new();
    let _ = writeln!(out, "{} scan", mode_heading(tagged.mode));
    let _ = writeln!(out, "  Time taken:  {:.3} s", r.elapsed_seconds);
    let _ = writeln!(out, "  Folders:     {}", group_thousands(r.file_counts.folders));
    let _ = writeln!(out, "  Files:       {}", group_thousands(r.file_counts.files));
    let _ = writeln!(
        out,
        "  Total size:  {} bytes ({})",
        group_thousands(r.file_counts.bytes),
        human_readable_size(r.file_counts.bytes)
    );
    let _ = writeln!(out, "  Images:      {}", group_thousands(r.image_counts.images));
    let _ = writeln!(
        out,
        "  Image size:  {} bytes ({})",
        group_thousands(r.image_counts.bytes),
        human_readable_size(r.image_counts.bytes)
    );
    out
}
