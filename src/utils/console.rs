// src/utils/console.rs

//! Human-readable console sections on top of the `log` facade.
//!
//! Progress and summaries are emitted at `info` so `--verbose`/`RUST_LOG`
//! control them like any other log line.

const WIDTH: usize = 60;

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    log::info!("[STEP {}/{}] {}", step_num, total, message);
}

/// Log a separator line
pub fn separator() {
    log::info!("{}", "─".repeat(WIDTH));
}

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(WIDTH);
    log::info!("{}", border);
    log::info!("  {}", title);
    log::info!("{}", border);
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    log::info!("    {}", message);
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {}", title);
    for (key, value) in items {
        log::info!("    {}: {}", key, value);
    }
}

/// Log a titled list, skipped entirely when empty.
pub fn list(title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    separator();
    log::info!("{} ({})", title, lines.len());
    for line in lines {
        sub_item(line);
    }
}
