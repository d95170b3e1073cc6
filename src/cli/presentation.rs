//! Presentation: text rendering of listings, actions and processes.

use crate::model::{ActionRecord, ListItem};
use crate::process::{EndReason, ProcessEvent, ProcessRecord};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn format_header(title: &str, breadcrumbs: &[String]) -> String {
    let trail = if breadcrumbs.is_empty() {
        "/".to_string()
    } else {
        breadcrumbs.join(" / ")
    };
    format!("{}  {}", title.bold().underline(), trail.dimmed())
}

/// Prompt shown by the shell.
pub fn prompt(breadcrumbs: &[String]) -> String {
    match breadcrumbs.last() {
        Some(last) => format!("{} ({})", last, breadcrumbs.len()),
        None => "root".to_string(),
    }
}

pub fn format_items(items: &[ListItem]) -> String {
    if items.is_empty() {
        return "Nothing to show here.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Name", "Label", "Type", "Group"]);
    for (index, item) in items.iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            item.name.clone(),
            item.label.clone(),
            item.kind.to_string(),
            item.group.clone().unwrap_or_default(),
        ]);
    }
    table.to_string()
}

pub fn format_actions(actions: &[ActionRecord]) -> String {
    if actions.is_empty() {
        return "No compatible actions.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Action", "Label", "Icon", "Order"]);
    for action in actions {
        table.add_row(vec![
            action.name.clone(),
            action.label.clone(),
            action.icon.clone(),
            action.order.to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_environment(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return "Environment is empty at root.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Key", "Value"]);
    for (key, value) in pairs {
        table.add_row(vec![key, value]);
    }
    table.to_string()
}

fn colored_status(record: &ProcessRecord) -> String {
    let status = record.status();
    match status {
        "running" => status.green().to_string(),
        "killing" | "killed" => status.yellow().to_string(),
        "failed" => status.red().to_string(),
        _ => status.dimmed().to_string(),
    }
}

pub fn format_processes(records: &[ProcessRecord]) -> String {
    if records.is_empty() {
        return "No processes.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Label", "Pid", "Started", "Status", "Exit", "Lines"]);
    for record in records {
        table.add_row(vec![
            format!("#{}", record.id),
            record.label.clone(),
            record.pid.to_string(),
            record.started_at.format("%H:%M:%S").to_string(),
            colored_status(record),
            record
                .exit_code
                .map(|code| code.to_string())
                .unwrap_or_else(|| "-".to_string()),
            record.output.len().to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_logs(record: &ProcessRecord) -> String {
    let mut out = format!(
        "{} {} ({})",
        format!("#{}", record.id).bold(),
        record.label,
        colored_status(record)
    );
    for line in &record.output {
        out.push('\n');
        out.push_str(line);
    }
    out
}

/// One line per process event, prefixed with the process id.
pub fn format_event(event: &ProcessEvent, label: Option<&str>) -> String {
    let label = label.unwrap_or("?");
    match event {
        ProcessEvent::Output { id, line } => {
            format!("{} {}", format!("[#{} {}]", id, label).dimmed(), line)
        }
        ProcessEvent::Ended {
            id,
            exit_code,
            reason,
        } => {
            let how = match reason {
                EndReason::Eof => "ended".to_string(),
                EndReason::Killed => "killed".to_string(),
                EndReason::ReadError(err) => format!("stopped ({})", err),
            };
            let code = exit_code
                .map(|code| format!(", exit code {}", code))
                .unwrap_or_default();
            format!("{} {} {}{}", "●".yellow(), format!("#{} {}", id, label).bold(), how, code)
        }
    }
}

pub fn format_workdir(path: &Path) -> String {
    let marker = if path.is_dir() {
        "exists".green().to_string()
    } else {
        "missing".red().to_string()
    };
    format!("{} ({})", path.display(), marker)
}

/// Diagnostic block for a failed shell command.
pub fn format_diagnostic(command: &str, message: &str) -> String {
    let mut out = format!("{} {}", "error:".red().bold(), command);
    for line in message.lines() {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}
