//! CLI domain: parse, route, shell, output, and presentation only.
//! The engine lives in `navigation`, `action` and `process`; this layer only drives it.

mod output;
mod parse;
mod presentation;
mod route;
mod shell;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_actions, format_environment, format_event, format_items, format_processes,
};
pub use route::{
    check_environment, load_config, required_variables, resolve_projects_root, RunContext,
    PROJECTS_ENV,
};
pub use shell::{execute_line, ShellCommand, ShellReply};
