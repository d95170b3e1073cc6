//! Interactive operator shell
//!
//! A prompt loop over the run context. Process events are drained and printed
//! before every prompt. A failing or panicking command prints a diagnostic block
//! and the loop carries on.

use crate::cli::output::map_error;
use crate::cli::presentation::{
    format_actions, format_diagnostic, format_environment, format_event, format_header,
    format_items, format_logs, format_processes, format_workdir, prompt,
};
use crate::cli::route::RunContext;
use crate::error::{ApiError, LaunchError};
use crate::navigation::{NavigationEvent, PopTarget};
use crate::types::ProcessId;
use dialoguer::Input;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use tracing::{debug, info, warn};

const HELP: &str = "\
ls                 list items and actions at this level
cd <item>          enter an item by name or id (cd .. goes back)
back [n]           go back one or n levels
jump <index>       go back to a breadcrumb (0 is the project)
refresh            return to root and reload projects and actions
env                show the environment of this level
actions            list compatible actions
run <action>       run an action
ps                 list processes
logs <id>          show the output of a process
follow <id>        stream a process until it ends
kill <id>          terminate a process
dismiss <id>       forget a finished process
workdir            show the work directory of this level
help               show this help
quit               leave the launcher";

/// Parsed shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Enter(String),
    Back(Option<usize>),
    Jump(usize),
    Refresh,
    Env,
    Actions,
    Run(String),
    Ps,
    Logs(ProcessId),
    Follow(ProcessId),
    Kill(ProcessId),
    Dismiss(ProcessId),
    Workdir,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let argument = |what: &str| {
            if rest.is_empty() {
                Err(format!("'{}' needs {}", verb, what))
            } else {
                Ok(rest.to_string())
            }
        };
        let process_id = || {
            argument("a process id")?
                .parse::<ProcessId>()
                .map_err(|_| format!("'{}' is not a process id", rest))
        };
        let number = |what: &str| {
            argument(what)?
                .parse::<usize>()
                .map_err(|_| format!("'{}' is not a number", rest))
        };

        match verb {
            "ls" | "list" => Ok(ShellCommand::List),
            "cd" if rest == ".." => Ok(ShellCommand::Back(None)),
            "cd" => argument("an item").map(ShellCommand::Enter),
            "back" if rest.is_empty() => Ok(ShellCommand::Back(None)),
            "back" => number("a step count").map(|steps| ShellCommand::Back(Some(steps))),
            "jump" => number("a breadcrumb index").map(ShellCommand::Jump),
            "refresh" => Ok(ShellCommand::Refresh),
            "env" => Ok(ShellCommand::Env),
            "actions" => Ok(ShellCommand::Actions),
            "run" => argument("an action").map(ShellCommand::Run),
            "ps" => Ok(ShellCommand::Ps),
            "logs" => process_id().map(ShellCommand::Logs),
            "follow" => process_id().map(ShellCommand::Follow),
            "kill" => process_id().map(ShellCommand::Kill),
            "dismiss" => process_id().map(ShellCommand::Dismiss),
            "workdir" => Ok(ShellCommand::Workdir),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
            other => Err(format!("Unknown command '{}', try 'help'", other)),
        }
    }
}

/// What the loop does after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellReply {
    Output(String),
    Quit,
}

/// Run the prompt loop until `quit` or end of input.
pub fn run(context: &mut RunContext) -> Result<(), ApiError> {
    println!("{}", listing(context));
    loop {
        print_events(context);
        let line: String = match Input::new()
            .with_prompt(prompt(context.navigator.breadcrumbs()))
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) => {
                debug!(error = %e, "Input closed");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| execute_line(context, line))) {
            Ok(Ok(ShellReply::Quit)) => break,
            Ok(Ok(ShellReply::Output(text))) => {
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
            Ok(Err(err)) => {
                warn!(command = %line, error = %err, "Command failed");
                eprintln!("{}", format_diagnostic(line, &map_error(&err)));
            }
            Err(payload) => {
                warn!(command = %line, "Command panicked");
                eprintln!("{}", format_diagnostic(line, &panic_message(payload.as_ref())));
            }
        }
    }

    let running = context.supervisor.running();
    if running > 0 {
        info!(running, "Leaving with processes still running");
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic with a non-text payload".to_string()
    }
}

fn print_events(context: &RunContext) {
    for event in context.supervisor.drain_events() {
        let label = context
            .supervisor
            .record(event.id())
            .map(|record| record.label);
        println!("{}", format_event(&event, label.as_deref()));
    }
}

/// Header, items and actions of the current level.
pub(crate) fn listing(context: &RunContext) -> String {
    let navigator = &context.navigator;
    format!(
        "{}\n{}\n{}",
        format_header(&navigator.title(&context.session), navigator.breadcrumbs()),
        format_items(navigator.items()),
        format_actions(navigator.actions())
    )
}

/// Execute one line of shell input against `context`.
pub fn execute_line(context: &mut RunContext, line: &str) -> Result<ShellReply, ApiError> {
    let command = match line.parse::<ShellCommand>() {
        Ok(command) => command,
        Err(message) => return Ok(ShellReply::Output(message)),
    };
    debug!(?command, "Shell command");

    let output = match command {
        ShellCommand::Quit => return Ok(ShellReply::Quit),
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::List => listing(context),
        ShellCommand::Enter(selection) => {
            context
                .navigator
                .push(&mut context.session, &selection)?;
            listing(context)
        }
        ShellCommand::Back(steps) => {
            let target = steps.map_or(PopTarget::Back, PopTarget::Steps);
            pop(context, target)?
        }
        ShellCommand::Jump(index) => pop(context, PopTarget::Breadcrumb(index))?,
        ShellCommand::Refresh => pop(context, PopTarget::Refresh)?,
        ShellCommand::Env => format_environment(&context.navigator.environment()),
        ShellCommand::Actions => format_actions(context.navigator.actions()),
        ShellCommand::Run(action) => {
            match context
                .navigator
                .trigger(&context.session, &context.supervisor, &action)?
            {
                Some(id) => format!("Started {} as #{}", action, id),
                None => format!("{} completed", action),
            }
        }
        ShellCommand::Ps => format_processes(&context.supervisor.records()),
        ShellCommand::Logs(id) => {
            let record = context
                .supervisor
                .record(id)
                .ok_or(LaunchError::ProcessNotFound(id))?;
            format_logs(&record)
        }
        ShellCommand::Follow(id) => {
            if context.supervisor.record(id).is_none() {
                return Err(LaunchError::ProcessNotFound(id).into());
            }
            context.follow(id, |line| println!("{}", line));
            String::new()
        }
        ShellCommand::Kill(id) => {
            context.supervisor.kill(id)?;
            format!("Kill requested for #{}", id)
        }
        ShellCommand::Dismiss(id) => {
            let record = context.supervisor.dismiss(id)?;
            format!("Dismissed #{} {}", id, record.label)
        }
        ShellCommand::Workdir => {
            format_workdir(&context.navigator.work_directory(&context.session))
        }
    };
    Ok(ShellReply::Output(output))
}

fn pop(context: &mut RunContext, target: PopTarget) -> Result<String, ApiError> {
    let outcome = context.navigator.pop(&mut context.session, target)?;
    let returned = context
        .navigator
        .drain_events()
        .contains(&NavigationEvent::ReturnedToRoot);
    let mut out = String::new();
    if returned || outcome.returned_to_root {
        out.push_str("Returned to root, projects and actions reloaded.\n");
    }
    out.push_str(&listing(context));
    Ok(out)
}
