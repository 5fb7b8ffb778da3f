//! The `wsl-delegate` command: option registry, help and the run sequence.

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::compiler::CompilerRewriter;
use crate::config::Config;
use crate::error::LexError;
use crate::mapping::{EntryKind, MappingEntry, PathMappingTable};
use crate::options::{OptionDef, OptionSet, TokenizedInvocation};
use crate::platform::{self, HostDrives, NetUse, WslCli};
use crate::{output, runner};

pub const EXIT_USAGE: i32 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opt {
    Help,
    ListMounts,
    Json,
    ToTarget,
    ToSource,
    Verbose,
    Template,
}

pub fn options() -> OptionSet<Opt> {
    OptionSet::new(vec![
        OptionDef::new(Opt::Help, Some("h"), Some("help")),
        OptionDef::new(Opt::ListMounts, Some("l"), Some("list-mounts")),
        OptionDef::long(Opt::Json, "json"),
        OptionDef::short(Opt::ToTarget, "u"),
        OptionDef::short(Opt::ToSource, "w"),
        OptionDef::new(Opt::Verbose, Some("v"), Some("verbose")),
        OptionDef::long(Opt::Template, "template").with_param(),
    ])
}

pub const HELP_TEXT: &str = "\
Usage: wsl-delegate [options] <command> [args...]

Runs <command> inside the Linux subsystem from the current directory and prints its
output with subsystem paths translated back to host paths.

Options:
  -h, --help            show this help
  -l, --list-mounts     print the host/subsystem path mappings
      --json            print the mappings as JSON (with -l)
  -u <path>             print the subsystem path of a host path
  -w <path>             print the host path of a subsystem path
  -v, --verbose         log parsing and mapping decisions to stderr
      --template <name> rewrite host paths in the command arguments (gcc)

Environment:
  WSL_DELEGATE_BIN      launcher program (default: wsl)
  WSL_DELEGATE_DISTRO   distribution whose root is mapped (default: queried)
  WSL_DELEGATE_LOG      log filter, e.g. debug";

/// Rebuilds a single command line from already split process arguments. Arguments with
/// blanks are quoted, with inner quotes escaped.
pub fn raw_invocation<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().map(|a| quote_arg(a.as_ref())).collect::<Vec<_>>().join(" ")
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() || arg.contains([' ', '\t']) {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Gcc,
}

impl FromStr for Template {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gcc" => Ok(Template::Gcc),
            other => bail!("template {other} not found"),
        }
    }
}

impl Template {
    pub fn rewrite(&self, table: &PathMappingTable, command: &str) -> Result<String, LexError> {
        match self {
            Template::Gcc => CompilerRewriter::gcc(table).rewrite(command),
        }
    }
}

/// One line of `-l` output: `c: on /mnt/c fixed ready`, with the share for network drives.
pub fn format_entry(entry: &MappingEntry) -> String {
    let mut line = format!("{} on {} {} {}", entry.source_prefix(), entry.target_prefix(), entry.kind(), entry.state());
    if entry.kind() == EntryKind::NetworkDrive {
        if let Some(remote) = entry.remote() {
            line.push_str(&format!(" ({remote})"));
        }
    }
    line
}

fn print_table(table: &PathMappingTable, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
        return Ok(());
    }
    println!("Windows-Unix path mappings:");
    for entry in table.entries() {
        println!("{}", format_entry(entry));
    }
    Ok(())
}

/// Prefixes `command` with a `cd` into the subsystem path of `cwd`, when there is one.
pub fn with_working_dir(table: &PathMappingTable, cwd: &str, command: &str) -> String {
    match table.to_target(cwd) {
        Some(dir) => format!("cd \"{dir}\" && {command}"),
        None => {
            debug!(cwd, "working directory has no subsystem path");
            command.to_string()
        }
    }
}

/// The payload of `-u`/`-w` as one path: trimmed, and unquoted when [`raw_invocation`]
/// quoted it. Backslashes are path separators here, only `\"` is unescaped.
pub fn single_path(payload: &str) -> String {
    let trimmed = payload.trim();
    match trimmed.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\""),
        _ => trimmed.to_string(),
    }
}

fn convert(path: &str, translated: Option<String>) -> i32 {
    match translated {
        Some(p) => {
            println!("{p}");
            0
        }
        None => {
            println!("{path}");
            1
        }
    }
}

pub fn run(config: &Config, registry: &OptionSet<Opt>, invocation: &TokenizedInvocation<Opt>, raw: &str) -> Result<i32> {
    debug!(raw, "command line");
    for (key, value) in invocation.options() {
        if let Some(def) = registry.definition(key) {
            debug!(option = %def, value, "parsed option");
        }
    }
    debug!(payload = invocation.payload(), "payload");

    if invocation.contains(Opt::Help) {
        println!("{HELP_TEXT}");
        return Ok(0);
    }
    let template = match invocation.first(Opt::Template).map(Template::from_str).transpose() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            return Ok(EXIT_USAGE);
        }
    };

    let wsl = WslCli::new(config.launcher.as_str());
    let table = platform::build_table(&HostDrives, &wsl, &NetUse, &wsl, config.distro.as_deref());
    if invocation.contains(Opt::ListMounts) {
        print_table(&table, invocation.contains(Opt::Json))?;
    }

    let payload = invocation.payload();
    if invocation.contains(Opt::ToTarget) {
        let path = single_path(payload);
        return Ok(convert(&path, table.to_target(&path)));
    }
    if invocation.contains(Opt::ToSource) {
        let path = single_path(payload);
        return Ok(convert(&path, table.to_source(&path)));
    }
    if payload.trim().is_empty() {
        return Ok(0);
    }

    let command = match template {
        Some(t) => {
            debug!(template = ?t, "using template");
            t.rewrite(&table, payload).context("cannot rewrite command arguments")?
        }
        None => payload.to_string(),
    };
    let cwd = env::current_dir().context("cannot read current directory")?;
    let command = with_working_dir(&table, &cwd.to_string_lossy(), &command);
    debug!(command = %command, "subsystem command");

    runner::run_streamed(&config.launcher, &command, |line| output::rewrite_line(&table, line))
}
