//! Host and subsystem queries that feed the mapping table.
//!
//! Each query is a trait so the table builder can be driven by canned answers; the
//! implementations here shell out to the subsystem launcher (`wsl`), PowerShell and
//! `net use`, and keep the parsing of their output in plain functions.

use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::PlatformError;
use crate::mapping::{path_equals, EntryKind, MappingEntry, PathMappingTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    pub letter: char,
    pub kind: EntryKind,
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRecord {
    /// `c:` for drive mounts, the UNC path for share mounts.
    pub source_spec: String,
    pub mount_point: String,
}

pub trait DriveEnumerator {
    fn list_volumes(&self) -> Result<Vec<Volume>, PlatformError>;
}

pub trait MountQueryService {
    fn current_mounts(&self) -> Result<Vec<MountRecord>, PlatformError>;
}

pub trait NetworkShareResolver {
    fn resolve(&self, letter: char) -> Option<String>;
}

pub trait SubsystemRootLister {
    fn default_distribution(&self) -> Result<Option<String>, PlatformError>;
    fn list_root_entries(&self) -> Result<Vec<String>, PlatformError>;
}

/// Builds the table: one entry per host volume, then one entry per directory at the root
/// of the subsystem. `/mnt` is skipped so drive mounts are not mapped twice.
pub fn build_table(
    drives: &dyn DriveEnumerator,
    mounts: &dyn MountQueryService,
    shares: &dyn NetworkShareResolver,
    roots: &dyn SubsystemRootLister,
    distro_override: Option<&str>,
) -> PathMappingTable {
    let volumes = drives.list_volumes().unwrap_or_else(|e| {
        warn!(error = %e, "volume enumeration failed");
        Vec::new()
    });
    let mount_records = if volumes.is_empty() {
        Vec::new()
    } else {
        mounts.current_mounts().unwrap_or_else(|e| {
            warn!(error = %e, "mount query failed");
            Vec::new()
        })
    };

    let mut entries = Vec::new();
    for volume in &volumes {
        let drive_spec = format!("{}:", volume.letter.to_ascii_lowercase());
        let share = if volume.kind == EntryKind::NetworkDrive { shares.resolve(volume.letter) } else { None };
        let mounted = mount_records.iter().any(|m| {
            path_equals(&m.source_spec, &drive_spec)
                || share.as_deref().is_some_and(|unc| path_equals(&m.source_spec, unc))
        });
        debug!(drive = %drive_spec, kind = %volume.kind, ready = volume.ready, mounted, "volume");
        entries.push(MappingEntry::drive(volume.letter, volume.kind, volume.ready, mounted).with_remote(share));
    }

    let distro = match distro_override {
        Some(d) => Some(d.to_string()),
        None => roots.default_distribution().unwrap_or_else(|e| {
            warn!(error = %e, "distribution query failed");
            None
        }),
    };
    match distro {
        Some(distro) => {
            let dirs = roots.list_root_entries().unwrap_or_else(|e| {
                warn!(error = %e, "root listing failed");
                Vec::new()
            });
            for dir in dirs.iter().filter(|d| d.as_str() != "mnt") {
                entries.push(MappingEntry::subsystem_root(&distro, dir));
            }
        }
        None => warn!("no default distribution; subsystem paths will not be mapped"),
    }
    PathMappingTable::new(entries)
}

fn run_capture(program: &str, args: &[&str]) -> Result<Vec<u8>, PlatformError> {
    debug!(program, ?args, "query");
    let out = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| PlatformError::Spawn { program: program.to_string(), source })?;
    if !out.status.success() {
        return Err(PlatformError::Status { program: program.to_string(), code: out.status.code() });
    }
    Ok(out.stdout)
}

/// Queries answered by the subsystem launcher.
#[derive(Debug, Clone)]
pub struct WslCli {
    launcher: String,
}

impl WslCli {
    pub fn new(launcher: impl Into<String>) -> Self {
        WslCli { launcher: launcher.into() }
    }
}

impl MountQueryService for WslCli {
    fn current_mounts(&self) -> Result<Vec<MountRecord>, PlatformError> {
        let out = run_capture(&self.launcher, &["-e", "mount"])?;
        Ok(parse_mount_table(&String::from_utf8_lossy(&out)))
    }
}

impl SubsystemRootLister for WslCli {
    fn default_distribution(&self) -> Result<Option<String>, PlatformError> {
        let out = run_capture(&self.launcher, &["-l", "-v"])?;
        Ok(parse_default_distribution(&out))
    }

    fn list_root_entries(&self) -> Result<Vec<String>, PlatformError> {
        let out = run_capture(&self.launcher, &["-e", "ls", "-a", "/"])?;
        Ok(parse_root_listing(&String::from_utf8_lossy(&out)))
    }
}

/// Keeps the `drvfs` lines of `mount` output. Drive mounts are reported as `c:` and only
/// when the mount point ends in the same letter; share mounts keep their UNC source.
pub fn parse_mount_table(text: &str) -> Vec<MountRecord> {
    let mut records = Vec::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 || fields[4] != "drvfs" {
            continue;
        }
        let (source, mount_point) = (fields[0], fields[2]);
        let mut chars = source.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), Some(':')) => {
                let letter = letter.to_ascii_lowercase();
                if mount_point.chars().last().map(|c| c.to_ascii_lowercase()) == Some(letter) {
                    records.push(MountRecord { source_spec: format!("{letter}:"), mount_point: mount_point.to_string() });
                } else {
                    debug!(source, mount_point, "inconsistent drive mount");
                }
            }
            (Some('\\'), _) => {
                records.push(MountRecord { source_spec: source.to_string(), mount_point: mount_point.to_string() });
            }
            _ => {}
        }
    }
    records
}

/// Finds the `*`-marked line of `wsl -l -v`. The launcher writes UTF-16, so NULs and
/// carriage returns are dropped before decoding.
pub fn parse_default_distribution(raw: &[u8]) -> Option<String> {
    let bytes: Vec<u8> = raw.iter().copied().filter(|&b| b != 0 && b != b'\r').collect();
    let text = String::from_utf8_lossy(&bytes);
    static DEFAULT_LINE: OnceLock<Regex> = OnceLock::new();
    let re = DEFAULT_LINE.get_or_init(|| Regex::new(r"^\*\s+(\S+)").expect("valid regex"));
    text.lines().find_map(|line| re.captures(line).map(|c| c[1].to_string()))
}

pub fn parse_root_listing(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty() && *l != "." && *l != "..")
        .map(str::to_string)
        .collect()
}

/// Logical disks of the host.
#[derive(Debug, Clone, Default)]
pub struct HostDrives;

impl DriveEnumerator for HostDrives {
    #[cfg(windows)]
    fn list_volumes(&self) -> Result<Vec<Volume>, PlatformError> {
        let script = "Get-CimInstance Win32_LogicalDisk | ForEach-Object { \"$($_.DeviceID) $($_.DriveType)\" }";
        let out = run_capture("powershell", &["-NoProfile", "-NonInteractive", "-Command", script])?;
        let probe = |letter: char| std::path::Path::new(&format!("{letter}:\\")).exists();
        Ok(parse_logical_disks(&String::from_utf8_lossy(&out), probe))
    }

    #[cfg(not(windows))]
    fn list_volumes(&self) -> Result<Vec<Volume>, PlatformError> {
        Ok(Vec::new())
    }
}

/// Parses `C: 3` lines (device id, `Win32_LogicalDisk.DriveType`).
pub fn parse_logical_disks(text: &str, ready: impl Fn(char) -> bool) -> Vec<Volume> {
    let mut volumes = Vec::new();
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let (Some(id), Some(code)) = (fields.next(), fields.next()) else { continue };
        let mut chars = id.chars();
        let (Some(letter), Some(':')) = (chars.next(), chars.next()) else { continue };
        if !letter.is_ascii_alphabetic() {
            continue;
        }
        let kind = match code {
            "2" => EntryKind::RemovableDrive,
            "3" => EntryKind::LocalDrive,
            "4" => EntryKind::NetworkDrive,
            _ => EntryKind::Unmappable,
        };
        let letter = letter.to_ascii_uppercase();
        volumes.push(Volume { letter, kind, ready: ready(letter) });
    }
    volumes
}

/// Resolves mapped network drives through `net use`.
#[derive(Debug, Clone, Default)]
pub struct NetUse;

impl NetworkShareResolver for NetUse {
    #[cfg(windows)]
    fn resolve(&self, letter: char) -> Option<String> {
        let drive = format!("{letter}:");
        match run_capture("net", &["use", &drive]) {
            Ok(out) => parse_net_use(&String::from_utf8_lossy(&out)),
            Err(e) => {
                debug!(error = %e, drive = %drive, "share lookup failed");
                None
            }
        }
    }

    #[cfg(not(windows))]
    fn resolve(&self, _letter: char) -> Option<String> {
        None
    }
}

pub fn parse_net_use(text: &str) -> Option<String> {
    static REMOTE_NAME: OnceLock<Regex> = OnceLock::new();
    let re = REMOTE_NAME.get_or_init(|| Regex::new(r"(?m)^Remote name\s+(\\\\\S+)").expect("valid regex"));
    re.captures(text).map(|c| c[1].to_string())
}
