//! Prefix mapping between host paths (`c:\src`, `\\wsl$\Ubuntu\home`) and paths inside the
//! subsystem (`/mnt/c/src`, `/home`).

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    LocalDrive,
    RemovableDrive,
    NetworkDrive,
    SubsystemRoot,
    Unmappable,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::LocalDrive => "fixed",
            EntryKind::RemovableDrive => "removable",
            EntryKind::NetworkDrive => "network",
            EntryKind::SubsystemRoot => "wsl",
            EntryKind::Unmappable => "unknown",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    source_prefix: String,
    target_prefix: String,
    kind: EntryKind,
    ready: bool,
    mounted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote: Option<String>,
}

impl MappingEntry {
    pub fn new(
        source_prefix: impl Into<String>,
        target_prefix: impl Into<String>,
        kind: EntryKind,
        ready: bool,
        mounted: bool,
    ) -> Self {
        MappingEntry {
            source_prefix: source_prefix.into(),
            target_prefix: target_prefix.into(),
            kind,
            ready,
            mounted,
            remote: None,
        }
    }

    /// Records the share a network drive points at.
    pub fn with_remote(mut self, remote: Option<String>) -> Self {
        self.remote = remote;
        self
    }

    /// `c:` on `/mnt/c`.
    pub fn drive(letter: char, kind: EntryKind, ready: bool, mounted: bool) -> Self {
        let letter = letter.to_ascii_lowercase();
        Self::new(format!("{letter}:"), format!("/mnt/{letter}"), kind, ready, mounted)
    }

    /// `\\wsl$\<distro>\<dir>` on `/<dir>`. Always reachable from inside the subsystem.
    pub fn subsystem_root(distro: &str, dir: &str) -> Self {
        Self::new(format!(r"\\wsl$\{distro}\{dir}"), format!("/{dir}"), EntryKind::SubsystemRoot, false, true)
    }

    pub fn source_prefix(&self) -> &str {
        &self.source_prefix
    }

    pub fn target_prefix(&self) -> &str {
        &self.target_prefix
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn ready(&self) -> bool {
        self.ready
    }

    pub fn mounted(&self) -> bool {
        self.mounted
    }

    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    /// `ready` when mounted in the subsystem, `mountable` when the volume is up but not
    /// mounted, `n/a` otherwise.
    pub fn state(&self) -> &'static str {
        if self.mounted {
            "ready"
        } else if self.ready {
            "mountable"
        } else {
            "n/a"
        }
    }
}

/// Ordered mapping entries. Lookups take the first matching entry, not the longest one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathMappingTable {
    entries: Vec<MappingEntry>,
}

impl PathMappingTable {
    pub fn new(entries: Vec<MappingEntry>) -> Self {
        PathMappingTable { entries }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Host path to subsystem path, e.g. `C:\src\a.c` to `/mnt/c/src/a.c`.
    pub fn to_target(&self, source_path: &str) -> Option<String> {
        self.entries.iter().find_map(|entry| {
            let prefix = &entry.source_prefix;
            let head = source_path.get(..prefix.len())?;
            if !path_equals(prefix, head) {
                return None;
            }
            let mut out = entry.target_prefix.clone();
            out.push_str(&source_path[prefix.len()..]);
            Some(out.replace('\\', "/"))
        })
    }

    /// Subsystem path to host path. Plain case-insensitive prefix test, no separator
    /// normalization.
    pub fn to_source(&self, target_path: &str) -> Option<String> {
        self.entries.iter().find_map(|entry| {
            let prefix = &entry.target_prefix;
            let head = target_path.get(..prefix.len())?;
            if head.to_uppercase() != prefix.to_uppercase() {
                return None;
            }
            let mut out = entry.source_prefix.clone();
            out.push_str(&target_path[prefix.len()..]);
            Some(out.replace('/', "\\"))
        })
    }
}

/// Compares two paths ignoring case and separator style, treating `a` and `a/` alike.
pub fn path_equals(a: &str, b: &str) -> bool {
    canonical(a) == canonical(b)
}

fn canonical(path: &str) -> String {
    let mut out = path.replace('\\', "/").to_uppercase();
    if !out.ends_with('/') {
        out.push('/');
    }
    out
}
