use wsl_delegate::mapping::{path_equals, EntryKind, MappingEntry, PathMappingTable};

fn table() -> PathMappingTable {
    PathMappingTable::new(vec![
        MappingEntry::drive('C', EntryKind::LocalDrive, true, true),
        MappingEntry::drive('e', EntryKind::RemovableDrive, true, false),
        MappingEntry::subsystem_root("Ubuntu", "home"),
        MappingEntry::subsystem_root("Ubuntu", "usr"),
    ])
}

#[test]
fn drive_paths_to_target() {
    let t = table();
    assert_eq!(t.to_target(r"C:\src\a.c").as_deref(), Some("/mnt/c/src/a.c"));
    assert_eq!(t.to_target("c:/src").as_deref(), Some("/mnt/c/src"));
    assert_eq!(t.to_target("c:").as_deref(), Some("/mnt/c"));
    assert_eq!(t.to_target(r"E:\x").as_deref(), Some("/mnt/e/x"));
    assert_eq!(t.to_target(r"D:\x"), None);
    assert_eq!(t.to_target("c"), None);
}

#[test]
fn subsystem_paths_to_target() {
    let t = table();
    assert_eq!(t.to_target(r"\\wsl$\Ubuntu\home\u\a.c").as_deref(), Some("/home/u/a.c"));
    assert_eq!(t.to_target(r"\\WSL$\ubuntu\USR\include").as_deref(), Some("/usr/include"));
    assert_eq!(t.to_target(r"\\wsl$\Debian\home"), None);
}

#[test]
fn paths_to_source() {
    let t = table();
    assert_eq!(t.to_source("/mnt/c/src/a.c").as_deref(), Some(r"c:\src\a.c"));
    assert_eq!(t.to_source("/MNT/C/x").as_deref(), Some(r"c:\x"));
    assert_eq!(t.to_source("/home/u").as_deref(), Some(r"\\wsl$\Ubuntu\home\u"));
    assert_eq!(t.to_source("/opt/x"), None);
}

#[test]
fn round_trip_under_prefixes() {
    let t = table();
    for p in [r"c:", r"c:\src\main.c", r"\\wsl$\Ubuntu\home", r"\\wsl$\Ubuntu\usr\lib\x.so"] {
        let target = t.to_target(p).unwrap();
        assert_eq!(t.to_source(&target).as_deref(), Some(p), "via {target}");
    }
}

#[test]
fn first_match_wins_over_longer_prefix() {
    let t = PathMappingTable::new(vec![
        MappingEntry::new(r"\\srv\a", "/a", EntryKind::NetworkDrive, true, true),
        MappingEntry::new(r"\\srv\a\b", "/ab", EntryKind::NetworkDrive, true, true),
    ]);
    assert_eq!(t.to_target(r"\\srv\a\b\c").as_deref(), Some("/a/b/c"));
}

#[test]
fn sibling_source_prefixes_take_the_first_entry() {
    let t = PathMappingTable::new(vec![
        MappingEntry::new(r"\\srv\home", "/h", EntryKind::NetworkDrive, true, true),
        MappingEntry::new(r"\\srv\homework", "/hwork", EntryKind::NetworkDrive, true, true),
    ]);
    assert_eq!(t.to_target(r"\\srv\homework\f").as_deref(), Some("/hwork/f"));
    assert_eq!(t.to_target(r"\\srv\home\f").as_deref(), Some("/h/f"));
}

#[test]
fn target_prefix_collision_is_plain_prefix() {
    let t = table();
    assert_eq!(t.to_source("/homework/x").as_deref(), Some(r"\\wsl$\Ubuntu\homework\x"));
}

#[test]
fn path_equality() {
    assert!(path_equals(r"C:\src", "c:/SRC"));
    assert!(path_equals("c:", "C:/"));
    assert!(path_equals(r"\\wsl$\Ubuntu\", r"\\WSL$\ubuntu"));
    assert!(!path_equals("c:", "d:"));
    assert!(!path_equals("/home", "/homework"));
}

#[test]
fn entry_state_and_labels() {
    let t = table();
    let e = &t.entries()[1];
    assert_eq!(e.source_prefix(), "e:");
    assert_eq!(e.target_prefix(), "/mnt/e");
    assert_eq!(e.state(), "mountable");
    assert_eq!(t.entries()[0].state(), "ready");
    assert_eq!(t.entries()[2].kind().to_string(), "wsl");
    let down = MappingEntry::drive('z', EntryKind::Unmappable, false, false);
    assert_eq!(down.state(), "n/a");
    assert_eq!(down.kind().as_str(), "unknown");
    assert!(PathMappingTable::default().is_empty());
}

#[test]
fn table_serializes_as_array() {
    let t = PathMappingTable::new(vec![
        MappingEntry::drive('n', EntryKind::NetworkDrive, true, false).with_remote(Some(r"\\srv\share".to_string())),
        MappingEntry::subsystem_root("Ubuntu", "home"),
    ]);
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v[0]["source_prefix"], "n:");
    assert_eq!(v[0]["kind"], "network_drive");
    assert_eq!(v[0]["remote"], r"\\srv\share");
    assert_eq!(v[1]["target_prefix"], "/home");
    assert!(v[1].get("remote").is_none());
}
