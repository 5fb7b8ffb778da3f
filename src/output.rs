//! Translates subsystem paths found in command output back to host paths.

use crate::mapping::PathMappingTable;

fn is_valid_start(c: char) -> bool {
    matches!(c, '"' | ' ' | '\'' | '=' | ':')
}

/// Whether a path may start at byte `at` of `line`: at the start of the line, after one of
/// `" ' = :` or a blank, or right after a fused upper-case flag such as `-I`.
fn at_boundary(line: &str, at: usize) -> bool {
    let mut before = line[..at].chars().rev();
    match before.next() {
        None => true,
        Some(c) if is_valid_start(c) => true,
        Some(c) => c.is_uppercase() && before.next() == Some('-'),
    }
}

/// Rewrites one line of output. Every subsystem prefix found at a path boundary is
/// replaced by its host prefix; afterwards all `/` become `\` and typographic single
/// quotes become `'`.
pub fn rewrite_line(table: &PathMappingTable, line: &str) -> String {
    let mut line = line.to_string();
    for entry in table.entries() {
        let target = entry.target_prefix();
        let source = entry.source_prefix();
        if target.is_empty() {
            continue;
        }
        let mut from = 0;
        while let Some(off) = line[from..].find(target) {
            let at = from + off;
            if at_boundary(&line, at) {
                line.replace_range(at..at + target.len(), source);
                from = at + source.len();
            } else {
                from = at + target.len();
            }
        }
    }
    line.replace('/', "\\").replace(['\u{2018}', '\u{2019}'], "'")
}
