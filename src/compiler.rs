//! Rewrites host paths inside a compiler-style command line.
//!
//! Unlike [`crate::options::lex`] this works on a flat argument list: every
//! whitespace-separated argument after the program name is a candidate path, optionally
//! quoted and optionally fused to a path flag such as `-I`.

use crate::error::{LexError, LexErrorKind};
use crate::mapping::PathMappingTable;
use crate::scan::{Body, Syntax, SHELL};

/// Flags whose value is glued to them (`-Ic:\inc`, `-Lc:\lib`).
pub const GCC_PATH_FLAGS: &[char] = &['I', 'L'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub offset: usize,
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct CompilerRewriter<'a> {
    table: &'a PathMappingTable,
    path_flags: &'a [char],
    syntax: Syntax,
}

impl<'a> CompilerRewriter<'a> {
    pub fn new(table: &'a PathMappingTable, path_flags: &'a [char]) -> Self {
        CompilerRewriter { table, path_flags, syntax: SHELL }
    }

    pub fn gcc(table: &'a PathMappingTable) -> Self {
        Self::new(table, GCC_PATH_FLAGS)
    }

    /// Returns `cmd` with every mappable argument translated. Text outside the matched
    /// spans is copied unchanged.
    pub fn rewrite(&self, cmd: &str) -> Result<String, LexError> {
        let found = self.locate(cmd)?;
        let mut out = String::with_capacity(cmd.len());
        let mut last = 0;
        for (span, replacement) in &found {
            out.push_str(&cmd[last..span.offset]);
            out.push_str(replacement);
            last = span.offset + span.len;
        }
        out.push_str(&cmd[last..]);
        Ok(out)
    }

    /// Finds the translatable spans of `cmd` in ascending order, with their translations.
    pub fn locate(&self, cmd: &str) -> Result<Vec<(MatchSpan, String)>, LexError> {
        let syntax = &self.syntax;
        let mut found = Vec::new();

        // program name
        let mut pos = syntax.skip_spaces(cmd, 0);
        pos = cmd[pos..].find(|c: char| syntax.is_space(c)).map(|off| pos + off).unwrap_or(cmd.len());

        while let Some(c) = cmd[pos..].chars().next() {
            if syntax.is_space(c) {
                pos += c.len_utf8();
                continue;
            }
            let start = pos;
            let end = if c == '-' {
                let after = pos + 1;
                match cmd[after..].chars().next() {
                    Some(n) if n.is_alphanumeric() || n == '-' => {}
                    // lone `-` reads stdin
                    Some(n) if syntax.is_space(n) => {
                        pos = after;
                        continue;
                    }
                    Some(_) => return Err(LexError::new(after, LexErrorKind::BareMinus)),
                    None => break,
                }
                let flag_end = cmd[after..]
                    .find(|c: char| syntax.is_space(c) || c == syntax.quote)
                    .map(|off| after + off)
                    .unwrap_or(cmd.len());
                if cmd[flag_end..].starts_with(syntax.quote) {
                    let body = syntax.scan_body(cmd, flag_end + 1, Body::Quoted);
                    if !body.terminated {
                        break;
                    }
                    body.end
                } else {
                    flag_end
                }
            } else if c == syntax.quote {
                let body = syntax.scan_body(cmd, pos + 1, Body::Quoted);
                if !body.terminated {
                    break;
                }
                body.end
            } else {
                syntax.scan_body(cmd, pos, Body::Unquoted).end
            };
            if let Some(hit) = self.examine(cmd, start, end) {
                found.push(hit);
            }
            pos = end;
        }
        Ok(found)
    }

    fn examine(&self, cmd: &str, mut start: usize, mut end: usize) -> Option<(MatchSpan, String)> {
        let token = &cmd[start..end];
        if let Some(flag) = token.strip_prefix('-').and_then(|rest| rest.chars().next()) {
            if self.path_flags.contains(&flag) {
                start += 1 + flag.len_utf8();
            }
        }
        let quote = self.syntax.quote;
        let inner = &cmd[start..end];
        if inner.len() >= 2 && inner.starts_with(quote) && inner.ends_with(quote) {
            start += quote.len_utf8();
            end -= quote.len_utf8();
        }
        let candidate = &cmd[start..end];
        if candidate.is_empty() {
            return None;
        }
        let translated = self.table.to_target(candidate)?;
        Some((MatchSpan { offset: start, len: end - start }, translated))
    }
}
