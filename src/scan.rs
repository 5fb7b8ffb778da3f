//! Character classes and token-body scanning shared by the invocation lexer
//! and the compiler argument rewriter.

#[derive(Debug, Clone, Copy)]
pub struct Syntax {
    pub quote: char,
    pub escape: char,
    pub is_space: fn(char) -> bool,
    /// Maps the character following an escape to the literal it stands for.
    pub unescape: fn(char) -> char,
}

fn shell_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn literal(c: char) -> char {
    c
}

/// Double quotes, backslash escapes that pass the next character through, blanks and tabs.
pub const SHELL: Syntax = Syntax { quote: '"', escape: '\\', is_space: shell_space, unescape: literal };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    /// Runs until the next unescaped space.
    Unquoted,
    /// Starts just after an opening quote and runs through the closing one.
    Quoted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned {
    /// Byte offset just past the body (past the closing quote when quoted).
    pub end: usize,
    pub cooked: String,
    pub terminated: bool,
}

impl Syntax {
    pub fn is_space(&self, c: char) -> bool {
        (self.is_space)(c)
    }

    pub fn scan_body(&self, src: &str, start: usize, body: Body) -> Scanned {
        let mut cooked = String::new();
        let mut escaped = false;
        for (off, c) in src[start..].char_indices() {
            let at = start + off;
            if escaped {
                escaped = false;
                cooked.push((self.unescape)(c));
            } else if c == self.escape {
                escaped = true;
            } else if body == Body::Unquoted && self.is_space(c) {
                return Scanned { end: at, cooked, terminated: true };
            } else if body == Body::Quoted && c == self.quote {
                return Scanned { end: at + c.len_utf8(), cooked, terminated: true };
            } else {
                cooked.push(c);
            }
        }
        Scanned { end: src.len(), cooked, terminated: false }
    }

    /// Skips spaces from `start`, returning the offset of the next non-space character
    /// (or the end of `src`).
    pub fn skip_spaces(&self, src: &str, start: usize) -> usize {
        src[start..]
            .char_indices()
            .find(|&(_, c)| !self.is_space(c))
            .map(|(off, _)| start + off)
            .unwrap_or(src.len())
    }
}
