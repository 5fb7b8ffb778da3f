//! Option registry, the raw invocation lexer and verb resolution.
//!
//! A raw invocation such as `-lv --template gcc gcc -Ic:\inc main.c` is first lexed into
//! verb/value pairs (`l`, `v`, `template=gcc`) plus the untouched payload
//! (`gcc -Ic:\inc main.c`), then every verb is resolved against an [`OptionSet`].

use std::fmt;

use crate::error::{LexError, LexErrorKind, ParseError};
use crate::scan::{Body, SHELL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDef<K> {
    pub key: K,
    pub short: Option<&'static str>,
    pub long: Option<&'static str>,
    pub has_param: bool,
    pub allow_dupe: bool,
}

impl<K> OptionDef<K> {
    pub const fn new(key: K, short: Option<&'static str>, long: Option<&'static str>) -> Self {
        OptionDef { key, short, long, has_param: false, allow_dupe: false }
    }

    pub const fn short(key: K, name: &'static str) -> Self {
        Self::new(key, Some(name), None)
    }

    pub const fn long(key: K, name: &'static str) -> Self {
        Self::new(key, None, Some(name))
    }

    pub const fn with_param(mut self) -> Self {
        self.has_param = true;
        self
    }

    pub const fn allow_dupe(mut self) -> Self {
        self.allow_dupe = true;
        self
    }

    pub fn accepts(&self, verb: &str) -> bool {
        self.short == Some(verb) || self.long == Some(verb)
    }

    /// True when the definition has exactly one spelling.
    pub fn is_mappable(&self) -> bool {
        self.short.is_some() != self.long.is_some()
    }
}

impl<K> fmt::Display for OptionDef<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.short {
            write!(f, "{s}")?;
        }
        if let Some(l) = self.long {
            write!(f, "({l})")?;
        }
        if self.has_param {
            write!(f, " <>")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub verb: String,
    pub value: String,
}

impl RawToken {
    fn new(verb: impl Into<String>, value: impl Into<String>) -> Self {
        RawToken { verb: verb.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInvocation {
    pub tokens: Vec<RawToken>,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FindVerb,
    Minus,
    MinusLetter,
    MinusMinus,
    MinusMinusLetters,
    ParseParamStart,
    ParseParamPostQuote,
}

/// Splits `raw` into option tokens and the trailing payload.
///
/// `has_param` decides whether a verb consumes the following parameter. `--name=value`
/// always binds `value`, whatever `has_param` says. The first character outside option
/// syntax starts the payload, which runs verbatim to the end of the input.
pub fn lex(raw: &str, has_param: impl Fn(&str) -> bool) -> Result<RawInvocation, LexError> {
    let syntax = &SHELL;
    let mut tokens = Vec::new();
    let mut state = State::FindVerb;
    let mut verb = String::new();
    let mut pos = raw.len() - raw.trim_start().len();

    while let Some(c) = raw[pos..].chars().next() {
        let next = pos + c.len_utf8();
        match state {
            State::FindVerb => {
                if c == '-' {
                    state = State::Minus;
                } else if !syntax.is_space(c) {
                    return Ok(RawInvocation { tokens, payload: raw[pos..].to_string() });
                }
            }
            State::Minus | State::MinusLetter => {
                if state == State::Minus && c == '-' {
                    state = State::MinusMinus;
                } else if c.is_alphanumeric() {
                    verb = c.to_string();
                    if has_param(&verb) {
                        state = State::ParseParamStart;
                    } else {
                        tokens.push(RawToken::new(verb.as_str(), ""));
                        state = State::MinusLetter;
                    }
                } else if state == State::MinusLetter && syntax.is_space(c) {
                    state = State::FindVerb;
                } else if state == State::Minus {
                    return Err(LexError::new(pos, LexErrorKind::BareMinus));
                } else {
                    return Err(LexError::new(pos, LexErrorKind::BadVerbChar(c)));
                }
            }
            State::MinusMinus => {
                if !c.is_alphanumeric() {
                    return Err(LexError::new(pos, LexErrorKind::EmptyLongName));
                }
                verb = c.to_string();
                state = State::MinusMinusLetters;
            }
            State::MinusMinusLetters => {
                if syntax.is_space(c) {
                    if has_param(&verb) {
                        state = State::ParseParamStart;
                    } else {
                        tokens.push(RawToken::new(verb.as_str(), ""));
                        state = State::FindVerb;
                    }
                } else if c.is_alphanumeric() || c == '-' {
                    verb.push(c);
                } else if c == '=' {
                    state = State::ParseParamStart;
                } else {
                    return Err(LexError::new(pos, LexErrorKind::BadVerbChar(c)));
                }
            }
            State::ParseParamStart => {
                if c == '-' {
                    return Err(LexError::new(pos, LexErrorKind::ParamLooksLikeOption));
                } else if c == syntax.quote {
                    let body = syntax.scan_body(raw, next, Body::Quoted);
                    if !body.terminated {
                        return Err(LexError::new(pos, LexErrorKind::UnterminatedQuote));
                    }
                    tokens.push(RawToken::new(verb.as_str(), body.cooked));
                    state = State::ParseParamPostQuote;
                    pos = body.end;
                    continue;
                } else if !syntax.is_space(c) {
                    let body = syntax.scan_body(raw, pos, Body::Unquoted);
                    tokens.push(RawToken::new(verb.as_str(), body.cooked));
                    state = State::FindVerb;
                    pos = body.end;
                    continue;
                }
            }
            State::ParseParamPostQuote => {
                if !syntax.is_space(c) {
                    return Err(LexError::new(pos, LexErrorKind::CharAfterQuote(c)));
                }
                state = State::FindVerb;
            }
        }
        pos = next;
    }

    match state {
        State::FindVerb | State::MinusLetter | State::ParseParamPostQuote => {}
        State::Minus => return Err(LexError::new(pos, LexErrorKind::BareMinus)),
        State::MinusMinus => return Err(LexError::new(pos, LexErrorKind::EmptyLongName)),
        State::ParseParamStart => return Err(LexError::new(pos, LexErrorKind::MissingParam)),
        State::MinusMinusLetters => {
            if has_param(&verb) {
                return Err(LexError::new(pos, LexErrorKind::MissingParam));
            }
            tokens.push(RawToken::new(verb, ""));
        }
    }
    Ok(RawInvocation { tokens, payload: String::new() })
}

/// The registry of recognized options, built once and shared by reference.
#[derive(Debug, Clone)]
pub struct OptionSet<K> {
    defs: Vec<OptionDef<K>>,
}

impl<K: Copy + Eq> OptionSet<K> {
    pub fn new(defs: Vec<OptionDef<K>>) -> Self {
        OptionSet { defs }
    }

    pub fn definitions(&self) -> &[OptionDef<K>] {
        &self.defs
    }

    pub fn find(&self, verb: &str) -> Option<&OptionDef<K>> {
        self.defs.iter().find(|d| d.accepts(verb))
    }

    pub fn definition(&self, key: K) -> Option<&OptionDef<K>> {
        self.defs.iter().find(|d| d.key == key)
    }

    pub fn has_param(&self, verb: &str) -> bool {
        self.find(verb).map(|d| d.has_param).unwrap_or(false)
    }

    /// Resolves lexed verbs. A repeated option without `allow_dupe` keeps its first value.
    pub fn resolve(&self, raw: RawInvocation) -> Result<TokenizedInvocation<K>, ParseError> {
        let mut options: Vec<(K, String)> = Vec::with_capacity(raw.tokens.len());
        for token in raw.tokens {
            let def = self.find(&token.verb).ok_or_else(|| ParseError::UnknownOption(token.verb.clone()))?;
            let seen = options.iter().any(|(k, _)| *k == def.key);
            if !seen || def.allow_dupe {
                options.push((def.key, token.value));
            }
        }
        Ok(TokenizedInvocation { options, payload: raw.payload })
    }

    pub fn tokenize(&self, raw: &str) -> Result<TokenizedInvocation<K>, ParseError> {
        let lexed = lex(raw, |verb| self.has_param(verb))?;
        self.resolve(lexed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedInvocation<K> {
    options: Vec<(K, String)>,
    payload: String,
}

impl<K: Copy + Eq> TokenizedInvocation<K> {
    pub fn contains(&self, key: K) -> bool {
        self.options.iter().any(|(k, _)| *k == key)
    }

    pub fn first(&self, key: K) -> Option<&str> {
        self.options.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    pub fn options(&self) -> impl Iterator<Item = (K, &str)> + '_ {
        self.options.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}
