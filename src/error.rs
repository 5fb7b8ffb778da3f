use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// `-` not followed by an option letter or a second `-`.
    BareMinus,
    /// `--` not followed by an option name.
    EmptyLongName,
    /// Character that cannot appear in an option name.
    BadVerbChar(char),
    /// A parameter was expected but the next token starts with `-`.
    ParamLooksLikeOption,
    /// A parameter was expected but the input ended.
    MissingParam,
    /// Something other than whitespace right after a closing quote.
    CharAfterQuote(char),
    /// Input ended inside a quoted parameter.
    UnterminatedQuote,
}

impl std::fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErrorKind::BareMinus => write!(f, "'-' must be followed by an option name"),
            LexErrorKind::EmptyLongName => write!(f, "'--' must be followed by an option name"),
            LexErrorKind::BadVerbChar(c) => write!(f, "unexpected '{c}' in option name"),
            LexErrorKind::ParamLooksLikeOption => write!(f, "missing parameter (found another option)"),
            LexErrorKind::MissingParam => write!(f, "missing parameter at end of input"),
            LexErrorKind::CharAfterQuote(c) => write!(f, "unexpected '{c}' after closing quote"),
            LexErrorKind::UnterminatedQuote => write!(f, "unterminated quote"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed command line at offset {offset}: {kind}")]
pub struct LexError {
    pub offset: usize,
    pub kind: LexErrorKind,
}

impl LexError {
    pub(crate) fn new(offset: usize, kind: LexErrorKind) -> Self {
        LexError { offset, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with status {code:?}")]
    Status { program: String, code: Option<i32> },
}
