//! Runs commands inside the Linux subsystem on behalf of host tools.
//!
//! The engine is plain text processing: [`options`] lexes the raw invocation, [`mapping`]
//! translates path prefixes in both directions, [`compiler`] rewrites paths inside
//! compiler arguments and [`output`] rewrites paths found in the command's output.
//! [`platform`] and [`runner`] hold the process-facing glue.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod mapping;
pub mod options;
pub mod output;
pub mod platform;
pub mod runner;
pub mod scan;

pub use error::{LexError, LexErrorKind, ParseError, PlatformError};
pub use mapping::{EntryKind, MappingEntry, PathMappingTable};
pub use options::{OptionDef, OptionSet, TokenizedInvocation};
