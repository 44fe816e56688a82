use thiserror::Error;

use crate::parser::Rule;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("syntax error: {0}")]
    Parse(#[from] Box<pest::error::Error<Rule>>),

    #[error("malformed source: {0}")]
    Malformed(String),

    #[error("no pragma declared")]
    MissingPragma,

    #[error("no contract declared")]
    MissingContract,

    #[error("contract `{0}` not found in source")]
    ContractNotFound(String),

    #[error("cannot resolve import `{import}` from {from}")]
    ImportNotFound { import: String, from: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("circular inheritance through {path} ({chain})")]
    CircularInheritance { path: String, chain: String },
}

pub type Result<T> = std::result::Result<T, DocError>;
