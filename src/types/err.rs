/*!
Error types used in the library.

Following the error taxonomy this library implements:
parse errors are local to [parse](crate::parse) and returned directly.
Static and dynamic infeasibility are *decision results*, not errors — a
`Context` reports them as part of [solve::Outcome](crate::solve::Outcome),
never as an [ErrorKind]. Only a deadline expiry or an internal
inconsistency (a verifier failure, or a variable-manager invariant break)
is surfaced as an [ErrorKind].

Names of the error enums overlap with the subsystem they describe, so
`err::` is typically used as a prefix at the use site.
*/

use crate::instance::ConstraintId;

/// A union of varied error kinds which may be returned from the outermost
/// operations of the library (parsing and building a context).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An error while parsing the textual instance format.
    Parse(ParseError),

    /// An internal inconsistency was detected: a back-end invariant was
    /// violated, or a `Sat` outcome failed independent verification.
    Internal(InternalError),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Internal(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

impl From<InternalError> for ErrorKind {
    fn from(e: InternalError) -> Self {
        ErrorKind::Internal(e)
    }
}

/// Errors raised while parsing the textual instance format (C2).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// One of `#Steps`, `#Users`, `#Constraints` is missing, duplicated, or
    /// out of the expected order.
    MissingHeader(&'static str),

    /// A header value failed to parse as a positive integer.
    BadHeaderValue { header: &'static str, line_no: usize },

    /// A constraint or authorization line did not match any known grammar.
    BadLine { line_no: usize, excerpt: String },

    /// A step or user index was zero, or at or beyond the declared count.
    IndexOutOfRange { line_no: usize, index: usize },

    /// A team/department/source/target list was declared but empty.
    EmptyTeamList { line_no: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader(name) => write!(f, "missing or misplaced header: {name}"),
            Self::BadHeaderValue { header, line_no } => {
                write!(f, "line {line_no}: could not parse the {header} attribute")
            }
            Self::BadLine { line_no, excerpt } => {
                write!(f, "line {line_no}: failed to parse: {excerpt:?}")
            }
            Self::IndexOutOfRange { line_no, index } => {
                write!(f, "line {line_no}: index {index} is out of range")
            }
            Self::EmptyTeamList { line_no } => {
                write!(f, "line {line_no}: team/department/source/target list is empty")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors which indicate a bug in the library rather than a property of the
/// input instance: an invariant the back-end or variable manager relies on
/// was violated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InternalError {
    /// The variable manager found zero or more than one true variable for a
    /// step in a complete model. The cardinality (Authorization) constraint
    /// is supposed to make this impossible.
    AmbiguousStepSelection(usize),

    /// A back-end reported `Sat`, but the independent [verifier](crate::verify)
    /// found at least one violation. Carries the id of the first violated
    /// constraint found, and how many violations were found in total.
    VerifierFoundViolations {
        first_constraint: Option<ConstraintId>,
        count: usize,
    },

    /// The solve deadline expired before a decision (`Sat`/`Unsat`) could be
    /// reached.
    Timeout,
}

impl std::fmt::Display for InternalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmbiguousStepSelection(step) => {
                write!(f, "internal inconsistency: step {step} has no unique assignee in a complete model")
            }
            Self::VerifierFoundViolations { first_constraint, count } => {
                write!(
                    f,
                    "internal inconsistency: a satisfiable result failed verification ({count} violation(s), first at constraint {first_constraint:?})"
                )
            }
            Self::Timeout => write!(f, "the solve deadline expired before a decision was reached"),
        }
    }
}

impl std::error::Error for InternalError {}
