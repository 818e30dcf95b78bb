use std::fmt;

/// Errors raised while building or looking up an engine from the registry.
///
/// `Build` stops at the first error and discards partial state; the engine
/// is not reusable after a failed build. `Lookup` never errors — a miss is
/// not an error, it is the sentinel `None` in the return value.
#[derive(Debug)]
pub enum RouterError {
    /// The same parameter name was used twice within one pattern.
    DuplicateParamName { pattern: String, name: String },
    /// Sibling records arrived out of sort order during Double-Array build.
    /// Should not occur under a correct pre-sort; surfacing it as an error
    /// rather than panicking keeps a malformed caller-supplied sort from
    /// corrupting the table silently.
    UnsortedInternal { pattern: String, depth: usize },
    /// A pattern could not be compiled into a valid regular expression.
    PatternCompile { pattern: String, source: regex::Error },
    /// `NewURLRouter` was asked for a name with no registered factory.
    UnknownEngine(String),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::DuplicateParamName { pattern, name } => write!(
                f,
                "duplicate parameter name {:?} in pattern {:?}",
                name, pattern
            ),
            RouterError::UnsortedInternal { pattern, depth } => write!(
                f,
                "unsorted internal state building pattern {:?} at depth {}",
                pattern, depth
            ),
            RouterError::PatternCompile { pattern, source } => {
                write!(f, "pattern {:?} failed to compile: {}", pattern, source)
            }
            RouterError::UnknownEngine(name) => {
                write!(f, "no engine registered under name {:?}", name)
            }
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouterError::PatternCompile { source, .. } => Some(source),
            _ => None,
        }
    }
}
