use std::{error::Error, fmt::Display};

/// A semantic diagnostic tied to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub message: String,
    pub lineno: usize,
}

impl Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.lineno, self.message)
    }
}

impl Error for TypeError {}
