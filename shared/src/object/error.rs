use thiserror::Error;

/// Errors that can occur while walking an object's outer chain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectPathError {
    /// The outer chain is longer than the walk allows, most likely a cycle
    #[error("Outer chain of '{path}' exceeds {limit} levels (possible cycle)")]
    OuterChainTooDeep { path: String, limit: usize },
}
