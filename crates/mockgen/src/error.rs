//! Error types for IR building and rendering
//!
//! Both error kinds are deterministic functions of their input: retrying
//! without changing the resolved declaration cannot succeed. Callers report
//! the offending declaration and skip it.

use crate::ir::TypeKind;
use thiserror::Error;

/// Result type for the interface IR builder
pub type BuildResult<T> = Result<T, MalformedInterfaceError>;

/// Result type for the type-expression renderer
pub type RenderResult<T> = Result<T, UnsupportedTypeNodeError>;

/// Result type for building and rendering a declaration in one step
pub type GenerateResult<T> = Result<T, GenerateError>;

/// The IR builder received a declaration it cannot represent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInterfaceError {
    /// Declared name is empty
    #[error("interface name cannot be empty")]
    EmptyName,

    /// Import path is empty
    #[error("import path of interface {0} cannot be empty")]
    EmptyImportPath(String),

    /// The resolved type is not an interface
    #[error("{name} is not an interface (resolved to {kind})")]
    NotAnInterface { name: String, kind: TypeKind },

    /// A method's type is not a signature
    #[error("method {interface}.{method} is not a signature (resolved to {kind})")]
    NonSignatureMethod {
        interface: String,
        method: String,
        kind: TypeKind,
    },
}

/// The renderer met a type node it has no rule for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported type node: no rendering rule for {kind}")]
pub struct UnsupportedTypeNodeError {
    /// Tag of the offending node
    pub kind: TypeKind,
}

/// Either failure of the build-then-render pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Malformed(#[from] MalformedInterfaceError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedTypeNodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MalformedInterfaceError::NotAnInterface {
            name: "Set".to_string(),
            kind: TypeKind::Struct,
        };
        assert_eq!(err.to_string(), "Set is not an interface (resolved to struct)");

        let err = UnsupportedTypeNodeError {
            kind: TypeKind::Tuple,
        };
        assert_eq!(
            err.to_string(),
            "unsupported type node: no rendering rule for tuple"
        );

        let err: GenerateError = MalformedInterfaceError::EmptyName.into();
        assert_eq!(err.to_string(), "interface name cannot be empty");
    }
}
