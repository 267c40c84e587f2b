//! Mockgen: interface IR and Go type-expression rendering
//!
//! This crate turns a resolved Go interface declaration into the pieces a
//! mock emitter needs: a deterministic interface/method model and composable
//! source fragments for every parameter, result and field type.
//!
//! # Architecture
//!
//! - `ir`: The resolved type graph and the interface/method IR built from it
//! - `codegen`: Fragments, the type-expression renderer and declaration rendering
//! - `error`: Builder and renderer errors
//!
//! # Usage
//!
//! ```rust
//! use mockgen::{ImportContext, Interface, InterfaceType, Signature, TypeNode};
//!
//! let resolved = TypeNode::interface(
//!     InterfaceType::new()
//!         .method("Put", Signature::new().param("key", TypeNode::string()))
//!         .method(
//!             "Get",
//!             Signature::new()
//!                 .param("key", TypeNode::string())
//!                 .result(TypeNode::error()),
//!         ),
//! );
//!
//! let iface = Interface::build("Store", "example.com/store", vec![], &resolved)?;
//! assert_eq!(iface.methods[0].name, "Get");
//!
//! let ctx = iface.import_context("example.com/store/mocks");
//! let get = iface.methods[0].render_signature(&ctx)?;
//! assert_eq!(get.to_string(), "func(key string) error");
//! # Ok::<(), mockgen::GenerateError>(())
//! ```

pub mod codegen;
pub mod error;
pub mod ir;

// Re-export commonly used types
pub use codegen::{
    compose, interface_declaration, render, self_append, type_args_clause, type_params_clause,
    with_comment, Delim, Fragment, ImportContext, Punct, Token,
};
pub use error::{
    BuildResult, GenerateError, GenerateResult, MalformedInterfaceError, RenderResult,
    UnsupportedTypeNodeError,
};
pub use ir::{
    ChanDir, Field, Interface, InterfaceType, Method, MethodSpec, NamedType, Param, Signature,
    Term, TypeKind, TypeNode, TypeParamField,
};
