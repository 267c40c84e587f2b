//! Code generation for mockgen
//!
//! This module provides:
//! - Composable source fragments and their composition helpers
//! - The recursive Go type-expression renderer
//! - Declaration-level rendering (type-parameter lists, interface declarations)

pub mod declaration;
pub mod fragment;
pub mod render;

pub use declaration::{interface_declaration, type_args_clause, type_params_clause};
pub use fragment::{compose, package_name, self_append, with_comment, Delim, Fragment, Punct, Token};
pub use render::{render, ImportContext};
