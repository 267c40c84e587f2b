//! Go type-expression renderer
//!
//! Maps any node of the resolved type graph to a [`Fragment`]. Dispatch is an
//! exhaustive match over [`TypeNode`]; every variant has one fixed rule.
//! Rendering fails with [`UnsupportedTypeNodeError`] on a node with no Go
//! syntax at all, or on an interface method whose type is not a signature.
//!
//! # Qualification
//!
//! A named type is written `pkg.Name` only when its declaring import path
//! differs from both the output path (the package of the generated file) and
//! the enclosing path (the package of the declaration being rendered):
//!
//! | declared in | enclosing | output | result |
//! |-------------|-----------|--------|--------|
//! | `P` | `P` | `Q` | `Name` |
//! | `P` | `Q` | `Q` | `p.Name` |
//! | `P` | any | `P` | `Name` |
//!
//! # Variadic Position
//!
//! Only the last parameter of a variadic signature renders its slice as
//! `...T`. Every other recursive call, type arguments included, resets the
//! flag.

use crate::codegen::fragment::{compose, Delim, Fragment, Punct};
use crate::error::{RenderResult, UnsupportedTypeNodeError};
use crate::ir::{ChanDir, Field, InterfaceType, NamedType, Signature, Term, TypeNode};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Import paths a rendering is performed against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ImportContext {
    /// Import path of the declaration being rendered
    #[serde(default)]
    pub enclosing_import_path: String,
    /// Import path of the generated file
    #[serde(default)]
    pub output_import_path: String,
}

impl ImportContext {
    /// Create a context from the enclosing and output import paths
    pub fn new(
        enclosing_import_path: impl Into<String>,
        output_import_path: impl Into<String>,
    ) -> Self {
        Self {
            enclosing_import_path: enclosing_import_path.into(),
            output_import_path: output_import_path.into(),
        }
    }

    /// Context for a generated file living in the declaring package itself
    pub fn same_package(import_path: impl Into<String>) -> Self {
        let import_path = import_path.into();
        Self {
            enclosing_import_path: import_path.clone(),
            output_import_path: import_path,
        }
    }

    /// Set the enclosing import path
    pub fn with_enclosing(mut self, import_path: impl Into<String>) -> Self {
        self.enclosing_import_path = import_path.into();
        self
    }

    /// Set the output import path
    pub fn with_output(mut self, import_path: impl Into<String>) -> Self {
        self.output_import_path = import_path.into();
        self
    }

    /// Whether a name declared in `import_path` must carry a package qualifier
    pub fn needs_qualifier(&self, import_path: &str) -> bool {
        self.renderer().needs_qualifier(import_path)
    }

    /// Render a type node in this context
    pub fn render(&self, node: &TypeNode, variadic: bool) -> RenderResult<Fragment> {
        self.renderer().render(node, variadic)
    }

    pub(crate) fn renderer(&self) -> Renderer<'_> {
        Renderer {
            enclosing_import_path: &self.enclosing_import_path,
            output_import_path: &self.output_import_path,
        }
    }
}

/// Render a type node as a Go type expression
///
/// # Errors
/// Returns [`UnsupportedTypeNodeError`] when the node, or any node below it,
/// has no Go type syntax. Generation of the affected declaration must stop.
pub fn render(
    node: &TypeNode,
    enclosing_import_path: &str,
    output_import_path: &str,
    variadic: bool,
) -> RenderResult<Fragment> {
    Renderer {
        enclosing_import_path,
        output_import_path,
    }
    .render(node, variadic)
}

/// Borrowed rendering state shared by the recursive walk
#[derive(Debug, Clone, Copy)]
pub(crate) struct Renderer<'a> {
    enclosing_import_path: &'a str,
    output_import_path: &'a str,
}

impl Renderer<'_> {
    pub(crate) fn render(&self, node: &TypeNode, variadic: bool) -> RenderResult<Fragment> {
        match node {
            TypeNode::Basic(name) => Ok(Fragment::ident(name.as_str())),
            TypeNode::Pointer(elem) => self.pointer(elem),
            TypeNode::Slice(elem) => self.slice(elem, variadic),
            TypeNode::Array { len, elem } => self.array(*len, elem),
            TypeNode::Map { key, value } => self.map(key, value),
            TypeNode::Chan { dir, elem } => self.chan(*dir, elem),
            TypeNode::Struct(fields) => self.structure(fields),
            TypeNode::Signature(signature) => self.signature(signature),
            TypeNode::Interface(interface) => self.interface(interface),
            TypeNode::Named(named) => self.named(named),
            TypeNode::TypeParam(name) => Ok(Fragment::ident(name.as_str())),
            TypeNode::Union(terms) => self.union(terms),
            TypeNode::Tuple(_) => {
                trace!(kind = %node.kind(), "no rendering rule for type node");
                Err(UnsupportedTypeNodeError { kind: node.kind() })
            }
        }
    }

    fn elem(&self, node: &TypeNode) -> RenderResult<Fragment> {
        self.render(node, false)
    }

    pub(crate) fn needs_qualifier(&self, import_path: &str) -> bool {
        !import_path.is_empty()
            && import_path != self.output_import_path
            && import_path != self.enclosing_import_path
    }

    fn pointer(&self, elem: &TypeNode) -> RenderResult<Fragment> {
        Ok(compose(&Fragment::punct(Punct::Star), [self.elem(elem)?]))
    }

    fn slice(&self, elem: &TypeNode, variadic: bool) -> RenderResult<Fragment> {
        let marker = if variadic { Punct::Ellipsis } else { Punct::Brackets };
        Ok(compose(&Fragment::punct(marker), [self.elem(elem)?]))
    }

    fn array(&self, len: u64, elem: &TypeNode) -> RenderResult<Fragment> {
        let len = Fragment::group(Delim::Index, [Fragment::ident(len.to_string())]);
        Ok(compose(&len, [self.elem(elem)?]))
    }

    fn map(&self, key: &TypeNode, value: &TypeNode) -> RenderResult<Fragment> {
        let key = self.elem(key)?;
        let value = self.elem(value)?;
        Ok(compose(
            &Fragment::keyword("map"),
            [Fragment::group(Delim::Index, [key]), value],
        ))
    }

    fn chan(&self, dir: ChanDir, elem: &TypeNode) -> RenderResult<Fragment> {
        let chan = Fragment::keyword("chan");
        let marker = match dir {
            ChanDir::Both => chan,
            ChanDir::Recv => compose(&Fragment::punct(Punct::RecvArrow), [chan]),
            ChanDir::Send => compose(&chan, [Fragment::punct(Punct::SendArrow)]),
        };

        // `chan <-chan T` would parse as `chan<- chan T`
        let mut elem_fragment = self.elem(elem)?;
        if dir == ChanDir::Both && matches!(elem, TypeNode::Chan { dir: ChanDir::Recv, .. }) {
            elem_fragment = Fragment::group(Delim::Paren, [elem_fragment]);
        }

        Ok(compose(&marker, [elem_fragment]))
    }

    fn structure(&self, fields: &[Field]) -> RenderResult<Fragment> {
        let fields = fields
            .iter()
            .map(|field| -> RenderResult<Fragment> {
                Ok(named_entry(&field.name, self.elem(&field.ty)?))
            })
            .collect::<RenderResult<Vec<_>>>()?;

        Ok(compose(
            &Fragment::keyword("struct"),
            [Fragment::group(Delim::Brace, fields)],
        ))
    }

    pub(crate) fn signature(&self, signature: &Signature) -> RenderResult<Fragment> {
        Ok(compose(
            &Fragment::keyword("func"),
            [self.signature_tail(signature)?],
        ))
    }

    /// Parameter and result clauses without the `func` keyword
    pub(crate) fn signature_tail(&self, signature: &Signature) -> RenderResult<Fragment> {
        let last = signature.params.len().saturating_sub(1);
        let params = signature
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| -> RenderResult<Fragment> {
                let variadic = signature.variadic && i == last;
                Ok(named_entry(&param.name, self.render(&param.ty, variadic)?))
            })
            .collect::<RenderResult<Vec<_>>>()?;

        let results = signature
            .results
            .iter()
            .map(|result| self.elem(&result.ty))
            .collect::<RenderResult<Vec<_>>>()?;

        let params = Fragment::group(Delim::Paren, params);
        Ok(match results.len() {
            0 => params,
            1 => compose(&params, results),
            _ => compose(&params, [Fragment::group(Delim::Paren, results)]),
        })
    }

    /// `Name(params) results`, the form a method takes inside an interface
    pub(crate) fn method_entry(&self, name: &str, ty: &TypeNode) -> RenderResult<Fragment> {
        let Some(signature) = ty.as_signature() else {
            trace!(method = name, kind = %ty.kind(), "interface method is not a signature");
            return Err(UnsupportedTypeNodeError { kind: ty.kind() });
        };
        let tail = self.signature_tail(signature)?;
        Ok(compose(&Fragment::ident(name), [tail]))
    }

    fn interface(&self, interface: &InterfaceType) -> RenderResult<Fragment> {
        // A constraint interface prints as its type set only
        if let Some(terms) = interface.union_terms() {
            return self.union(terms);
        }

        let methods = interface
            .methods
            .iter()
            .map(|method| self.method_entry(&method.name, &method.ty))
            .collect::<RenderResult<Vec<_>>>()?;

        Ok(compose(
            &Fragment::keyword("interface"),
            [Fragment::group(Delim::Brace, methods)],
        ))
    }

    pub(crate) fn union(&self, terms: &[Term]) -> RenderResult<Fragment> {
        let terms = terms
            .iter()
            .map(|term| -> RenderResult<Fragment> {
                let ty = self.elem(&term.ty)?;
                Ok(if term.tilde {
                    compose(&Fragment::punct(Punct::Tilde), [ty])
                } else {
                    ty
                })
            })
            .collect::<RenderResult<Vec<_>>>()?;

        Ok(Fragment::group(Delim::Pipe, terms))
    }

    fn named(&self, named: &NamedType) -> RenderResult<Fragment> {
        let name = if self.needs_qualifier(&named.import_path) {
            Fragment::qualified(named.import_path.as_str(), named.name.as_str())
        } else {
            Fragment::ident(named.name.as_str())
        };

        if named.type_args.is_empty() {
            return Ok(name);
        }

        let type_args = named
            .type_args
            .iter()
            .map(|arg| self.elem(arg))
            .collect::<RenderResult<Vec<_>>>()?;

        Ok(compose(&name, [Fragment::group(Delim::Bracket, type_args)]))
    }
}

/// `name T`, or just `T` for an unnamed entry
fn named_entry(name: &str, ty: Fragment) -> Fragment {
    if name.is_empty() {
        ty
    } else {
        compose(&Fragment::ident(name), [ty])
    }
}
