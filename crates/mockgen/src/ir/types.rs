//! Resolved type graph for mockgen
//!
//! This module provides the type representation handed to the renderer by
//! the upstream type-resolution facility. Every node is already resolved:
//! embedding is flattened, aliases are expanded and type parameters are
//! bound. The renderer only decides how to print a node.
//!
//! # Node Overview
//!
//! | Variant | Go syntax | Notes |
//! |---------|-----------|-------|
//! | `Basic` | `int`, `string` | Canonical primitive name |
//! | `Pointer` | `*T` | |
//! | `Slice` | `[]T` / `...T` | Spread form only in the variadic position |
//! | `Array` | `[N]T` | |
//! | `Map` | `map[K]V` | |
//! | `Chan` | `chan T`, `<-chan T`, `chan<- T` | |
//! | `Struct` | `struct{ A int }` | Field order preserved |
//! | `Signature` | `func(a int) error` | |
//! | `Interface` | `interface{ M() }` / `uint8 \| ~uint16` | Union constraints short-circuit |
//! | `Named` | `Name`, `pkg.Name[T]` | Qualified across import boundaries |
//! | `TypeParam` | `T` | |
//! | `Union` | `A \| ~B` | Constraint term set |
//! | `Tuple` | _none_ | Resolver-internal, cannot be rendered |
//!
//! # Named Types
//!
//! A [`NamedType`] only records its name, declaring import path and type
//! arguments. It never holds its underlying structure, so a self-referential
//! declaration such as `type List struct { next *List }` stays a finite tree.
//! A named type with an empty import path is predeclared (`error`, `any`,
//! `comparable`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a channel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChanDir {
    /// `chan T`
    #[default]
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// A struct field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: TypeNode,
}

impl Field {
    /// Create a new field
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A parameter or result of a signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name, empty when unnamed
    #[serde(default)]
    pub name: String,
    /// Parameter type
    pub ty: TypeNode,
}

impl Param {
    /// Create a named parameter
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Create an unnamed parameter
    pub fn unnamed(ty: TypeNode) -> Self {
        Self::new(String::new(), ty)
    }
}

/// A function or method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Signature {
    /// Parameters in declaration order
    #[serde(default)]
    pub params: Vec<Param>,
    /// Results in declaration order
    #[serde(default)]
    pub results: Vec<Param>,
    /// Whether the last parameter is variadic (its type is then a slice)
    #[serde(default)]
    pub variadic: bool,
}

impl Signature {
    /// Create an empty signature: `func()`
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named parameter
    pub fn param(mut self, name: impl Into<String>, ty: TypeNode) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    /// Add an unnamed result
    pub fn result(mut self, ty: TypeNode) -> Self {
        self.results.push(Param::unnamed(ty));
        self
    }

    /// Add a named result
    pub fn named_result(mut self, name: impl Into<String>, ty: TypeNode) -> Self {
        self.results.push(Param::new(name, ty));
        self
    }

    /// Mark the last parameter as variadic
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

/// A method entry of an interface type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSpec {
    /// Method name
    pub name: String,
    /// Method type; a `Signature` for any well-formed interface
    pub ty: TypeNode,
}

/// An interface type with its flattened method set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct InterfaceType {
    /// Complete method set, embedded interfaces already flattened
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
    /// Embedded element types (unions for constraint interfaces)
    #[serde(default)]
    pub embeddeds: Vec<TypeNode>,
}

impl InterfaceType {
    /// Create an empty interface: `interface{}`
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method
    pub fn method(mut self, name: impl Into<String>, signature: Signature) -> Self {
        self.methods.push(MethodSpec {
            name: name.into(),
            ty: TypeNode::Signature(signature),
        });
        self
    }

    /// Add an embedded element
    pub fn embed(mut self, ty: TypeNode) -> Self {
        self.embeddeds.push(ty);
        self
    }

    /// Terms of the first embedded union, if this interface constrains a type set
    pub fn union_terms(&self) -> Option<&[Term]> {
        self.embeddeds.iter().find_map(|embedded| match embedded {
            TypeNode::Union(terms) => Some(terms.as_slice()),
            _ => None,
        })
    }
}

/// Reference to a declared type, possibly instantiated
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedType {
    /// Declared name
    pub name: String,
    /// Import path of the declaring package, empty for predeclared types
    #[serde(default)]
    pub import_path: String,
    /// Type arguments of an instantiated generic type
    #[serde(default)]
    pub type_args: Vec<TypeNode>,
}

/// A union constraint term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Term type
    pub ty: TypeNode,
    /// Approximate match (`~T`): any type whose underlying type is `ty`
    #[serde(default)]
    pub tilde: bool,
}

impl Term {
    /// Create an exact term: `T`
    pub fn exact(ty: TypeNode) -> Self {
        Self { ty, tilde: false }
    }

    /// Create an approximate term: `~T`
    pub fn tilde(ty: TypeNode) -> Self {
        Self { ty, tilde: true }
    }
}

/// A node of the resolved type graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeNode {
    /// Predeclared basic type
    Basic(String),

    /// `*T`
    Pointer(Box<TypeNode>),

    /// `[]T`
    Slice(Box<TypeNode>),

    /// `[N]T`
    Array { len: u64, elem: Box<TypeNode> },

    /// `map[K]V`
    Map {
        key: Box<TypeNode>,
        value: Box<TypeNode>,
    },

    /// `chan T` in one of three directions
    Chan {
        #[serde(default)]
        dir: ChanDir,
        elem: Box<TypeNode>,
    },

    /// Anonymous struct
    Struct(Vec<Field>),

    /// Function type
    Signature(Signature),

    /// Anonymous interface
    Interface(InterfaceType),

    /// Reference to a declared type
    Named(NamedType),

    /// Bound type parameter
    TypeParam(String),

    /// Constraint term set
    Union(Vec<Term>),

    /// Parameter tuple produced by the resolver for signatures
    Tuple(Vec<Param>),
}

impl TypeNode {
    /// Create a basic type
    pub fn basic(name: impl Into<String>) -> Self {
        TypeNode::Basic(name.into())
    }

    /// Create a `string` type
    pub fn string() -> Self {
        Self::basic("string")
    }

    /// Create an `int` type
    pub fn int() -> Self {
        Self::basic("int")
    }

    /// Create a `bool` type
    pub fn bool() -> Self {
        Self::basic("bool")
    }

    /// Create the predeclared `error` type
    pub fn error() -> Self {
        Self::named("error", "")
    }

    /// Create a pointer type
    pub fn pointer(elem: TypeNode) -> Self {
        TypeNode::Pointer(Box::new(elem))
    }

    /// Create a slice type
    pub fn slice(elem: TypeNode) -> Self {
        TypeNode::Slice(Box::new(elem))
    }

    /// Create an array type
    pub fn array(len: u64, elem: TypeNode) -> Self {
        TypeNode::Array {
            len,
            elem: Box::new(elem),
        }
    }

    /// Create a map type
    pub fn map(key: TypeNode, value: TypeNode) -> Self {
        TypeNode::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Create a channel type
    pub fn chan(dir: ChanDir, elem: TypeNode) -> Self {
        TypeNode::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    /// Create a reference to a non-generic declared type
    pub fn named(name: impl Into<String>, import_path: impl Into<String>) -> Self {
        Self::generic(name, import_path, Vec::new())
    }

    /// Create a reference to an instantiated generic type
    pub fn generic(
        name: impl Into<String>,
        import_path: impl Into<String>,
        type_args: Vec<TypeNode>,
    ) -> Self {
        TypeNode::Named(NamedType {
            name: name.into(),
            import_path: import_path.into(),
            type_args,
        })
    }

    /// Create a type parameter reference
    pub fn type_param(name: impl Into<String>) -> Self {
        TypeNode::TypeParam(name.into())
    }

    /// Create a union of constraint terms
    pub fn union(terms: Vec<Term>) -> Self {
        TypeNode::Union(terms)
    }

    /// Create a function type
    pub fn func(signature: Signature) -> Self {
        TypeNode::Signature(signature)
    }

    /// Create an anonymous struct type
    pub fn structure(fields: Vec<Field>) -> Self {
        TypeNode::Struct(fields)
    }

    /// Create an anonymous interface type
    pub fn interface(interface: InterfaceType) -> Self {
        TypeNode::Interface(interface)
    }

    /// Create a constraint interface holding a single union: `interface{ A | ~B }`
    pub fn constraint(terms: Vec<Term>) -> Self {
        TypeNode::Interface(InterfaceType::new().embed(TypeNode::Union(terms)))
    }

    /// The tag of this node
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeNode::Basic(_) => TypeKind::Basic,
            TypeNode::Pointer(_) => TypeKind::Pointer,
            TypeNode::Slice(_) => TypeKind::Slice,
            TypeNode::Array { .. } => TypeKind::Array,
            TypeNode::Map { .. } => TypeKind::Map,
            TypeNode::Chan { .. } => TypeKind::Chan,
            TypeNode::Struct(_) => TypeKind::Struct,
            TypeNode::Signature(_) => TypeKind::Signature,
            TypeNode::Interface(_) => TypeKind::Interface,
            TypeNode::Named(_) => TypeKind::Named,
            TypeNode::TypeParam(_) => TypeKind::TypeParam,
            TypeNode::Union(_) => TypeKind::Union,
            TypeNode::Tuple(_) => TypeKind::Tuple,
        }
    }

    /// Borrow the signature of a function type
    pub fn as_signature(&self) -> Option<&Signature> {
        match self {
            TypeNode::Signature(signature) => Some(signature),
            _ => None,
        }
    }

    /// Borrow the interface of an anonymous interface type
    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            TypeNode::Interface(interface) => Some(interface),
            _ => None,
        }
    }
}

/// Tag of a [`TypeNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Basic,
    Pointer,
    Slice,
    Array,
    Map,
    Chan,
    Struct,
    Signature,
    Interface,
    Named,
    TypeParam,
    Union,
    Tuple,
}

impl TypeKind {
    /// Every tag, in declaration order
    pub const ALL: [TypeKind; 13] = [
        TypeKind::Basic,
        TypeKind::Pointer,
        TypeKind::Slice,
        TypeKind::Array,
        TypeKind::Map,
        TypeKind::Chan,
        TypeKind::Struct,
        TypeKind::Signature,
        TypeKind::Interface,
        TypeKind::Named,
        TypeKind::TypeParam,
        TypeKind::Union,
        TypeKind::Tuple,
    ];

    /// Human-readable name used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Basic => "basic",
            TypeKind::Pointer => "pointer",
            TypeKind::Slice => "slice",
            TypeKind::Array => "array",
            TypeKind::Map => "map",
            TypeKind::Chan => "channel",
            TypeKind::Struct => "struct",
            TypeKind::Signature => "signature",
            TypeKind::Interface => "interface",
            TypeKind::Named => "named",
            TypeKind::TypeParam => "type parameter",
            TypeKind::Union => "union",
            TypeKind::Tuple => "tuple",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
