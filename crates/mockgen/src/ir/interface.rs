//! Interface and method IR
//!
//! This module builds the stable, deduplicated, deterministically ordered
//! model of one interface declaration that the mock emitter consumes.

use crate::error::{BuildResult, MalformedInterfaceError};
use crate::ir::{Param, Signature, Term, TypeNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One field of a declaration's type-parameter list
///
/// `[K, V comparable]` is a single field with two names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParamField {
    /// Declared names sharing the constraint
    pub names: Vec<String>,
    /// Constraint type (`any`, `comparable`, a union interface, ...)
    pub constraint: TypeNode,
}

impl TypeParamField {
    /// Create a field declaring several names
    pub fn new<I, S>(names: I, constraint: TypeNode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            constraint,
        }
    }

    /// Create a field declaring a single name
    pub fn single(name: impl Into<String>, constraint: TypeNode) -> Self {
        Self {
            names: vec![name.into()],
            constraint,
        }
    }
}

/// A method of an interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Method {
    /// Method name
    pub name: String,
    /// Parameter and result lists
    pub signature: Signature,
}

impl Method {
    /// Create a new method
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }

    /// Parameters in declaration order
    pub fn params(&self) -> &[Param] {
        &self.signature.params
    }

    /// Results in declaration order
    pub fn results(&self) -> &[Param] {
        &self.signature.results
    }

    /// Whether the last parameter is variadic
    pub fn is_variadic(&self) -> bool {
        self.signature.variadic
    }
}

/// IR of one interface declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Declared name, unique within its import path
    pub name: String,
    /// Import path of the declaring package
    pub import_path: String,
    /// Declared type-parameter fields, in declaration order
    pub type_params: Vec<TypeParamField>,
    /// Methods, deduplicated by name and sorted by name
    pub methods: Vec<Method>,
    /// Union terms when the interface embeds a type set
    pub type_set: Vec<Term>,
}

impl Interface {
    /// Build the IR for an interface declaration
    ///
    /// `resolved` must be the fully resolved interface type carrying the
    /// flattened method set. Methods are collected by name and emitted in
    /// sorted name order, so the resolver's iteration order never leaks into
    /// the output.
    ///
    /// # Errors
    /// Returns [`MalformedInterfaceError`] when the name or import path is
    /// empty, when `resolved` is not an interface, or when a method's type is
    /// not a signature.
    pub fn build(
        name: impl Into<String>,
        import_path: impl Into<String>,
        type_params: Vec<TypeParamField>,
        resolved: &TypeNode,
    ) -> BuildResult<Self> {
        let name = name.into();
        let import_path = import_path.into();

        if name.is_empty() {
            return Err(MalformedInterfaceError::EmptyName);
        }
        if import_path.is_empty() {
            return Err(MalformedInterfaceError::EmptyImportPath(name));
        }

        let underlying = resolved.as_interface().ok_or_else(|| {
            MalformedInterfaceError::NotAnInterface {
                name: name.clone(),
                kind: resolved.kind(),
            }
        })?;

        let mut method_map: HashMap<String, Method> =
            HashMap::with_capacity(underlying.methods.len());
        for spec in &underlying.methods {
            let signature = spec.ty.as_signature().ok_or_else(|| {
                MalformedInterfaceError::NonSignatureMethod {
                    interface: name.clone(),
                    method: spec.name.clone(),
                    kind: spec.ty.kind(),
                }
            })?;
            method_map.insert(spec.name.clone(), Method::new(&spec.name, signature.clone()));
        }

        let mut method_names: Vec<String> = method_map.keys().cloned().collect();
        method_names.sort_unstable();

        let methods: Vec<Method> = method_names
            .iter()
            .filter_map(|method_name| method_map.remove(method_name))
            .collect();

        let type_set = underlying
            .union_terms()
            .map(<[Term]>::to_vec)
            .unwrap_or_default();

        let interface = Self {
            name,
            import_path,
            type_params,
            methods,
            type_set,
        };

        debug!(
            interface = %interface.name,
            import_path = %interface.import_path,
            methods = interface.methods.len(),
            type_params = interface.type_params.len(),
            "built interface IR"
        );
        if interface.is_constraint_only() {
            warn!(
                interface = %interface.name,
                terms = interface.type_set.len(),
                "interface only declares a type set; generating it anyway"
            );
        }

        Ok(interface)
    }

    /// Look up a method by name
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods
            .binary_search_by(|method| method.name.as_str().cmp(name))
            .ok()
            .map(|index| &self.methods[index])
    }

    /// Whether the declaration has type parameters
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Whether the interface is a pure type set such as `interface{ int8 | int16 }`
    ///
    /// Such interfaces can only be used as constraints. They are still built
    /// and rendered; the emitter decides what to do with them.
    pub fn is_constraint_only(&self) -> bool {
        self.methods.is_empty() && !self.type_set.is_empty()
    }

    /// Every declared type-parameter name, in declaration order
    pub fn type_param_names(&self) -> impl Iterator<Item = &str> {
        self.type_params
            .iter()
            .flat_map(|field| field.names.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{InterfaceType, TypeKind};

    fn sig_with_param(name: &str) -> Signature {
        Signature::new().param(name, TypeNode::int())
    }

    #[test]
    fn test_methods_sorted_by_name() {
        let resolved = TypeNode::interface(
            InterfaceType::new()
                .method("Remove", sig_with_param("v"))
                .method("Add", sig_with_param("v"))
                .method("Contains", Signature::new().result(TypeNode::bool())),
        );

        let iface = Interface::build("Set", "example.com/generics", vec![], &resolved).unwrap();
        let names: Vec<&str> = iface.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Add", "Contains", "Remove"]);
        assert!(!iface.is_generic());
        assert!(!iface.is_constraint_only());
    }

    #[test]
    fn test_embedding_order_does_not_matter() {
        // Flattened sets of `interface{ B; A }` and `interface{ A; B }`
        let foo = ("foo", Signature::new());
        let bar = ("bar", Signature::new().result(TypeNode::error()));

        let b_first = TypeNode::interface(
            InterfaceType::new()
                .method(foo.0, foo.1.clone())
                .method(bar.0, bar.1.clone()),
        );
        let a_first = TypeNode::interface(
            InterfaceType::new()
                .method(bar.0, bar.1)
                .method(foo.0, foo.1),
        );

        let left = Interface::build("AB", "example.com/p", vec![], &b_first).unwrap();
        let right = Interface::build("AB", "example.com/p", vec![], &a_first).unwrap();

        assert_eq!(left, right);
        assert_eq!(left.methods[0].name, "bar");
        assert_eq!(left.methods[1].name, "foo");
    }

    #[test]
    fn test_duplicate_methods_collapse() {
        let resolved = TypeNode::interface(
            InterfaceType::new()
                .method("Close", Signature::new().result(TypeNode::error()))
                .method("Close", Signature::new().result(TypeNode::error())),
        );

        let iface = Interface::build("Closer", "io", vec![], &resolved).unwrap();
        assert_eq!(iface.methods.len(), 1);
    }

    #[test]
    fn test_build_is_idempotent() {
        let resolved = TypeNode::interface(
            InterfaceType::new()
                .method("Get", sig_with_param("key"))
                .method("Put", sig_with_param("key")),
        );
        let params = vec![TypeParamField::new(["K", "V"], TypeNode::named("any", ""))];

        let first = Interface::build("Map", "example.com/m", params.clone(), &resolved).unwrap();
        let second = Interface::build("Map", "example.com/m", params, &resolved).unwrap();
        assert_eq!(first, second);
        assert!(first.is_generic());
        assert_eq!(first.type_param_names().collect::<Vec<_>>(), vec!["K", "V"]);
    }

    #[test]
    fn test_not_an_interface() {
        let err = Interface::build("Point", "example.com/geo", vec![], &TypeNode::structure(vec![]))
            .unwrap_err();
        assert_eq!(
            err,
            MalformedInterfaceError::NotAnInterface {
                name: "Point".to_string(),
                kind: TypeKind::Struct,
            }
        );
    }

    #[test]
    fn test_non_signature_method() {
        let resolved = TypeNode::interface(InterfaceType {
            methods: vec![crate::ir::MethodSpec {
                name: "Len".to_string(),
                ty: TypeNode::int(),
            }],
            embeddeds: vec![],
        });

        let err = Interface::build("Sized", "example.com/s", vec![], &resolved).unwrap_err();
        assert!(matches!(
            err,
            MalformedInterfaceError::NonSignatureMethod { ref method, kind: TypeKind::Basic, .. }
                if method == "Len"
        ));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let resolved = TypeNode::interface(InterfaceType::new());
        assert_eq!(
            Interface::build("", "p", vec![], &resolved).unwrap_err(),
            MalformedInterfaceError::EmptyName
        );
        assert_eq!(
            Interface::build("I", "", vec![], &resolved).unwrap_err(),
            MalformedInterfaceError::EmptyImportPath("I".to_string())
        );
    }

    #[test]
    fn test_constraint_only_interface_is_kept() {
        let resolved = TypeNode::constraint(vec![
            Term::exact(TypeNode::basic("int8")),
            Term::exact(TypeNode::basic("int16")),
            Term::exact(TypeNode::basic("int64")),
        ]);

        let iface = Interface::build("NumericSets", "example.com/generics", vec![], &resolved)
            .unwrap();
        assert!(iface.is_constraint_only());
        assert!(iface.methods.is_empty());
        assert_eq!(iface.type_set.len(), 3);
    }

    #[test]
    fn test_method_lookup() {
        let resolved = TypeNode::interface(
            InterfaceType::new()
                .method("Write", sig_with_param("p").variadic())
                .method("Flush", Signature::new().result(TypeNode::error())),
        );
        let iface = Interface::build("Writer", "example.com/w", vec![], &resolved).unwrap();

        let write = iface.method("Write").unwrap();
        assert!(write.is_variadic());
        assert_eq!(write.params().len(), 1);
        assert_eq!(iface.method("Flush").unwrap().results().len(), 1);
        assert!(iface.method("Missing").is_none());
    }
}
