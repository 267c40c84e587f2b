//! Declaration rendering
//!
//! Builds the declaration-level fragments an emitter needs around a mock:
//! type-parameter lists, references to the mocked interface and the
//! interface declaration itself.

use crate::codegen::fragment::{compose, Delim, Fragment, Punct, Token};
use crate::codegen::render::ImportContext;
use crate::error::{GenerateResult, RenderResult};
use crate::ir::{Interface, Method, TypeNode, TypeParamField};

/// Render a declaration's type-parameter list: `[K comparable, V any]`
///
/// Names sharing a field stay together (`[K, V any]`). An empty list renders
/// as the empty fragment. A lone parameter whose constraint starts with `*`
/// gets a trailing comma: `[T *int,]`.
pub fn type_params_clause(
    fields: &[TypeParamField],
    ctx: &ImportContext,
) -> RenderResult<Fragment> {
    if fields.is_empty() {
        return Ok(Fragment::empty());
    }

    let renderer = ctx.renderer();
    let lone_name = matches!(fields, [field] if field.names.len() == 1);
    let fields = fields
        .iter()
        .map(|field| -> RenderResult<Fragment> {
            let constraint = renderer.render(&field.constraint, false)?;
            let mut tail = vec![constraint];
            if lone_name && starts_with_star(&tail[0]) {
                tail.push(Fragment::punct(Punct::Comma));
            }
            Ok(compose(&names_list(&field.names), tail))
        })
        .collect::<RenderResult<Vec<_>>>()?;

    Ok(Fragment::group(Delim::Bracket, fields))
}

/// Whether the constraint begins with `*`, directly or as its first union term
///
/// `[T *C]` with a single name parses as the array length `T * C`.
fn starts_with_star(constraint: &Fragment) -> bool {
    match constraint.tokens().first() {
        Some(Token::Punct(Punct::Star)) => true,
        Some(Token::Group { delim: Delim::Pipe, items }) => {
            items.first().is_some_and(starts_with_star)
        }
        _ => false,
    }
}

/// Render the instantiation form of a type-parameter list: `[K, V]`
pub fn type_args_clause(fields: &[TypeParamField]) -> Fragment {
    let names: Vec<Fragment> = fields
        .iter()
        .flat_map(|field| field.names.iter())
        .map(|name| Fragment::ident(name.as_str()))
        .collect();

    if names.is_empty() {
        Fragment::empty()
    } else {
        Fragment::group(Delim::Bracket, names)
    }
}

/// `K, V`
fn names_list(names: &[String]) -> Fragment {
    let mut parts = Vec::with_capacity(names.len() * 2);
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            parts.push(Fragment::punct(Punct::Comma));
        }
        parts.push(Fragment::ident(name.as_str()));
    }
    compose(&Fragment::empty(), parts)
}

impl Method {
    /// Render the method type: `func(key K) (V, bool)`
    pub fn render_signature(&self, ctx: &ImportContext) -> RenderResult<Fragment> {
        ctx.renderer().signature(&self.signature)
    }

    /// Render the method as an interface element: `Get(key K) (V, bool)`
    pub fn render_entry(&self, ctx: &ImportContext) -> RenderResult<Fragment> {
        let tail = ctx.renderer().signature_tail(&self.signature)?;
        Ok(compose(&Fragment::ident(self.name.as_str()), [tail]))
    }
}

impl Interface {
    /// Context for rendering this interface into a file at `output_import_path`
    pub fn import_context(&self, output_import_path: impl Into<String>) -> ImportContext {
        ImportContext::new(self.import_path.as_str(), output_import_path)
    }

    /// Reference to the interface instantiated with its own type parameters
    ///
    /// `Set[T]` from the declaring package, `generics.Set[T]` from elsewhere.
    pub fn render_reference(&self, ctx: &ImportContext) -> Fragment {
        let name = if ctx.needs_qualifier(&self.import_path) {
            Fragment::qualified(self.import_path.as_str(), self.name.as_str())
        } else {
            Fragment::ident(self.name.as_str())
        };
        compose(&name, [type_args_clause(&self.type_params)])
    }

    /// Render the interface declaration
    ///
    /// `type Map[K comparable, V any] interface{ Get(key K) (V, bool) }`. An
    /// embedded type set is written before the methods.
    pub fn render_declaration(&self, ctx: &ImportContext) -> RenderResult<Fragment> {
        let mut body = Vec::with_capacity(self.methods.len() + 1);
        if !self.type_set.is_empty() {
            body.push(ctx.renderer().union(&self.type_set)?);
        }
        for method in &self.methods {
            body.push(method.render_entry(ctx)?);
        }

        Ok(compose(
            &Fragment::keyword("type"),
            [
                Fragment::ident(self.name.as_str()),
                type_params_clause(&self.type_params, ctx)?,
                Fragment::keyword("interface"),
                Fragment::group(Delim::Brace, body),
            ],
        ))
    }
}

/// Build the IR for a declaration and render it in one step
///
/// # Errors
/// Returns [`crate::GenerateError`] when the declaration is malformed or
/// uses a type node without Go syntax.
pub fn interface_declaration(
    name: &str,
    import_path: &str,
    type_params: Vec<TypeParamField>,
    resolved: &TypeNode,
    ctx: &ImportContext,
) -> GenerateResult<Fragment> {
    let interface = Interface::build(name, import_path, type_params, resolved)?;
    Ok(interface.render_declaration(ctx)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerateError;
    use crate::ir::{InterfaceType, Param, Signature, Term, TypeKind};

    const GENERICS: &str = "example.com/generics";

    fn any() -> TypeNode {
        TypeNode::named("any", "")
    }

    #[test]
    fn test_type_params_clause() {
        let ctx = ImportContext::same_package(GENERICS);
        let fields = vec![
            TypeParamField::new(["K", "V"], TypeNode::named("comparable", "")),
            TypeParamField::single(
                "T",
                TypeNode::constraint(vec![
                    Term::exact(TypeNode::basic("uint8")),
                    Term::tilde(TypeNode::basic("uint16")),
                ]),
            ),
        ];

        let clause = type_params_clause(&fields, &ctx).unwrap();
        assert_eq!(clause.to_string(), "[K, V comparable, T uint8 | ~uint16]");
        assert_eq!(type_args_clause(&fields).to_string(), "[K, V, T]");

        assert!(type_params_clause(&[], &ctx).unwrap().is_empty());
        assert!(type_args_clause(&[]).is_empty());
    }

    #[test]
    fn test_lone_pointer_constraint_keeps_trailing_comma() {
        let ctx = ImportContext::same_package(GENERICS);
        let resolved = TypeNode::interface(
            InterfaceType::new().method("Get", Signature::new().result(TypeNode::type_param("T"))),
        );
        let params = vec![TypeParamField::single(
            "T",
            TypeNode::constraint(vec![Term::exact(TypeNode::pointer(TypeNode::int()))]),
        )];

        let decl = interface_declaration("Ptr", GENERICS, params, &resolved, &ctx).unwrap();
        assert_eq!(decl.to_string(), "type Ptr[T *int,] interface{ Get() T }");

        let bare = [TypeParamField::single("T", TypeNode::pointer(TypeNode::int()))];
        assert_eq!(type_params_clause(&bare, &ctx).unwrap().to_string(), "[T *int,]");

        // A second name or field already disambiguates
        let pair = [TypeParamField::new(["K", "V"], TypeNode::pointer(TypeNode::int()))];
        assert_eq!(type_params_clause(&pair, &ctx).unwrap().to_string(), "[K, V *int]");

        let fields = [
            TypeParamField::single("T", TypeNode::pointer(TypeNode::int())),
            TypeParamField::single("U", any()),
        ];
        assert_eq!(
            type_params_clause(&fields, &ctx).unwrap().to_string(),
            "[T *int, U any]"
        );
    }

    #[test]
    fn test_render_declaration() {
        let resolved = TypeNode::interface(
            InterfaceType::new().method(
                "Accept",
                Signature::new()
                    .param("v", TypeNode::type_param("T"))
                    .result(TypeNode::bool()),
            ),
        );
        let params = vec![TypeParamField::single(
            "T",
            TypeNode::constraint(vec![
                Term::exact(TypeNode::basic("uint8")),
                Term::tilde(TypeNode::basic("uint16")),
            ]),
        )];
        let ctx = ImportContext::same_package(GENERICS);

        let decl = interface_declaration("Restricted", GENERICS, params, &resolved, &ctx).unwrap();
        assert_eq!(
            decl.to_string(),
            "type Restricted[T uint8 | ~uint16] interface{ Accept(v T) bool }"
        );
    }

    #[test]
    fn test_type_set_written_before_methods() {
        let resolved = TypeNode::interface(
            InterfaceType::new()
                .method("String", Signature::new().result(TypeNode::string()))
                .embed(TypeNode::union(vec![Term::tilde(TypeNode::int())])),
        );
        let iface = Interface::build("IntLike", GENERICS, vec![], &resolved).unwrap();
        let decl = iface
            .render_declaration(&ImportContext::same_package(GENERICS))
            .unwrap();

        assert_eq!(decl.to_string(), "type IntLike interface{ ~int; String() string }");
    }

    #[test]
    fn test_method_rendering() {
        let method = Method::new(
            "Get",
            Signature::new()
                .param("key", TypeNode::type_param("K"))
                .result(TypeNode::type_param("V"))
                .result(TypeNode::bool()),
        );
        let ctx = ImportContext::same_package(GENERICS);

        assert_eq!(method.render_signature(&ctx).unwrap().to_string(), "func(key K) (V, bool)");
        assert_eq!(method.render_entry(&ctx).unwrap().to_string(), "Get(key K) (V, bool)");
    }

    #[test]
    fn test_render_reference() {
        let resolved =
            TypeNode::interface(InterfaceType::new().method("Contains", Signature::new()));
        let iface = Interface::build(
            "Set",
            GENERICS,
            vec![TypeParamField::single("T", any())],
            &resolved,
        )
        .unwrap();

        let home = iface.import_context(GENERICS);
        assert_eq!(iface.render_reference(&home).to_string(), "Set[T]");

        let elsewhere = ImportContext::same_package("example.com/mocks");
        let reference = iface.render_reference(&elsewhere);
        assert_eq!(reference.to_string(), "generics.Set[T]");
        assert_eq!(reference.import_paths(), vec![GENERICS]);
    }

    #[test]
    fn test_pipeline_errors() {
        let ctx = ImportContext::same_package(GENERICS);

        let err =
            interface_declaration("Bad", GENERICS, vec![], &TypeNode::int(), &ctx).unwrap_err();
        assert!(matches!(err, GenerateError::Malformed(_)));

        let resolved = TypeNode::interface(InterfaceType::new().method(
            "Values",
            Signature::new().result(TypeNode::Tuple(vec![Param::unnamed(TypeNode::int())])),
        ));
        let err = interface_declaration("Odd", GENERICS, vec![], &resolved, &ctx).unwrap_err();
        assert_eq!(
            err,
            GenerateError::Unsupported(crate::error::UnsupportedTypeNodeError {
                kind: TypeKind::Tuple
            })
        );
    }
}
