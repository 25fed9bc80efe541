//! Tests for package loading and shape resolution.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;

use super::{load_package, package_from_source};
use crate::error::Error;
use crate::shape::{FieldKey, PointerKind, TypeShape};

fn field_shape<'a>(
    package: &'a super::ResolvedPackage,
    fields: &[crate::shape::Field],
    name: &str,
) -> &'a TypeShape {
    let field = fields
        .iter()
        .find(|f| matches!(&f.key, FieldKey::Name(n) if n == name))
        .unwrap_or_else(|| panic!("missing field {name}"));
    package.arena().get(field.shape)
}

#[test]
fn resolves_scalar_struct_fields() -> Result<()> {
    let mut package = package_from_source(
        "pub struct Point { pub x: i64, pub y: i64, label: String }",
    )?;
    let id = package.requested_shape("Point")?;
    let TypeShape::Struct { ident, fields } = package.arena().get(id).clone() else {
        return Err(anyhow!("expected a struct shape"));
    };
    ensure!(ident == "Point", "unexpected ident {ident}");
    ensure!(fields.len() == 3, "expected three fields");
    ensure!(
        matches!(field_shape(&package, &fields, "x"), TypeShape::Basic(_)),
        "x should be basic"
    );
    ensure!(
        matches!(field_shape(&package, &fields, "label"), TypeShape::Basic(_)),
        "label should be basic"
    );
    ensure!(!fields[2].exported, "private field should not be exported");
    Ok(())
}

#[test]
fn resolves_containers_and_pointers() -> Result<()> {
    let mut package = package_from_source(
        "use std::collections::HashMap;\n\
         use std::rc::Rc;\n\
         use std::sync::Arc;\n\
         pub struct Bag {\n\
             pub items: Vec<String>,\n\
             pub lookup: HashMap<String, Vec<u8>>,\n\
             pub shared: Rc<String>,\n\
             pub heavy: Arc<Vec<u8>>,\n\
             pub boxed: Box<String>,\n\
             pub maybe: Option<Rc<String>>,\n\
             pub fixed: [u8; 4],\n\
         }",
    )?;
    let id = package.requested_shape("Bag")?;
    let TypeShape::Struct { fields, .. } = package.arena().get(id).clone() else {
        return Err(anyhow!("expected a struct shape"));
    };
    ensure!(
        matches!(field_shape(&package, &fields, "items"), TypeShape::Slice { .. }),
        "Vec should resolve to a slice shape"
    );
    ensure!(
        matches!(field_shape(&package, &fields, "lookup"), TypeShape::Map { .. }),
        "HashMap should resolve to a map shape"
    );
    ensure!(
        matches!(
            field_shape(&package, &fields, "shared"),
            TypeShape::Pointer { kind: PointerKind::Rc, nullable: false, .. }
        ),
        "Rc should resolve to a non-nullable pointer"
    );
    ensure!(
        matches!(
            field_shape(&package, &fields, "heavy"),
            TypeShape::Pointer { kind: PointerKind::Arc, .. }
        ),
        "Arc should resolve to an Arc pointer"
    );
    ensure!(
        matches!(
            field_shape(&package, &fields, "boxed"),
            TypeShape::Pointer { kind: PointerKind::Boxed, .. }
        ),
        "Box should resolve to a boxed pointer"
    );
    ensure!(
        matches!(
            field_shape(&package, &fields, "maybe"),
            TypeShape::Pointer { kind: PointerKind::Rc, nullable: true, .. }
        ),
        "Option<Rc<_>> should be a nullable Rc pointer"
    );
    ensure!(
        matches!(field_shape(&package, &fields, "fixed"), TypeShape::Array { .. }),
        "array field should resolve to an array shape"
    );
    Ok(())
}

#[test]
fn resolves_self_referential_structs() -> Result<()> {
    let mut package = package_from_source(
        "use std::rc::Rc;\n\
         pub struct Node { pub value: i64, pub next: Option<Rc<Node>> }",
    )?;
    let id = package.requested_shape("Node")?;
    let TypeShape::Struct { fields, .. } = package.arena().get(id).clone() else {
        return Err(anyhow!("expected a struct shape"));
    };
    let TypeShape::Pointer { elem, .. } = field_shape(&package, &fields, "next") else {
        return Err(anyhow!("next should be a pointer"));
    };
    ensure!(
        package.arena().base(*elem) == package.arena().base(id),
        "recursive pointer should land on the same arena node"
    );
    Ok(())
}

#[test]
fn resolves_aliases_to_structs() -> Result<()> {
    let mut package = package_from_source(
        "pub struct Inner { pub n: u32 }\npub type Outer = Inner;",
    )?;
    let id = package.requested_shape("Outer")?;
    ensure!(
        matches!(package.arena().get(id), TypeShape::Named { .. }),
        "alias should resolve to a named shape"
    );
    ensure!(
        matches!(
            package.arena().get(package.arena().base(id)),
            TypeShape::Struct { .. }
        ),
        "alias base should be the struct"
    );
    Ok(())
}

#[test]
fn tuple_struct_fields_use_indices() -> Result<()> {
    let mut package = package_from_source("pub struct Pair(pub u8, pub String);")?;
    let id = package.requested_shape("Pair")?;
    let TypeShape::Struct { fields, .. } = package.arena().get(id) else {
        return Err(anyhow!("expected a struct shape"));
    };
    ensure!(
        fields[0].key == FieldKey::Index(0) && fields[1].key == FieldKey::Index(1),
        "tuple struct fields should be indexed"
    );
    Ok(())
}

#[test]
fn trait_objects_resolve_to_interfaces() -> Result<()> {
    let mut package = package_from_source(
        "use std::rc::Rc;\npub struct Holder { pub value: Rc<dyn std::fmt::Debug> }",
    )?;
    let id = package.requested_shape("Holder")?;
    let TypeShape::Struct { fields, .. } = package.arena().get(id).clone() else {
        return Err(anyhow!("expected a struct shape"));
    };
    ensure!(
        matches!(field_shape(&package, &fields, "value"), TypeShape::Interface { .. }),
        "Rc<dyn _> should resolve to an interface shape"
    );
    Ok(())
}

#[test]
fn qualified_external_types_degrade_to_unsupported() -> Result<()> {
    let mut package = package_from_source(
        "pub struct Stamped { pub at: chrono::DateTime }",
    )?;
    let id = package.requested_shape("Stamped")?;
    let TypeShape::Struct { fields, .. } = package.arena().get(id).clone() else {
        return Err(anyhow!("expected a struct shape"));
    };
    ensure!(
        matches!(field_shape(&package, &fields, "at"), TypeShape::Unsupported { .. }),
        "qualified external type should be unsupported, not fatal"
    );
    Ok(())
}

#[test]
fn unknown_bare_identifier_is_fatal() -> Result<()> {
    let mut package = package_from_source("pub struct Broken { pub inner: Missing }")?;
    let Err(err) = package.requested_shape("Broken") else {
        return Err(anyhow!("expected an unresolved type error"));
    };
    ensure!(
        matches!(&err, Error::UnresolvedType { ident, context }
            if ident == "Missing" && context == "Broken"),
        "unexpected error: {err}"
    );
    Ok(())
}

#[rstest]
#[case("pub enum Kind { A, B }", "Kind")]
#[case("pub type Alias = Vec<u8>;", "Alias")]
fn non_struct_requests_are_rejected(#[case] source: &str, #[case] name: &str) -> Result<()> {
    let mut package = package_from_source(source)?;
    let Err(err) = package.requested_shape(name) else {
        return Err(anyhow!("expected rejection of `{name}`"));
    };
    ensure!(matches!(err, Error::NotAStruct(_)), "unexpected error: {err}");
    Ok(())
}

#[test]
fn missing_requested_type_is_distinct() -> Result<()> {
    let mut package = package_from_source("pub struct Present { pub n: u8 }")?;
    let Err(err) = package.requested_shape("Absent") else {
        return Err(anyhow!("expected an unknown type error"));
    };
    ensure!(matches!(err, Error::UnknownType(_)), "unexpected error: {err}");
    Ok(())
}

#[test]
fn generic_requested_type_is_rejected() -> Result<()> {
    let mut package = package_from_source("pub struct Wrap<T> { pub value: T }")?;
    let Err(err) = package.requested_shape("Wrap") else {
        return Err(anyhow!("expected a generics rejection"));
    };
    ensure!(matches!(err, Error::GenericType(_)), "unexpected error: {err}");
    Ok(())
}

#[test]
fn enum_fields_clone_as_basic() -> Result<()> {
    let mut package = package_from_source(
        "pub enum Kind { A, B }\npub struct Tagged { pub kind: Kind }",
    )?;
    let id = package.requested_shape("Tagged")?;
    let TypeShape::Struct { fields, .. } = package.arena().get(id).clone() else {
        return Err(anyhow!("expected a struct shape"));
    };
    ensure!(
        matches!(field_shape(&package, &fields, "kind"), TypeShape::Basic(_)),
        "enum field should clone as a basic shape"
    );
    Ok(())
}

#[test]
fn loads_directory_packages_in_sorted_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("b_late.rs"),
        "pub struct Late { pub early: Early }",
    )?;
    std::fs::write(dir.path().join("a_early.rs"), "pub struct Early { pub n: u8 }")?;
    std::fs::write(dir.path().join("notes.txt"), "ignored")?;
    let mut package = load_package(dir.path())?;
    package.requested_shape("Late")?;
    package.requested_shape("Early")?;
    Ok(())
}

#[test]
fn empty_directory_is_no_package() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let Err(err) = load_package(dir.path()) else {
        return Err(anyhow!("expected a no-package error"));
    };
    ensure!(matches!(err, Error::NoPackage(_)), "unexpected error: {err}");
    Ok(())
}

#[test]
fn missing_path_is_no_package() -> Result<()> {
    let Err(err) = load_package(std::path::Path::new("/definitely/not/here")) else {
        return Err(anyhow!("expected a no-package error"));
    };
    ensure!(matches!(err, Error::NoPackage(_)), "unexpected error: {err}");
    Ok(())
}

#[test]
fn parse_failure_is_a_load_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("bad.rs"), "pub struct {")?;
    let Err(err) = load_package(dir.path()) else {
        return Err(anyhow!("expected a load error"));
    };
    ensure!(matches!(err, Error::PackageLoad { .. }), "unexpected error: {err}");
    Ok(())
}

#[test]
fn collects_declarations_from_inline_modules() -> Result<()> {
    let mut package = package_from_source(
        "pub mod inner { pub struct Hidden { pub n: u8 } }",
    )?;
    package.requested_shape("Hidden")?;
    Ok(())
}
