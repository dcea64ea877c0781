//! Depth-first traversal over a [`CompilationUnit`].
//!
//! Every `enter_*` hook fires when a construct starts and the matching
//! `exit_*` hook after all of its nested constructs were visited. A type's
//! [`Visitor::exit_type_body`] fires after its last member and before
//! [`Visitor::exit_type`].

use crate::ast::{
    CallableDecl, CompilationUnit, EnumConstantDecl, FieldDecl, ImportDecl, MemberDecl,
    PackageDecl, ParameterDecl, TypeDecl,
};

#[allow(unused_variables)]
pub trait Visitor {
    fn enter_compilation_unit(&mut self, unit: &CompilationUnit) {}
    fn exit_compilation_unit(&mut self, unit: &CompilationUnit) {}
    fn enter_package(&mut self, package: &PackageDecl) {}
    fn enter_import(&mut self, import: &ImportDecl) {}
    fn enter_type(&mut self, decl: &TypeDecl) {}
    fn exit_type_body(&mut self, decl: &TypeDecl) {}
    fn exit_type(&mut self, decl: &TypeDecl) {}
    fn enter_enum_constant(&mut self, constant: &EnumConstantDecl) {}
    fn exit_enum_constant(&mut self, constant: &EnumConstantDecl) {}
    fn enter_constructor(&mut self, decl: &CallableDecl) {}
    fn exit_constructor(&mut self, decl: &CallableDecl) {}
    fn enter_method(&mut self, decl: &CallableDecl) {}
    fn exit_method(&mut self, decl: &CallableDecl) {}
    fn enter_parameter(&mut self, param: &ParameterDecl) {}
    fn enter_field(&mut self, field: &FieldDecl) {}
}

/// Walks `unit`, firing the hooks of `visitor` in source order.
pub fn walk<V: Visitor + ?Sized>(unit: &CompilationUnit, visitor: &mut V) {
    visitor.enter_compilation_unit(unit);
    if let Some(pkg) = &unit.package {
        visitor.enter_package(pkg);
    }
    for import in &unit.imports {
        visitor.enter_import(import);
    }
    for decl in &unit.types {
        walk_type(decl, visitor);
    }
    visitor.exit_compilation_unit(unit);
}

fn walk_type<V: Visitor + ?Sized>(decl: &TypeDecl, visitor: &mut V) {
    visitor.enter_type(decl);
    walk_members(&decl.members, visitor);
    visitor.exit_type_body(decl);
    visitor.exit_type(decl);
}

fn walk_members<V: Visitor + ?Sized>(members: &[MemberDecl], visitor: &mut V) {
    for member in members {
        match member {
            MemberDecl::Type(t) => walk_type(t, visitor),
            MemberDecl::Field(f) => visitor.enter_field(f),
            MemberDecl::EnumConstant(c) => {
                visitor.enter_enum_constant(c);
                if let Some(body) = &c.body {
                    walk_members(body, visitor);
                }
                visitor.exit_enum_constant(c);
            }
            MemberDecl::Constructor(c) => {
                visitor.enter_constructor(c);
                walk_callable(c, visitor);
                visitor.exit_constructor(c);
            }
            MemberDecl::Method(m) => {
                visitor.enter_method(m);
                walk_callable(m, visitor);
                visitor.exit_method(m);
            }
        }
    }
}

fn walk_callable<V: Visitor + ?Sized>(decl: &CallableDecl, visitor: &mut V) {
    for p in &decl.parameters {
        visitor.enter_parameter(p);
    }
    for t in &decl.local_types {
        walk_type(t, visitor);
    }
}
