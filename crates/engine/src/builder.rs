//! Tree builder: turns one compilation unit into a file-scoped component
//! tree, guided by a [`ParsingContext`].
//!
//! The same builder runs in both passes. [`Phase::Declaration`] creates the
//! skeleton (packages, types, members, parameters, default constructors);
//! [`Phase::Structure`] creates the same skeleton and additionally resolves
//! supertypes and type-parameter bounds against the application built so far.

use ir::ast::{
    CallableDecl, CompilationUnit, EnumConstantDecl, FieldDecl, ImportDecl, PackageDecl,
    ParameterDecl, Span, TypeDecl, TypeKind, TypeParameterDecl,
};
use ir::{
    walk, AttributeKind, Component, ComponentAttribute, ComponentId, ComponentKind, ComponentTree,
    ImportKind, Visitor,
};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use crate::application::{qualified_name, Application, ComponentRef};
use crate::context::ParsingContext;
use crate::java::{
    ACCESS_MODIFIERS, FINAL, IMPLICIT_PACKAGES, JAVA_LANG_ENUM, JAVA_LANG_OBJECT,
    PACKAGE_SEPARATOR, PUBLIC, STATIC,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Declaration,
    Structure,
}

impl Phase {
    /// Both passes, in execution order.
    pub const ALL: [Phase; 2] = [Phase::Declaration, Phase::Structure];

    pub fn attaches_relationships(self) -> bool {
        self == Phase::Structure
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Declaration => f.write_str("declaration"),
            Phase::Structure => f.write_str("structure"),
        }
    }
}

/// Seeds the scope of a new file: the implicit Java packages, the
/// application root and every library root.
pub fn init_parsing_context(app: &Application, context: &mut ParsingContext) {
    for package in IMPLICIT_PACKAGES {
        let coordinate = package.replace(PACKAGE_SEPARATOR, &app.config().unique_delimiter);
        let found = app
            .find_library_component_by_unique_coordinate(&coordinate)
            .or_else(|| {
                app.find_application_component_by_unique_coordinate(&coordinate)
                    .map(ComponentRef::application)
            });
        match found {
            Some(r) => context.add_component_with_visible_children(r),
            None => debug!(package, "Implicit package not available"),
        }
    }
    context.add_component_with_visible_children(app.root());
    for i in 0..app.libraries().len() {
        context.add_component_with_visible_children(app.library_root(i));
    }
}

/// Walks `unit` once and returns its component tree. The context is fully
/// reset first, so it can be reused across files and passes.
pub fn build_component_tree(
    app: &Application,
    phase: Phase,
    context: &mut ParsingContext,
    unit: &CompilationUnit,
) -> ComponentTree {
    context.full_reset();
    init_parsing_context(app, context);
    let mut builder = TreeBuilder {
        app,
        phase,
        ctx: context,
    };
    walk(unit, &mut builder);
    context.take_tree()
}

fn with_span(mut component: Component, span: Span) -> Component {
    for (kind, value) in [
        (AttributeKind::StartLine, span.start_line),
        (AttributeKind::StartColumn, span.start_column),
        (AttributeKind::StopLine, span.stop_line),
        (AttributeKind::StopColumn, span.stop_column),
    ] {
        component.add_attribute(ComponentAttribute::new(kind, value.to_string()));
    }
    component
}

/// Annotations become [`AttributeKind::Annotated`], keywords
/// [`AttributeKind::Modifier`]. Type declarations without an access
/// modifier are public.
fn with_modifiers(mut component: Component, modifiers: &[String], default_public: bool) -> Component {
    for m in modifiers {
        let kind = if m.starts_with('@') {
            AttributeKind::Annotated
        } else {
            AttributeKind::Modifier
        };
        component.add_attribute(ComponentAttribute::new(kind, m.as_str()));
    }
    if default_public && !ACCESS_MODIFIERS.iter().any(|m| component.has_modifier(m)) {
        component.add_attribute(ComponentAttribute::new(AttributeKind::Modifier, PUBLIC));
    }
    component
}

fn normalize_type(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `java.util.Map<K, V>[]` -> `java.util.Map`; drops leading annotations.
fn erase_type(text: &str) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    let out = out.replace("[]", "").replace("...", "");
    out.split_whitespace().last().unwrap_or_default().to_string()
}

const ANONYMOUS: &str = "anonymous";

/// Anonymous classes carry the name of their supertype but cannot be named.
fn is_named_type(component: &Component, name: &str) -> bool {
    component.value == name
        && component.kind.is_type_declaration()
        && !component.has_attribute(AttributeKind::LocalClass, ANONYMOUS)
}

#[derive(Debug, Clone, Copy)]
enum Resolved {
    /// Declared in the file being built.
    Local(ComponentId),
    Global(ComponentRef),
}

struct TreeBuilder<'a> {
    app: &'a Application,
    phase: Phase,
    ctx: &'a mut ParsingContext,
}

impl TreeBuilder<'_> {
    fn file_name(&self) -> &str {
        self.ctx
            .current_file()
            .map(|a| a.value.as_str())
            .unwrap_or("-")
    }

    fn coordinate(&self, dotted: &str) -> String {
        dotted.replace(PACKAGE_SEPARATOR, &self.app.config().unique_delimiter)
    }

    fn qualified(&self, id: ComponentId) -> String {
        qualified_name(self.ctx.tree(), id, &self.app.config().nested_type_separator)
    }

    /// Adds `component` under `parent` unless the same symbol is already
    /// there, in which case its attributes are unioned into the existing one.
    fn attach(&mut self, parent: ComponentId, component: Component) -> ComponentId {
        let tree = self.ctx.tree_mut();
        match tree.find_child(parent, &component) {
            Some(existing) => {
                let node = tree.get_mut(existing);
                for a in component.attributes() {
                    node.add_attribute_if_absent(a.clone());
                }
                existing
            }
            None => tree.add_new_child(parent, component),
        }
    }

    fn attach_here(&mut self, component: Component) -> ComponentId {
        let parent = self.ctx.current();
        self.attach(parent, component)
    }

    fn add_attribute(&mut self, id: ComponentId, kind: AttributeKind, value: impl Into<String>) {
        self.ctx
            .tree_mut()
            .get_mut(id)
            .add_attribute_if_absent(ComponentAttribute::new(kind, value));
    }

    /// Types of a file without a package declaration go into the default package.
    fn ensure_package(&mut self) {
        if self.ctx.has_package() {
            return;
        }
        let name = self.app.config().default_package.clone();
        let mut package = Component::new(ComponentKind::Package, name.as_str());
        if let Some(file) = self.ctx.current_file() {
            package.add_attribute(file.clone());
        }
        let id = self.attach_here(package);
        self.ctx.descend(id);
        self.ctx.set_has_package(true);
        if let Some(found) = self.app.find_component_by_unique_coordinate(&name) {
            self.ctx.add_component_with_visible_children(found);
        }
    }

    fn declare_type_parameters(&mut self, owner: ComponentId, params: &[TypeParameterDecl]) {
        for tp in params {
            let component = with_span(Component::new(ComponentKind::TypeParameter, tp.name.as_str()), tp.span);
            self.attach(owner, component);
        }
    }

    fn ensure_default_constructor(&mut self, owner: ComponentId) {
        let tree = self.ctx.tree();
        if tree
            .children(owner)
            .iter()
            .any(|c| tree.get(*c).kind.is_constructor())
        {
            return;
        }
        let name = tree.get(owner).value.clone();
        let ctor = Component::new(ComponentKind::DefaultConstructor, name)
            .with_signature("()")
            .with_attribute(ComponentAttribute::new(AttributeKind::Modifier, PUBLIC));
        self.attach(owner, ctor);
    }

    fn enter_callable(&mut self, kind: ComponentKind, decl: &CallableDecl) {
        let component = Component::new(kind, decl.name.as_str()).with_signature(decl.signature());
        let mut component = with_modifiers(with_span(component, decl.span), &decl.modifiers, false);
        if let Some(ret) = &decl.return_type {
            component.add_attribute(ComponentAttribute::new(
                AttributeKind::ReturnType,
                normalize_type(ret),
            ));
        }
        let id = self.attach_here(component);
        self.declare_type_parameters(id, &decl.type_parameters);
        self.ctx.descend(id);
        if self.phase.attaches_relationships() {
            self.attach_bounds(id, &decl.type_parameters);
        }
    }

    /// The application's copy of a file-local scope. After the Declaration
    /// pass it holds every member, including those declared later in the file.
    fn app_scope(&self, id: ComponentId) -> Option<ComponentRef> {
        let coordinate = self
            .ctx
            .tree()
            .unique_coordinate(id, &self.app.config().unique_delimiter);
        self.app
            .find_application_component_by_unique_coordinate(&coordinate)
            .map(ComponentRef::application)
    }

    fn app_member(
        &self,
        scope: ComponentId,
        name: &str,
        with_type_parameters: bool,
    ) -> Option<Resolved> {
        let scope = self.app_scope(scope)?;
        self.app
            .children(scope)
            .find(|c| {
                let c = self.app.get(*c);
                is_named_type(c, name)
                    || (with_type_parameters
                        && c.kind == ComponentKind::TypeParameter
                        && c.value == name)
            })
            .map(Resolved::Global)
    }

    fn resolve_simple(&self, from: ComponentId, name: &str) -> Option<Resolved> {
        let tree = self.ctx.tree();
        let mut cur = Some(from);
        while let Some(id) = cur {
            let node = tree.get(id);
            match node.kind {
                ComponentKind::Root => break,
                ComponentKind::Package => {
                    let sibling = tree
                        .children(id)
                        .iter()
                        .copied()
                        .find(|c| is_named_type(tree.get(*c), name));
                    if let Some(found) = sibling {
                        return Some(Resolved::Local(found));
                    }
                    break;
                }
                _ => {
                    let member = tree.children(id).iter().copied().find(|c| {
                        let c = tree.get(*c);
                        is_named_type(c, name)
                            || (c.kind == ComponentKind::TypeParameter && c.value == name)
                    });
                    if let Some(found) = member {
                        return Some(Resolved::Local(found));
                    }
                    if let Some(found) = self.app_member(id, name, true) {
                        return Some(found);
                    }
                    if is_named_type(node, name) {
                        return Some(Resolved::Local(id));
                    }
                }
            }
            cur = tree.parent(id);
        }
        self.ctx
            .find_visible_component_matching(self.app, name, |c| c.kind.is_type_declaration())
            .map(Resolved::Global)
    }

    fn member_type(&self, scope: Resolved, name: &str) -> Option<Resolved> {
        match scope {
            Resolved::Local(id) => {
                let tree = self.ctx.tree();
                tree.children(id)
                    .iter()
                    .copied()
                    .find(|c| is_named_type(tree.get(*c), name))
                    .map(Resolved::Local)
                    .or_else(|| self.app_member(id, name, false))
            }
            Resolved::Global(r) => self
                .app
                .children(r)
                .find(|c| is_named_type(self.app.get(*c), name))
                .map(Resolved::Global),
        }
    }

    fn describe(&self, found: Resolved) -> (String, ComponentKind) {
        match found {
            Resolved::Local(id) => (self.qualified(id), self.ctx.tree().get(id).kind),
            Resolved::Global(r) => (self.app.get_qualified_name(r), self.app.get(r).kind),
        }
    }

    /// Resolves a type reference as written in source to its qualified name,
    /// searching enclosing scopes from `from` outwards, then the visible
    /// components, then the text as a fully qualified name. A member chain
    /// that breaks off still gets the fully qualified attempt.
    fn resolve_type(&self, from: ComponentId, text: &str) -> Option<(String, ComponentKind)> {
        let erased = erase_type(text);
        let mut segments = erased.split(PACKAGE_SEPARATOR).filter(|s| !s.is_empty());
        let first = segments.next()?;
        let rest: Vec<&str> = segments.collect();
        let chained = self.resolve_simple(from, first).and_then(|start| {
            rest.iter()
                .try_fold(start, |scope, segment| self.member_type(scope, segment))
        });
        if let Some(found) = chained {
            return Some(self.describe(found));
        }
        if rest.is_empty() {
            return None;
        }
        let target = self.app.find_component_by_unique_coordinate(&self.coordinate(&erased))?;
        let kind = self.app.get(target).kind;
        kind.is_type_declaration()
            .then(|| (self.app.get_qualified_name(target), kind))
    }

    fn add_edge(&mut self, id: ComponentId, kind: AttributeKind, type_text: &str) {
        match self.resolve_type(self.ctx.current(), type_text) {
            Some((name, _)) => self.add_attribute(id, kind, name),
            None => debug!(
                file = %self.file_name(),
                target = type_text,
                edge = kind.label(),
                "Relationship omitted, type not resolved"
            ),
        }
    }

    fn attach_bounds(&mut self, owner: ComponentId, params: &[TypeParameterDecl]) {
        for tp in params {
            let probe = Component::new(ComponentKind::TypeParameter, tp.name.as_str());
            let Some(tp_id) = self.ctx.tree().find_child(owner, &probe) else {
                continue;
            };
            for (i, bound) in tp.bounds.iter().enumerate() {
                let kind = if i == 0 {
                    AttributeKind::ExtendsType
                } else {
                    AttributeKind::ImplementsType
                };
                self.add_edge(tp_id, kind, bound);
            }
        }
    }

    fn attach_type_relationships(&mut self, id: ComponentId, decl: &TypeDecl) {
        let own = self.qualified(id);
        match decl.kind {
            TypeKind::Class if decl.anonymous => {
                let from = self.ctx.tree().parent(id).unwrap_or(id);
                match self.resolve_type(from, &decl.name) {
                    Some((name, ComponentKind::Interface)) => {
                        self.add_attribute(id, AttributeKind::ImplementsType, name)
                    }
                    Some((name, _)) => self.add_attribute(id, AttributeKind::ExtendsType, name),
                    None => debug!(
                        file = %self.file_name(),
                        target = %decl.name,
                        "Anonymous class supertype not resolved"
                    ),
                }
            }
            TypeKind::Class => {
                match &decl.superclass {
                    Some(superclass) => self.add_edge(id, AttributeKind::ExtendsType, superclass),
                    None if own != JAVA_LANG_OBJECT => {
                        self.add_attribute(id, AttributeKind::ExtendsType, JAVA_LANG_OBJECT)
                    }
                    None => {}
                }
                for i in &decl.interfaces {
                    self.add_edge(id, AttributeKind::ImplementsType, i);
                }
            }
            TypeKind::Interface => {
                for i in &decl.interfaces {
                    self.add_edge(id, AttributeKind::ImplementsType, i);
                }
            }
            TypeKind::Enum => {
                if own != JAVA_LANG_ENUM {
                    self.add_attribute(id, AttributeKind::ImplementsType, JAVA_LANG_ENUM);
                }
                for i in &decl.interfaces {
                    self.add_edge(id, AttributeKind::ImplementsType, i);
                }
            }
            TypeKind::Annotation => {}
        }
    }
}

impl Visitor for TreeBuilder<'_> {
    fn enter_compilation_unit(&mut self, unit: &CompilationUnit) {
        self.ctx.set_current_file(ComponentAttribute::new(
            AttributeKind::SourceName,
            unit.file_name(),
        ));
    }

    fn enter_package(&mut self, package: &PackageDecl) {
        for segment in &package.segments {
            let id = self.attach_here(Component::new(ComponentKind::Package, segment.as_str()));
            self.ctx.descend(id);
        }
        self.ctx.set_has_package(true);
        let coordinate = package.segments.join(&self.app.config().unique_delimiter);
        if let Some(found) = self.app.find_component_by_unique_coordinate(&coordinate) {
            self.ctx.add_component_with_visible_children(found);
        }
    }

    fn enter_import(&mut self, import: &ImportDecl) {
        let kind = ImportKind::classify(import.is_static, import.on_demand);
        self.ctx
            .add_import(Component::new(ComponentKind::Import(kind), import.path.as_str()));
        let target = self
            .app
            .find_component_by_unique_coordinate(&self.coordinate(&import.path));
        match target {
            Some(found) if kind.is_on_demand() => self.ctx.add_component_with_visible_children(found),
            Some(found) => {
                self.ctx.add_visible_component_if_not_contained(found);
            }
            // Forward references are normal until every file was declared.
            None if self.phase.attaches_relationships() => warn!(
                file = %self.file_name(),
                import = %import.path,
                "Unknown import"
            ),
            None => debug!(file = %self.file_name(), import = %import.path, "Import not resolved yet"),
        }
    }

    fn enter_type(&mut self, decl: &TypeDecl) {
        self.ensure_package();
        let kind = match decl.kind {
            TypeKind::Class => ComponentKind::Class,
            TypeKind::Interface => ComponentKind::Interface,
            TypeKind::Enum => ComponentKind::Enum,
            TypeKind::Annotation => ComponentKind::Annotation,
        };
        let parent = self.ctx.current();
        let top_level = self.ctx.tree().get(parent).kind == ComponentKind::Package;

        let mut component = Component::new(kind, decl.name.as_str());
        if let Some(file) = self.ctx.current_file() {
            component.add_attribute(file.clone());
        }
        let mut component = with_modifiers(with_span(component, decl.span), &decl.modifiers, !decl.anonymous);
        if decl.anonymous {
            component.add_attribute(ComponentAttribute::new(AttributeKind::LocalClass, ANONYMOUS));
        }
        let id = self.attach(parent, component);
        if top_level {
            let imports = self.ctx.imports().to_vec();
            for import in imports {
                self.attach(id, import);
            }
        }
        self.declare_type_parameters(id, &decl.type_parameters);
        self.ctx.descend(id);

        if self.phase.attaches_relationships() {
            self.attach_type_relationships(id, decl);
            self.attach_bounds(id, &decl.type_parameters);
        }
    }

    fn exit_type_body(&mut self, decl: &TypeDecl) {
        if matches!(decl.kind, TypeKind::Class | TypeKind::Enum) {
            let owner = self.ctx.current();
            self.ensure_default_constructor(owner);
        }
    }

    fn exit_type(&mut self, _decl: &TypeDecl) {
        self.ctx.ascend();
    }

    fn enter_enum_constant(&mut self, constant: &EnumConstantDecl) {
        let owner = self.ctx.current();
        let component = Component::new(ComponentKind::EnumConstant, constant.name.as_str());
        let mut component = with_modifiers(with_span(component, constant.span), &constant.modifiers, false);
        for m in [PUBLIC, STATIC, FINAL] {
            component.add_attribute(ComponentAttribute::new(AttributeKind::Modifier, m));
        }
        let id = self.attach(owner, component);
        self.ctx.descend(id);
        if self.phase.attaches_relationships() {
            let declared = self.qualified(owner);
            self.add_attribute(id, AttributeKind::DeclaredType, declared);
        }
    }

    fn exit_enum_constant(&mut self, _constant: &EnumConstantDecl) {
        let owner = self.ctx.current();
        self.ensure_default_constructor(owner);
        self.ctx.ascend();
    }

    fn enter_constructor(&mut self, decl: &CallableDecl) {
        self.enter_callable(ComponentKind::Constructor, decl);
    }

    fn exit_constructor(&mut self, _decl: &CallableDecl) {
        self.ctx.ascend();
    }

    fn enter_method(&mut self, decl: &CallableDecl) {
        self.enter_callable(ComponentKind::Method, decl);
    }

    fn exit_method(&mut self, _decl: &CallableDecl) {
        self.ctx.ascend();
    }

    fn enter_parameter(&mut self, param: &ParameterDecl) {
        let mut component = Component::new(ComponentKind::Parameter, param.name.as_str()).with_attribute(
            ComponentAttribute::new(AttributeKind::DeclaredType, normalize_type(&param.declared_type)),
        );
        if param.variadic {
            component.add_attribute(ComponentAttribute::new(AttributeKind::Variadic, "true"));
        }
        let component = with_modifiers(with_span(component, param.span), &param.modifiers, false);
        self.attach_here(component);
    }

    fn enter_field(&mut self, field: &FieldDecl) {
        for name in &field.names {
            let component = Component::new(ComponentKind::Field, name.as_str());
            let mut component = with_modifiers(with_span(component, field.span), &field.modifiers, false);
            component.add_attribute(ComponentAttribute::new(
                AttributeKind::DeclaredType,
                normalize_type(&field.declared_type),
            ));
            if field.constant {
                for m in [PUBLIC, STATIC, FINAL] {
                    if !component.has_modifier(m) {
                        component.add_attribute(ComponentAttribute::new(AttributeKind::Modifier, m));
                    }
                }
            }
            self.attach_here(component);
        }
    }
}
