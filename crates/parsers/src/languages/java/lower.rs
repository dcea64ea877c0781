use ir::ast::{
    CallableDecl, CompilationUnit, EnumConstantDecl, FieldDecl, ImportDecl, MemberDecl,
    PackageDecl, ParameterDecl, Span, TypeDecl, TypeKind, TypeParameterDecl,
};
use tree_sitter::Node;

fn type_kind(kind: &str) -> Option<TypeKind> {
    match kind {
        "class_declaration" | "record_declaration" => Some(TypeKind::Class),
        "interface_declaration" => Some(TypeKind::Interface),
        "enum_declaration" => Some(TypeKind::Enum),
        "annotation_type_declaration" => Some(TypeKind::Annotation),
        _ => None,
    }
}

fn span(node: Node) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span {
        start_line: start.row + 1,
        start_column: start.column + 1,
        stop_line: end.row + 1,
        stop_column: end.column + 1,
    }
}

/// Lowers a tree-sitter-java syntax tree into declaration values.
///
/// In tolerant mode error and missing nodes are skipped together with
/// everything below them; the rest of the tree is lowered as usual.
pub(super) struct Lowering<'a> {
    src: &'a str,
    tolerant: bool,
}

impl<'a> Lowering<'a> {
    pub(super) fn new(src: &'a str, tolerant: bool) -> Self {
        Self { src, tolerant }
    }

    pub(super) fn unit(&self, root: Node, source_name: &str) -> CompilationUnit {
        let mut unit = CompilationUnit::new(source_name);
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            if self.skip(child) {
                continue;
            }
            match child.kind() {
                "package_declaration" => unit.package = self.package(child),
                "import_declaration" => unit.imports.extend(self.import(child)),
                kind if type_kind(kind).is_some() => unit.types.extend(self.type_decl(child)),
                _ => {}
            }
        }
        unit
    }

    fn skip(&self, node: Node) -> bool {
        self.tolerant && (node.is_error() || node.is_missing())
    }

    fn text(&self, node: Node) -> String {
        node.utf8_text(self.src.as_bytes())
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    fn field_text(&self, node: Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .filter(|n| !self.skip(*n))
            .map(|n| self.text(n))
            .filter(|t| !t.is_empty())
    }

    fn child_of_kind<'t>(&self, node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|c| c.kind() == kind && !self.skip(*c));
        found
    }

    fn package(&self, node: Node) -> Option<PackageDecl> {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))?;
        let segments: Vec<String> = self
            .text(name)
            .split('.')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            return None;
        }
        Some(PackageDecl {
            segments,
            span: span(node),
        })
    }

    fn import(&self, node: Node) -> Option<ImportDecl> {
        let mut is_static = false;
        let mut on_demand = false;
        let mut path = None;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "static" => is_static = true,
                "asterisk" => on_demand = true,
                "scoped_identifier" | "identifier" => path = Some(self.text(child)),
                _ => {}
            }
        }
        let path: String = path?.split_whitespace().collect();
        Some(ImportDecl {
            path,
            is_static,
            on_demand,
            span: span(node),
        })
    }

    fn modifiers(&self, node: Node) -> Vec<String> {
        let Some(mods) = self.child_of_kind(node, "modifiers") else {
            return Vec::new();
        };
        let mut cursor = mods.walk();
        let out: Vec<String> = mods
            .children(&mut cursor)
            .filter(|c| !self.skip(*c))
            .map(|c| self.text(c))
            .filter(|t| !t.is_empty())
            .collect();
        out
    }

    fn type_decl(&self, node: Node) -> Option<TypeDecl> {
        let kind = type_kind(node.kind())?;
        let name = self.field_text(node, "name")?;
        let mut decl = TypeDecl::new(kind, name);
        decl.modifiers = self.modifiers(node);
        decl.span = span(node);
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if self.skip(child) {
                continue;
            }
            match child.kind() {
                "type_parameters" => decl.type_parameters = self.type_parameters(child),
                "superclass" => {
                    let mut c = child.walk();
                    decl.superclass = child
                        .named_children(&mut c)
                        .find(|n| !self.skip(*n))
                        .map(|n| self.text(n));
                }
                "super_interfaces" | "extends_interfaces" => {
                    decl.interfaces.extend(self.type_list(child))
                }
                "class_body" | "interface_body" | "annotation_type_body" => {
                    decl.members = self.body(child, kind)
                }
                "enum_body" => decl.members = self.enum_body(child),
                _ => {}
            }
        }
        Some(decl)
    }

    fn type_list(&self, node: Node) -> Vec<String> {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if self.skip(child) {
                continue;
            }
            if child.kind() == "type_list" {
                out.extend(self.type_list(child));
            } else {
                out.push(self.text(child));
            }
        }
        out
    }

    fn type_parameters(&self, node: Node) -> Vec<TypeParameterDecl> {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        for param in node.named_children(&mut cursor) {
            if param.kind() != "type_parameter" || self.skip(param) {
                continue;
            }
            let mut name = None;
            let mut bounds = Vec::new();
            let mut c = param.walk();
            for child in param.named_children(&mut c) {
                match child.kind() {
                    "type_identifier" | "identifier" if name.is_none() => {
                        name = Some(self.text(child))
                    }
                    "type_bound" => bounds.extend(self.type_list(child)),
                    _ => {}
                }
            }
            if let Some(name) = name {
                out.push(TypeParameterDecl {
                    name,
                    bounds,
                    span: span(param),
                });
            }
        }
        out
    }

    fn body(&self, node: Node, owner: TypeKind) -> Vec<MemberDecl> {
        let mut members = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if self.skip(child) {
                continue;
            }
            match child.kind() {
                kind if type_kind(kind).is_some() => {
                    members.extend(self.type_decl(child).map(MemberDecl::Type))
                }
                "method_declaration" => {
                    members.extend(self.callable(child, true).map(MemberDecl::Method))
                }
                "annotation_type_element_declaration" => {
                    members.extend(self.annotation_element(child).map(MemberDecl::Method))
                }
                "constructor_declaration" | "compact_constructor_declaration" => {
                    members.extend(self.callable(child, false).map(MemberDecl::Constructor))
                }
                "field_declaration" | "constant_declaration" => {
                    let constant =
                        child.kind() == "constant_declaration" || owner == TypeKind::Interface;
                    let mut local = Vec::new();
                    if let Some(field) = self.field(child, constant, &mut local) {
                        members.push(MemberDecl::Field(field));
                    }
                    members.extend(local.into_iter().map(MemberDecl::Type));
                }
                "block" | "static_initializer" => {
                    let mut local = Vec::new();
                    self.collect_local_types(child, &mut local);
                    members.extend(local.into_iter().map(MemberDecl::Type));
                }
                _ => {}
            }
        }
        members
    }

    fn enum_body(&self, node: Node) -> Vec<MemberDecl> {
        let mut members = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if self.skip(child) {
                continue;
            }
            match child.kind() {
                "enum_constant" => members.extend(self.enum_constant(child)),
                "enum_body_declarations" => members.extend(self.body(child, TypeKind::Enum)),
                _ => {}
            }
        }
        members
    }

    fn enum_constant(&self, node: Node) -> Option<MemberDecl> {
        let name = self.field_text(node, "name")?;
        let body = node
            .child_by_field_name("body")
            .or_else(|| self.child_of_kind(node, "class_body"))
            .filter(|b| !self.skip(*b))
            .map(|b| self.body(b, TypeKind::Class));
        Some(MemberDecl::EnumConstant(EnumConstantDecl {
            name,
            modifiers: self.modifiers(node),
            body,
            span: span(node),
        }))
    }

    fn callable(&self, node: Node, is_method: bool) -> Option<CallableDecl> {
        let name = self.field_text(node, "name")?;
        let mut decl = CallableDecl::new(name);
        decl.modifiers = self.modifiers(node);
        decl.span = span(node);
        if let Some(tp) = self.child_of_kind(node, "type_parameters") {
            decl.type_parameters = self.type_parameters(tp);
        }
        if is_method {
            decl.return_type = self.field_text(node, "type");
        }
        if let Some(params) = node.child_by_field_name("parameters") {
            decl.parameters = self.parameters(params);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_local_types(body, &mut decl.local_types);
        }
        Some(decl)
    }

    fn annotation_element(&self, node: Node) -> Option<CallableDecl> {
        let name = self.field_text(node, "name")?;
        let mut decl = CallableDecl::new(name);
        decl.modifiers = self.modifiers(node);
        decl.return_type = self.field_text(node, "type");
        decl.span = span(node);
        Some(decl)
    }

    fn parameters(&self, node: Node) -> Vec<ParameterDecl> {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if self.skip(child) {
                continue;
            }
            match child.kind() {
                "formal_parameter" => out.extend(self.formal_parameter(child)),
                "spread_parameter" => out.extend(self.spread_parameter(child)),
                _ => {}
            }
        }
        out
    }

    fn formal_parameter(&self, node: Node) -> Option<ParameterDecl> {
        let mut declared_type = self.field_text(node, "type")?;
        let name = self.field_text(node, "name").or_else(|| {
            self.child_of_kind(node, "identifier")
                .map(|n| self.text(n))
        })?;
        if let Some(dims) = self.child_of_kind(node, "dimensions") {
            declared_type.push_str(&self.text(dims));
        }
        Some(ParameterDecl {
            name,
            modifiers: self.modifiers(node),
            declared_type,
            variadic: false,
            span: span(node),
        })
    }

    fn spread_parameter(&self, node: Node) -> Option<ParameterDecl> {
        let mut declared_type = None;
        let mut name = None;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "modifiers" => {}
                "variable_declarator" => {
                    name = self.field_text(child, "name").or_else(|| {
                        self.child_of_kind(child, "identifier")
                            .map(|n| self.text(n))
                    })
                }
                "identifier" if declared_type.is_some() => name = Some(self.text(child)),
                _ if declared_type.is_none() => declared_type = Some(self.text(child)),
                _ => {}
            }
        }
        Some(ParameterDecl {
            name: name?,
            modifiers: self.modifiers(node),
            declared_type: declared_type?,
            variadic: true,
            span: span(node),
        })
    }

    fn field(&self, node: Node, constant: bool, local: &mut Vec<TypeDecl>) -> Option<FieldDecl> {
        let declared_type = self.field_text(node, "type")?;
        let mut names = Vec::new();
        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" || self.skip(declarator) {
                continue;
            }
            names.extend(self.field_text(declarator, "name"));
            if let Some(value) = declarator.child_by_field_name("value") {
                self.collect_local_types(value, local);
            }
        }
        if names.is_empty() {
            return None;
        }
        Some(FieldDecl {
            names,
            modifiers: self.modifiers(node),
            declared_type,
            constant,
            span: span(node),
        })
    }

    /// Finds classes declared inside a body or expression, including
    /// anonymous `new T() { ... }` bodies. Does not look into the
    /// classes it finds; their own lowering handles nesting.
    fn collect_local_types(&self, node: Node, out: &mut Vec<TypeDecl>) {
        if self.skip(node) {
            return;
        }
        if type_kind(node.kind()).is_some() {
            out.extend(self.type_decl(node));
            return;
        }
        let mut cursor = node.walk();
        if node.kind() == "object_creation_expression" {
            let mut body = None;
            for child in node.named_children(&mut cursor) {
                if child.kind() == "class_body" {
                    body = Some(child);
                } else {
                    self.collect_local_types(child, out);
                }
            }
            if let (Some(body), Some(created)) = (body, self.field_text(node, "type")) {
                let name = created
                    .split('<')
                    .next()
                    .unwrap_or(&created)
                    .trim()
                    .to_string();
                let mut decl = TypeDecl::new(TypeKind::Class, name);
                decl.anonymous = true;
                decl.members = self.body(body, TypeKind::Class);
                decl.span = span(node);
                out.push(decl);
            }
            return;
        }
        for child in node.named_children(&mut cursor) {
            self.collect_local_types(child, out);
        }
    }
}
