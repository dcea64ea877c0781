//! Component tree model shared by the symtree crates.
//!
//! A [`ComponentTree`] is an arena of [`Component`] nodes addressed by
//! [`ComponentId`]. Parents are stored as indices, so a tree can be copied
//! between arenas and serialized without further bookkeeping. The Java
//! declaration syntax consumed by the tree builder lives in [`ast`] and the
//! traversal protocol over it in [`walk`].

pub mod ast;
pub mod walk;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use ast::{CompilationUnit, Span};
pub use walk::{walk, Visitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Java import flavour, derived from the `static` keyword and a trailing `*`.
pub enum ImportKind {
    Single,
    OnDemand,
    Static,
    StaticOnDemand,
}

impl ImportKind {
    pub fn classify(is_static: bool, on_demand: bool) -> Self {
        match (is_static, on_demand) {
            (false, false) => ImportKind::Single,
            (false, true) => ImportKind::OnDemand,
            (true, false) => ImportKind::Static,
            (true, true) => ImportKind::StaticOnDemand,
        }
    }

    pub fn is_on_demand(self) -> bool {
        matches!(self, ImportKind::OnDemand | ImportKind::StaticOnDemand)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Closed set of syntactic units a [`Component`] can represent.
pub enum ComponentKind {
    Root,
    Package,
    Class,
    Interface,
    Enum,
    EnumConstant,
    Annotation,
    Constructor,
    DefaultConstructor,
    Method,
    Field,
    Parameter,
    TypeParameter,
    Import(ImportKind),
}

impl ComponentKind {
    /// Class, interface, enum or annotation type.
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            ComponentKind::Class
                | ComponentKind::Interface
                | ComponentKind::Enum
                | ComponentKind::Annotation
        )
    }

    pub fn is_constructor(self) -> bool {
        matches!(
            self,
            ComponentKind::Constructor | ComponentKind::DefaultConstructor
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Root => "ROOT",
            ComponentKind::Package => "PACKAGE",
            ComponentKind::Class => "CLASS",
            ComponentKind::Interface => "INTERFACE",
            ComponentKind::Enum => "ENUM",
            ComponentKind::EnumConstant => "ENUM_CONSTANT",
            ComponentKind::Annotation => "ANNOTATION",
            ComponentKind::Constructor => "CONSTRUCTOR",
            ComponentKind::DefaultConstructor => "DEFAULT_CONSTRUCTOR",
            ComponentKind::Method => "METHOD",
            ComponentKind::Field => "FIELD",
            ComponentKind::Parameter => "PARAMETER",
            ComponentKind::TypeParameter => "TYPE_PARAMETER",
            ComponentKind::Import(ImportKind::Single) => "IMPORT",
            ComponentKind::Import(ImportKind::OnDemand) => "IMPORT_ON_DEMAND",
            ComponentKind::Import(ImportKind::Static) => "IMPORT_STATIC",
            ComponentKind::Import(ImportKind::StaticOnDemand) => "IMPORT_STATIC_ON_DEMAND",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// File name of the compilation unit that declared the component.
    SourceName,
    StartLine,
    StartColumn,
    StopLine,
    StopColumn,
    Modifier,
    Annotated,
    ExtendsType,
    ImplementsType,
    /// Set on anonymous classes.
    LocalClass,
    /// Trailing `...` parameter.
    Variadic,
    DeclaredType,
    ReturnType,
}

impl AttributeKind {
    pub fn label(self) -> &'static str {
        match self {
            AttributeKind::SourceName => "source",
            AttributeKind::StartLine => "start_line",
            AttributeKind::StartColumn => "start_column",
            AttributeKind::StopLine => "stop_line",
            AttributeKind::StopColumn => "stop_column",
            AttributeKind::Modifier => "modifier",
            AttributeKind::Annotated => "annotated",
            AttributeKind::ExtendsType => "extends",
            AttributeKind::ImplementsType => "implements",
            AttributeKind::LocalClass => "local_class",
            AttributeKind::Variadic => "variadic",
            AttributeKind::DeclaredType => "type",
            AttributeKind::ReturnType => "returns",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Immutable `(kind, value)` pair attached to a component.
pub struct ComponentAttribute {
    pub kind: AttributeKind,
    pub value: String,
}

impl ComponentAttribute {
    pub fn new(kind: AttributeKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for ComponentAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind.label(), self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Stable handle of a node inside one [`ComponentTree`].
pub struct ComponentId(usize);

impl ComponentId {
    pub const ROOT: ComponentId = ComponentId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub kind: ComponentKind,
    /// Simple name of the unit.
    pub value: String,
    /// Ordered parameter types of a constructor or method, e.g. `(int,String...)`.
    /// Keeps overloads apart when trees are merged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<ComponentAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<ComponentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<ComponentId>,
}

impl Component {
    /// Creates a detached component without attributes.
    ///
    /// # Example
    /// ```
    /// use ir::{Component, ComponentKind};
    /// let c = Component::new(ComponentKind::Class, "Foo");
    /// assert!(c.is_type(ComponentKind::Class));
    /// assert!(c.parent().is_none());
    /// ```
    pub fn new(kind: ComponentKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            signature: None,
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_attribute(mut self, attribute: ComponentAttribute) -> Self {
        self.add_attribute(attribute);
        self
    }

    pub fn is_type(&self, kind: ComponentKind) -> bool {
        self.kind == kind
    }

    /// Structural identity used by merge and lookup.
    pub fn same_symbol(&self, other: &Component) -> bool {
        self.kind == other.kind && self.value == other.value && self.signature == other.signature
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn attributes(&self) -> &[ComponentAttribute] {
        &self.attributes
    }

    pub fn add_attribute(&mut self, attribute: ComponentAttribute) {
        self.attributes.push(attribute);
    }

    /// Appends `attribute` unless an equal one is already present.
    pub fn add_attribute_if_absent(&mut self, attribute: ComponentAttribute) -> bool {
        if self.attributes.contains(&attribute) {
            return false;
        }
        self.attributes.push(attribute);
        true
    }

    pub fn find_attributes_by_type(
        &self,
        kind: AttributeKind,
    ) -> impl Iterator<Item = &ComponentAttribute> + '_ {
        self.attributes.iter().filter(move |a| a.kind == kind)
    }

    pub fn find_attributes_by_value<'a>(
        &'a self,
        value: &'a str,
    ) -> impl Iterator<Item = &'a ComponentAttribute> + 'a {
        self.attributes.iter().filter(move |a| a.value == value)
    }

    pub fn has_attribute_with_type(&self, kind: AttributeKind) -> bool {
        self.attributes.iter().any(|a| a.kind == kind)
    }

    pub fn has_attribute(&self, kind: AttributeKind, value: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.kind == kind && a.value == value)
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.has_attribute(AttributeKind::Modifier, modifier)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.kind, self.value)?;
        if let Some(sig) = &self.signature {
            f.write_str(sig)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Arena owning every component of one tree. Index 0 is the synthetic root.
pub struct ComponentTree {
    nodes: Vec<Component>,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Component::new(ComponentKind::Root, "ROOT")],
        }
    }

    pub fn root(&self) -> ComponentId {
        ComponentId::ROOT
    }

    /// Number of nodes in the arena, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree only holds its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, id: ComponentId) -> &Component {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: ComponentId) -> &mut Component {
        &mut self.nodes[id.0]
    }

    /// Stores a detached component and returns its handle.
    pub fn create(&mut self, mut component: Component) -> ComponentId {
        component.parent = None;
        component.children.clear();
        let id = ComponentId(self.nodes.len());
        self.nodes.push(component);
        id
    }

    /// Attaches `child` under `parent`. This is the only place a parent link is set.
    ///
    /// # Panics
    /// Panics if `child` already has a parent or is the root.
    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) {
        assert!(
            child != ComponentId::ROOT && self.nodes[child.0].parent.is_none(),
            "component {} is already attached",
            self.nodes[child.0]
        );
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Creates `component` and attaches it under `parent` in one step.
    ///
    /// # Example
    /// ```
    /// use ir::{Component, ComponentKind, ComponentTree};
    /// let mut tree = ComponentTree::new();
    /// let pkg = tree.add_new_child(tree.root(), Component::new(ComponentKind::Package, "demo"));
    /// let class = tree.add_new_child(pkg, Component::new(ComponentKind::Class, "A"));
    /// assert_eq!(tree.unique_coordinate(class, "."), "demo.A");
    /// ```
    pub fn add_new_child(&mut self, parent: ComponentId, component: Component) -> ComponentId {
        let id = self.create(component);
        self.add_child(parent, id);
        id
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.get(id).parent
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        &self.get(id).children
    }

    pub fn has_children(&self, id: ComponentId) -> bool {
        self.get(id).has_children()
    }

    /// First child of `parent` that is the same symbol as `probe`.
    pub fn find_child(&self, parent: ComponentId, probe: &Component) -> Option<ComponentId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|c| self.get(*c).same_symbol(probe))
    }

    pub fn find_children_by_type(&self, parent: ComponentId, kind: ComponentKind) -> Vec<ComponentId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|c| self.get(*c).kind == kind)
            .collect()
    }

    pub fn find_children_by_value(&self, parent: ComponentId, value: &str) -> Vec<ComponentId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|c| self.get(*c).value == value)
            .collect()
    }

    /// Nearest ancestor of `id` with the given kind.
    pub fn find_parent_by_type(&self, id: ComponentId, kind: ComponentKind) -> Option<ComponentId> {
        self.find_parent_matching(id, |c| c.kind == kind)
    }

    pub fn find_parent_matching<F>(&self, id: ComponentId, pred: F) -> Option<ComponentId>
    where
        F: Fn(&Component) -> bool,
    {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if pred(self.get(p)) {
                return Some(p);
            }
            cur = self.parent(p);
        }
        None
    }

    /// Ancestors of `id`, nearest first, without the root.
    pub fn get_parents(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if self.get(p).kind == ComponentKind::Root {
                break;
            }
            out.push(p);
            cur = self.parent(p);
        }
        out
    }

    /// The root sentinel counts as "no parent".
    pub fn has_parent_and_parent_is_not_root(&self, id: ComponentId) -> bool {
        self.parent(id)
            .is_some_and(|p| self.get(p).kind != ComponentKind::Root)
    }

    /// Values from the outermost non-root ancestor down to `id`.
    pub fn path_values(&self, id: ComponentId) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .get_parents(id)
            .into_iter()
            .rev()
            .map(|p| self.get(p).value.as_str())
            .collect();
        if self.get(id).kind != ComponentKind::Root {
            out.push(self.get(id).value.as_str());
        }
        out
    }

    pub fn unique_coordinate(&self, id: ComponentId, delimiter: &str) -> String {
        self.path_values(id).join(delimiter)
    }

    /// Finds the first attached component whose unique coordinate equals
    /// `coordinate`, descending segment by segment.
    pub fn find_by_unique_coordinate(&self, coordinate: &str, delimiter: &str) -> Option<ComponentId> {
        if coordinate.is_empty() {
            return None;
        }
        self.descend(self.root(), coordinate, delimiter)
    }

    fn descend(&self, at: ComponentId, rest: &str, delimiter: &str) -> Option<ComponentId> {
        for &child in self.children(at) {
            let value = self.get(child).value.as_str();
            let Some(tail) = rest.strip_prefix(value) else {
                continue;
            };
            if tail.is_empty() {
                return Some(child);
            }
            if let Some(next) = tail.strip_prefix(delimiter) {
                if let Some(found) = self.descend(child, next, delimiter) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Deep-copies the subtree at `source_id` of `source` under `parent`.
    pub fn copy_subtree(
        &mut self,
        parent: ComponentId,
        source: &ComponentTree,
        source_id: ComponentId,
    ) -> ComponentId {
        let copy = self.add_new_child(parent, source.get(source_id).clone());
        for &child in source.children(source_id) {
            self.copy_subtree(copy, source, child);
        }
        copy
    }

    /// Attached descendants of `id` in pre-order, `id` excluded.
    pub fn descendants(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        let mut stack: Vec<ComponentId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Checks that parent and child links agree and every handle is in range.
    pub fn is_consistent(&self) -> bool {
        let Some(root) = self.nodes.first() else {
            return false;
        };
        if root.kind != ComponentKind::Root || root.parent.is_some() {
            return false;
        }
        self.nodes.iter().enumerate().all(|(idx, node)| {
            node.children.iter().all(|c| {
                self.nodes
                    .get(c.0)
                    .is_some_and(|child| child.parent == Some(ComponentId(idx)))
            })
        })
    }

    /// Indented outline of the attached tree, one component per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.outline(self.root(), 0, false, &mut out);
        out
    }

    /// Like [`to_text`](Self::to_text) with children and attributes sorted,
    /// so trees built in different file orders compare equal.
    pub fn canonical_outline(&self) -> String {
        let mut out = String::new();
        self.outline(self.root(), 0, true, &mut out);
        out
    }

    fn outline(&self, id: ComponentId, depth: usize, sorted: bool, out: &mut String) {
        let node = self.get(id);
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.to_string());
        let mut attrs: Vec<&ComponentAttribute> = node.attributes.iter().collect();
        if sorted {
            attrs.sort();
        }
        if !attrs.is_empty() {
            let joined: Vec<String> = attrs.iter().map(|a| a.to_string()).collect();
            out.push_str(&format!(" [{}]", joined.join(", ")));
        }
        out.push('\n');
        if sorted {
            let mut lines: Vec<String> = node
                .children
                .iter()
                .map(|c| {
                    let mut s = String::new();
                    self.outline(*c, depth + 1, true, &mut s);
                    s
                })
                .collect();
            lines.sort();
            for l in lines {
                out.push_str(&l);
            }
        } else {
            for c in &node.children {
                self.outline(*c, depth + 1, false, out);
            }
        }
    }

    /// Exports the attached tree to DOT format.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph Components {\n");
        let mut ids = vec![self.root()];
        ids.extend(self.descendants(self.root()));
        for id in ids {
            let node = self.get(id);
            let label = format!("{}:{}", node.kind, node.value).replace('"', "\\\"");
            out.push_str(&format!("    {} [label=\"{}\"];\n", id.0, label));
            for child in &node.children {
                out.push_str(&format!("    {} -> {};\n", id.0, child.0));
            }
        }
        out.push('}');
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Pre-built component tree of an external artifact, searched during
/// analysis but never modified by it.
pub struct Library {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default)]
    pub revision_id: Option<String>,
    pub components: ComponentTree,
}

impl Library {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        components: ComponentTree,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            revision_id: None,
            components,
        }
    }

    /// `group:artifact:version`
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

#[cfg(test)]
mod tests;
