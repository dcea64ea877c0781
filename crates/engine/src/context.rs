use ir::{Component, ComponentAttribute, ComponentId, ComponentTree};
use std::fmt;

use crate::application::{Application, ComponentRef};

/// Per-file scope state of one tree-building walk.
///
/// Owns the file-scoped tree under construction and the insertion cursor
/// into it, plus the two sets used to resolve unqualified names:
/// components that are visible themselves, and components whose
/// children are visible.
#[derive(Debug)]
pub struct ParsingContext {
    component: ComponentTree,
    current: ComponentId,
    current_file: Option<ComponentAttribute>,
    revision_id: Option<String>,
    has_package: bool,
    imports: Vec<Component>,
    visible_components: Vec<ComponentRef>,
    components_with_visible_children: Vec<ComponentRef>,
}

impl Default for ParsingContext {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ParsingContext {
    pub fn new(revision_id: Option<String>) -> Self {
        let component = ComponentTree::new();
        let current = component.root();
        Self {
            component,
            current,
            current_file: None,
            revision_id,
            has_package: false,
            imports: Vec::new(),
            visible_components: Vec::new(),
            components_with_visible_children: Vec::new(),
        }
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.component
    }

    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.component
    }

    pub fn current(&self) -> ComponentId {
        self.current
    }

    /// Moves the cursor to `id`, which must be attached to this context's tree.
    pub fn descend(&mut self, id: ComponentId) {
        debug_assert!(
            id == self.component.root() || self.component.parent(id).is_some(),
            "cursor moved to a detached component"
        );
        self.current = id;
    }

    /// Moves the cursor to its parent; stays put at the root.
    pub fn ascend(&mut self) {
        if let Some(parent) = self.component.parent(self.current) {
            self.current = parent;
        }
    }

    pub fn current_file(&self) -> Option<&ComponentAttribute> {
        self.current_file.as_ref()
    }

    pub fn set_current_file(&mut self, file: ComponentAttribute) {
        self.current_file = Some(file);
    }

    pub fn revision_id(&self) -> Option<&str> {
        self.revision_id.as_deref()
    }

    pub fn has_package(&self) -> bool {
        self.has_package
    }

    pub fn set_has_package(&mut self, has_package: bool) {
        self.has_package = has_package;
    }

    pub fn imports(&self) -> &[Component] {
        &self.imports
    }

    /// Records an import unless the same one was already seen.
    pub fn add_import(&mut self, import: Component) -> bool {
        if self.imports.iter().any(|i| i.same_symbol(&import)) {
            return false;
        }
        self.imports.push(import);
        true
    }

    pub fn visible_components(&self) -> &[ComponentRef] {
        &self.visible_components
    }

    pub fn components_with_visible_children(&self) -> &[ComponentRef] {
        &self.components_with_visible_children
    }

    pub fn add_visible_component_if_not_contained(&mut self, component: ComponentRef) -> bool {
        if self.visible_components.contains(&component) {
            return false;
        }
        self.visible_components.push(component);
        true
    }

    /// Duplicates are kept; they only repeat a scope already searched.
    pub fn add_component_with_visible_children(&mut self, component: ComponentRef) {
        self.components_with_visible_children.push(component);
    }

    pub fn clear_visible_components(&mut self) {
        self.visible_components.clear();
        self.components_with_visible_children.clear();
    }

    /// First visible component named `value`: direct visibles are searched
    /// before the children of visible containers.
    pub fn find_visible_component_by_value(&self, app: &Application, value: &str) -> Option<ComponentRef> {
        self.find_visible_component_matching(app, value, |_| true)
    }

    pub fn find_visible_component_matching<F>(
        &self,
        app: &Application,
        value: &str,
        accept: F,
    ) -> Option<ComponentRef>
    where
        F: Fn(&Component) -> bool,
    {
        let matches = |r: &ComponentRef| {
            let c = app.get(*r);
            c.value == value && accept(c)
        };
        if let Some(found) = self.visible_components.iter().copied().find(|r| matches(r)) {
            return Some(found);
        }
        self.components_with_visible_children
            .iter()
            .find_map(|scope| app.children(*scope).find(|r| matches(r)))
    }

    /// Starts a fresh file tree and clears the current file. Scope state
    /// and the revision id are kept.
    pub fn reset(&mut self) {
        self.component = ComponentTree::new();
        self.current = self.component.root();
        self.current_file = None;
    }

    /// [`reset`](Self::reset) plus package flag, imports and both
    /// visibility sets.
    pub fn full_reset(&mut self) {
        self.reset();
        self.has_package = false;
        self.imports.clear();
        self.clear_visible_components();
    }

    /// Hands out the finished file tree and resets the context.
    pub fn take_tree(&mut self) -> ComponentTree {
        let tree = std::mem::take(&mut self.component);
        self.reset();
        tree
    }
}

impl fmt::Display for ParsingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self
            .current_file
            .as_ref()
            .map(|a| a.value.as_str())
            .unwrap_or("-");
        write!(
            f,
            "FILE: {} | CURRENT: {}",
            file,
            self.component.get(self.current)
        )
    }
}
