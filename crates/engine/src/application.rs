//! Program-wide symbol table: the merged application tree plus the
//! registered library trees.

use anyhow::{anyhow, Result};
use ir::{Component, ComponentId, ComponentKind, ComponentTree, Library};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

use crate::java::{PACKAGE_SEPARATOR, PRIVATE, PROTECTED, PUBLIC};
use crate::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Tree a [`ComponentRef`] points into.
pub enum Origin {
    Application,
    /// Index into [`Application::libraries`].
    Library(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    pub origin: Origin,
    pub id: ComponentId,
}

impl ComponentRef {
    pub fn application(id: ComponentId) -> Self {
        Self {
            origin: Origin::Application,
            id,
        }
    }
}

/// Qualified name of `id` inside `tree`. A type nested directly in another
/// type is joined with `nested`, everything else with `.`.
pub fn qualified_name(tree: &ComponentTree, id: ComponentId, nested: &str) -> String {
    let node = tree.get(id);
    match tree.parent(id) {
        Some(parent) if tree.has_parent_and_parent_is_not_root(id) => {
            let sep = if node.kind.is_type_declaration() && tree.get(parent).kind.is_type_declaration() {
                nested
            } else {
                PACKAGE_SEPARATOR
            };
            format!("{}{}{}", qualified_name(tree, parent, nested), sep, node.value)
        }
        _ => node.value.clone(),
    }
}

/// Analysis session state. Only ever grows during a run: components are
/// added or gain attributes, nothing is removed.
#[derive(Debug, Clone)]
pub struct Application {
    config: EngineConfig,
    components: ComponentTree,
    libraries: Vec<Library>,
    revision_id: Option<String>,
}

impl Application {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            components: ComponentTree::new(),
            libraries: Vec::new(),
            revision_id: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn components(&self) -> &ComponentTree {
        &self.components
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    pub fn revision_id(&self) -> Option<&str> {
        self.revision_id.as_deref()
    }

    pub fn set_revision_id(&mut self, revision_id: impl Into<String>) {
        self.revision_id = Some(revision_id.into());
    }

    pub fn root(&self) -> ComponentRef {
        ComponentRef::application(self.components.root())
    }

    pub fn library_root(&self, index: usize) -> ComponentRef {
        ComponentRef {
            origin: Origin::Library(index),
            id: self.libraries[index].components.root(),
        }
    }

    /// Registers a library unless one with the same coordinates exists.
    pub fn add_library(&mut self, library: Library) -> bool {
        let started = Instant::now();
        let coordinates = library.coordinates();
        if self
            .libraries
            .iter()
            .any(|l| l.coordinates() == coordinates)
        {
            debug!(library = %coordinates, "Library already registered");
            return false;
        }
        let revision = library.revision_id.clone().unwrap_or_default();
        self.libraries.push(library);
        info!(
            library = %coordinates,
            revision = %revision,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Library loaded"
        );
        true
    }

    pub fn tree(&self, origin: Origin) -> &ComponentTree {
        match origin {
            Origin::Application => &self.components,
            Origin::Library(i) => &self.libraries[i].components,
        }
    }

    pub fn get(&self, component: ComponentRef) -> &Component {
        self.tree(component.origin).get(component.id)
    }

    pub fn parent(&self, component: ComponentRef) -> Option<ComponentRef> {
        self.tree(component.origin)
            .parent(component.id)
            .map(|id| ComponentRef {
                origin: component.origin,
                id,
            })
    }

    pub fn children(&self, component: ComponentRef) -> impl Iterator<Item = ComponentRef> + '_ {
        self.tree(component.origin)
            .children(component.id)
            .iter()
            .map(move |&id| ComponentRef {
                origin: component.origin,
                id,
            })
    }

    /// Merges a per-file tree into the application tree, root to root.
    ///
    /// Attributes are unioned and children matched by symbol identity;
    /// unmatched children are copied in. Merging the same tree twice
    /// leaves the application unchanged the second time.
    pub fn merge_with_application(&mut self, source: &ComponentTree) {
        let target = self.components.root();
        self.merge_at(target, source, source.root());
    }

    /// Merges the subtree `source_id` of `source` into `target`.
    pub fn merge_at(&mut self, target: ComponentId, source: &ComponentTree, source_id: ComponentId) {
        for attribute in source.get(source_id).attributes() {
            self.components
                .get_mut(target)
                .add_attribute_if_absent(attribute.clone());
        }
        for &child in source.children(source_id) {
            match self.components.find_child(target, source.get(child)) {
                Some(existing) => self.merge_at(existing, source, child),
                None => {
                    self.components.copy_subtree(target, source, child);
                }
            }
        }
    }

    /// Looks in the application tree first, then every library in
    /// registration order.
    pub fn find_component_by_unique_coordinate(&self, coordinate: &str) -> Option<ComponentRef> {
        self.find_application_component_by_unique_coordinate(coordinate)
            .map(ComponentRef::application)
            .or_else(|| self.find_library_component_by_unique_coordinate(coordinate))
    }

    pub fn find_application_component_by_unique_coordinate(&self, coordinate: &str) -> Option<ComponentId> {
        self.components
            .find_by_unique_coordinate(coordinate, &self.config.unique_delimiter)
    }

    pub fn find_library_component_by_unique_coordinate(&self, coordinate: &str) -> Option<ComponentRef> {
        self.libraries.iter().enumerate().find_map(|(i, lib)| {
            lib.components
                .find_by_unique_coordinate(coordinate, &self.config.unique_delimiter)
                .map(|id| ComponentRef {
                    origin: Origin::Library(i),
                    id,
                })
        })
    }

    /// Independent lookups, evaluated in parallel.
    pub fn find_all_by_unique_coordinates(&self, coordinates: &[String]) -> Vec<Option<ComponentRef>> {
        coordinates
            .par_iter()
            .map(|c| self.find_component_by_unique_coordinate(c))
            .collect()
    }

    pub fn unique_coordinate(&self, component: ComponentRef) -> String {
        self.tree(component.origin)
            .unique_coordinate(component.id, &self.config.unique_delimiter)
    }

    pub fn get_qualified_name(&self, component: ComponentRef) -> String {
        qualified_name(
            self.tree(component.origin),
            component.id,
            &self.config.nested_type_separator,
        )
    }

    /// Package segments enclosing `component`, outermost first. A package
    /// counts as its own enclosing package.
    pub fn package_of(&self, component: ComponentRef) -> Vec<String> {
        let tree = self.tree(component.origin);
        let mut chain = tree.get_parents(component.id);
        chain.reverse();
        chain.push(component.id);
        chain
            .into_iter()
            .filter(|id| tree.get(*id).kind == ComponentKind::Package)
            .map(|id| tree.get(id).value.clone())
            .collect()
    }

    /// Nearest strict ancestor that is a type declaration.
    pub fn find_immediate_containing_type(&self, component: ComponentRef) -> Result<ComponentRef> {
        self.tree(component.origin)
            .find_parent_matching(component.id, |c| c.kind.is_type_declaration())
            .map(|id| ComponentRef {
                origin: component.origin,
                id,
            })
            .ok_or_else(|| anyhow!("no type declaration encloses {}", self.get(component)))
    }

    /// Outermost type declaration among `component` and its ancestors.
    pub fn find_top_level_type(&self, component: ComponentRef) -> Result<ComponentRef> {
        let tree = self.tree(component.origin);
        let mut found = None;
        let mut cur = Some(component.id);
        while let Some(id) = cur {
            if tree.get(id).kind.is_type_declaration() {
                found = Some(id);
            }
            cur = tree.parent(id);
        }
        found
            .map(|id| ComponentRef {
                origin: component.origin,
                id,
            })
            .ok_or_else(|| anyhow!("{} is not inside a type declaration", self.get(component)))
    }

    /// Java access check of `component` as seen from `visible_from`. The
    /// first matching rule wins:
    ///
    /// 1. packages are always visible
    /// 2. `public`
    /// 3. `protected`: same package, or `within_inheritance`
    /// 4. `private` and type parameters: same top-level type
    /// 5. otherwise same package
    ///
    /// Rule 4 fails when either side has no enclosing type.
    pub fn is_component_visible(
        &self,
        component: ComponentRef,
        visible_from: ComponentRef,
        within_inheritance: bool,
    ) -> Result<bool> {
        let target = self.get(component);
        if target.kind == ComponentKind::Package || target.has_modifier(PUBLIC) {
            return Ok(true);
        }
        if target.has_modifier(PROTECTED) {
            return Ok(within_inheritance || self.same_package(component, visible_from));
        }
        if target.has_modifier(PRIVATE) || target.kind == ComponentKind::TypeParameter {
            let own = self.find_top_level_type(component)?;
            let other = self.find_top_level_type(visible_from)?;
            return Ok(self.unique_coordinate(own) == self.unique_coordinate(other));
        }
        Ok(self.same_package(component, visible_from))
    }

    fn same_package(&self, a: ComponentRef, b: ComponentRef) -> bool {
        self.package_of(a) == self.package_of(b)
    }

    /// `component` and, when `visit_parents` is set, each of its ancestors
    /// below the root, keeping those accepted by `filter`. Nearest first.
    pub fn find_component_and_apply_filter<F>(
        &self,
        component: ComponentRef,
        filter: F,
        visit_parents: bool,
    ) -> Vec<ComponentRef>
    where
        F: Fn(&Component) -> bool,
    {
        let tree = self.tree(component.origin);
        let mut out = Vec::new();
        let mut cur = component;
        loop {
            if filter(self.get(cur)) {
                out.push(cur);
            }
            if !visit_parents || !tree.has_parent_and_parent_is_not_root(cur.id) {
                break;
            }
            match self.parent(cur) {
                Some(parent) => cur = parent,
                None => break,
            }
        }
        out
    }
}
