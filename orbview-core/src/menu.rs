/// Ordered menu of mesh builders and mode switches
use std::fmt;

use crate::geometry::{mesh_builder, Mesh, MeshBuilder};
use crate::input::RenderMode;

#[derive(Clone)]
pub enum MenuAction {
    Build(MeshBuilder),
    SetMode(RenderMode),
}

impl fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Build(_) => f.write_str("Build(..)"),
            MenuAction::SetMode(mode) => write!(f, "SetMode({mode:?})"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuEntry {
    pub label: String,
    pub action: MenuAction,
}

#[derive(Debug, Clone)]
pub struct MenuCategory {
    pub label: String,
    pub entries: Vec<MenuEntry>,
}

/// Category label → entries, both kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct Menu {
    categories: Vec<MenuCategory>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, creating its category on first use
    pub fn with_entry(mut self, category: &str, label: &str, action: MenuAction) -> Self {
        let entry = MenuEntry {
            label: label.to_owned(),
            action,
        };
        match self.categories.iter_mut().find(|c| c.label == category) {
            Some(existing) => existing.entries.push(entry),
            None => self.categories.push(MenuCategory {
                label: category.to_owned(),
                entries: vec![entry],
            }),
        }
        self
    }

    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.categories.iter().flat_map(|c| c.entries.iter())
    }

    pub fn lookup(&self, label: &str) -> Option<&MenuAction> {
        self.entries()
            .find(|entry| entry.label == label)
            .map(|entry| &entry.action)
    }

    /// Built-in shapes plus the mono/stereo switches
    pub fn builtin() -> Self {
        Self::new()
            .with_entry("Shapes", "Cube", build(|| Mesh::cube(2.0)))
            .with_entry("Shapes", "Tetrahedron", build(|| Mesh::tetrahedron(2.0)))
            .with_entry("Shapes", "Octahedron", build(|| Mesh::octahedron(2.5)))
            .with_entry("Structures", "Tower", build(|| Mesh::tower(5, 2.0)))
            .with_entry("Structures", "Lattice", build(|| Mesh::lattice(3, 1.0)))
            .with_entry("View", "Mono", MenuAction::SetMode(RenderMode::Normal))
            .with_entry("View", "Stereo", MenuAction::SetMode(RenderMode::Stereo))
    }
}

fn build(shape: fn() -> Mesh) -> MenuAction {
    MenuAction::Build(mesh_builder(move || Ok(shape())))
}
