//! In-memory model of the page elements
//!
//! The choreography never touches the DOM directly. It mutates a `Stage`,
//! which records every change as a `DomOp`. The browser layer drains those
//! ops once per animation frame and applies them to real nodes; tests read
//! the stage instead.

pub mod prop;
pub mod role;

pub use prop::{Prop, Unit, transform_css};
pub use role::Role;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Stable handle to a stage element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// A pending mutation for the real document
#[derive(Debug, Clone, PartialEq)]
pub enum DomOp {
    /// Create a `div` with the role's class; `parent: None` appends to body
    Create {
        id: ElementId,
        role: Role,
        parent: Option<ElementId>,
    },
    Remove {
        id: ElementId,
    },
    /// Set one inline style declaration (empty value clears it)
    Style {
        id: ElementId,
        name: &'static str,
        value: String,
    },
    AddClass {
        id: ElementId,
        class: &'static str,
    },
    RemoveClass {
        id: ElementId,
        class: &'static str,
    },
    Text {
        id: ElementId,
        text: String,
    },
    /// Clear and restore an iframe's `src` to stop embedded playback
    ReloadFrame {
        id: ElementId,
    },
}

/// Recorded state of one element
#[derive(Debug, Clone)]
pub struct Element {
    pub role: Role,
    props: BTreeMap<Prop, f32>,
    styles: BTreeMap<&'static str, String>,
    classes: BTreeSet<&'static str>,
    text: Option<String>,
    /// Numeric props changed since the last flush
    dirty: BTreeSet<Prop>,
}

impl Element {
    fn new(role: Role) -> Self {
        Self {
            role,
            props: BTreeMap::new(),
            styles: BTreeMap::new(),
            classes: BTreeSet::new(),
            text: None,
            dirty: BTreeSet::new(),
        }
    }

    fn get(&self, prop: Prop) -> f32 {
        self.props.get(&prop).copied().unwrap_or_else(|| prop.initial())
    }
}

/// The element store plus its pending op queue
#[derive(Debug, Default)]
pub struct Stage {
    elements: BTreeMap<ElementId, Element>,
    next_id: u32,
    ops: Vec<DomOp>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, role: Role) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, Element::new(role));
        id
    }

    /// Register an element that already exists in the markup
    pub fn adopt(&mut self, role: Role) -> ElementId {
        self.allocate(role)
    }

    /// Create a new element at runtime
    pub fn spawn(&mut self, role: Role, parent: Option<ElementId>) -> ElementId {
        let id = self.allocate(role);
        self.ops.push(DomOp::Create { id, role, parent });
        id
    }

    /// Remove an element; returns false if it was already gone
    pub fn remove(&mut self, id: ElementId) -> bool {
        if self.elements.remove(&id).is_some() {
            self.ops.push(DomOp::Remove { id });
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// First element with the given role
    pub fn find(&self, role: Role) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|(_, el)| el.role == role)
            .map(|(id, _)| *id)
    }

    /// All elements with the given role, in creation order
    pub fn find_all(&self, role: Role) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|(_, el)| el.role == role)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn count(&self, role: Role) -> usize {
        self.elements.values().filter(|el| el.role == role).count()
    }

    /// Current value of a numeric property (its initial value if unset)
    pub fn get(&self, id: ElementId, prop: Prop) -> f32 {
        self.elements
            .get(&id)
            .map(|el| el.get(prop))
            .unwrap_or_else(|| prop.initial())
    }

    /// Assign a numeric property; ignored for removed elements
    pub fn set(&mut self, id: ElementId, prop: Prop, value: f32) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.props.insert(prop, value);
            el.dirty.insert(prop);
        }
    }

    /// Assign an inline style that is not animated
    pub fn set_style(&mut self, id: ElementId, name: &'static str, value: impl Into<String>) {
        if let Some(el) = self.elements.get_mut(&id) {
            let value = value.into();
            if value.is_empty() {
                el.styles.remove(name);
            } else {
                el.styles.insert(name, value.clone());
            }
            self.ops.push(DomOp::Style { id, name, value });
        }
    }

    pub fn style(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements
            .get(&id)
            .and_then(|el| el.styles.get(name))
            .map(String::as_str)
    }

    pub fn add_class(&mut self, id: ElementId, class: &'static str) {
        if let Some(el) = self.elements.get_mut(&id) {
            if el.classes.insert(class) {
                self.ops.push(DomOp::AddClass { id, class });
            }
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &'static str) {
        if let Some(el) = self.elements.get_mut(&id) {
            if el.classes.remove(class) {
                self.ops.push(DomOp::RemoveClass { id, class });
            }
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(&id)
            .is_some_and(|el| el.classes.contains(class))
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(el) = self.elements.get_mut(&id) {
            let text = text.into();
            el.text = Some(text.clone());
            self.ops.push(DomOp::Text { id, text });
        }
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).and_then(|el| el.text.as_deref())
    }

    pub fn reload_frame(&mut self, id: ElementId) {
        if self.contains(id) {
            self.ops.push(DomOp::ReloadFrame { id });
        }
    }

    /// Render dirty numeric props to style ops and drain the queue
    pub fn flush(&mut self) -> Vec<DomOp> {
        let mut ops = std::mem::take(&mut self.ops);
        for (id, el) in self.elements.iter_mut() {
            if el.dirty.is_empty() {
                continue;
            }
            let dirty = std::mem::take(&mut el.dirty);
            if dirty.iter().any(|p| p.is_transform()) {
                let value = transform_css(
                    el.get(Prop::X),
                    el.get(Prop::Y),
                    el.get(Prop::RotationX),
                    el.get(Prop::RotationY),
                    el.get(Prop::Scale),
                );
                ops.push(DomOp::Style {
                    id: *id,
                    name: "transform",
                    value,
                });
            }
            for prop in dirty.into_iter().filter(|p| !p.is_transform()) {
                ops.push(DomOp::Style {
                    id: *id,
                    name: prop.css_name(),
                    value: prop.css_value(el.get(prop)),
                });
            }
        }
        ops
    }
}
