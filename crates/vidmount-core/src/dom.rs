//! Adapter-owned host subtree
//!
//! A minimal element model standing in for the DOM nodes the adapter owns:
//! one container, and the playable host element the player is created over.
//! Handles are cheap clones sharing the underlying node, the way element
//! references behave in a real document, so the backend can hold the host
//! element the adapter created and the embedding host can observe the
//! container without owning it.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Class applied to every playable host element the adapter creates
pub const HOST_ELEMENT_CLASS: &str = "vidmount-player";

#[derive(Debug, Default)]
struct ElementInner {
    tag: String,
    class_name: String,
    attributes: BTreeMap<String, String>,
}

/// A single element node; clones share the node
#[derive(Debug, Clone)]
pub struct MediaElement {
    inner: Arc<RwLock<ElementInner>>,
}

impl MediaElement {
    /// Create an element with the given tag name
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ElementInner {
                tag: tag.into(),
                ..ElementInner::default()
            })),
        }
    }

    /// Tag name
    pub fn tag(&self) -> String {
        self.inner.read().map(|e| e.tag.clone()).unwrap_or_default()
    }

    /// Set the class attribute
    pub fn set_class_name(&self, class_name: impl Into<String>) {
        if let Ok(mut e) = self.inner.write() {
            e.class_name = class_name.into();
        }
    }

    /// Class attribute value
    pub fn class_name(&self) -> String {
        self.inner
            .read()
            .map(|e| e.class_name.clone())
            .unwrap_or_default()
    }

    /// Set an attribute
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut e) = self.inner.write() {
            e.attributes.insert(name.into(), value.into());
        }
    }

    /// Read an attribute, if set
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|e| e.attributes.get(name).cloned())
    }

    /// Remove an attribute
    pub fn remove_attribute(&self, name: &str) {
        if let Ok(mut e) = self.inner.write() {
            e.attributes.remove(name);
        }
    }

    /// True if both handles refer to the same node
    pub fn same_node(&self, other: &MediaElement) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// The container element the adapter owns; all children are torn down with it
#[derive(Debug, Clone, Default)]
pub struct HostContainer {
    children: Arc<RwLock<Vec<MediaElement>>>,
}

impl HostContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child element
    pub fn append(&self, element: MediaElement) {
        if let Ok(mut children) = self.children.write() {
            children.push(element);
        }
    }

    /// Remove a specific child, if present
    pub fn remove(&self, element: &MediaElement) {
        if let Ok(mut children) = self.children.write() {
            children.retain(|c| !c.same_node(element));
        }
    }

    /// Remove all children
    pub fn clear(&self) {
        if let Ok(mut children) = self.children.write() {
            children.clear();
        }
    }

    /// Number of children
    pub fn child_count(&self) -> usize {
        self.children.read().map(|c| c.len()).unwrap_or(0)
    }

    /// True if the container has no children
    pub fn is_empty(&self) -> bool {
        self.child_count() == 0
    }

    /// First child, if any
    pub fn first(&self) -> Option<MediaElement> {
        self.children.read().ok().and_then(|c| c.first().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_attributes() {
        let el = MediaElement::new("video");
        assert_eq!(el.tag(), "video");
        assert_eq!(el.attribute("preload"), None);

        el.set_attribute("preload", "metadata");
        assert_eq!(el.attribute("preload").as_deref(), Some("metadata"));

        el.remove_attribute("preload");
        assert_eq!(el.attribute("preload"), None);
    }

    #[test]
    fn test_clones_share_the_node() {
        let el = MediaElement::new("video");
        let alias = el.clone();
        alias.set_attribute("poster", "p.jpg");
        assert_eq!(el.attribute("poster").as_deref(), Some("p.jpg"));
        assert!(el.same_node(&alias));
        assert!(!el.same_node(&MediaElement::new("video")));
    }

    #[test]
    fn test_container_append_and_clear() {
        let container = HostContainer::new();
        assert!(container.is_empty());

        container.append(MediaElement::new("video"));
        assert_eq!(container.child_count(), 1);

        container.clear();
        assert!(container.is_empty());
        assert!(container.first().is_none());
    }

    #[test]
    fn test_container_remove_specific_child() {
        let container = HostContainer::new();
        let a = MediaElement::new("video");
        let b = MediaElement::new("video");
        container.append(a.clone());
        container.append(b.clone());

        container.remove(&a);
        assert_eq!(container.child_count(), 1);
        assert!(container.first().unwrap().same_node(&b));
    }
}
