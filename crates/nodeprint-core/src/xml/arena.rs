use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use indextree::{Arena, NodeId};
use tracing::debug;

/// Arena-backed XML tree.
///
/// Node handles are plain [`NodeId`]s; they stay valid until the node is
/// removed. Clone the document to keep an untouched copy before running a
/// mutating operation on it.
#[derive(Clone, Debug)]
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// First element child of the document node, or the root itself when
    /// the tree was built without a document node.
    pub fn root_element(&self) -> Option<NodeId> {
        let root = self.root?;
        match self.get(root)? {
            XmlNodeData::Document => self
                .children(root)
                .find(|&child| self.get(child).is_some_and(XmlNodeData::is_element)),
            data if data.is_element() => Some(root),
            _ => None,
        }
    }

    /// Whether `id` refers to a live node of this document.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(|node| !node.is_removed())
    }

    pub fn get(&self, id: NodeId) -> Option<&XmlNodeData> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut XmlNodeData> {
        self.arena
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get_mut())
    }

    pub fn add_root(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.root = Some(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.append(child, &mut self.arena);
        child
    }

    pub fn add_after(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_after(new_node, &mut self.arena);
        new_node
    }

    /// Detaches `node` from its parent and frees it. Children of the removed
    /// node take its place.
    pub fn remove(&mut self, node: NodeId) {
        if self.root == Some(node) {
            self.root = None;
        }
        node.remove(&mut self.arena);
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &XName, value: &str) {
        if let Some(node_data) = self.get_mut(node) {
            if let Some(attrs) = node_data.attributes_mut() {
                if let Some(attr) = attrs.iter_mut().find(|a| &a.name == name) {
                    attr.value = value.to_string();
                } else {
                    attrs.push(XAttribute::new(name.clone(), value));
                }
            }
        }
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    /// `node` followed by everything below it, in document order.
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    /// `node` followed by its parent, grandparent and so on.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.ancestors(&self.arena)
    }

    /// Merges adjacent text siblings below `node` into the first of each run
    /// and drops empty text nodes, like DOM `Node.normalize()`.
    ///
    /// CDATA sections are left alone. Returns the number of nodes removed.
    pub fn normalize(&mut self, node: NodeId) -> usize {
        let parents: Vec<NodeId> = self
            .descendants(node)
            .filter(|&id| self.get(id).is_some_and(|data| !data.is_text()))
            .collect();
        let mut removed = 0;

        for parent in parents {
            let children: Vec<NodeId> = self.children(parent).collect();
            let mut run_head: Option<NodeId> = None;

            for child in children {
                let text = match self.get_mut(child) {
                    Some(XmlNodeData::Text(text)) => std::mem::take(text),
                    _ => {
                        run_head = None;
                        continue;
                    }
                };

                match run_head {
                    Some(head) => {
                        if let Some(XmlNodeData::Text(head_text)) = self.get_mut(head) {
                            head_text.push_str(&text);
                        }
                        self.remove(child);
                        removed += 1;
                    }
                    None if text.is_empty() => {
                        self.remove(child);
                        removed += 1;
                    }
                    None => {
                        if let Some(XmlNodeData::Text(slot)) = self.get_mut(child) {
                            *slot = text;
                        }
                        run_head = Some(child);
                    }
                }
            }
        }

        if removed > 0 {
            debug!(removed, "normalized adjacent text nodes");
        }
        removed
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}
