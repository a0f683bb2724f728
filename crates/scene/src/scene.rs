use crate::SceneError;
use crate::light::Light;
use glam::Mat4;
use std::collections::BTreeMap;
use vista_assets::{MaterialHandle, MeshHandle};
use vista_common::{Aabb, Color, NodeId, Transform};

/// Mesh + material reference attached to a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderable {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    /// Bounds of the mesh in the node's local space.
    pub local_bounds: Aabb,
}

/// A node in the scene hierarchy.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub renderable: Option<Renderable>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// A grouping node with no geometry.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            renderable: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(name: impl Into<String>, renderable: Renderable) -> Self {
        Self {
            renderable: Some(renderable),
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// One renderable node resolved to world space, ready to draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem {
    pub id: NodeId,
    pub world: Mat4,
    pub renderable: Renderable,
}

/// Scene graph: a forest of nodes plus lights and a background color.
///
/// Nodes live in a BTreeMap for deterministic iteration; root order is the
/// order in which they were added.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    nodes: BTreeMap<NodeId, Node>,
    roots: Vec<NodeId>,
    lights: Vec<Light>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            nodes: BTreeMap::new(),
            roots: Vec::new(),
            lights: Vec::new(),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Add a node at the top level. Returns its id.
    pub fn add(&mut self, mut node: Node) -> NodeId {
        let id = NodeId::new();
        node.parent = None;
        node.children.clear();
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Add a node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = NodeId::new();
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Remove a node and its whole subtree. Returns the removed node.
    pub fn remove(&mut self, id: NodeId) -> Result<Node, SceneError> {
        let node = self.nodes.remove(&id).ok_or(SceneError::NodeNotFound(id))?;
        match node.parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        let mut pending = node.children.clone();
        while let Some(child) = pending.pop() {
            if let Some(removed) = self.nodes.remove(&child) {
                pending.extend(removed.children);
            }
        }
        Ok(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))?;
        node.transform = transform;
        Ok(())
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| *id)
    }

    /// Local-to-world matrix: the product of every transform up the parent chain.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut node = self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))?;
        let mut matrix = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self
                .nodes
                .get(&parent)
                .ok_or(SceneError::NodeNotFound(parent))?;
            matrix = node.transform.matrix() * matrix;
        }
        Ok(matrix)
    }

    /// World-space box containing every renderable in the subtree rooted at `id`.
    ///
    /// Each mesh's local box is transformed corner by corner, so rotated
    /// meshes produce a box that encloses the rotated local box.
    pub fn bounding_box(&self, id: NodeId) -> Result<Aabb, SceneError> {
        let root_world = self.world_matrix(id)?;
        let mut bounds = Aabb::empty();
        let mut pending = vec![(id, root_world)];
        while let Some((current, world)) = pending.pop() {
            let node = self
                .nodes
                .get(&current)
                .ok_or(SceneError::NodeNotFound(current))?;
            if let Some(r) = &node.renderable {
                bounds = bounds.union(&r.local_bounds.transformed(&world));
            }
            for child in &node.children {
                if let Some(c) = self.nodes.get(child) {
                    pending.push((*child, world * c.transform.matrix()));
                }
            }
        }
        Ok(bounds)
    }

    /// Every renderable node with its world matrix, in hierarchy order.
    pub fn draw_items(&self) -> Vec<DrawItem> {
        let mut items = Vec::new();
        let mut pending: Vec<(NodeId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .filter_map(|id| self.nodes.get(id).map(|n| (*id, n.transform.matrix())))
            .collect();
        while let Some((id, world)) = pending.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if let Some(renderable) = node.renderable {
                items.push(DrawItem {
                    id,
                    world,
                    renderable,
                });
            }
            for child in node.children.iter().rev() {
                if let Some(c) = self.nodes.get(child) {
                    pending.push((*child, world * c.transform.matrix()));
                }
            }
        }
        items
    }

    /// Iterate nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, n)| (*id, n))
    }
}
