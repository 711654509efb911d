use crate::duel::{Multiplier, State};

/// Index of a node inside a [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

pub struct Node {
    pub state: State,
    // The Move to get from the parent to here.
    // Only None at the root.
    pub m: Option<Multiplier>,
    // Bookkeeping only, the search never walks upwards.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena of game states. Nodes are keyed by the path that reached them, so the
/// same state may appear several times.
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root: State) -> Self {
        Self {
            nodes: vec![Node {
                state: root,
                m: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    // Never empty: the root is always present.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Every node id, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn state(&self, id: NodeId) -> &State {
        &self.nodes[id.0].state
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn add_child(&mut self, parent: NodeId, m: Multiplier, state: State) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            state,
            m: Some(m),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Moves leading from the root to `id`.
    pub fn path_to(&self, id: NodeId) -> Vec<Multiplier> {
        let mut moves = Vec::new();
        let mut cur = self.get(id);
        while let (Some(m), Some(parent)) = (cur.m, cur.parent) {
            moves.push(m);
            cur = self.get(parent);
        }
        moves.reverse();
        moves
    }

    /// Marks the current size of the arena for a later [`Tree::rollback`].
    pub fn checkpoint(&self) -> usize {
        self.nodes.len()
    }

    /// Drops every node created since `mark`, along with the links to them.
    pub fn rollback(&mut self, mark: usize) {
        if mark >= self.nodes.len() {
            return;
        }
        let dropped = self.nodes.len() - mark;
        self.nodes.truncate(mark);
        for node in self.nodes.iter_mut() {
            node.children.retain(|c| c.0 < mark);
        }
        tracing::trace!(dropped, kept = mark, "rolled back lookahead nodes");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::duel::Side;

    fn mult(v: u64) -> Multiplier {
        Multiplier::try_from(v).unwrap()
    }

    #[test]
    fn test_path_to() {
        let start = State::new(30, Side::Human);
        let mut tree = Tree::new(start);
        let a = tree.add_child(tree.root(), mult(2), start);
        let b = tree.add_child(a, mult(4), start);
        let c = tree.add_child(tree.root(), mult(3), start);
        assert_eq!(tree.path_to(b), vec![mult(2), mult(4)]);
        assert_eq!(tree.path_to(c), vec![mult(3)]);
        assert!(tree.path_to(tree.root()).is_empty());
        assert_eq!(tree.children(tree.root()), &[a, c]);
        assert_eq!(tree.get(b).parent, Some(a));
    }

    #[test]
    fn test_rollback() {
        let start = State::new(30, Side::Human);
        let mut tree = Tree::new(start);
        let real = tree.add_child(tree.root(), mult(2), start);
        let mark = tree.checkpoint();
        let h = tree.add_child(real, mult(3), start);
        tree.add_child(h, mult(4), start);
        assert_eq!(tree.len(), 4);

        tree.rollback(mark);
        assert_eq!(tree.len(), 2);
        assert!(tree.children(real).is_empty());
        assert_eq!(tree.children(tree.root()), &[real]);

        // Rolling back to the present is a no-op.
        tree.rollback(tree.checkpoint());
        assert_eq!(tree.len(), 2);
    }
}
