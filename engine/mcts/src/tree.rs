//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for node storage. Nodes are stored in a
//! contiguous Vec and referenced by NodeId indices, so a child's link to its
//! parent is a plain index rather than an owning pointer.

use crate::node::{MctsNode, NodeId};

/// Which children of a node are eligible during selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildFilter {
    /// Every expanded child
    All,
    /// Only children that still have untried actions
    Expandable,
}

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<A, P> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<A, P>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<A: Clone + PartialEq, P: PartialEq> MctsTree<A, P> {
    /// Create a new tree whose root offers `root_actions`.
    pub fn new(root_actions: Vec<A>) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_actions)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<A, P> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<A, P> {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    fn allocate(&mut self, node: MctsNode<A, P>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<A, P>] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest UCB score from the
    /// deciding player's (`bot`) perspective.
    ///
    /// Returns None when no child passes `filter`. Ties go to whichever
    /// maximal child the iterator yields last.
    pub fn select_child(
        &self,
        node_id: NodeId,
        bot: &P,
        exploration: f64,
        filter: ChildFilter,
    ) -> Option<NodeId> {
        let node = self.get(node_id);
        let parent_visits = node.visits;

        node.children
            .iter()
            .map(|(_, id)| *id)
            .filter(|id| match filter {
                ChildFilter::All => true,
                ChildFilter::Expandable => self.get(*id).has_untried_actions(),
            })
            .map(|id| {
                let child = self.get(id);
                let score = child.ucb_score(parent_visits, child.is_opponent_of(bot), exploration);
                (id, score)
            })
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(id, _)| id)
    }

    /// Add a child to a parent node.
    /// Returns the new child's NodeId.
    ///
    /// The caller is responsible for having removed `action` from the
    /// parent's untried actions.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        action: A,
        mover: P,
        untried_actions: Vec<A>,
    ) -> NodeId {
        debug_assert!(
            self.get(parent_id).child(&action).is_none(),
            "action expanded twice"
        );

        let child = MctsNode::new_child(parent_id, action.clone(), mover, untried_actions);
        let child_id = self.allocate(child);

        // Add to parent's children
        self.get_mut(parent_id).children.push((action, child_id));

        child_id
    }

    /// Backpropagate a simulation result from `start_id` up to the root.
    ///
    /// Every node on the path gets one more visit and has its win counter
    /// moved by +1 (`won`) or -1. Starting from `NodeId::NONE` does nothing.
    pub fn backpropagate(&mut self, start_id: NodeId, won: bool) {
        let mut current_id = start_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.record(won);
            current_id = node.parent;
        }
    }

    /// Get the best action from root by raw win ratio.
    /// Returns (action, win_ratio) or None if root has no children.
    pub fn best_action(&self) -> Option<(A, f64)> {
        let root = self.get(self.root);
        root.children
            .iter()
            .map(|(action, id)| (action, self.get(*id).win_ratio()))
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(action, ratio)| (action.clone(), ratio))
    }

    /// Per-child statistics at the root as (action, visits, wins).
    pub fn root_children(&self) -> Vec<(A, u32, i32)> {
        self.get(self.root)
            .children
            .iter()
            .map(|(action, id)| {
                let child = self.get(*id);
                (action.clone(), child.visits, child.wins)
            })
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_win_ratio: root.win_ratio(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0u32)];

        while let Some((node_id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(
                self.get(node_id)
                    .children
                    .iter()
                    .map(|(_, id)| (*id, depth + 1)),
            );
        }

        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_win_ratio: f64,
    pub max_depth: u32,
}
