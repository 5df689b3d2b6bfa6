//! MCTS tree node representation.
//!
//! Each node stands for the game state reached by taking `parent_action` from
//! the parent. Nodes store the visit statistics used for UCB selection and the
//! actions that have not been expanded into children yet.

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
///
/// `A` is the game's action type and `P` its player identity type.
#[derive(Debug, Clone)]
pub struct MctsNode<A, P> {
    /// Parent node index (NONE for root). Not an ownership edge.
    pub parent: NodeId,

    /// Action that led to this node from parent (None for root)
    pub parent_action: Option<A>,

    /// Player who took `parent_action` (None for root)
    pub mover: Option<P>,

    /// Expanded children keyed by action.
    pub children: Vec<(A, NodeId)>,

    /// Legal actions at this node's state that have no child yet.
    pub untried_actions: Vec<A>,

    /// Number of simulations that passed through this node
    pub visits: u32,

    /// Simulations won by the deciding player minus simulations lost.
    pub wins: i32,
}

impl<A: PartialEq, P: PartialEq> MctsNode<A, P> {
    /// Create a new root node.
    pub fn new_root(untried_actions: Vec<A>) -> Self {
        Self {
            parent: NodeId::NONE,
            parent_action: None,
            mover: None,
            children: Vec::new(),
            untried_actions,
            visits: 0,
            wins: 0,
        }
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, action: A, mover: P, untried_actions: Vec<A>) -> Self {
        Self {
            parent,
            parent_action: Some(action),
            mover: Some(mover),
            children: Vec::new(),
            untried_actions,
            visits: 0,
            wins: 0,
        }
    }

    #[inline]
    pub fn has_untried_actions(&self) -> bool {
        !self.untried_actions.is_empty()
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Remove and return the untried action at `index`.
    ///
    /// Order of the remaining untried actions is not preserved.
    pub fn take_untried(&mut self, index: usize) -> A {
        self.untried_actions.swap_remove(index)
    }

    /// Remove a specific action from the untried list.
    /// Returns false if the action was not untried.
    pub fn remove_untried(&mut self, action: &A) -> bool {
        match self.untried_actions.iter().position(|a| a == action) {
            Some(index) => {
                self.untried_actions.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Look up the child reached by `action`.
    pub fn child(&self, action: &A) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, id)| *id)
    }

    /// Count one simulation through this node.
    #[inline]
    pub fn record(&mut self, won: bool) {
        self.visits += 1;
        if won {
            self.wins += 1;
        } else {
            self.wins -= 1;
        }
    }

    /// Raw win ratio `wins / visits`, 0.0 if never visited.
    #[inline]
    pub fn win_ratio(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins as f64 / self.visits as f64
        }
    }

    /// Whether the edge into this node was taken by someone other than `bot`.
    /// The root has no incoming edge and is never an opponent node.
    #[inline]
    pub fn is_opponent_of(&self, bot: &P) -> bool {
        matches!(&self.mover, Some(mover) if mover != bot)
    }

    /// Calculate the UCB score used to choose among siblings.
    ///
    /// Unvisited nodes score `sqrt(ln(N_parent + 1))`, a bounded bonus rather
    /// than infinite priority. Visited nodes score
    /// `Q + c * sqrt(ln(N_parent) / N)` where `Q = wins / visits`, replaced by
    /// `1 - Q` when the edge into the node belongs to the opponent.
    #[inline]
    pub fn ucb_score(&self, parent_visits: u32, is_opponent: bool, exploration: f64) -> f64 {
        if self.visits == 0 {
            return ((parent_visits as f64) + 1.0).ln().sqrt();
        }

        let mut exploitation = self.wins as f64 / self.visits as f64;
        if is_opponent {
            exploitation = 1.0 - exploitation;
        }

        // A visited child implies a visited parent; ln(0) would be -inf.
        if parent_visits == 0 {
            return exploitation;
        }

        let explore = exploration * ((parent_visits as f64).ln() / self.visits as f64).sqrt();
        exploitation + explore
    }
}
