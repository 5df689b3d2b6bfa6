//! Small scripted games for unit tests.

use engine_core::game_utils::{points_for_winner, ONGOING};
use engine_core::{Board, Points};

/// One position of a [`ScriptedGame`].
#[derive(Debug, Clone)]
pub struct ScriptedNode {
    pub player: u8,
    pub moves: Vec<(u8, usize)>,
    pub winner: u8,
}

/// A game given as an explicit table of positions. States are indices into
/// the table; position 0 is the start.
#[derive(Debug, Clone)]
pub struct ScriptedGame {
    nodes: Vec<ScriptedNode>,
}

/// A position where `player` chooses among `moves` as (action, next position).
pub fn turn(player: u8, moves: &[(u8, usize)]) -> ScriptedNode {
    ScriptedNode {
        player,
        moves: moves.to_vec(),
        winner: ONGOING,
    }
}

/// A finished position; `winner` uses the game_utils encoding (3 = draw).
pub fn end(winner: u8) -> ScriptedNode {
    ScriptedNode {
        player: 1,
        moves: Vec::new(),
        winner,
    }
}

impl ScriptedGame {
    pub fn new(nodes: Vec<ScriptedNode>) -> Self {
        Self { nodes }
    }

    /// Player 1 to move: action 0 wins at once, actions 1 and 2 lose at once.
    pub fn win_in_one() -> Self {
        Self::new(vec![turn(1, &[(0, 1), (1, 2), (2, 2)]), end(1), end(2)])
    }

    /// Player 1 has exactly one legal action, which draws.
    pub fn single_action() -> Self {
        Self::new(vec![turn(1, &[(7, 1)]), end(3)])
    }

    /// Two plies deep. After action 0 every reply by player 2 loses; after
    /// action 1 player 2 can win with reply 0.
    pub fn safe_and_risky() -> Self {
        Self::new(vec![
            turn(1, &[(0, 1), (1, 2)]),
            turn(2, &[(0, 3), (1, 3)]),
            turn(2, &[(0, 4), (1, 3)]),
            end(1),
            end(2),
        ])
    }

    /// The start position is already over.
    pub fn finished() -> Self {
        Self::new(vec![end(1)])
    }

    /// A single action that loops back forever.
    pub fn endless() -> Self {
        Self::new(vec![turn(1, &[(0, 0)])])
    }

    /// Not over, yet nothing is legal.
    pub fn stalled() -> Self {
        Self::new(vec![turn(1, &[])])
    }
}

impl Board for ScriptedGame {
    type State = usize;
    type Action = u8;
    type Player = u8;

    fn is_ended(&self, state: &usize) -> bool {
        self.nodes[*state].winner != ONGOING
    }

    fn legal_actions(&self, state: &usize) -> Vec<u8> {
        self.nodes[*state].moves.iter().map(|(a, _)| *a).collect()
    }

    fn next_state(&self, state: &usize, action: &u8) -> usize {
        self.nodes[*state]
            .moves
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, next)| *next)
            .expect("scripted move must be legal")
    }

    fn current_player(&self, state: &usize) -> u8 {
        self.nodes[*state].player
    }

    fn points_values(&self, state: &usize) -> Option<Points<u8>> {
        points_for_winner(self.nodes[*state].winner)
    }
}
