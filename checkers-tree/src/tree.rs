//! Statistical game tree
//!
//! Every node is a position reached by a recorded move sequence. Nodes store
//! the average number of pieces each side went on to lose from that position,
//! aggregated over the games that passed through it.
//!
//! ## Architecture
//! - Level 2: Insertion (insert_sequence, build_from_corpus, build_skipping_invalid)
//! - Level 3: Statistics (update_statistics)
//! - Level 4: Lookup and inspection (find_child_by_move, follow, line, render)

use std::fmt::Write as _;

use checkers_core::{Move, RecordedMove, Side};
use tracing::warn;

use crate::error::TreeError;

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the game tree
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    /// Side to move once this node's move has been played
    pub side_to_move: Side,
    /// Move that led to this node (None for root)
    pub mv: Option<Move>,
    /// Expected white pieces lost from here on
    pub lost_white: f64,
    /// Expected black pieces lost from here on
    pub lost_black: f64,
    /// Parent node (None for root)
    pub parent: Option<NodeId>,
    /// Children in insertion order, unique by move
    pub children: Vec<NodeId>,
}

impl TreeNode {
    fn new(side_to_move: Side, mv: Option<Move>, parent: Option<NodeId>) -> Self {
        Self {
            side_to_move,
            mv,
            lost_white: 0.0,
            lost_black: 0.0,
            parent,
            children: Vec::new(),
        }
    }

    /// Expected losses for `side`
    pub fn lost(&self, side: Side) -> f64 {
        match side {
            Side::White => self.lost_white,
            Side::Black => self.lost_black,
        }
    }

    fn set_lost(&mut self, side: Side, value: f64) {
        match side {
            Side::White => self.lost_white = value,
            Side::Black => self.lost_black = value,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether the move into this node captured a piece
    pub fn is_capture(&self) -> bool {
        self.mv.map_or(false, |mv| mv.is_capture())
    }
}

// ============================================================================
// GAME TREE (Level 2 - Insertion)
// ============================================================================

/// Move-indexed tree of historical outcomes with arena allocation
#[derive(Clone, Debug, PartialEq)]
pub struct GameTree {
    nodes: Vec<TreeNode>,
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new(Side::White)
    }
}

impl GameTree {
    /// Empty tree whose root has `first_mover` to move
    pub fn new(first_mover: Side) -> Self {
        Self {
            nodes: vec![TreeNode::new(first_mover, None, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push_child(&mut self, parent: NodeId, mv: Move, side_to_move: Side) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::new(side_to_move, Some(mv), Some(parent)));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Insert a full game.
    ///
    /// Existing prefixes are shared; the remainder becomes a new chain whose
    /// nodes take the side of the next recorded mover (the opponent of the
    /// last mover at the end). Statistics are then recomputed from the end of
    /// the new chain up to the root. The whole sequence is checked against the
    /// existing nodes first, so a mismatch leaves the tree untouched.
    pub fn insert_sequence(&mut self, moves: &[RecordedMove]) -> Result<(), TreeError> {
        let mut current = self.root();
        let mut branch = None;

        for (index, recorded) in moves.iter().enumerate() {
            let expected = self.get(current).side_to_move;
            if recorded.side != expected {
                return Err(TreeError::MoverMismatch {
                    index,
                    expected,
                    found: recorded.side,
                    mv: recorded.mv,
                });
            }
            match self.find_child_by_move(current, &recorded.mv) {
                Some(child) => current = child,
                None => {
                    branch = Some(index);
                    break;
                }
            }
        }

        let Some(start) = branch else {
            return Ok(());
        };

        for index in start..moves.len() {
            let side_after = match moves.get(index + 1) {
                Some(next) => next.side,
                None => moves[index].side.opponent(),
            };
            current = self.push_child(current, moves[index].mv, side_after);
        }

        let mut cursor = Some(current);
        while let Some(id) = cursor {
            self.update_statistics(id);
            cursor = self.get(id).parent;
        }
        Ok(())
    }

    // ========================================================================
    // Level 3: Statistics
    // ========================================================================

    /// Recompute one node from its children.
    ///
    /// The mover's own loss is the mean of the children's; the opponent's is
    /// the mean of the children's plus one for every capturing child. Leaves
    /// keep zero.
    pub fn update_statistics(&mut self, id: NodeId) {
        let node = self.get(id);
        if node.is_leaf() {
            return;
        }

        let mover = node.side_to_move;
        let count = node.children.len() as f64;
        let mut own = 0.0;
        let mut opponent = 0.0;
        for &child_id in &node.children {
            let child = self.get(child_id);
            own += child.lost(mover);
            opponent += child.lost(mover.opponent()) + if child.is_capture() { 1.0 } else { 0.0 };
        }

        let node = self.get_mut(id);
        node.set_lost(mover, own / count);
        node.set_lost(mover.opponent(), opponent / count);
    }

    // ========================================================================
    // Level 4: Lookup
    // ========================================================================

    /// Child of `id` reached by `mv`
    pub fn find_child_by_move(&self, id: NodeId, mv: &Move) -> Option<NodeId> {
        self.get(id)
            .children
            .iter()
            .copied()
            .find(|&child| self.get(child).mv.as_ref() == Some(mv))
    }

    /// Node reached from the root by playing `moves`
    pub fn follow<'a, I>(&self, moves: I) -> Option<NodeId>
    where
        I: IntoIterator<Item = &'a Move>,
    {
        moves
            .into_iter()
            .try_fold(self.root(), |node, mv| self.find_child_by_move(node, mv))
    }

    /// Whether the whole sequence is a path from the root with matching movers
    pub fn contains_sequence(&self, moves: &[RecordedMove]) -> bool {
        let mut current = self.root();
        for recorded in moves {
            if self.get(current).side_to_move != recorded.side {
                return false;
            }
            match self.find_child_by_move(current, &recorded.mv) {
                Some(child) => current = child,
                None => return false,
            }
        }
        true
    }

    /// Recorded moves from the root down to `id`
    pub fn line(&self, id: NodeId) -> Vec<RecordedMove> {
        let mut line = Vec::new();
        let mut current = id;
        while let Some(parent) = self.get(current).parent {
            if let Some(mv) = self.get(current).mv {
                line.push(RecordedMove::new(self.get(parent).side_to_move, mv));
            }
            current = parent;
        }
        line.reverse();
        line
    }

    /// Length of the longest path from the root
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root(), 0)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.get(id).children.iter().map(|&child| (child, depth + 1)));
        }
        deepest
    }

    /// Indented dump, one node per line, down to `max_depth` if given
    pub fn render(&self, max_depth: Option<usize>) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.get(id);
            let mv = node.mv.map_or_else(|| "start".to_string(), |mv| mv.to_string());
            let turn = match node.side_to_move {
                Side::White => "White's move",
                Side::Black => "Black's move",
            };
            let _ = writeln!(
                out,
                "{}{}, B: {:.2}, W: {:.2} -> {}",
                "  ".repeat(depth),
                mv,
                node.lost_black,
                node.lost_white,
                turn
            );
            if max_depth.map_or(true, |max| depth < max) {
                stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
            }
        }
        out
    }
}

/// Tree built from a list of games, white to move at the root
pub fn build_from_corpus(games: &[Vec<RecordedMove>]) -> Result<GameTree, TreeError> {
    let mut tree = GameTree::new(Side::White);
    for (game, moves) in games.iter().enumerate() {
        tree.insert_sequence(moves).map_err(|source| TreeError::InvalidGame {
            game,
            source: Box::new(source),
        })?;
    }
    Ok(tree)
}

/// A corpus game left out of the tree
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedGame {
    /// Index of the game in the corpus
    pub game: usize,
    pub error: TreeError,
}

/// Tree built from every game that fits; the others are skipped and reported
pub fn build_skipping_invalid(games: &[Vec<RecordedMove>]) -> (GameTree, Vec<SkippedGame>) {
    let mut tree = GameTree::new(Side::White);
    let mut skipped = Vec::new();
    for (game, moves) in games.iter().enumerate() {
        if let Err(error) = tree.insert_sequence(moves) {
            warn!(game, %error, "skipping game that does not fit the tree");
            skipped.push(SkippedGame { game, error });
        }
    }
    (tree, skipped)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use checkers_core::decode_sequence;

    fn seq(cells: &[&str]) -> Vec<RecordedMove> {
        decode_sequence(cells).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_tree_creation() {
        let tree = GameTree::default();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId::ROOT);
        assert_eq!(tree.get(NodeId::ROOT).side_to_move, Side::White);
        assert!(tree.get(NodeId::ROOT).mv.is_none());
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_walk_reproduces_sequence() {
        let game = seq(&["1b5  a4", "0c2  b3", "1a4b3c2", "0d1  e2"]);
        let mut tree = GameTree::default();
        tree.insert_sequence(&game).unwrap();
        assert_eq!(tree.len(), 5);

        let mut node = tree.root();
        for recorded in &game {
            assert_eq!(tree.get(node).side_to_move, recorded.side);
            node = tree.find_child_by_move(node, &recorded.mv).unwrap();
        }
        assert!(tree.get(node).is_leaf());
        assert_eq!(tree.get(node).side_to_move, Side::White);
        assert_eq!(tree.line(node), game);
    }

    #[test]
    fn test_duplicate_insert_keeps_shape() {
        let game = seq(&["1b5  a4", "0c2  b3"]);
        let mut tree = GameTree::default();
        tree.insert_sequence(&game).unwrap();
        let before = tree.clone();
        tree.insert_sequence(&game).unwrap();
        assert_eq!(tree, before);

        // A prefix of an existing game adds nothing either
        tree.insert_sequence(&game[..1]).unwrap();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_statistics_with_opponent_capture() {
        let mut tree = GameTree::default();
        tree.insert_sequence(&seq(&["1b5  a4", "0a2  b3"])).unwrap();
        tree.insert_sequence(&seq(&["1d5  c4", "0b3c4d5"])).unwrap();

        let root = tree.get(NodeId::ROOT);
        assert!(approx(root.lost_white, 0.5));
        assert!(approx(root.lost_black, 0.0));

        let capture_reply = tree.follow(&[seq(&["1d5  c4"])[0].mv]).unwrap();
        assert!(approx(tree.get(capture_reply).lost_white, 1.0));
        assert!(approx(tree.get(capture_reply).lost_black, 0.0));
    }

    #[test]
    fn test_statistics_average_over_children() {
        let mut tree = GameTree::default();
        tree.insert_sequence(&seq(&["1b5  a4", "0a2  b3"])).unwrap();
        tree.insert_sequence(&seq(&["1d5  c4", "0b3c4d5"])).unwrap();
        tree.insert_sequence(&seq(&["1c4d3e2", "0a2  b3"])).unwrap();

        let root = tree.get(NodeId::ROOT);
        assert_eq!(root.children.len(), 3);
        assert!(approx(root.lost_white, 1.0 / 3.0));
        assert!(approx(root.lost_black, 1.0 / 3.0));
        for &child in &root.children {
            let node = tree.get(child);
            assert!(node.lost_white >= 0.0 && node.lost_white <= 6.0);
            assert!(node.lost_black >= 0.0 && node.lost_black <= 6.0);
        }
    }

    #[test]
    fn test_ancestors_refreshed_after_deep_insert() {
        let mut tree = GameTree::default();
        tree.insert_sequence(&seq(&["1b5  a4", "0a2  b3"])).unwrap();
        // Branches two levels down; the root must see the new capture
        tree.insert_sequence(&seq(&["1b5  a4", "0c2  b3", "1a4b3c2"])).unwrap();

        let after_first = tree.follow(&[seq(&["1b5  a4"])[0].mv]).unwrap();
        let node = tree.get(after_first);
        assert_eq!(node.children.len(), 2);
        // Black to move: its own loss averages (0 + 1) over two children
        assert!(approx(node.lost_black, 0.5));
        assert!(approx(tree.get(NodeId::ROOT).lost_black, 0.5));
    }

    #[test]
    fn test_capture_chain_keeps_mover() {
        let game = seq(&["1e6d5c4", "1c4b3a2", "0f1  e2"]);
        let mut tree = GameTree::default();
        tree.insert_sequence(&game).unwrap();

        let first = tree.follow(&[game[0].mv]).unwrap();
        let second = tree.follow(&[game[0].mv, game[1].mv]).unwrap();
        assert_eq!(tree.get(first).side_to_move, Side::White);
        assert_eq!(tree.get(second).side_to_move, Side::Black);

        assert!(approx(tree.get(first).lost_black, 1.0));
        assert!(approx(tree.get(NodeId::ROOT).lost_black, 2.0));
        assert!(approx(tree.get(NodeId::ROOT).lost_white, 0.0));
    }

    #[test]
    fn test_mover_mismatch_leaves_tree_untouched() {
        let mut tree = GameTree::default();
        tree.insert_sequence(&seq(&["1b5  a4", "0a2  b3"])).unwrap();
        let before = tree.clone();

        let err = tree.insert_sequence(&seq(&["1b5  a4", "1a4  b3"])).unwrap_err();
        assert!(matches!(
            err,
            TreeError::MoverMismatch { index: 1, expected: Side::Black, found: Side::White, .. }
        ));
        assert_eq!(tree, before);

        let err = tree.insert_sequence(&seq(&["0a2  b3"])).unwrap_err();
        assert!(matches!(err, TreeError::MoverMismatch { index: 0, .. }));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_contains_sequence() {
        let game = seq(&["1b5  a4", "0c2  b3", "1a4b3c2"]);
        let tree = build_from_corpus(&[game.clone()]).unwrap();
        assert!(tree.contains_sequence(&game));
        assert!(tree.contains_sequence(&game[..2]));
        assert!(tree.contains_sequence(&[]));
        assert!(!tree.contains_sequence(&seq(&["1d5  c4"])));
        assert!(!tree.contains_sequence(&seq(&["0b5  a4"])));
    }

    #[test]
    fn test_build_from_corpus_reports_game() {
        let games = vec![seq(&["1b5  a4", "0c2  b3"]), seq(&["0c2  b3"])];
        let err = build_from_corpus(&games).unwrap_err();
        assert!(matches!(err, TreeError::InvalidGame { game: 1, .. }));
    }

    #[test]
    fn test_build_skipping_invalid_keeps_the_rest() {
        let games = vec![
            seq(&["1b5  a4", "0c2  b3"]),
            seq(&["0a2  b3", "1b5  a4"]),
            seq(&["1d5  c4", "0c2  d3"]),
        ];
        let (tree, skipped) = build_skipping_invalid(&games);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].game, 1);
        assert!(matches!(skipped[0].error, TreeError::MoverMismatch { index: 0, .. }));

        assert!(tree.contains_sequence(&games[0]));
        assert!(tree.contains_sequence(&games[2]));
        assert_eq!(tree.get(tree.root()).children.len(), 2);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_render_and_depth() {
        let mut tree = GameTree::default();
        tree.insert_sequence(&seq(&["1b5  a4", "0a2  b3"])).unwrap();
        tree.insert_sequence(&seq(&["1d5  c4", "0b3c4d5"])).unwrap();
        assert_eq!(tree.depth(), 2);

        let full = tree.render(None);
        assert_eq!(full.lines().count(), 5);
        assert!(full.starts_with("start, B: 0.00, W: 0.50 -> White's move\n"));
        assert!(full.contains("\n  b5  a4, B: 0.00, W: 0.00 -> Black's move\n"));
        assert!(full.contains("\n    b3c4d5, B: 0.00, W: 0.00 -> White's move\n"));

        let shallow = tree.render(Some(1));
        assert_eq!(shallow.lines().count(), 3);
    }
}
