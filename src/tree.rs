//! Monte Carlo Search Tree
//!
//! This module provides the bookkeeping half of an MCTS player: a [`SearchTree`] that owns the
//! node structure in an arena, and the per-node statistics ([`TreeNode`]) that an external
//! search driver reads and updates as it runs the selection, expansion, simulation, and
//! back-propagation phases. The driver itself (UCT selection, rollouts, move generation) lives
//! in game-specific code.

use indextree::{Arena, NodeId};

use crate::state::{Game, State};

/// Points credited to a leaf whose game has a decided winner.
const WIN_SCORE: i32 = 2;
/// Points credited to a leaf whose game ended in a draw.
const DRAW_SCORE: i32 = 1;

/// Errors reported by the search tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// An expansion was attempted with no state to wrap. This signals a bug in the search
    /// driver rather than a recoverable condition.
    #[error("empty state added")]
    EmptyState,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TreeError>;

/// The statistics kept for one position in the search tree
///
/// A node wraps the game state it represents together with two counters: `playouts`, the number
/// of simulations folded into the node, and `wins`, the aggregate score of those simulations
/// (a decided win is worth [`WIN_SCORE`] points and a draw [`DRAW_SCORE`]). For a leaf the
/// counters are fixed at construction; for an interior node they start at zero and are
/// maintained by the driver, either one playout at a time or wholesale through
/// [`SearchTree::back_propagate`].
///
/// Nodes cannot be constructed standalone; they are created by [`SearchTree::new`] (the root)
/// and [`SearchTree::add_child`] (everything else), which keep the parent/child links
/// consistent.
///
/// # Type Parameters
/// * `S` - Game state type
pub struct TreeNode<S>
where
    S: State,
{
    /// The game state represented by this node, fixed at construction
    state: S,
    /// Aggregate score of the simulations folded into this node
    wins: i32,
    /// Number of simulations folded into this node
    playouts: i32,
}

impl<S> TreeNode<S>
where
    S: State,
{
    // Creates a new node wrapping the given state.
    //
    // A terminal state makes the node a leaf, and a leaf's statistics are computed here, once:
    // one playout, scored WIN_SCORE if the state has a winner and DRAW_SCORE otherwise. A
    // non-terminal node starts with both counters at zero.
    fn new(state: S) -> Self {
        let (wins, playouts) = if state.is_terminal() {
            let score = if state.winner().is_some() { WIN_SCORE } else { DRAW_SCORE };
            (score, 1)
        } else {
            (0, 0)
        };
        Self { state, wins, playouts }
    }

    /// Returns `true` if this node is a leaf node (in which case no further exploration is
    /// possible). A node is a leaf exactly when its state is terminal.
    pub fn is_leaf(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns the game state this node represents.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Returns `true` if the player to move at this node is the game's opening player.
    ///
    /// By analogy with chess, the opener is "white"; this assumes a two-player game.
    pub fn is_opening_player_move(&self) -> bool {
        self.state.player() == self.state.game().opener()
    }

    /// Returns the aggregate score for this node. A win is worth 2 points and a draw 1 point.
    pub fn wins(&self) -> i32 {
        self.wins
    }

    /// Overwrites the aggregate score.
    ///
    /// # Note
    /// No validation is performed; keeping the counters consistent with the aggregation
    /// protocol is the driver's responsibility.
    pub fn set_wins(&mut self, wins: i32) {
        self.wins = wins;
    }

    /// Returns the number of playouts folded into this node. A leaf has a playouts value of 1.
    pub fn playouts(&self) -> i32 {
        self.playouts
    }

    /// Overwrites the playout count.
    ///
    /// # Note
    /// No validation is performed; keeping the counters consistent with the aggregation
    /// protocol is the driver's responsibility.
    pub fn set_playouts(&mut self, playouts: i32) {
        self.playouts = playouts;
    }

    /// Adds one playout to this node's count.
    pub fn increment_playouts(&mut self) {
        self.playouts += 1;
    }

    /// Adjusts the aggregate score by `wins`, which may be negative.
    pub fn add_wins(&mut self, wins: i32) {
        self.wins += wins;
    }
}

/// An MCTS search tree over states of the game `S`
///
/// The tree owns every node in an arena; nodes are addressed by [`NodeId`] handles, and the
/// parent/child structure is kept in the arena's links rather than in the nodes themselves, so
/// a child never holds an ownership claim on its parent. Children are kept in insertion order.
///
/// # Type Parameters
/// * `S` - Game state type
///
/// # Examples
///
/// ```rust
/// # use mcts_tree::state::{Game, PlayerId, State};
/// # use mcts_tree::tree::SearchTree;
/// # struct TestGame;
/// # impl Game for TestGame {
/// #     fn opener(&self) -> PlayerId { PlayerId::Alice }
/// # }
/// # #[derive(Clone)]
/// # struct TestState { terminal: bool }
/// # impl State for TestState {
/// #     type Game = TestGame;
/// #     fn game(&self) -> &TestGame { &TestGame }
/// #     fn player(&self) -> PlayerId { PlayerId::Alice }
/// #     fn winner(&self) -> Option<PlayerId> { None }
/// #     fn is_terminal(&self) -> bool { self.terminal }
/// # }
/// let mut tree = SearchTree::new(TestState { terminal: false });
/// let child = tree.add_child(tree.root(), Some(TestState { terminal: true }))?;
///
/// assert_eq!(tree.parent(child), Some(tree.root()));
/// assert!(tree.node(child).is_leaf());
/// # Ok::<(), mcts_tree::TreeError>(())
/// ```
pub struct SearchTree<S>
where
    S: State,
{
    /// The arena holding every node of the tree
    arena: Arena<TreeNode<S>>,
    /// The node the search starts from
    root: NodeId,
}

impl<S> SearchTree<S>
where
    S: State,
{
    /// Creates a tree whose root wraps the given state.
    ///
    /// # Arguments
    /// * `state` - The game state the search starts from
    pub fn new(state: S) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(TreeNode::new(state));
        Self { arena, root }
    }

    /// Returns the root node's id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.arena.count()
    }

    /// Returns `true` if the tree holds no nodes. Always `false` in practice, since the root
    /// is created with the tree.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &TreeNode<S> {
        self.arena[id].get()
    }

    /// Returns the node with the given id, mutably.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn node_mut(&mut self, id: NodeId) -> &mut TreeNode<S> {
        self.arena[id].get_mut()
    }

    /// Returns the children of a node in insertion order.
    ///
    /// The returned ids stay valid across later expansions, but the driver may append further
    /// children at any time, so callers must not assume the collection is complete.
    ///
    /// # Arguments
    /// * `id` - The node whose children are wanted
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Returns the parent of a node, or `None` for the root (or a detached node).
    ///
    /// # Arguments
    /// * `id` - The node whose parent is wanted
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    /// Moves a node (and its subtree) under a new parent.
    ///
    /// Re-parenting is not part of the normal search protocol, but it is not prevented either;
    /// the node is detached from its current position and appended to the new parent's
    /// children.
    ///
    /// # Arguments
    /// * `child` - The node to move
    /// * `new_parent` - The node to attach it under
    pub fn set_parent(&mut self, child: NodeId, new_parent: NodeId) {
        child.detach(&mut self.arena);
        new_parent.append(child, &mut self.arena);
    }

    /// Adds a child to a node during the expansion phase.
    ///
    /// The new node wraps `state` (computing leaf statistics if the state is terminal), its
    /// parent link is set to `id`, and it is appended to `id`'s children.
    ///
    /// # Arguments
    /// * `id` - The node being expanded
    /// * `state` - The state for the new child, as produced by the driver's move generation
    ///
    /// # Returns
    /// The new child's id, or [`TreeError::EmptyState`] if `state` is `None`. On failure the
    /// children of `id` are left untouched.
    pub fn add_child(&mut self, id: NodeId, state: Option<S>) -> Result<NodeId> {
        let state = state.ok_or(TreeError::EmptyState)?;
        let child = self.arena.new_node(TreeNode::new(state));
        id.append(child, &mut self.arena);
        log::trace!("[SearchTree] expanded {:?} with child {:?}", id, child);
        Ok(child)
    }

    /// Sets a node's wins and playouts from its children's statistics.
    ///
    /// Both counters are overwritten with the sums over the direct children; any prior value is
    /// discarded, so calling this twice in a row is stable rather than doubling. The
    /// aggregation is deliberately single-level: it neither recurses into grandchildren nor
    /// walks up to the ancestors. The driver is expected to call this at each node on the path
    /// from a newly simulated leaf back to the root.
    ///
    /// # Arguments
    /// * `id` - The node to update
    pub fn back_propagate(&mut self, id: NodeId) {
        let mut wins = 0;
        let mut playouts = 0;
        let mut child_count = 0;
        for child_id in id.children(&self.arena) {
            let child = self.arena[child_id].get();
            wins += child.wins;
            playouts += child.playouts;
            child_count += 1;
        }

        let node = self.arena[id].get_mut();
        node.wins = wins;
        node.playouts = playouts;

        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "[SearchTree] back_propagate {:?}: wins={} playouts={} over {} children",
                id,
                wins,
                playouts,
                child_count
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Game, PlayerId};
    use assert_matches::assert_matches;

    // Test implementations for testing
    #[derive(Debug, Clone, Copy)]
    struct TestGame {
        opener: PlayerId,
    }

    impl Game for TestGame {
        fn opener(&self) -> PlayerId {
            self.opener
        }
    }

    #[derive(Debug, Clone)]
    struct TestGameState {
        game: TestGame,
        player: PlayerId,
        winner: Option<PlayerId>,
        terminal: bool,
    }

    impl State for TestGameState {
        type Game = TestGame;

        fn game(&self) -> &TestGame {
            &self.game
        }

        fn player(&self) -> PlayerId {
            self.player
        }

        fn winner(&self) -> Option<PlayerId> {
            self.winner
        }

        fn is_terminal(&self) -> bool {
            self.terminal
        }
    }

    // An undecided mid-game state with the given player to move. Alice is the opener.
    fn open_state(player: PlayerId) -> TestGameState {
        TestGameState {
            game: TestGame { opener: PlayerId::Alice },
            player,
            winner: None,
            terminal: false,
        }
    }

    // A terminal state won by the given player
    fn won_state(winner: PlayerId) -> TestGameState {
        TestGameState {
            winner: Some(winner),
            terminal: true,
            ..open_state(PlayerId::Alice)
        }
    }

    // A terminal state with no winner
    fn drawn_state() -> TestGameState {
        TestGameState {
            terminal: true,
            ..open_state(PlayerId::Alice)
        }
    }

    #[test]
    fn test_decisive_leaf_scores_two_points() {
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        let leaf = tree.add_child(tree.root(), Some(won_state(PlayerId::Bob))).unwrap();

        assert_eq!(tree.node(leaf).wins(), 2);
        assert_eq!(tree.node(leaf).playouts(), 1);
    }

    #[test]
    fn test_drawn_leaf_scores_one_point() {
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        let leaf = tree.add_child(tree.root(), Some(drawn_state())).unwrap();

        assert_eq!(tree.node(leaf).wins(), 1);
        assert_eq!(tree.node(leaf).playouts(), 1);
    }

    #[test]
    fn test_non_terminal_node_starts_with_no_statistics() {
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        let child = tree.add_child(tree.root(), Some(open_state(PlayerId::Bob))).unwrap();

        assert_eq!(tree.node(tree.root()).wins(), 0);
        assert_eq!(tree.node(tree.root()).playouts(), 0);
        assert_eq!(tree.node(child).wins(), 0);
        assert_eq!(tree.node(child).playouts(), 0);
    }

    #[test]
    fn test_add_child_rejects_empty_state() {
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        tree.add_child(tree.root(), Some(open_state(PlayerId::Bob))).unwrap();
        let before = tree.children(tree.root()).count();

        let result = tree.add_child(tree.root(), None);

        assert_matches!(result, Err(TreeError::EmptyState));
        assert_eq!(tree.children(tree.root()).count(), before);
    }

    #[test]
    fn test_add_child_links_child_to_parent() {
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        let root = tree.root();

        let first = tree.add_child(root, Some(open_state(PlayerId::Bob))).unwrap();
        assert_eq!(tree.children(root).count(), 1);

        let second = tree.add_child(root, Some(open_state(PlayerId::Bob))).unwrap();
        assert_eq!(tree.children(root).count(), 2);

        assert_eq!(tree.parent(first), Some(root));
        assert_eq!(tree.parent(second), Some(root));
        assert_eq!(tree.parent(root), None);

        // Children come back in insertion order
        let children: Vec<NodeId> = tree.children(root).collect();
        assert_eq!(children, vec![first, second]);
    }

    #[test]
    fn test_back_propagate_sums_direct_children() {
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        let root = tree.root();

        let stats = [(2, 1), (1, 1), (1, 2)];
        for (wins, playouts) in stats {
            let child = tree.add_child(root, Some(open_state(PlayerId::Bob))).unwrap();
            tree.node_mut(child).set_wins(wins);
            tree.node_mut(child).set_playouts(playouts);
        }

        tree.back_propagate(root);

        assert_eq!(tree.node(root).wins(), 4);
        assert_eq!(tree.node(root).playouts(), 4);
    }

    #[test]
    fn test_back_propagate_overwrites_prior_totals() {
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        let root = tree.root();
        let child = tree.add_child(root, Some(won_state(PlayerId::Alice))).unwrap();
        assert_eq!(tree.node(child).playouts(), 1);

        // A stale total on the node must not leak into the result
        tree.node_mut(root).set_wins(99);
        tree.node_mut(root).set_playouts(99);

        tree.back_propagate(root);
        assert_eq!(tree.node(root).wins(), 2);
        assert_eq!(tree.node(root).playouts(), 1);

        // Calling again is stable, not doubling
        tree.back_propagate(root);
        assert_eq!(tree.node(root).wins(), 2);
        assert_eq!(tree.node(root).playouts(), 1);
    }

    #[test]
    fn test_leaf_tracks_state_terminality() {
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        let root = tree.root();
        assert!(!tree.node(root).is_leaf());

        let leaf = tree.add_child(root, Some(drawn_state())).unwrap();
        assert!(tree.node(leaf).is_leaf());

        // Expanding the root does not change its own terminality
        assert!(!tree.node(root).is_leaf());
    }

    #[test]
    fn test_opening_player_move_follows_the_opener() {
        let tree = SearchTree::new(open_state(PlayerId::Alice));
        assert!(tree.node(tree.root()).is_opening_player_move());

        let tree = SearchTree::new(open_state(PlayerId::Bob));
        assert!(!tree.node(tree.root()).is_opening_player_move());
    }

    #[test]
    fn test_counter_mutators() {
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        let root = tree.root();

        for _ in 0..3 {
            tree.node_mut(root).increment_playouts();
        }
        assert_eq!(tree.node(root).playouts(), 3);

        tree.node_mut(root).add_wins(5);
        tree.node_mut(root).add_wins(-2);
        assert_eq!(tree.node(root).wins(), 3);

        tree.node_mut(root).set_playouts(10);
        tree.node_mut(root).set_wins(7);
        assert_eq!(tree.node(root).playouts(), 10);
        assert_eq!(tree.node(root).wins(), 7);
    }

    #[test]
    fn test_set_parent_moves_subtree() {
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        let root = tree.root();
        let first = tree.add_child(root, Some(open_state(PlayerId::Bob))).unwrap();
        let second = tree.add_child(root, Some(open_state(PlayerId::Bob))).unwrap();

        tree.set_parent(second, first);

        assert_eq!(tree.parent(second), Some(first));
        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![first]);
        assert_eq!(tree.children(first).collect::<Vec<_>>(), vec![second]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_expansion_then_staged_aggregation() {
        // Expand a root three ways, give the middle child a decisive leaf, and check that
        // statistics only move when back_propagate is invoked on each node in turn.
        let mut tree = SearchTree::new(open_state(PlayerId::Alice));
        let root = tree.root();

        let left = tree.add_child(root, Some(open_state(PlayerId::Bob))).unwrap();
        let middle = tree.add_child(root, Some(open_state(PlayerId::Bob))).unwrap();
        let right = tree.add_child(root, Some(open_state(PlayerId::Bob))).unwrap();

        let leaf = tree.add_child(middle, Some(won_state(PlayerId::Alice))).unwrap();
        assert_eq!(tree.node(leaf).wins(), 2);
        assert_eq!(tree.node(leaf).playouts(), 1);

        tree.back_propagate(middle);
        assert_eq!(tree.node(middle).wins(), 2);
        assert_eq!(tree.node(middle).playouts(), 1);

        // The root is untouched until the driver walks up to it
        assert_eq!(tree.node(root).wins(), 0);
        assert_eq!(tree.node(root).playouts(), 0);
        assert_eq!(tree.node(left).playouts(), 0);
        assert_eq!(tree.node(right).playouts(), 0);

        tree.back_propagate(root);
        assert_eq!(tree.node(root).wins(), 2);
        assert_eq!(tree.node(root).playouts(), 1);
    }
}
