//! MCTS Search Tree
//!
//! This crate provides the tree bookkeeping needed to implement a Monte Carlo Tree Search
//! player for two-person games: an arena-backed [`SearchTree`] of [`TreeNode`]s, each carrying
//! the win/playout statistics that guide the search.
//!
//! The search driver itself is out of scope. Selection (e.g. UCT), rollout simulation, and
//! move generation are game-specific concerns; this crate gives them a tree to read and
//! update.
//!
//! ## Key Integration Points
//!
//! 1. **Implement [`Game`]**: Names the opening player for your game
//! 2. **Implement [`State`]**: Exposes a position's terminality, winner, and player to move
//! 3. **Use [`SearchTree::add_child`]**: Grows the tree during the expansion phase
//! 4. **Use [`SearchTree::back_propagate`]** (with [`TreeNode::increment_playouts`] and
//!    [`TreeNode::add_wins`]): Folds simulation results back into the tree
//! 5. **Use [`SearchTree::children`]** with [`TreeNode::wins`] and [`TreeNode::playouts`]:
//!    Drives the selection phase
//!
//! ## Example
//!
//! ```rust
//! use mcts_tree::{Game, PlayerId, SearchTree, State};
//!
//! // Tic-tac-toe, with Alice playing X and moving first
//! #[derive(Clone)]
//! struct TicTacToe;
//!
//! impl Game for TicTacToe {
//!     fn opener(&self) -> PlayerId {
//!         PlayerId::Alice
//!     }
//! }
//!
//! const LINES: [[usize; 3]; 8] = [
//!     [0, 1, 2], [3, 4, 5], [6, 7, 8], // rows
//!     [0, 3, 6], [1, 4, 7], [2, 5, 8], // columns
//!     [0, 4, 8], [2, 4, 6],            // diagonals
//! ];
//!
//! #[derive(Clone)]
//! struct Board {
//!     game: TicTacToe,
//!     cells: [Option<PlayerId>; 9],
//!     to_move: PlayerId,
//! }
//!
//! impl Board {
//!     fn new() -> Self {
//!         Board { game: TicTacToe, cells: [None; 9], to_move: PlayerId::Alice }
//!     }
//!
//!     // Returns the position after the player to move takes the given cell
//!     fn play(&self, cell: usize) -> Self {
//!         let mut next = self.clone();
//!         next.cells[cell] = Some(self.to_move);
//!         next.to_move = match self.to_move {
//!             PlayerId::Alice => PlayerId::Bob,
//!             PlayerId::Bob => PlayerId::Alice,
//!         };
//!         next
//!     }
//! }
//!
//! impl State for Board {
//!     type Game = TicTacToe;
//!
//!     fn game(&self) -> &TicTacToe {
//!         &self.game
//!     }
//!
//!     fn player(&self) -> PlayerId {
//!         self.to_move
//!     }
//!
//!     fn winner(&self) -> Option<PlayerId> {
//!         LINES.iter().find_map(|line| {
//!             let owner = self.cells[line[0]]?;
//!             line.iter().all(|&c| self.cells[c] == Some(owner)).then_some(owner)
//!         })
//!     }
//!
//!     fn is_terminal(&self) -> bool {
//!         self.winner().is_some() || self.cells.iter().all(|c| c.is_some())
//!     }
//! }
//!
//! // Expansion: the driver wraps each successor position in a child node
//! let mut tree = SearchTree::new(Board::new());
//! let root = tree.root();
//! let corner = tree.add_child(root, Some(Board::new().play(0)))?;
//! let center = tree.add_child(root, Some(Board::new().play(4)))?;
//!
//! // X has moved, so neither child is an opening-player node
//! assert!(tree.node(root).is_opening_player_move());
//! assert!(!tree.node(corner).is_opening_player_move());
//!
//! // Simulation results are credited by the driver: say the corner line was played out to a
//! // win (2 points) and the center line to a draw (1 point)
//! tree.node_mut(corner).increment_playouts();
//! tree.node_mut(corner).add_wins(2);
//! tree.node_mut(center).increment_playouts();
//! tree.node_mut(center).add_wins(1);
//!
//! // Back-propagation folds the children's statistics into the root
//! tree.back_propagate(root);
//! assert_eq!(tree.node(root).wins(), 3);
//! assert_eq!(tree.node(root).playouts(), 2);
//! # Ok::<(), mcts_tree::TreeError>(())
//! ```

pub mod state;
pub mod tree;

pub use state::{Game, PlayerId, State};
pub use tree::{Result, SearchTree, TreeError, TreeNode};
