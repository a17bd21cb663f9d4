//! Game State
//!
//! This module defines the capability traits that a game must implement for its states to be
//! tracked by the search tree: [`Game`] identifies the rules object (and in particular the
//! opening player), and [`State`] exposes a position's terminality, winner, and player to move.

/// Identifies one of the two players.
///
/// The crate assumes a two-person game. By convention Alice is the player the engine is
/// evaluating for and Bob is the opponent, but nothing in the tree depends on which is which;
/// the only distinguished role is the game's opener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    /// The first of the two players.
    Alice,
    /// The second of the two players.
    Bob,
}

/// The rules object shared by all states of one game.
pub trait Game {
    /// Returns the player designated to move first (by analogy with chess, "white").
    ///
    /// # Returns
    /// The opening player
    ///
    /// # Note
    /// This function must be implemented.
    fn opener(&self) -> PlayerId;
}

/// A game position as seen by the search tree.
///
/// The tree never inspects the board itself; it only needs to know whether a position is
/// terminal, who (if anyone) has won it, and whose turn it is. Implement this trait for your
/// game's state type to use it with [`SearchTree`](crate::tree::SearchTree).
///
/// # Examples
///
/// ```rust
/// use mcts_tree::state::{Game, PlayerId, State};
///
/// struct CoinGame;
///
/// impl Game for CoinGame {
///     fn opener(&self) -> PlayerId {
///         PlayerId::Alice
///     }
/// }
///
/// // A game that ends as soon as three coins have been taken
/// struct CoinState {
///     game: CoinGame,
///     coins_taken: u8,
/// }
///
/// impl State for CoinState {
///     type Game = CoinGame;
///
///     fn game(&self) -> &CoinGame {
///         &self.game
///     }
///
///     fn player(&self) -> PlayerId {
///         if self.coins_taken % 2 == 0 { PlayerId::Alice } else { PlayerId::Bob }
///     }
///
///     fn winner(&self) -> Option<PlayerId> {
///         // Whoever takes the third coin wins
///         self.is_terminal().then_some(PlayerId::Alice)
///     }
///
///     fn is_terminal(&self) -> bool {
///         self.coins_taken >= 3
///     }
/// }
///
/// let opening = CoinState { game: CoinGame, coins_taken: 0 };
/// assert!(!opening.is_terminal());
/// assert_eq!(opening.player(), opening.game().opener());
///
/// let finished = CoinState { game: CoinGame, coins_taken: 3 };
/// assert!(finished.is_terminal());
/// assert_eq!(finished.winner(), Some(PlayerId::Alice));
/// ```
pub trait State {
    /// The rules object type for this game.
    type Game: Game;

    /// Returns the game this state belongs to.
    fn game(&self) -> &Self::Game;

    /// Returns the player to move at this state.
    fn player(&self) -> PlayerId;

    /// Returns the winner of a decided terminal state, or `None` for a draw or an unfinished
    /// game.
    fn winner(&self) -> Option<PlayerId>;

    /// Returns `true` if the game is over at this state.
    fn is_terminal(&self) -> bool;
}
