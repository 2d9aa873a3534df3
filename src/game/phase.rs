//! The phase selector the orchestrator dispatches on.

/// The four presentation phases of the game.
///
/// The selector is read once per frame by the dispatch and only mutated
/// between frames by the main loop. `Menu` doubles as the default, so a
/// freshly built selector always renders the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Menu,
    Instructions,
    Gameplay,
    Results,
}
