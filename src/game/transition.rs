//! Phase changes reported back to the main loop.
//!
//! The game never flips its own phase selector; it reports the wanted
//! change and the loop applies it, together with the side effects that
//! belong outside the dispatch (round reset, victory flag reset).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    ToMenu,
    ToInstructions,
    ToGameplay,
    ToResults { player_one_victory: bool },
}
