//! Deck selection engine.
//!
//! Picks `size` records from a pool so that each targeted feature column
//! is flagged on close to its target percentage of the deck, while keeping
//! every mandatory record and at least one carrier of every individual
//! feature.
//!
//! The pipeline is: [`build_initial_deck`] seeds a feasible-size deck,
//! then [`DeckRunner`] anneals it with one-for-one swaps ([`neighbor()`]),
//! scored by [`energy()`] and stopped early by [`is_feasible`].

mod builder;
mod deck;
mod energy;
mod feasibility;
mod neighbor;
mod problem;
mod runner;

pub use builder::build_initial_deck;
pub use deck::Deck;
pub use energy::{energy, individuals_present, target_error};
pub use feasibility::{is_feasible, within_tolerance};
pub use neighbor::neighbor;
pub use problem::DeckProblem;
pub use runner::{DeckRunner, SelectionOutcome};
