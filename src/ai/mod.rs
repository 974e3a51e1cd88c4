pub mod policy;
pub mod weights;

pub use policy::{Difficulty, HeuristicSelector, MoveSelector};
