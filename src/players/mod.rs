pub mod base;
pub mod dumb;
pub mod random;

pub use base::BasePlayer;
pub use dumb::DumbPlayer;
pub use random::RandomPlayer;
