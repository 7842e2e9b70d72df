mod card;
mod deck;
mod rules;

pub use card::*;
pub use deck::*;
pub use rules::*;
