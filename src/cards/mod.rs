//! Bingo cards: term lists, the 5×5 grid and its HTML form.

pub mod html;
pub mod model;
pub mod terms;

pub use html::{CARD_ELEMENT_ID, card_document, sheet_document};
pub use model::{BingoCard, DEFAULT_FREE_SPACE};
