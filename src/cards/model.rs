//! Bingo card data model.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::CardError;

/// Cells per row and column.
pub const GRID_SIZE: usize = 5;

/// Total cells on a card.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Logical index of the center cell.
pub const FREE_SPACE_INDEX: usize = CELL_COUNT / 2;

/// Number of terms a card consumes.
pub const TERMS_PER_CARD: usize = CELL_COUNT - 1;

/// Default label of the center cell.
pub const DEFAULT_FREE_SPACE: &str = "FREE SPACE";

/// A 5×5 bingo card, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BingoCard {
    cells: Vec<String>,
}

impl BingoCard {
    /// Build a card from the first 24 terms in a random order, with
    /// `free_space` in the center.
    pub fn generate<R: Rng + ?Sized>(
        terms: &[String],
        free_space: &str,
        rng: &mut R,
    ) -> Result<Self, CardError> {
        if terms.len() < TERMS_PER_CARD {
            return Err(CardError::NotEnoughTerms {
                needed: TERMS_PER_CARD,
                got: terms.len(),
            });
        }

        let mut picked: Vec<String> = terms[..TERMS_PER_CARD].to_vec();
        picked.shuffle(rng);
        picked.insert(FREE_SPACE_INDEX, free_space.to_string());

        Ok(Self { cells: picked })
    }

    /// All 25 cells, row-major.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Cells grouped into rows of five.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(GRID_SIZE)
    }

    /// Label of the center cell.
    pub fn free_space(&self) -> &str {
        &self.cells[FREE_SPACE_INDEX]
    }

    /// The 24 cells that hold terms.
    pub fn terms(&self) -> impl Iterator<Item = &String> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != FREE_SPACE_INDEX)
            .map(|(_, cell)| cell)
    }
}
