use rand::Rng;
use rand::seq::SliceRandom;

/// A draw pile and a discard pile of card handles.
///
/// The top of the draw pile is the end of the vector; the bottom is index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck<Id> {
    draw_pile: Vec<Id>,
    discard_pile: Vec<Id>,
}

impl<Id> Default for Deck<Id> {
    fn default() -> Self {
        Self {
            draw_pile: Vec::new(),
            discard_pile: Vec::new(),
        }
    }
}

impl<Id: Copy> Deck<Id> {
    pub fn new(draw_pile: Vec<Id>) -> Self {
        Self {
            draw_pile,
            discard_pile: Vec::new(),
        }
    }

    pub fn from_piles(draw_pile: Vec<Id>, discard_pile: Vec<Id>) -> Self {
        Self {
            draw_pile,
            discard_pile,
        }
    }

    pub fn draw_pile(&self) -> &[Id] {
        &self.draw_pile
    }

    pub fn discard_pile(&self) -> &[Id] {
        &self.discard_pile
    }

    pub fn draw(&mut self) -> Option<Id> {
        self.draw_pile.pop()
    }

    pub fn draw_bottom(&mut self) -> Option<Id> {
        if self.draw_pile.is_empty() {
            None
        } else {
            Some(self.draw_pile.remove(0))
        }
    }

    pub fn discard(&mut self, card: Id) {
        self.discard_pile.push(card);
    }

    pub fn shuffle_draw_pile(&mut self, rng: &mut impl Rng) {
        self.draw_pile.shuffle(rng);
    }

    /// Turns the shuffled discard pile into the draw pile. Returns the number of cards moved.
    pub fn reshuffle_discard_into_draw(&mut self, rng: &mut impl Rng) -> usize {
        let mut recycled = std::mem::take(&mut self.discard_pile);
        recycled.shuffle(rng);
        let moved = recycled.len();
        self.draw_pile.extend(recycled);
        moved
    }

    /// Shuffles the discard pile and stacks it on top of the draw pile, so those
    /// cards come up next. Returns the number of cards moved.
    pub fn intensify(&mut self, rng: &mut impl Rng) -> usize {
        self.reshuffle_discard_into_draw(rng)
    }
}
