use crate::error::{Result, SimError};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shared::{check_probability, Position, RngState};

/// The single seeded stream behind every stochastic decision
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Resume a stream captured with [`RandomSource::state`]
    pub fn from_state(state: &RngState) -> Self {
        let mut rng = ChaCha8Rng::from_seed(state.seed);
        rng.set_stream(state.stream);
        rng.set_word_pos(state.word_pos());
        Self { rng }
    }

    pub fn state(&self) -> RngState {
        RngState {
            seed: self.rng.get_seed(),
            stream: self.rng.get_stream(),
            word_pos_hi: 0,
            word_pos_lo: 0,
        }
        .with_word_pos(self.rng.get_word_pos())
    }

    pub fn choose_one<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T> {
        items.choose(&mut self.rng).ok_or(SimError::EmptySequence)
    }

    /// Bernoulli draw with the given probability
    pub fn chance(&mut self, probability: f64) -> Result<bool> {
        check_probability("probability", probability)?;
        Ok(self.rng.gen_bool(probability))
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Uniform cell on a `width` x `height` grid
    pub fn position(&mut self, width: usize, height: usize) -> Result<Position> {
        if width == 0 || height == 0 {
            return Err(SimError::EmptySequence);
        }
        let x = self.rng.gen_range(0..width);
        let y = self.rng.gen_range(0..height);
        Ok(Position::new(x, y))
    }
}
