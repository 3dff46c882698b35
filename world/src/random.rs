//! Adapters that feed `rand` generators into the simulation.

use forage_core::RandomSource;
use rand::{rngs::ThreadRng, Rng, RngCore};

/// Wraps any `rand` generator as a [`RandomSource`].
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ThreadRng> {
    /// Draws from the thread-local generator seeded by the operating system.
    #[must_use]
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}
