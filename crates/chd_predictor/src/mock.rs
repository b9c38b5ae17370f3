use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chd_model::{PredictError, PredictionResult, RiskInput};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::PredictorGateway;

/// Stand-in predictor: waits, then draws a uniform probability.
pub struct MockGateway {
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl MockGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(delay: Duration, seed: u64) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self) -> Result<f64, PredictError> {
        match self.rng.lock() {
            Ok(mut rng) => Ok(rng.gen_range(0.0..=1.0)),
            Err(_) => Err(PredictError::Transport("mock generator unavailable".to_string())),
        }
    }
}

impl PredictorGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn predict(&self, _input: &RiskInput) -> Result<PredictionResult, PredictError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let probability = self.draw()?;
        debug!("mock drew probability {probability:.4}");
        Ok(PredictionResult::from_probability(probability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_draws() {
        let a = MockGateway::seeded(Duration::ZERO, 7);
        let b = MockGateway::seeded(Duration::ZERO, 7);
        for _ in 0..5 {
            assert_eq!(a.draw().unwrap(), b.draw().unwrap());
        }
    }
}
