//! Fixed-step clock and the bobbing motion of the main object.

use crate::config::FloatMotionConfig;

/// Advances by a fixed step per tick, independent of wall time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    time: f64,
    step: f64,
}

impl FrameClock {
    pub fn new(step: f64) -> Self {
        Self { time: 0.0, step }
    }

    pub fn tick(&mut self) -> f64 {
        self.time += self.step;
        self.time
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

/// `base + sin(time * frequency) * amplitude`
pub fn float_height(config: &FloatMotionConfig, time: f64) -> f32 {
    (config.base_height + (time * config.frequency).sin() * config.amplitude) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_steps() {
        let mut clock = FrameClock::new(0.01);
        for _ in 0..100 {
            clock.tick();
        }
        assert!((clock.time() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_float_height() {
        let config = FloatMotionConfig::default();
        assert!((float_height(&config, 0.0) - 0.1).abs() < 1e-6);

        let t = std::f64::consts::FRAC_PI_2 / 1.5;
        assert!((float_height(&config, t) - 0.17).abs() < 1e-6);

        let t = 1.234;
        let expected = 0.1 + (t * 1.5f64).sin() * 0.07;
        assert!((float_height(&config, t) as f64 - expected).abs() < 1e-6);
    }
}
