//! Test RNGs — make message picks predictable.

use casebook_core::rng::DeterministicRng;

/// Always picks the low end of a range, so every pool yields its first
/// message.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// Replays scripted values in order, clamping each into the requested range
/// and starting over when the script runs out.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    script: Vec<u32>,
    cursor: usize,
}

impl SequenceRng {
    /// Script the values to hand out. An empty script behaves like
    /// [`MockRng`].
    #[must_use]
    pub fn new(script: Vec<u32>) -> Self {
        Self { script, cursor: 0 }
    }

    fn next_raw(&mut self) -> Option<u32> {
        let value = *self.script.get(self.cursor % self.script.len().max(1))?;
        self.cursor += 1;
        Some(value)
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.next_raw()
            .map_or(min, |value| value.clamp(min, max.max(min)))
    }

    fn next_f64(&mut self) -> f64 {
        self.next_raw()
            .map_or(0.0, |value| f64::from(value % 100) / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_clamps_and_wraps() {
        let mut rng = SequenceRng::new(vec![7, 1]);

        assert_eq!(rng.next_u32_range(0, 3), 3);
        assert_eq!(rng.next_u32_range(0, 3), 1);
        assert_eq!(rng.next_u32_range(2, 5), 5);
        assert_eq!(SequenceRng::new(Vec::new()).next_u32_range(4, 9), 4);
    }
}
