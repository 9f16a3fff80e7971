use crate::config::{MAGNITUDE_GAIN, MAGNITUDE_MAX, NUM_BARS};
use crate::fft::{find_dft, DFTBase};
use num_complex::Complex32;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// One scaled magnitude per bar.
pub type Spectrum = [f32; NUM_BARS];

/// Latest published spectrum, replaced as a whole array.
pub struct SpectrumBuffer {
    values: Mutex<Spectrum>,
}

impl SpectrumBuffer {
    pub fn new() -> Self {
        Self {
            values: Mutex::new([0.0; NUM_BARS]),
        }
    }

    /// Copy of the current values.
    pub fn snapshot(&self) -> Spectrum {
        *self.values.lock()
    }

    /// Exclusive access for writers that must check a condition under the lock.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Spectrum> {
        self.values.lock()
    }
}

impl Default for SpectrumBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scales a raw DFT magnitude into bar units.
pub fn scale_magnitude(mag: f32) -> f32 {
    (mag * MAGNITUDE_GAIN).clamp(0.0, MAGNITUDE_MAX)
}

/// Turns mono frames into bar magnitudes.
pub struct SpectrumAnalyzer {
    plan: Arc<dyn DFTBase>,
    scratch: Vec<Complex32>,
}

impl SpectrumAnalyzer {
    pub fn new(frame_size: usize) -> Self {
        let plan = find_dft(frame_size);
        let scratch = vec![Complex32::default(); plan.size()];
        Self { plan, scratch }
    }

    pub fn plan_name(&self) -> String {
        self.plan.name()
    }

    /// Computes the first `NUM_BARS` scaled magnitudes of `frame`.
    /// Short frames are zero-padded; extra samples are ignored.
    pub fn analyze(&mut self, frame: &[f32]) -> Spectrum {
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let x = frame.get(i).copied().unwrap_or(0.0);
            *slot = Complex32::new(x, 0.0);
        }

        self.plan.xform_inplace(&mut self.scratch);

        let mut out = [0.0; NUM_BARS];
        for (dst, c) in out.iter_mut().zip(&self.scratch) {
            *dst = scale_magnitude(c.norm());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FRAME_SIZE;

    #[test]
    fn magnitudes_above_threshold_clamp_to_max() {
        assert_eq!(scale_magnitude(MAGNITUDE_MAX / MAGNITUDE_GAIN + 1.0), MAGNITUDE_MAX);
        assert_eq!(scale_magnitude(10_000.0), MAGNITUDE_MAX);
        assert_eq!(scale_magnitude(0.0), 0.0);
        assert!((scale_magnitude(100.0) - 70.0).abs() < 1e-4);
    }

    #[test]
    fn silence_gives_flat_spectrum() {
        let mut analyzer = SpectrumAnalyzer::new(FRAME_SIZE);
        let out = analyzer.analyze(&[0.0; FRAME_SIZE]);
        assert_eq!(out, [0.0; NUM_BARS]);
    }

    #[test]
    fn full_scale_dc_saturates_first_bar_only() {
        let mut analyzer = SpectrumAnalyzer::new(FRAME_SIZE);
        let out = analyzer.analyze(&[1.0; FRAME_SIZE]);

        assert_eq!(out[0], MAGNITUDE_MAX);
        for v in &out[1..] {
            assert!(*v < 1e-2);
        }
    }

    #[test]
    fn quiet_tone_is_scaled_by_gain() {
        // Amplitude 0.1 sine at bin 3: raw magnitude 0.1 * 512 = 51.2.
        let bin = 3;
        let frame: Vec<f32> = (0..FRAME_SIZE)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * (bin * i) as f32 / FRAME_SIZE as f32;
                0.1 * phase.sin()
            })
            .collect();

        let mut analyzer = SpectrumAnalyzer::new(FRAME_SIZE);
        let out = analyzer.analyze(&frame);

        assert!((out[bin] - 51.2 * MAGNITUDE_GAIN).abs() < 0.05);
        assert!(out.iter().all(|v| (0.0..=MAGNITUDE_MAX).contains(v)));
    }

    #[test]
    fn buffer_starts_zeroed_and_replaces_whole_array() {
        let buffer = SpectrumBuffer::new();
        assert_eq!(buffer.snapshot(), [0.0; NUM_BARS]);

        *buffer.lock() = [3.0; NUM_BARS];
        assert_eq!(buffer.snapshot(), [3.0; NUM_BARS]);
    }
}
