pub mod direct;
pub mod radix2;

use lazy_static::lazy_static;
use num_complex::Complex32;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Base interface for all DFT implementations.
pub trait DFTBase: Send + Sync {
    /// Forward, unnormalized transform of `input` into `output`.
    /// Both slices must hold exactly `size()` elements.
    fn xform(&self, input: &[Complex32], output: &mut [Complex32]);

    /// Default in-place transform: temporary buffer copy.
    fn xform_inplace(&self, buffer: &mut [Complex32]) {
        let temp = buffer.to_vec();
        self.xform(&temp, buffer);
    }

    fn name(&self) -> String;
    fn size(&self) -> usize;
}

lazy_static! {
    static ref PLAN_CACHE: Mutex<HashMap<usize, Arc<dyn DFTBase>>> = Mutex::new(HashMap::new());
}

/// Returns a DFT plan for size `n`, reusing a cached plan when one exists.
pub fn find_dft(n: usize) -> Arc<dyn DFTBase> {
    // Cached plan lookup.
    {
        let cache = PLAN_CACHE.lock();
        if let Some(plan) = cache.get(&n) {
            return plan.clone();
        }
    }

    // Strategy selection. `FRAME_SIZE` always takes the radix-2 branch.
    let plan: Arc<dyn DFTBase> = if n.is_power_of_two() {
        Arc::new(radix2::DFTRadix2::new(n))
    } else {
        Arc::new(direct::DFTDirect::new(n))
    };

    // Cache the plan.
    let mut cache = PLAN_CACHE.lock();
    cache.entry(n).or_insert(plan).clone()
}

/// Twiddle factor e^(-2πik/n).
pub(crate) fn w(k: usize, n: usize) -> Complex32 {
    let angle = -2.0 * std::f64::consts::PI * (k as f64) / (n as f64);
    Complex32::new(angle.cos() as f32, angle.sin() as f32)
}
