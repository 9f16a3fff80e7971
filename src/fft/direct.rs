use super::{w, DFTBase};
use num_complex::Complex32;
use num_traits::Zero;

//
// Direct O(n²) DFT. The capture frame is always a power of two, so in the
// app this only backs odd sizes handed to `find_dft`; the tests use it as
// the reference the radix-2 plan is checked against.
//
pub struct DFTDirect {
    n: usize,
    wtable: Vec<Complex32>,
}

impl DFTDirect {
    pub fn new(n: usize) -> Self {
        //
        // One full turn of twiddles; index (j * k) mod n.
        //
        let wtable = (0..n).map(|k| w(k, n)).collect();
        Self { n, wtable }
    }
}

impl DFTBase for DFTDirect {
    fn name(&self) -> String {
        format!("Direct({})", self.n)
    }
    fn size(&self) -> usize {
        self.n
    }

    fn xform(&self, input: &[Complex32], output: &mut [Complex32]) {
        for (k, out) in output.iter_mut().enumerate().take(self.n) {
            let mut acc = Complex32::zero();
            for (j, &x) in input.iter().enumerate().take(self.n) {
                acc += x * self.wtable[(j * k) % self.n];
            }
            *out = acc;
        }
    }
}
