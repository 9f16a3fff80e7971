use super::{w, DFTBase};
use num_complex::Complex32;

//
// Iterative radix-2 Cooley–Tukey for power-of-two sizes.
//
pub struct DFTRadix2 {
    n: usize,
    wtable: Vec<Complex32>,
    bitrev: Vec<usize>,
}

impl DFTRadix2 {
    pub fn new(n: usize) -> Self {
        assert!(n.is_power_of_two(), "radix-2 plan needs a power of two, got {n}");

        //
        // Half a turn of twiddles is enough for every butterfly stage.
        //
        let wtable = (0..n / 2).map(|k| w(k, n)).collect();

        //
        // Bit-reversal permutation for the decimation-in-time input order.
        //
        let bits = n.trailing_zeros();
        let bitrev = (0..n)
            .map(|i| {
                if bits == 0 {
                    0
                } else {
                    i.reverse_bits() >> (usize::BITS - bits)
                }
            })
            .collect();

        Self { n, wtable, bitrev }
    }
}

impl DFTBase for DFTRadix2 {
    fn name(&self) -> String {
        format!("Radix2({})", self.n)
    }
    fn size(&self) -> usize {
        self.n
    }

    fn xform(&self, input: &[Complex32], output: &mut [Complex32]) {
        for (i, &r) in self.bitrev.iter().enumerate() {
            output[i] = input[r];
        }

        //
        // Butterfly stages of doubling length.
        //
        let mut len = 2;
        while len <= self.n {
            let half = len / 2;
            let stride = self.n / len;
            for start in (0..self.n).step_by(len) {
                for k in 0..half {
                    let t = output[start + k + half] * self.wtable[k * stride];
                    let u = output[start + k];
                    output[start + k] = u + t;
                    output[start + k + half] = u - t;
                }
            }
            len *= 2;
        }
    }
}
