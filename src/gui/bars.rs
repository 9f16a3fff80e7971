use crate::config::SIDE_MARGIN;
use crate::spectrum::Spectrum;

/// One bar in canvas coordinates (origin at the canvas' top-left corner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x0: f32,
    pub x1: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bar {
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Pixel height of a bar for one magnitude.
pub fn bar_height(magnitude: f32, window_height: f32, sensitivity: f32) -> f32 {
    (magnitude * window_height * sensitivity).max(0.0).trunc()
}

/// Bars laid out for one canvas size. Rebuilt on every resize.
#[derive(Debug, Clone)]
pub struct BarLayout {
    pub bar_width: f32,
    bars: Vec<Bar>,
}

impl BarLayout {
    /// Lays out `count` collapsed bars across `width`, keeping a 50 px
    /// margin on each side.
    pub fn new(width: f32, height: f32, count: usize) -> Self {
        let usable = (width - 2.0 * SIDE_MARGIN).max(0.0);
        let bar_width = if count == 0 {
            0.0
        } else {
            (usable / (2 * count) as f32).floor()
        };
        let spacing = bar_width;

        let bars = (0..count)
            .map(|i| {
                let x0 = i as f32 * (bar_width + spacing) + SIDE_MARGIN;
                Bar {
                    x0,
                    x1: x0 + bar_width,
                    top: height,
                    bottom: height,
                }
            })
            .collect();

        Self {
            bar_width,
            bars,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Moves each bar's top edge to reflect `spectrum`. Bottoms stay pinned.
    pub fn apply(&mut self, spectrum: &Spectrum, window_height: f32, sensitivity: f32) {
        for (bar, &magnitude) in self.bars.iter_mut().zip(spectrum.iter()) {
            bar.bottom = window_height;
            bar.top = window_height - bar_height(magnitude, window_height, sensitivity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAGNITUDE_MAX, NUM_BARS, SENSITIVITY_MAX, SENSITIVITY_MIN};

    #[test]
    fn height_is_bounded_for_valid_inputs() {
        let window_height = 200.0;
        let ceiling = window_height * MAGNITUDE_MAX * SENSITIVITY_MAX;

        for s_step in 0..=99 {
            let s = SENSITIVITY_MIN + s_step as f32 * 0.001;
            for m_step in 0..=30 {
                let m = m_step as f32 * 5.0;
                let h = bar_height(m, window_height, s);
                assert!(h >= 0.0);
                assert!(h <= ceiling);
                assert!((h - (m * window_height * s)).abs() < 1.0);
            }
        }
    }

    #[test]
    fn new_bars_start_collapsed() {
        let layout = BarLayout::new(400.0, 200.0, NUM_BARS);
        assert_eq!(layout.bars().len(), NUM_BARS);
        assert!(layout.bars().iter().all(|b| b.height() == 0.0 && b.bottom == 200.0));
    }

    #[test]
    fn resize_recomputes_positions() {
        let small = BarLayout::new(400.0, 200.0, NUM_BARS);
        assert_eq!(small.bar_width, 7.0);
        assert_eq!(small.bars()[0].x0, 50.0);
        assert_eq!(small.bars()[1].x0, 64.0);

        let large = BarLayout::new(800.0, 200.0, NUM_BARS);
        assert_eq!(large.bar_width, 17.0);
        for (i, bar) in large.bars().iter().enumerate() {
            assert_eq!(bar.x0, 50.0 + i as f32 * 34.0);
            assert_eq!(bar.x1, bar.x0 + 17.0);
        }
        for pair in large.bars().windows(2) {
            assert!(pair[0].x0 < pair[1].x0);
            assert!(pair[0].x1 <= pair[1].x0);
        }
        assert!(large.bars().iter().all(|b| b.height() == 0.0));
    }

    #[test]
    fn narrow_window_gives_zero_width_bars() {
        let layout = BarLayout::new(60.0, 100.0, NUM_BARS);
        assert_eq!(layout.bar_width, 0.0);
        assert!(layout.bars().iter().all(|b| b.x0 == 50.0 && b.x1 == 50.0));
    }

    #[test]
    fn apply_pins_bottom_and_raises_top() {
        let mut layout = BarLayout::new(400.0, 200.0, NUM_BARS);
        let mut spectrum = [0.0; NUM_BARS];
        spectrum[0] = 10.0;
        spectrum[1] = 150.0;

        layout.apply(&spectrum, 300.0, 0.03125);

        // 10 * 300 * 0.03125 = 93.75, truncated to whole pixels.
        let bars = layout.bars();
        assert_eq!(bars[0].bottom, 300.0);
        assert_eq!(bars[0].top, 300.0 - 93.0);
        assert_eq!(bars[1].top, 300.0 - 1406.0);
        assert_eq!(bars[2].height(), 0.0);
    }
}
