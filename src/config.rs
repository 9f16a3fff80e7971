use std::time::Duration;

// Audio capture.
pub const SAMPLE_RATE: u32 = 44100; // Requested loopback sample rate.
pub const FRAME_SIZE: usize = 1024; // Samples per channel per analysed frame.
pub const RING_CAPACITY: usize = FRAME_SIZE * 4;
pub const CAPTURE_POLL: Duration = Duration::from_millis(5);

// Spectrum scaling.
pub const NUM_BARS: usize = 20;
pub const MAGNITUDE_GAIN: f32 = 0.7;
pub const MAGNITUDE_MAX: f32 = 150.0;

// Sensitivity (mouse wheel).
pub const SENSITIVITY_INITIAL: f32 = 0.02;
pub const SENSITIVITY_MIN: f32 = 0.001;
pub const SENSITIVITY_MAX: f32 = 0.1;
pub const SENSITIVITY_STEP: f32 = 0.001;

// Rendering.
pub const RENDER_TICK: Duration = Duration::from_millis(50);
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);
pub const SIDE_MARGIN: f32 = 50.0;
pub const WINDOW_SIZE: [f32; 2] = [400.0, 200.0];
pub const WINDOW_TITLE: &str = "BVis";
