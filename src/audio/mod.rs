pub mod capture;

use crate::config::{RING_CAPACITY, SAMPLE_RATE};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    FromSample, Sample, SampleFormat, SampleRate, SizedSample, StreamConfig,
    SupportedStreamConfig, SupportedStreamConfigRange,
};
use ringbuf::{Consumer, HeapRb, Producer};
use std::sync::Arc;
use thiserror::Error;

pub type SampleConsumer = Consumer<f32, Arc<HeapRb<f32>>>;
type SampleProducer = Producer<f32, Arc<HeapRb<f32>>>;

/// Audio capture errors.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("No loopback device found")]
    NoLoopbackDevice,

    #[error("Failed to get device config: {0}")]
    Config(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to build audio stream: {0}")]
    BuildStream(String),

    #[error("Failed to start audio stream: {0}")]
    PlayStream(String),

    #[error("Thread error: {0}")]
    Thread(String),
}

/// A running loopback stream feeding mono samples into a ring buffer.
/// Dropping it stops the stream.
pub struct LoopbackStream {
    _stream: cpal::Stream,
    pub consumer: SampleConsumer,
    pub device_name: String,
    pub config: StreamConfig,
}

/// Opens the system's loopback source and starts streaming mono samples.
pub fn open_loopback() -> Result<LoopbackStream, CaptureError> {
    let host = cpal::default_host();
    log::info!("Audio host: {:?}", host.id());

    let (device, supported_config) = find_loopback_device(&host)?;
    let device_name = device.name().unwrap_or_else(|_| "Unknown".into());
    log::info!("Selected loopback device: {}", device_name);

    //
    // Ring buffer sized at four frames so the capture thread can fall behind briefly.
    //
    let (producer, consumer) = HeapRb::<f32>::new(RING_CAPACITY).split();

    let sample_format = supported_config.sample_format();
    let config: StreamConfig = supported_config.into();

    log::info!(
        "Audio config: {:?} @ {}Hz, Channels: {}",
        sample_format,
        config.sample_rate.0,
        config.channels
    );

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, producer),
        SampleFormat::I16 => build_stream::<i16>(&device, &config, producer),
        SampleFormat::U16 => build_stream::<u16>(&device, &config, producer),
        other => return Err(CaptureError::UnsupportedFormat(format!("{:?}", other))),
    }
    .map_err(|e| CaptureError::BuildStream(e.to_string()))?;

    stream
        .play()
        .map_err(|e| CaptureError::PlayStream(e.to_string()))?;

    Ok(LoopbackStream {
        _stream: stream,
        consumer,
        device_name,
        config,
    })
}

/// WASAPI opens an input stream on an output device in loopback mode.
#[cfg(target_os = "windows")]
fn find_loopback_device(
    host: &cpal::Host,
) -> Result<(cpal::Device, SupportedStreamConfig), CaptureError> {
    let device = host
        .default_output_device()
        .ok_or(CaptureError::NoLoopbackDevice)?;

    let fallback = device
        .default_output_config()
        .map_err(|e| CaptureError::Config(format!("Loopback config: {}", e)))?;
    let config = match device.supported_output_configs() {
        Ok(ranges) => prefer_sample_rate(ranges, fallback),
        Err(e) => {
            log::warn!("Could not list output configs ({}), using default", e);
            fallback
        }
    };

    Ok((device, config))
}

/// Elsewhere the loopback appears as a monitor input (PulseAudio/PipeWire)
/// or a virtual loopback driver.
#[cfg(not(target_os = "windows"))]
fn find_loopback_device(
    host: &cpal::Host,
) -> Result<(cpal::Device, SupportedStreamConfig), CaptureError> {
    let output_name = host.default_output_device().and_then(|d| d.name().ok());

    let mut devices: Vec<(String, cpal::Device)> = host
        .input_devices()
        .map_err(|e| CaptureError::Config(e.to_string()))?
        .map(|d| (d.name().unwrap_or_else(|_| "Unknown".into()), d))
        .collect();

    //
    // Log all available input devices for debugging.
    //
    log::info!("--- AVAILABLE INPUT DEVICES ---");
    for (i, (name, _)) in devices.iter().enumerate() {
        log::info!("  [{}]: {}", i, name);
    }
    log::info!("-------------------------------");

    let names: Vec<&str> = devices.iter().map(|(name, _)| name.as_str()).collect();
    let index = pick_monitor(&names, output_name.as_deref()).ok_or(CaptureError::NoLoopbackDevice)?;
    let (_, device) = devices.swap_remove(index);

    let fallback = device
        .default_input_config()
        .map_err(|e| CaptureError::Config(e.to_string()))?;
    let config = match device.supported_input_configs() {
        Ok(ranges) => prefer_sample_rate(ranges, fallback),
        Err(e) => {
            log::warn!("Could not list input configs ({}), using default", e);
            fallback
        }
    };

    Ok((device, config))
}

/// Name fragments of virtual loopback drivers (macOS) and monitor sources.
#[cfg_attr(target_os = "windows", allow(dead_code))]
const LOOPBACK_MARKERS: [&str; 4] = ["monitor", "loopback", "blackhole", "soundflower"];

/// ALSA PCMs that route through the sound server, where `PULSE_SOURCE`
/// points them at the default sink's monitor.
#[cfg_attr(target_os = "windows", allow(dead_code))]
const SOUND_SERVER_PCMS: [&str; 2] = ["pulse", "pipewire"];

/// PulseAudio and pipewire-pulse resolve this to the default sink's monitor.
pub const DEFAULT_MONITOR: &str = "@DEFAULT_MONITOR@";

/// Points sound-server capture at the default monitor unless the user
/// already chose a source. Must run before any thread is spawned.
pub fn route_pulse_to_monitor() {
    if cfg!(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd"
    )) && std::env::var_os("PULSE_SOURCE").is_none()
    {
        std::env::set_var("PULSE_SOURCE", DEFAULT_MONITOR);
        log::info!("PULSE_SOURCE={}", DEFAULT_MONITOR);
    }
}

/// Chooses, in order: the monitor of the default output, any input named
/// like a monitor or virtual loopback driver, then the `pulse`/`pipewire`
/// ALSA PCM.
#[cfg_attr(target_os = "windows", allow(dead_code))]
fn pick_monitor(names: &[&str], output_name: Option<&str>) -> Option<usize> {
    let lower: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();

    if let Some(output) = output_name {
        let wanted = format!("monitor of {}", output.to_lowercase());
        if let Some(i) = lower.iter().position(|n| *n == wanted) {
            return Some(i);
        }
    }

    if let Some(i) = lower
        .iter()
        .position(|n| LOOPBACK_MARKERS.iter().any(|m| n.contains(m)))
    {
        return Some(i);
    }

    SOUND_SERVER_PCMS
        .iter()
        .find_map(|pcm| lower.iter().position(|n| n.as_str() == *pcm))
}

/// Picks a config running at `SAMPLE_RATE`, keeping the default's format
/// and channel count when possible.
fn prefer_sample_rate(
    ranges: impl Iterator<Item = SupportedStreamConfigRange>,
    fallback: SupportedStreamConfig,
) -> SupportedStreamConfig {
    let wanted = SampleRate(SAMPLE_RATE);
    let mut candidates: Vec<SupportedStreamConfigRange> = ranges
        .filter(|r| r.min_sample_rate() <= wanted && wanted <= r.max_sample_rate())
        .collect();

    //
    // Ranges matching the default's layout sort first.
    //
    candidates.sort_by_key(|r| {
        (
            r.sample_format() != fallback.sample_format(),
            r.channels() != fallback.channels(),
        )
    });

    match candidates.into_iter().next() {
        Some(range) => range.with_sample_rate(wanted),
        None => {
            log::warn!(
                "Device cannot run at {}Hz, using {}Hz",
                SAMPLE_RATE,
                fallback.sample_rate().0
            );
            fallback
        }
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut producer: SampleProducer,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;
    let mut mono = Vec::new();

    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            downmix_into(data, channels, &mut mono);
            // Samples that do not fit are dropped.
            let _ = producer.push_slice(&mono);
        },
        |err| log::error!("Audio stream error: {}", err),
        None,
    )
}

/// Averages each interleaved frame of `data` into one f32 sample.
pub fn downmix_into<T>(data: &[T], channels: usize, out: &mut Vec<f32>)
where
    T: Sample,
    f32: FromSample<T>,
{
    out.clear();
    let channels = channels.max(1);
    out.extend(data.chunks_exact(channels).map(|frame| {
        let sum: f32 = frame.iter().map(|&s| f32::from_sample(s)).sum();
        sum / channels as f32
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpal::SupportedBufferSize;

    #[test]
    fn downmix_averages_all_channels() {
        let mut out = Vec::new();
        downmix_into(&[1.0f32, 0.0, 0.5, 0.5], 2, &mut out);
        assert_eq!(out, vec![0.5, 0.5]);

        downmix_into(&[0.3f32, 0.6, 0.9], 3, &mut out);
        assert!((out[0] - 0.6).abs() < 1e-6);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn downmix_converts_integer_samples() {
        let mut out = Vec::new();
        downmix_into(&[i16::MIN, i16::MIN], 2, &mut out);
        assert_eq!(out, vec![-1.0]);

        downmix_into(&[32768u16], 1, &mut out);
        assert_eq!(out, vec![0.0]);
    }

    #[test]
    fn downmix_drops_trailing_partial_frame() {
        let mut out = vec![42.0];
        downmix_into(&[0.2f32, 0.4, 0.6], 2, &mut out);
        assert_eq!(out.len(), 1);
        assert!((out[0] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn prefers_monitor_of_default_output() {
        let names = [
            "Built-in Microphone",
            "Monitor of HDMI Output",
            "Monitor of Speakers",
        ];
        assert_eq!(pick_monitor(&names, Some("Speakers")), Some(2));
        assert_eq!(pick_monitor(&names, Some("Headphones")), Some(1));
        assert_eq!(pick_monitor(&names, None), Some(1));
    }

    #[test]
    fn alsa_hints_fall_back_to_sound_server_pcm() {
        let names = [
            "default",
            "pulse",
            "pipewire",
            "sysdefault:CARD=PCH",
            "front:CARD=PCH,DEV=0",
            "hw:CARD=PCH,DEV=0",
        ];
        assert_eq!(pick_monitor(&names, Some("default")), Some(1));

        let pipewire_only = ["default", "pipewire", "hw:CARD=PCH,DEV=0"];
        assert_eq!(pick_monitor(&pipewire_only, Some("default")), Some(1));
    }

    #[test]
    fn macos_virtual_drivers_are_accepted() {
        let names = ["MacBook Pro Microphone", "BlackHole 2ch", "Soundflower (2ch)"];
        assert_eq!(pick_monitor(&names, Some("MacBook Pro Speakers")), Some(1));
        assert_eq!(
            pick_monitor(&["MacBook Pro Microphone", "Soundflower (2ch)"], None),
            Some(1)
        );
    }

    #[test]
    fn plain_hardware_inputs_are_rejected() {
        let names = ["default", "sysdefault:CARD=PCH", "hw:CARD=PCH,DEV=0"];
        assert_eq!(pick_monitor(&names, Some("default")), None);
        assert_eq!(pick_monitor(&["MacBook Pro Microphone"], None), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn pulse_source_is_set_after_routing() {
        route_pulse_to_monitor();
        assert!(std::env::var_os("PULSE_SOURCE").is_some());
    }

    #[test]
    fn sample_rate_preference() {
        let fallback = SupportedStreamConfig::new(
            2,
            SampleRate(48000),
            SupportedBufferSize::Unknown,
            SampleFormat::F32,
        );
        let ranges = vec![
            SupportedStreamConfigRange::new(
                1,
                SampleRate(8000),
                SampleRate(96000),
                SupportedBufferSize::Unknown,
                SampleFormat::I16,
            ),
            SupportedStreamConfigRange::new(
                2,
                SampleRate(44100),
                SampleRate(48000),
                SupportedBufferSize::Unknown,
                SampleFormat::F32,
            ),
        ];

        let picked = prefer_sample_rate(ranges.into_iter(), fallback.clone());
        assert_eq!(picked.sample_rate(), SampleRate(SAMPLE_RATE));
        assert_eq!(picked.channels(), 2);
        assert_eq!(picked.sample_format(), SampleFormat::F32);

        let only_high = vec![SupportedStreamConfigRange::new(
            2,
            SampleRate(48000),
            SampleRate(48000),
            SupportedBufferSize::Unknown,
            SampleFormat::F32,
        )];
        let picked = prefer_sample_rate(only_high.into_iter(), fallback);
        assert_eq!(picked.sample_rate(), SampleRate(48000));
    }
}
