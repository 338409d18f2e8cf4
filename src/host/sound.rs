use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.25;

/// Output stream that plays a tone while the gate is open.
pub struct Sound {
    _stream: cpal::Stream,
    gate: Arc<AtomicBool>,
}

impl Sound {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no output device available"))?;
        let supported_config = device
            .supported_output_configs()
            .context("error while querying configs")?
            .next()
            .ok_or_else(|| anyhow!("no supported output config"))?
            .with_max_sample_rate();
        let format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let gate = Arc::new(AtomicBool::new(false));

        let stream = match format {
            cpal::SampleFormat::I8 => Self::build::<i8>(&device, &config, &gate),
            cpal::SampleFormat::I16 => Self::build::<i16>(&device, &config, &gate),
            cpal::SampleFormat::I32 => Self::build::<i32>(&device, &config, &gate),
            cpal::SampleFormat::I64 => Self::build::<i64>(&device, &config, &gate),
            cpal::SampleFormat::U8 => Self::build::<u8>(&device, &config, &gate),
            cpal::SampleFormat::U16 => Self::build::<u16>(&device, &config, &gate),
            cpal::SampleFormat::U32 => Self::build::<u32>(&device, &config, &gate),
            cpal::SampleFormat::U64 => Self::build::<u64>(&device, &config, &gate),
            cpal::SampleFormat::F32 => Self::build::<f32>(&device, &config, &gate),
            cpal::SampleFormat::F64 => Self::build::<f64>(&device, &config, &gate),
            sample_format => return Err(anyhow!("unsupported sample format '{sample_format}'")),
        }?;
        stream.play().context("starting audio stream")?;

        Ok(Self {
            _stream: stream,
            gate,
        })
    }

    pub fn set_active(&self, on: bool) {
        self.gate.store(on, Ordering::Relaxed);
    }

    fn build<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        gate: &Arc<AtomicBool>,
    ) -> Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;
        let gate = Arc::clone(gate);

        // sinusoid, silence while the sound timer is at zero
        let mut sample_clock = 0f32;
        let mut next_value = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            if !gate.load(Ordering::Relaxed) {
                return 0.0;
            }
            (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin() * VOLUME
        };

        let err_fn = |err| log::error!("an error occurred on stream: {err}");

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    write_data(data, channels, &mut next_value)
                },
                err_fn,
                None,
            )
            .context("building output stream")
    }
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}
