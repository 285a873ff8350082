use std::path::Path;

use rand::Rng;
use rand::rngs::StdRng;

use crate::audio::bed::AudioPcm;
use crate::foundation::error::{NewsreelError, NewsreelResult};

/// How one bed is placed under a clip.
#[derive(Clone, Copy, Debug)]
pub struct BedParams {
    /// Linear gain applied to every sample.
    pub volume: f32,
    pub fade_in_sec: f64,
    pub fade_out_sec: f64,
    /// Source speed multiplier; 1.0 plays at natural speed.
    pub playback_rate: f64,
    /// Where in the source the bed starts, in seconds.
    pub start_offset_sec: f64,
    /// Wrap around the source end instead of going silent.
    pub loop_source: bool,
}

impl BedParams {
    /// Jittered ambient placement: 20-25% volume, one-second fades, a +/-2%
    /// speed perturbation and a random start inside the source.
    pub fn jittered(source_duration_sec: f64, clip_duration_sec: f64, rng: &mut StdRng) -> Self {
        let volume = rng.random_range(0.20..0.25);
        let playback_rate = rng.random_range(0.98..1.02);
        let max_start = (source_duration_sec - clip_duration_sec).max(0.0);
        let start_offset_sec = if max_start > 0.0 {
            rng.random_range(0.0..max_start)
        } else {
            0.0
        };
        Self {
            volume,
            fade_in_sec: 1.0,
            fade_out_sec: 1.0,
            playback_rate,
            start_offset_sec,
            loop_source: true,
        }
    }
}

/// Gain multiplier for the fade envelope at `rel_sec` into a clip of
/// `clip_len_sec`.
fn fade_gain(params: &BedParams, rel_sec: f64, clip_len_sec: f64) -> f32 {
    let mut gain = 1.0f32;
    if params.fade_in_sec > 0.0 {
        gain *= (rel_sec / params.fade_in_sec).clamp(0.0, 1.0) as f32;
    }
    if params.fade_out_sec > 0.0 {
        let remaining = (clip_len_sec - rel_sec).max(0.0);
        gain *= (remaining / params.fade_out_sec).clamp(0.0, 1.0) as f32;
    }
    gain
}

/// Resample the bed onto `[0, duration_sec)` as interleaved stereo f32 at the
/// source sample rate, applying gain, fades, rate and loop/truncate.
///
/// An empty source produces pure silence of the right length.
pub fn render_bed(src: &AudioPcm, duration_sec: f64, params: &BedParams) -> Vec<f32> {
    let sample_rate = src.sample_rate;
    let out_frames = (duration_sec * f64::from(sample_rate)).round().max(0.0) as usize;
    let mut out = vec![0.0f32; out_frames * 2];

    let src_frames = src.frames();
    if src_frames == 0 {
        return out;
    }
    let channels = usize::from(src.channels);

    for frame in 0..out_frames {
        let rel_sec = frame as f64 / f64::from(sample_rate);
        let src_sec = params.start_offset_sec + rel_sec * params.playback_rate;
        let mut src_pos = src_sec * f64::from(src.sample_rate);
        if !src_pos.is_finite() || src_pos < 0.0 {
            break;
        }

        if params.loop_source {
            src_pos %= src_frames as f64;
        } else if src_pos >= src_frames as f64 {
            break;
        }

        let f0 = src_pos.floor() as usize % src_frames;
        let f1 = if params.loop_source {
            (f0 + 1) % src_frames
        } else {
            (f0 + 1).min(src_frames - 1)
        };
        let frac = (src_pos - src_pos.floor()) as f32;

        let (l, r) = if channels == 1 {
            let v0 = src.interleaved_f32[f0];
            let v1 = src.interleaved_f32[f1];
            let v = v0 + (v1 - v0) * frac;
            (v, v)
        } else {
            let (i0, i1) = (f0 * channels, f1 * channels);
            let l = src.interleaved_f32[i0]
                + (src.interleaved_f32[i1] - src.interleaved_f32[i0]) * frac;
            let r = src.interleaved_f32[i0 + 1]
                + (src.interleaved_f32[i1 + 1] - src.interleaved_f32[i0 + 1]) * frac;
            (l, r)
        };

        let gain = params.volume * fade_gain(params, rel_sec, duration_sec);
        out[frame * 2] = (l * gain).clamp(-1.0, 1.0);
        out[frame * 2 + 1] = (r * gain).clamp(-1.0, 1.0);
    }
    out
}

/// Write interleaved `f32` PCM samples as a raw little-endian `.f32le` file.
pub fn write_mix_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> NewsreelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            NewsreelError::render_failed(format!(
                "failed to create audio mix output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        NewsreelError::render_failed(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}
