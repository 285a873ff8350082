use std::path::Path;

use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Sample rate every bed is decoded to before mixing.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Decoded PCM audio, interleaved f32.
#[derive(Clone, Debug)]
pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.interleaved_f32.len() / usize::from(self.channels)
        }
    }

    pub fn duration_sec(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Decode any audio file to stereo f32 PCM via the system `ffmpeg`.
///
/// A file without an audio stream decodes to empty PCM rather than an error;
/// everything else surfaces as `AssetUnavailable` so the caller can fall back
/// to a silent video.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> NewsreelResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            NewsreelError::asset_unavailable(format!("failed to run ffmpeg for audio decode: {e}"))
        })?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("Output file #0 does not contain any stream")
        {
            return Ok(AudioPcm {
                sample_rate,
                channels: 2,
                interleaved_f32: Vec::new(),
            });
        }
        return Err(NewsreelError::asset_unavailable(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(NewsreelError::asset_unavailable(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32: pcm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_duration_math() {
        let pcm = AudioPcm {
            sample_rate: 48_000,
            channels: 2,
            interleaved_f32: vec![0.0; 48_000 * 2],
        };
        assert_eq!(pcm.frames(), 48_000);
        assert!((pcm.duration_sec() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_channel_pcm_is_empty() {
        let pcm = AudioPcm {
            sample_rate: 48_000,
            channels: 0,
            interleaved_f32: vec![0.0; 128],
        };
        assert_eq!(pcm.frames(), 0);
    }
}
