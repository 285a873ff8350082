//! Audio bed selection and placement under the clip.

pub mod bed;
pub mod mix;

pub use bed::{AudioPcm, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
pub use mix::{BedParams, render_bed, write_mix_to_f32le_file};

use std::path::Path;

use rand::rngs::StdRng;

use crate::assets::store::AssetStore;
use crate::encode::ffmpeg::is_ffmpeg_on_path;
use crate::encode::sink::AudioInputConfig;
use crate::foundation::error::NewsreelResult;
use crate::story::{Mood, MoodThemes};

/// Picks and renders the mood-matched audio bed for one clip.
///
/// Every failure mode here (missing bed, no ffmpeg, decode error, empty
/// stream) degrades to `None`: a silent video is a valid output, never an
/// error.
pub struct AudioMixer<'a> {
    store: &'a AssetStore,
    themes: &'a MoodThemes,
}

impl<'a> AudioMixer<'a> {
    pub fn new(store: &'a AssetStore, themes: &'a MoodThemes) -> Self {
        Self { store, themes }
    }

    /// Render the bed for `mood` to a raw f32le file at `out_path` and
    /// return the encoder-side description of it.
    pub fn mix(
        &self,
        mood: Mood,
        duration_sec: f64,
        out_path: &Path,
        rng: &mut StdRng,
    ) -> NewsreelResult<Option<AudioInputConfig>> {
        let bed_name = &self.themes.theme(mood).audio_bed;
        let bed_path = self.store.ensure(bed_name);
        if !bed_path.exists() {
            tracing::warn!(bed = %bed_name, "audio bed missing, rendering silent video");
            return Ok(None);
        }
        if !is_ffmpeg_on_path() {
            tracing::warn!("ffmpeg not on PATH, cannot decode audio bed");
            return Ok(None);
        }

        let pcm = match decode_audio_f32_stereo(&bed_path, MIX_SAMPLE_RATE) {
            Ok(pcm) => pcm,
            Err(e) => {
                tracing::warn!(bed = %bed_name, error = %e, "audio bed decode failed");
                return Ok(None);
            }
        };
        if pcm.frames() == 0 {
            tracing::warn!(bed = %bed_name, "audio bed has no audio stream");
            return Ok(None);
        }

        let params = BedParams::jittered(pcm.duration_sec(), duration_sec, rng);
        let samples = render_bed(&pcm, duration_sec, &params);
        write_mix_to_f32le_file(&samples, out_path)?;

        tracing::info!(
            bed = %bed_name,
            volume = params.volume,
            rate = params.playback_rate,
            "audio bed mixed"
        );
        Ok(Some(AudioInputConfig {
            path: out_path.to_path_buf(),
            sample_rate: pcm.sample_rate,
            channels: 2,
        }))
    }
}
