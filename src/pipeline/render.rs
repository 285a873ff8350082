use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::assets::font::load_display_font;
use crate::assets::store::AssetStore;
use crate::audio::AudioMixer;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, OUTPUT_CANVAS};
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::motion::{CameraPath, MotionSampler};
use crate::pipeline::composite::alpha_over;
use crate::skin::{Skin, SkinComposer};
use crate::story::{CopyBundle, MoodThemes, NewsItem};

const IMAGE_TIMEOUT: Duration = Duration::from_secs(15);

/// Per-invocation knobs. Ranges are sampled once per job from the injected
/// seed, so a fixed seed fixes the whole output.
#[derive(Clone, Debug)]
pub struct RenderOpts {
    pub out_path: PathBuf,
    pub fps: Fps,
    /// Clip duration window in seconds, sampled uniformly.
    pub duration_range: (f64, f64),
    /// Video bitrate window in kbps, sampled uniformly.
    pub bitrate_range_kbps: (u32, u32),
    /// Skins eligible for this job; chosen uniformly.
    pub enabled_skins: Vec<Skin>,
    /// Fixed seed for reproducible output; `None` draws from the OS.
    pub seed: Option<u64>,
    /// Render frames on the rayon pool instead of sequentially.
    pub parallel: bool,
    /// Frames composited per batch before being pushed to the sink.
    pub chunk_size: usize,
    /// Apply the cosmetic color grade to the base frame.
    pub grade: bool,
}

impl RenderOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            fps: Fps { num: 24, den: 1 },
            duration_range: (8.0, 14.0),
            bitrate_range_kbps: (3000, 5500),
            enabled_skins: Skin::ALL.to_vec(),
            seed: None,
            parallel: false,
            chunk_size: 64,
            grade: true,
        }
    }
}

/// Pipeline stage, for logging and failure attribution.
#[derive(Clone, Copy, Debug)]
enum Stage {
    Fetching,
    Normalizing,
    Composing,
    Animating,
    Mixing,
    Assembling,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Normalizing => "normalizing",
            Stage::Composing => "composing",
            Stage::Animating => "animating",
            Stage::Mixing => "mixing",
            Stage::Assembling => "assembling",
        };
        f.write_str(name)
    }
}

/// Everything needed to emit frames: built by the early stages, consumed by
/// assembly, dropped when the job ends.
pub struct RenderJob {
    pub sampler: MotionSampler,
    pub overlay: RgbaImage,
    pub audio: Option<AudioInputConfig>,
    pub duration_sec: f64,
}

impl RenderJob {
    /// Composite and push every output frame into `sink` in index order.
    ///
    /// `parallel` renders each chunk on the rayon pool; `frame_at` is a pure
    /// function of `t`, so parallel and sequential runs are pixel-identical.
    pub fn stream_into(
        &self,
        fps: Fps,
        parallel: bool,
        chunk_size: usize,
        sink: &mut dyn FrameSink,
    ) -> NewsreelResult<()> {
        let total = fps.secs_to_frames(self.duration_sec);
        sink.begin(SinkConfig {
            width: OUTPUT_CANVAS.width,
            height: OUTPUT_CANVAS.height,
            fps,
            audio: self.audio.clone(),
        })?;

        let frame_dur = fps.frame_duration_secs();
        let chunk = chunk_size.max(1) as u64;
        let mut idx = 0u64;
        while idx < total {
            let end = (idx + chunk).min(total);
            let frames: Vec<RgbaImage> = if parallel {
                (idx..end)
                    .into_par_iter()
                    .map(|i| self.composite_frame(i as f64 * frame_dur))
                    .collect::<NewsreelResult<_>>()?
            } else {
                (idx..end)
                    .map(|i| self.composite_frame(i as f64 * frame_dur))
                    .collect::<NewsreelResult<_>>()?
            };
            for (off, frame) in frames.iter().enumerate() {
                sink.push_frame(FrameIndex(idx + off as u64), frame)?;
            }
            idx = end;
        }
        sink.end()
    }

    fn composite_frame(&self, t: f64) -> NewsreelResult<RgbaImage> {
        let mut frame = self.sampler.frame_at(t);
        alpha_over(&mut frame, &self.overlay)?;
        Ok(frame)
    }
}

/// The render pipeline front door.
pub struct Renderer {
    store: AssetStore,
    themes: MoodThemes,
    composer: SkinComposer,
    client: reqwest::blocking::Client,
}

impl Renderer {
    /// Load the display font (degrading to a system font if needed) and set
    /// up the HTTP client.
    pub fn new(store: AssetStore, themes: MoodThemes) -> NewsreelResult<Self> {
        let font = load_display_font(&store)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(IMAGE_TIMEOUT)
            .build()
            .context("build image http client")?;
        Ok(Self {
            store,
            themes,
            composer: SkinComposer::new(font),
            client,
        })
    }

    /// Render one finished video for `(item, copy)` and return its path.
    ///
    /// Linear stage machine; the first stage failure aborts the job with a
    /// typed error and leaves no partial output at `opts.out_path`.
    #[tracing::instrument(skip_all, fields(source = %item.source_name, mood = ?copy.mood))]
    pub fn render_video(
        &self,
        item: &NewsItem,
        copy: &CopyBundle,
        opts: &RenderOpts,
    ) -> NewsreelResult<PathBuf> {
        let mut rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let duration_sec = sample_f64(&mut rng, opts.duration_range);
        let bitrate_kbps = sample_u32(&mut rng, opts.bitrate_range_kbps);

        tracing::info!(stage = %Stage::Fetching, url = %item.image_url, "downloading article image");
        let bytes = crate::normalize::fetch_image(&self.client, &item.image_url)?;

        tracing::info!(stage = %Stage::Normalizing, bytes = bytes.len(), "normalizing base frame");
        let mut base = crate::normalize::normalize(&bytes)?;
        if opts.grade {
            crate::normalize::grade(&mut base, &mut rng);
        }

        let skin = self.composer.pick(&opts.enabled_skins, &mut rng);
        let accent = self.themes.theme(copy.mood).accent;
        tracing::info!(stage = %Stage::Composing, ?skin, "composing overlay");
        let overlay = self
            .composer
            .compose(skin, copy, &item.source_name, accent, &mut rng);

        tracing::info!(stage = %Stage::Animating, duration_sec, "building motion sampler");
        let path = CameraPath::drift(&mut rng);
        let sampler = MotionSampler::new(base, path, duration_sec)?;

        tracing::info!(stage = %Stage::Mixing, "mixing audio bed");
        let audio_path = opts.out_path.with_extension("f32le");
        let _audio_guard = TempFileGuard(Some(audio_path.clone()));
        let mixer = AudioMixer::new(&self.store, &self.themes);
        let audio = mixer.mix(copy.mood, duration_sec, &audio_path, &mut rng)?;

        let job = RenderJob {
            sampler,
            overlay,
            audio,
            duration_sec,
        };

        tracing::info!(stage = %Stage::Assembling, bitrate_kbps, "encoding");
        let part = part_path(&opts.out_path);
        let mut part_guard = TempFileGuard(Some(part.clone()));
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: part.clone(),
            overwrite: true,
            bitrate_kbps: Some(bitrate_kbps),
        });
        job.stream_into(opts.fps, opts.parallel, opts.chunk_size, &mut sink)?;

        std::fs::rename(&part, &opts.out_path).map_err(|e| {
            NewsreelError::render_failed(format!(
                "failed to move output into place '{}': {e}",
                opts.out_path.display()
            ))
        })?;
        part_guard.0 = None;

        tracing::info!(out = %opts.out_path.display(), "render done");
        Ok(opts.out_path.clone())
    }
}

/// Encode to a sibling `.part.mp4` so a failed job never clobbers the real
/// output path.
fn part_path(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("render");
    out.with_file_name(format!("{stem}.part.mp4"))
}

fn sample_f64(rng: &mut StdRng, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

fn sample_u32(rng: &mut StdRng, (lo, hi): (u32, u32)) -> u32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Removes its file on drop unless disarmed.
struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
