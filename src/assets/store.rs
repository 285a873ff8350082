use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::NewsreelResult;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// One known remote asset: the file name it is cached under and where to
/// fetch it from on first use.
#[derive(Clone, Debug)]
pub struct AssetSpec {
    pub name: String,
    pub url: String,
}

impl AssetSpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Fetch-once-on-demand cache for static render assets (fonts, audio beds).
///
/// `ensure` is idempotent and never fails: a network error is logged and the
/// canonical path is returned anyway, so the caller discovers the missing file
/// when it tries to open it and degrades from there. Concurrent jobs racing on
/// the same asset overwrite each other harmlessly (write-to-temp then rename).
pub struct AssetStore {
    root: PathBuf,
    manifest: Vec<AssetSpec>,
    client: reqwest::blocking::Client,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>, manifest: Vec<AssetSpec>) -> NewsreelResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("build asset http client")?;
        Ok(Self {
            root: root.into(),
            manifest,
            client,
        })
    }

    /// The built-in manifest: the Anton display font plus one ambient audio
    /// bed per mood.
    pub fn default_manifest() -> Vec<AssetSpec> {
        vec![
            AssetSpec::new(
                "Anton.ttf",
                "https://github.com/google/fonts/raw/main/ofl/anton/Anton-Regular.ttf",
            ),
            AssetSpec::new(
                "crisis.mp3",
                "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
            ),
            AssetSpec::new(
                "tech.mp3",
                "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3",
            ),
            AssetSpec::new(
                "general.mp3",
                "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3",
            ),
        ]
    }

    /// Canonical local path for `name`, whether or not the file exists yet.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Return the canonical path for `name`, fetching the asset first if it
    /// is not cached yet.
    ///
    /// A cache hit and a fresh fetch are indistinguishable to the caller. On
    /// any fetch failure the error is logged and the (missing) path is still
    /// returned.
    pub fn ensure(&self, name: &str) -> PathBuf {
        let path = self.path_for(name);
        if path.exists() {
            return path;
        }

        let Some(spec) = self.manifest.iter().find(|s| s.name == name) else {
            tracing::warn!(asset = name, "asset not in manifest, cannot fetch");
            return path;
        };

        if let Err(e) = self.fetch_to(spec, &path) {
            tracing::warn!(asset = name, error = %e, "asset fetch failed");
        } else {
            tracing::info!(asset = name, "asset fetched");
        }
        path
    }

    fn fetch_to(&self, spec: &AssetSpec, path: &Path) -> anyhow::Result<()> {
        let resp = self.client.get(&spec.url).send()?.error_for_status()?;
        let bytes = resp.bytes()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create asset dir '{}'", parent.display()))?;
        }
        // Write to a sibling temp file, then rename; a concurrent fetch of the
        // same asset ends with one of the two identical copies.
        let tmp = path.with_extension("part");
        std::fs::write(&tmp, &bytes)
            .with_context(|| format!("write asset '{}'", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("rename asset into place '{}'", path.display()))?;
        Ok(())
    }
}
