//! Boundary data model shared with the orchestration layer.
//!
//! `NewsItem` and `CopyBundle` arrive from outside (article supplier and copy
//! generator respectively) as JSON; the render pipeline treats their strings
//! as opaque except for wrapping and fitting.

use crate::foundation::core::Rgb;
use crate::foundation::error::{NewsreelError, NewsreelResult};

/// One candidate news article as delivered by the article supplier.
///
/// Immutable once handed to the pipeline.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub image_url: String,
    pub source_name: String,
    #[serde(default)]
    pub description: String,
}

/// Editorial mood tag chosen by the copy generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    Crisis,
    Tech,
    General,
}

/// AI-derived text fields for one video.
///
/// The headline targets 4-8 words and is rendered uppercase; the summary
/// targets 15-25 words. Neither is validated here: over-long copy is handled
/// by the layout engine's shrink-to-fit search.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CopyBundle {
    pub mood: Mood,
    pub headline: String,
    pub summary: String,
}

impl CopyBundle {
    /// Parse the copy generator's JSON response
    /// (`{"mood": "CRISIS|TECH|GENERAL", "headline": ..., "summary": ...}`).
    pub fn from_llm_json(raw: &str) -> NewsreelResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| NewsreelError::validation(format!("copy bundle json: {e}")))
    }
}

/// Visual and audio identity of one mood.
#[derive(Clone, Debug)]
pub struct MoodTheme {
    /// Accent color used for badges and headline fills.
    pub accent: Rgb,
    /// Asset-store name of the audio bed for this mood.
    pub audio_bed: String,
}

/// Immutable mood -> theme lookup table.
///
/// Passed into the renderer at construction so tests can substitute their own
/// palette; nothing in the crate reads a module-level table.
#[derive(Clone, Debug)]
pub struct MoodThemes {
    crisis: MoodTheme,
    tech: MoodTheme,
    general: MoodTheme,
}

impl MoodThemes {
    pub fn new(crisis: MoodTheme, tech: MoodTheme, general: MoodTheme) -> Self {
        Self {
            crisis,
            tech,
            general,
        }
    }

    pub fn theme(&self, mood: Mood) -> &MoodTheme {
        match mood {
            Mood::Crisis => &self.crisis,
            Mood::Tech => &self.tech,
            Mood::General => &self.general,
        }
    }
}

impl Default for MoodThemes {
    /// Red for crisis, cyan for tech, gold for everything else.
    fn default() -> Self {
        Self::new(
            MoodTheme {
                accent: Rgb::new(0xFF, 0x00, 0x00),
                audio_bed: "crisis.mp3".to_string(),
            },
            MoodTheme {
                accent: Rgb::new(0x00, 0xF0, 0xFF),
                audio_bed: "tech.mp3".to_string(),
            },
            MoodTheme {
                accent: Rgb::new(0xFF, 0xD7, 0x00),
                audio_bed: "general.mp3".to_string(),
            },
        )
    }
}
