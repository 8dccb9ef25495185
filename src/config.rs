//! Presentation configuration.
//!
//! Read from `starfield.toml` (or an explicit path). Every field has a
//! built-in default, so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ShowError, ShowResult};
use crate::schedule::Schedule;

pub const DEFAULT_CONFIG_FILE: &str = "starfield.toml";

// ── Public Config Structs ──

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    pub partner_name: String,
    pub messages: Vec<String>,
    /// `{name}` is replaced by `partner_name` when the schedule is built.
    pub final_lines: Vec<String>,
    pub continue_button_text: String,
    /// Fixed seed for every random source; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub starfield: StarfieldConfig,
    pub ambient: AmbientConfig,
    pub proposal: ProposalConfig,
    pub celebration: CelebrationConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub star_count: usize,
    pub color_hues: Vec<f32>,
    pub max_radius: f32,
    pub twinkle_chance: f64,
    /// Frames for each fade-in or fade-out phase.
    pub frame_duration: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub proposal_star_count: usize,
    pub celebration_star_count: usize,
    pub max_radius: f32,
    pub twinkle_chance: f64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProposalConfig {
    pub question: String,
    pub yes_text: String,
    pub no_text: String,
    pub no_growth_px: f32,
    pub no_messages: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CelebrationConfig {
    pub main_photo: PathBuf,
    pub side_photos: Vec<PathBuf>,
    pub message: String,
    pub sub_message: String,
}

// ── Defaults ──

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ShowConfig {
    fn default() -> Self {
        ShowConfig {
            partner_name: "My Love".into(),
            messages: strings(&[
                "Every single day, I cannot believe how lucky I am",
                "Amongst trillions and trillions of stars, over billions of years",
                "To be alive, and to get to spend this life with you",
                "Is so incredibly, unfathomably unlikely",
                "And yet here I am, with the impossible chance to know you",
            ]),
            final_lines: strings(&[
                "I love you so much {name}, more than all the time and space in the universe can contain",
                "And I can't wait to spend all the time in the world to share that love with you!",
                "Happy Valentine's Day",
            ]),
            continue_button_text: "Continue".into(),
            seed: None,
            starfield: StarfieldConfig::default(),
            ambient: AmbientConfig::default(),
            proposal: ProposalConfig::default(),
            celebration: CelebrationConfig::default(),
        }
    }
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        StarfieldConfig {
            star_count: 500,
            color_hues: vec![0.0, 60.0, 240.0], // red, gold, blue
            max_radius: 1.2,
            twinkle_chance: 0.01,
            frame_duration: 250,
        }
    }
}

impl Default for AmbientConfig {
    fn default() -> Self {
        AmbientConfig {
            proposal_star_count: 150,
            celebration_star_count: 120,
            max_radius: 1.0,
            twinkle_chance: 0.008,
        }
    }
}

impl Default for ProposalConfig {
    fn default() -> Self {
        ProposalConfig {
            question: "Will you be my Valentine?".into(),
            yes_text: "Yes".into(),
            no_text: "No".into(),
            no_growth_px: 12.0,
            no_messages: strings(&[
                "Are you sure?",
                "Think again...",
                "Pretty please?",
                "I'll be sad...",
                "Last chance...",
            ]),
        }
    }
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        CelebrationConfig {
            main_photo: "assets/us.jpg".into(),
            side_photos: vec![
                "assets/aatsu name.jpg".into(),
                "assets/brush.jpg".into(),
                "assets/coffee.jpg".into(),
                "assets/flower.jpg".into(),
            ],
            message: "Yay! You made my heart so happy!".into(),
            sub_message: "I love you to the moon and back".into(),
        }
    }
}

// ── Loader ──

impl ShowConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, `starfield.toml`
    /// in the working directory is used when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> ShowResult<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    debug!("no {DEFAULT_CONFIG_FILE} found, using built-in defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> ShowResult<Self> {
        toml::from_str(text).map_err(|e| ShowError::configuration(e.to_string()))
    }

    /// Every photo shown in the carousel, main photo first.
    pub fn carousel_photos(&self) -> Vec<PathBuf> {
        std::iter::once(self.celebration.main_photo.clone())
            .chain(self.celebration.side_photos.iter().cloned())
            .collect()
    }

    /// Reject anything that would only fail once the animation is running.
    pub fn validate(&self) -> ShowResult<()> {
        let sf = &self.starfield;
        if self.final_lines.is_empty() {
            return Err(ShowError::configuration(
                "at least one final line is required to place the continue control",
            ));
        }
        if sf.frame_duration == 0 {
            return Err(ShowError::configuration("starfield.frame_duration must be positive"));
        }
        if sf.color_hues.is_empty() {
            return Err(ShowError::configuration("starfield.color_hues must not be empty"));
        }
        for (key, count) in [
            ("starfield.star_count", sf.star_count),
            ("ambient.proposal_star_count", self.ambient.proposal_star_count),
            ("ambient.celebration_star_count", self.ambient.celebration_star_count),
        ] {
            if count == 0 {
                return Err(ShowError::configuration(format!("{key} must be positive")));
            }
        }
        check_radius("starfield.max_radius", sf.max_radius)?;
        check_radius("ambient.max_radius", self.ambient.max_radius)?;
        check_chance("starfield.twinkle_chance", sf.twinkle_chance)?;
        check_chance("ambient.twinkle_chance", self.ambient.twinkle_chance)?;
        if self.carousel_photos().is_empty() {
            return Err(ShowError::configuration("the carousel needs at least one photo"));
        }
        Schedule::build(&self.messages, &self.final_lines, sf.frame_duration, &self.partner_name)?;
        Ok(())
    }
}

fn check_radius(field: &str, value: f32) -> ShowResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ShowError::configuration(format!("{field} must be a finite value >= 0, got {value}")))
    }
}

fn check_chance(field: &str, value: f64) -> ShowResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ShowError::configuration(format!("{field} must lie in [0, 1], got {value}")))
    }
}
