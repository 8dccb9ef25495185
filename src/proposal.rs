use crate::config::ProposalConfig;

const BASE_YES_FONT_PX: f32 = 20.0;
const BASE_PADDING: (f32, f32) = (14.0, 40.0); // vertical, horizontal
const PADDING_GROWTH: (f32, f32) = (3.0, 6.0);

/// The question card: every "no" makes "yes" bigger and rephrases the question.
#[derive(Clone, Debug)]
pub struct Proposal {
    config: ProposalConfig,
    rejections: usize,
    question: String,
}

impl Proposal {
    pub fn new(config: ProposalConfig) -> Self {
        let question = config.question.clone();
        Self { config, rejections: 0, question }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn yes_text(&self) -> &str {
        &self.config.yes_text
    }

    pub fn no_text(&self) -> &str {
        &self.config.no_text
    }

    pub fn rejections(&self) -> usize {
        self.rejections
    }

    /// Record a "no" and return the question now shown.
    pub fn reject(&mut self) -> &str {
        self.rejections += 1;
        let msgs = &self.config.no_messages;
        if !msgs.is_empty() {
            self.question = msgs[(self.rejections - 1) % msgs.len()].clone();
        }
        &self.question
    }

    pub fn yes_font_px(&self) -> f32 {
        BASE_YES_FONT_PX + self.rejections as f32 * self.config.no_growth_px
    }

    /// `(vertical, horizontal)` padding of the "yes" button.
    pub fn yes_padding(&self) -> (f32, f32) {
        let n = self.rejections as f32;
        (BASE_PADDING.0 + n * PADDING_GROWTH.0, BASE_PADDING.1 + n * PADDING_GROWTH.1)
    }

    pub fn no_font_px(&self) -> f32 {
        BASE_YES_FONT_PX
    }

    pub fn no_padding(&self) -> (f32, f32) {
        BASE_PADDING
    }
}
