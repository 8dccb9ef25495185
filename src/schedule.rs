//! Fade schedule: when each message fades in and out, and when the
//! continue control is revealed. Everything here is a pure function of
//! configuration and frame number.

use tracing::debug;

use crate::error::{ShowError, ShowResult};
use crate::surface::clamp_unit;

pub type Frame = u64;

pub const NAME_PLACEHOLDER: &str = "{name}";

/// A message that fades in, then out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FadeSlot {
    pub text: String,
    pub fade_in_start: Frame,
    pub fade_in_end: Frame,
    pub fade_out_start: Frame,
    pub fade_out_end: Frame,
}

impl FadeSlot {
    /// Linear opacity: rising over `[fade_in_start, fade_in_end)`, falling
    /// over `[fade_out_start, fade_out_end)`, zero elsewhere.
    pub fn opacity(&self, frame: Frame) -> f32 {
        if frame >= self.fade_in_start && frame < self.fade_in_end {
            ratio(frame - self.fade_in_start, self.fade_in_end - self.fade_in_start)
        } else if frame >= self.fade_out_start && frame < self.fade_out_end {
            1.0 - ratio(frame - self.fade_out_start, self.fade_out_end - self.fade_out_start)
        } else {
            0.0
        }
    }
}

/// A persistent line: fades in once and stays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalSlot {
    pub text: String,
    pub fade_in_start: Frame,
    /// Stacking position, 0 for the first line.
    pub line_index: usize,
}

impl FinalSlot {
    pub fn opacity(&self, frame: Frame, phase_frames: Frame) -> f32 {
        if frame < self.fade_in_start {
            return 0.0;
        }
        ratio(frame - self.fade_in_start, phase_frames).min(1.0)
    }
}

fn ratio(num: Frame, den: Frame) -> f32 {
    if den == 0 {
        return 1.0;
    }
    clamp_unit(num as f32 / den as f32)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub sequential: Vec<FadeSlot>,
    pub finals: Vec<FinalSlot>,
    pub phase_frames: Frame,
    /// First frame at which the continue control is shown.
    pub continue_frame: Frame,
}

impl Schedule {
    /// Lay out every message on the frame timeline.
    ///
    /// Each sequential message gets a fade-in and a fade-out phase of
    /// `phase_frames`; the next message starts on the frame after the
    /// previous one ends. Final lines follow, one every `phase_frames`,
    /// with `{name}` replaced by `name` here and nowhere else.
    pub fn build<S: AsRef<str>>(
        sequential_texts: &[S],
        final_texts: &[S],
        phase_frames: Frame,
        name: &str,
    ) -> ShowResult<Self> {
        if phase_frames == 0 {
            return Err(ShowError::configuration("phase length must be at least one frame"));
        }
        if final_texts.is_empty() {
            return Err(ShowError::configuration(
                "at least one final line is required to place the continue control",
            ));
        }

        let overflow = || ShowError::configuration("schedule exceeds frame range");
        let slot_frames = phase_frames.checked_mul(2).ok_or_else(overflow)?;

        let mut frame: Frame = 0;
        let mut sequential = Vec::with_capacity(sequential_texts.len());
        for text in sequential_texts {
            let fade_in_start = frame.checked_add(1).ok_or_else(overflow)?;
            let fade_out_start = frame.checked_add(phase_frames).ok_or_else(overflow)?;
            let fade_out_end = frame.checked_add(slot_frames).ok_or_else(overflow)?;
            sequential.push(FadeSlot {
                text: text.as_ref().to_string(),
                fade_in_start,
                fade_in_end: fade_out_start,
                fade_out_start,
                fade_out_end,
            });
            frame = fade_out_end;
        }

        let mut finals = Vec::with_capacity(final_texts.len());
        for (i, raw) in final_texts.iter().enumerate() {
            let fade_in_start = (i as Frame)
                .checked_mul(phase_frames)
                .and_then(|offset| offset.checked_add(frame))
                .and_then(|start| start.checked_add(1))
                .ok_or_else(overflow)?;
            finals.push(FinalSlot {
                text: raw.as_ref().replace(NAME_PLACEHOLDER, name),
                fade_in_start,
                line_index: i,
            });
        }

        // Non-empty checked above.
        let last_start = finals.last().map_or(frame.saturating_add(1), |s| s.fade_in_start);
        let continue_frame = last_start.checked_add(phase_frames).ok_or_else(overflow)?;

        debug!(
            messages = sequential.len(),
            final_lines = finals.len(),
            phase_frames,
            continue_frame,
            "built fade schedule"
        );

        Ok(Self { sequential, finals, phase_frames, continue_frame })
    }

    pub fn final_opacity(&self, slot: &FinalSlot, frame: Frame) -> f32 {
        slot.opacity(frame, self.phase_frames)
    }

    pub fn is_revealed(&self, frame: Frame) -> bool {
        frame >= self.continue_frame
    }

    /// Every text with a non-zero opacity at `frame`, sequential slots first.
    pub fn visible_texts(&self, frame: Frame) -> Vec<(&str, f32)> {
        let seq = self
            .sequential
            .iter()
            .map(|s| (s.text.as_str(), s.opacity(frame)));
        let fin = self
            .finals
            .iter()
            .map(|s| (s.text.as_str(), self.final_opacity(s, frame)));
        seq.chain(fin).filter(|(_, o)| *o > 0.0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(seq: &[&str], fin: &[&str], phase: Frame) -> Schedule {
        Schedule::build(seq, fin, phase, "Aria").unwrap()
    }

    #[test]
    fn sequential_windows_are_ordered_and_disjoint() {
        let s = build(&["a", "b", "c"], &["z"], 10);
        for slot in &s.sequential {
            assert!(slot.fade_in_start < slot.fade_in_end);
            assert_eq!(slot.fade_in_end, slot.fade_out_start);
            assert!(slot.fade_out_start < slot.fade_out_end);
        }
        for pair in s.sequential.windows(2) {
            assert!(pair[1].fade_in_start > pair[0].fade_out_end);
        }
        assert_eq!(s.sequential[0].fade_in_start, 1);
        assert_eq!(s.sequential[2].fade_out_end, 60);
    }

    #[test]
    fn final_lines_follow_with_fixed_stride() {
        let s = build(&["a", "b"], &["x", "y", "z"], 10);
        let starts: Vec<_> = s.finals.iter().map(|f| f.fade_in_start).collect();
        assert_eq!(starts, vec![41, 51, 61]);
        assert_eq!(s.continue_frame, 71);
    }

    #[test]
    fn no_messages_starts_final_lines_right_away() {
        let s = build(&[], &["x"], 8);
        assert_eq!(s.finals[0].fade_in_start, 1);
        assert_eq!(s.continue_frame, 9);
    }

    #[test]
    fn name_is_substituted_once() {
        let s = build(&[], &["Love you {name}", "{name} and {name}"], 5);
        assert_eq!(s.finals[0].text, "Love you Aria");
        assert_eq!(s.finals[1].text, "Aria and Aria");
        assert!(s.finals.iter().all(|f| !f.text.contains(NAME_PLACEHOLDER)));
    }

    #[test]
    fn sequential_opacity_is_linear_and_bounded() {
        let s = build(&["a"], &["z"], 10);
        let slot = &s.sequential[0];
        assert_eq!(slot.opacity(0), 0.0);
        assert_eq!(slot.opacity(1), 0.0);
        assert!((slot.opacity(5) - 4.0 / 9.0).abs() < 1e-6);
        assert_eq!(slot.opacity(10), 1.0);
        assert!((slot.opacity(15) - 0.5).abs() < 1e-6);
        assert_eq!(slot.opacity(20), 0.0);
        for f in 2..20 {
            let o = slot.opacity(f);
            assert!(o > 0.0 && o <= 1.0, "frame {f}: {o}");
        }
    }

    #[test]
    fn final_opacity_saturates_after_one_phase() {
        let s = build(&[], &["z"], 10);
        let slot = &s.finals[0];
        let mut last = 0.0;
        for f in 0..40 {
            let o = s.final_opacity(slot, f);
            assert!(o >= last);
            last = o;
        }
        assert!(s.final_opacity(slot, 10) < 1.0);
        assert_eq!(s.final_opacity(slot, 11), 1.0);
    }

    #[test]
    fn reveal_threshold_is_exact() {
        let s = build(&["a"], &["z"], 4);
        assert!(!s.is_revealed(s.continue_frame - 1));
        assert!(s.is_revealed(s.continue_frame));
        assert!(s.is_revealed(s.continue_frame + 1000));
    }

    #[test]
    fn at_most_one_message_visible() {
        let s = build(&["a", "b", "c"], &["z"], 6);
        for f in 0..s.finals[0].fade_in_start {
            let visible = s.sequential.iter().filter(|x| x.opacity(f) > 0.0).count();
            assert!(visible <= 1, "frame {f}");
        }
    }

    #[test]
    fn rejects_bad_input() {
        let empty: [&str; 0] = [];
        assert!(Schedule::build(&["a"], &empty, 10, "n").is_err());
        assert!(Schedule::build(&["a"], &["b"], 0, "n").is_err());
    }

    #[test]
    fn rejects_phase_lengths_past_the_frame_range() {
        let err = Schedule::build(&["a", "b"], &["z"], i64::MAX as Frame, "n").unwrap_err();
        assert!(matches!(err, ShowError::Configuration(_)));
        assert!(Schedule::build(&["a"], &["z"], Frame::MAX, "n").is_err());
        let empty: [&str; 0] = [];
        assert!(Schedule::build(&empty, &["y", "z"], Frame::MAX / 2 + 1, "n").is_err());

        let s = Schedule::build(&empty, &["z"], Frame::MAX / 4, "n").unwrap();
        assert_eq!(s.continue_frame, 1 + Frame::MAX / 4);
    }
}
