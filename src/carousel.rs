//! Circular photo carousel: the current index and every item's slot.

use tracing::debug;

use crate::constants::{SWIPE_THRESHOLD_PX, VISIBLE_SLOT_RADIUS};
use crate::error::{ShowError, ShowResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Bring the item on the right to the centre.
    Next,
    /// Bring the item on the left to the centre.
    Previous,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Direction::Next => 1,
            Direction::Previous => -1,
        }
    }
}

/// Where an item sits relative to the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Signed circular distance, within `-2..=2`.
    Visible(i64),
    Hidden,
}

/// Discrete user input that can turn the carousel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    ArrowLeft,
    ArrowRight,
    /// Completed horizontal drag; `dx` is end minus start.
    Drag { dx: f32 },
}

impl Gesture {
    /// At most one step per gesture. Short drags do nothing.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Gesture::ArrowLeft => Some(Direction::Previous),
            Gesture::ArrowRight => Some(Direction::Next),
            Gesture::Drag { dx } if dx.abs() > SWIPE_THRESHOLD_PX => {
                Some(if dx < 0.0 { Direction::Next } else { Direction::Previous })
            }
            Gesture::Drag { .. } => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Carousel<T> {
    items: Vec<T>,
    current: usize,
    slots: Vec<Slot>,
}

impl<T> Carousel<T> {
    pub fn new(items: Vec<T>) -> ShowResult<Self> {
        if items.is_empty() {
            return Err(ShowError::configuration("carousel needs at least one item"));
        }
        let mut carousel = Self { items, current: 0, slots: Vec::new() };
        carousel.update_slots();
        Ok(carousel)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn rotate(&mut self, direction: Direction) {
        let n = self.items.len() as i64;
        if n == 0 {
            return;
        }
        self.current = (self.current as i64 + direction.step()).rem_euclid(n) as usize;
        self.update_slots();
        debug!(current = self.current, "carousel rotated");
    }

    /// Apply a gesture; returns whether the carousel turned.
    pub fn apply(&mut self, gesture: Gesture) -> bool {
        match gesture.direction() {
            Some(direction) => {
                self.rotate(direction);
                true
            }
            None => false,
        }
    }

    /// Slot of item `index` as of the last rotation.
    pub fn slot(&self, index: usize) -> Slot {
        self.slots.get(index).copied().unwrap_or(Slot::Hidden)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Items with their slots, for the layout pass.
    pub fn iter_slots(&self) -> impl Iterator<Item = (&T, Slot)> {
        self.items.iter().zip(self.slots.iter().copied())
    }

    fn update_slots(&mut self) {
        let n = self.items.len();
        self.slots = (0..n).map(|i| slot_of(i, self.current, n)).collect();
    }
}

/// Signed circular distance from `current` to `index`, normalised into
/// `(-n/2, n/2]`, then clipped to the visible window.
pub fn slot_of(index: usize, current: usize, n: usize) -> Slot {
    if n == 0 {
        return Slot::Hidden;
    }
    let n = n as i64;
    let mut diff = index as i64 - current as i64;
    if 2 * diff > n {
        diff -= n;
    } else if 2 * diff <= -n {
        diff += n;
    }
    if diff.abs() <= VISIBLE_SLOT_RADIUS {
        Slot::Visible(diff)
    } else {
        Slot::Hidden
    }
}

/// How the layout pass places an item in a given slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Horizontal offset from the centre, as a fraction of the track width.
    pub offset: f32,
    pub scale: f32,
    pub opacity: f32,
    /// Larger draws later (on top).
    pub depth: u8,
}

pub fn placement(slot: Slot) -> Option<Placement> {
    let Slot::Visible(d) = slot else {
        return None;
    };
    let side = d.signum() as f32;
    let p = match d.abs() {
        0 => Placement { offset: 0.0, scale: 1.0, opacity: 1.0, depth: 3 },
        1 => Placement { offset: 0.28 * side, scale: 0.78, opacity: 0.85, depth: 2 },
        _ => Placement { offset: 0.48 * side, scale: 0.6, opacity: 0.5, depth: 1 },
    };
    Some(p)
}
