//! Step-by-step visibility of a laid out hypergraph.
//!
//! A frequency is hidden while its percentage at the current step is below the
//! threshold. An attribute stays visible as long as at least one of its
//! frequencies is visible. Frequencies without data for a step keep whatever
//! state they had before.

use tracing::debug;

use crate::layout::{LayoutResult, Node};

/// Number of animation steps: the longest interval sequence of any frequency.
pub fn step_count(layout: &LayoutResult) -> usize {
    layout
        .frequencies()
        .map(|(_, frequency)| frequency.intervals.len())
        .max()
        .unwrap_or(0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepChanges {
    pub shown: Vec<usize>,
    pub hidden: Vec<usize>,
}

impl StepChanges {
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty() && self.hidden.is_empty()
    }
}

/// Visibility per node, indexed like [`LayoutResult::nodes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    visible: Vec<bool>,
    active_links: Vec<usize>,
}

impl Visibility {
    pub fn new(layout: &LayoutResult) -> Self {
        let active_links = layout
            .nodes
            .iter()
            .map(|node| match node {
                Node::Attribute(attribute) => attribute.number_of_links,
                Node::Frequency(_) => 0,
            })
            .collect();
        Self {
            visible: vec![true; layout.nodes.len()],
            active_links,
        }
    }

    /// Visibility after replaying steps `0..=step` from the initial state.
    pub fn at_step(layout: &LayoutResult, step: usize, threshold: f32) -> Self {
        let mut visibility = Self::new(layout);
        for current in 0..=step {
            visibility.apply_step(layout, current, threshold);
        }
        visibility
    }

    pub fn is_visible(&self, node: usize) -> bool {
        self.visible.get(node).copied().unwrap_or(false)
    }

    pub fn is_link_visible(&self, layout: &LayoutResult, link: usize) -> bool {
        layout
            .links
            .get(link)
            .is_some_and(|link| self.is_visible(link.source))
    }

    pub fn apply_step(&mut self, layout: &LayoutResult, step: usize, threshold: f32) -> StepChanges {
        let mut changes = StepChanges::default();
        for (idx, frequency) in layout.frequencies() {
            let Some(percentage) = frequency.percentage_at(step) else {
                continue;
            };
            if percentage < threshold {
                self.hide_frequency(layout, idx, &mut changes);
            } else {
                self.show_frequency(layout, idx, &mut changes);
            }
        }
        debug!(
            step,
            shown = changes.shown.len(),
            hidden = changes.hidden.len(),
            "applied animation step"
        );
        changes
    }

    fn hide_frequency(&mut self, layout: &LayoutResult, idx: usize, changes: &mut StepChanges) {
        if !self.visible[idx] {
            return;
        }
        self.visible[idx] = false;
        changes.hidden.push(idx);
        for link in layout.links_from(idx) {
            let target = link.target;
            self.active_links[target] = self.active_links[target].saturating_sub(1);
            if self.active_links[target] == 0 && self.visible[target] {
                self.visible[target] = false;
                changes.hidden.push(target);
            }
        }
    }

    fn show_frequency(&mut self, layout: &LayoutResult, idx: usize, changes: &mut StepChanges) {
        if self.visible[idx] {
            return;
        }
        self.visible[idx] = true;
        changes.shown.push(idx);
        for link in layout.links_from(idx) {
            let target = link.target;
            if self.active_links[target] == 0 && !self.visible[target] {
                self.visible[target] = true;
                changes.shown.push(target);
            }
            self.active_links[target] += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Advanced(usize),
    /// The last step was reached; playback rewound to step 0 and stopped.
    Finished,
}

/// Play/pause state of the step animation. Timers are owned by the caller,
/// which calls [`Playback::tick`] every `velocity_ms` while playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    current: usize,
    last: usize,
    playing: bool,
    velocity_ms: u64,
}

impl Playback {
    pub fn new(layout: &LayoutResult, velocity_ms: u64) -> Self {
        Self {
            current: 0,
            last: step_count(layout).saturating_sub(1),
            playing: false,
            velocity_ms,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn velocity_ms(&self) -> u64 {
        self.velocity_ms
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn set_velocity(&mut self, velocity_ms: u64) -> u64 {
        self.velocity_ms = velocity_ms;
        self.velocity_ms
    }

    pub fn tick(&mut self) -> Tick {
        if self.current == self.last {
            self.current = 0;
            self.playing = false;
            Tick::Finished
        } else {
            self.current += 1;
            Tick::Advanced(self.current)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{NodeKind, layout};
    use crate::model::{Interval, RawNode};
    use crate::normalize::normalize;

    fn sample() -> LayoutResult {
        let raw = vec![
            vec![
                RawNode::attribute("1", "Milk"),
                RawNode::attribute("2", "Bread"),
                RawNode::frequency(
                    "a",
                    vec![
                        Interval::new(10.0, None),
                        Interval::new(2.0, None),
                        Interval::new(8.0, None),
                    ],
                ),
            ],
            vec![
                RawNode::attribute("1", "Milk"),
                RawNode::frequency(
                    "b",
                    vec![Interval::new(10.0, None), Interval::new(1.0, None)],
                ),
            ],
        ];
        layout(&normalize(&raw).unwrap(), 1200.0, 800.0, |p| p).unwrap()
    }

    #[test]
    fn counts_the_longest_interval_sequence() {
        assert_eq!(step_count(&sample()), 3);
    }

    #[test]
    fn hides_exclusive_attributes_with_their_frequency() {
        let layout = sample();
        let a = layout.find(NodeKind::Frequency, "a").unwrap();
        let b = layout.find(NodeKind::Frequency, "b").unwrap();
        let milk = layout.find(NodeKind::Attribute, "1").unwrap();
        let bread = layout.find(NodeKind::Attribute, "2").unwrap();

        let mut visibility = Visibility::new(&layout);
        assert!(visibility.apply_step(&layout, 0, 5.0).is_empty());

        let changes = visibility.apply_step(&layout, 1, 5.0);
        assert!(!visibility.is_visible(a));
        assert!(!visibility.is_visible(b));
        assert!(!visibility.is_visible(milk));
        assert!(!visibility.is_visible(bread));
        assert_eq!(changes.hidden.len(), 4);

        // "b" has no data at step 2 and stays hidden; "a" comes back.
        let changes = visibility.apply_step(&layout, 2, 5.0);
        assert!(visibility.is_visible(a));
        assert!(!visibility.is_visible(b));
        assert!(visibility.is_visible(milk));
        assert!(visibility.is_visible(bread));
        assert_eq!(changes.shown.len(), 3);
    }

    #[test]
    fn shared_attribute_survives_while_one_frequency_is_visible() {
        let layout = sample();
        let milk = layout.find(NodeKind::Attribute, "1").unwrap();
        let bread = layout.find(NodeKind::Attribute, "2").unwrap();
        let visibility = Visibility::at_step(&layout, 1, 1.5);
        // "a" (2.0) stays, "b" (1.0) hides.
        assert!(visibility.is_visible(milk));
        assert!(visibility.is_visible(bread));
        let b = layout.find(NodeKind::Frequency, "b").unwrap();
        assert!(!visibility.is_visible(b));
    }

    #[test]
    fn playback_rewinds_after_the_last_step() {
        let layout = sample();
        let mut playback = Playback::new(&layout, 2500);
        playback.play();
        assert_eq!(playback.tick(), Tick::Advanced(1));
        assert_eq!(playback.tick(), Tick::Advanced(2));
        assert_eq!(playback.tick(), Tick::Finished);
        assert_eq!(playback.current(), 0);
        assert!(!playback.is_playing());
        assert_eq!(playback.set_velocity(1000), 1000);
    }
}
