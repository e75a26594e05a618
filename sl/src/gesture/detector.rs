//! Swipe direction from consecutive touch positions

use crate::domain::{Swipe, TouchSample};

/// Keeps one slot of touch history and reports direction changes
#[derive(Debug, Clone, Default)]
pub struct GestureDetector {
    last_x: Option<i32>,
    reset_on_release: bool,
}

impl GestureDetector {
    pub fn new(reset_on_release: bool) -> Self {
        Self {
            last_x: None,
            reset_on_release,
        }
    }

    /// Feed one sample; returns the swipe it completes, if any
    pub fn observe(&mut self, sample: TouchSample) -> Option<Swipe> {
        if !sample.active {
            if self.reset_on_release {
                self.last_x = None;
            }
            return None;
        }

        let swipe = match self.last_x {
            Some(last) if sample.x < last => Some(Swipe::Left),
            Some(last) if sample.x > last => Some(Swipe::Right),
            _ => None,
        };
        self.last_x = Some(sample.x);
        swipe
    }

    pub fn last_x(&self) -> Option<i32> {
        self.last_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_sample_sets_reference() {
        let mut detector = GestureDetector::default();
        assert_eq!(detector.observe(TouchSample::touching(500)), None);
        assert_eq!(detector.last_x(), Some(500));
    }

    #[test]
    fn test_directions() {
        let mut detector = GestureDetector::default();
        detector.observe(TouchSample::touching(500));
        assert_eq!(detector.observe(TouchSample::touching(480)), Some(Swipe::Left));
        assert_eq!(detector.observe(TouchSample::touching(900)), Some(Swipe::Right));
        assert_eq!(detector.observe(TouchSample::touching(900)), None);
    }

    #[test]
    fn test_inactive_keeps_stale_position() {
        let mut detector = GestureDetector::new(false);
        detector.observe(TouchSample::touching(700));
        assert_eq!(detector.observe(TouchSample::released()), None);
        assert_eq!(detector.last_x(), Some(700));

        // A new touch further left reads as a left swipe against the old position
        assert_eq!(detector.observe(TouchSample::touching(100)), Some(Swipe::Left));
    }

    #[test]
    fn test_reset_on_release() {
        let mut detector = GestureDetector::new(true);
        detector.observe(TouchSample::touching(700));
        detector.observe(TouchSample::released());
        assert_eq!(detector.last_x(), None);
        assert_eq!(detector.observe(TouchSample::touching(100)), None);
    }

    proptest! {
        #[test]
        fn prop_swipe_follows_strict_ordering(
            samples in proptest::collection::vec((any::<bool>(), 0i32..1920), 1..64)
        ) {
            let mut detector = GestureDetector::default();
            let mut previous: Option<i32> = None;

            for (active, x) in samples {
                let swipe = detector.observe(TouchSample { active, x });
                if !active {
                    prop_assert_eq!(swipe, None);
                    continue;
                }
                let expected = match previous {
                    Some(p) if x < p => Some(Swipe::Left),
                    Some(p) if x > p => Some(Swipe::Right),
                    _ => None,
                };
                prop_assert_eq!(swipe, expected);
                previous = Some(x);
            }
        }
    }
}
