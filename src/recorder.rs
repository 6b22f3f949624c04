use crate::geometry::Point;
use crate::pathfinding::{Route, RouteKind};
use log::trace;

/// Spatially subsampled history of an agent's positions.
///
/// A new sample is stored only once the agent has moved at least
/// `sample_spacing` from the previous one. When the history grows past
/// `max_points` it is cut back to the newest `max_points` samples.
#[derive(Clone, Debug)]
pub struct TrajectoryRecorder {
    sample_spacing: f32,
    max_points: usize,
    samples: Vec<Point>,
}

impl TrajectoryRecorder {
    pub fn new(sample_spacing: f32, max_points: usize) -> Self {
        TrajectoryRecorder {
            sample_spacing,
            max_points,
            samples: Vec::new(),
        }
    }

    pub fn sample_spacing(&self) -> f32 {
        self.sample_spacing
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn samples(&self) -> &[Point] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Record an agent position (call once per frame after movement)
    pub fn record(&mut self, position: Point) {
        let Some(last) = self.samples.last() else {
            self.samples.push(position);
            return;
        };

        if last.distance_squared(&position) >= self.sample_spacing * self.sample_spacing {
            self.samples.push(position);
            if self.samples.len() > self.max_points {
                let excess = self.samples.len() - self.max_points;
                self.samples.drain(..excess);
                trace!("[TrajectoryRecorder] dropped {} oldest samples", excess);
            }
        }
    }

    /// Forget every sample
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Index of the sample nearest to `position`; the earliest wins exact ties
    fn nearest_index(&self, position: Point) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, sample) in self.samples.iter().enumerate() {
            let d2 = sample.distance_squared(&position);
            match best {
                Some((_, best_d2)) if d2 >= best_d2 => {}
                _ => best = Some((i, d2)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Walk-back route from `current` to the oldest sample.
    ///
    /// The history is cut at the sample nearest to `current` and reversed.
    /// With `include_current`, that nearest sample is replaced by `current`
    /// itself so the retrace starts exactly where the agent stands.
    pub fn backtrack(&self, current: Point, include_current: bool) -> Route {
        let Some(nearest) = self.nearest_index(current) else {
            return Route::empty(RouteKind::Retrace);
        };

        let mut back: Vec<Point> = self.samples[..=nearest].to_vec();
        if include_current {
            if let Some(last) = back.last_mut() {
                *last = current;
            }
        }
        back.reverse();

        trace!(
            "[TrajectoryRecorder] backtrack from sample {} of {}",
            nearest,
            self.samples.len()
        );
        Route::new(RouteKind::Retrace, back)
    }
}
