use serde::Serialize;
use std::collections::VecDeque;

/// Number of samples kept for the moisture trend
pub const CHART_CAPACITY: usize = 10;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub moisture: f64,
}

/// Capacity-bounded FIFO feeding the moisture trend chart.
#[derive(Debug, Clone)]
pub struct ChartWindow {
    points: VecDeque<ChartPoint>,
    capacity: usize,
    redraws: u64,
}

impl Default for ChartWindow {
    fn default() -> Self {
        Self::with_capacity(CHART_CAPACITY)
    }
}

impl ChartWindow {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
            redraws: 0,
        }
    }

    /// Appends a sample, evicting the oldest once over capacity, and
    /// requests a redraw.
    pub fn push(&mut self, label: impl Into<String>, moisture: f64) {
        self.points.push_back(ChartPoint {
            label: label.into(),
            moisture,
        });

        while self.points.len() > self.capacity {
            self.points.pop_front();
        }

        self.redraws += 1;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of redraws requested so far
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.moisture).collect()
    }

    /// Renders the window on a fixed 0-100 axis.
    pub fn sparkline(&self) -> String {
        let top = (SPARK_LEVELS.len() - 1) as f64;
        self.points
            .iter()
            .map(|p| {
                let level = (p.moisture.clamp(0.0, 100.0) / 100.0 * top).round() as usize;
                SPARK_LEVELS[level]
            })
            .collect()
    }
}
