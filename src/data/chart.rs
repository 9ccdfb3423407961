//! Rolling buffer of drift chart points.

use std::collections::VecDeque;

use serde::Serialize;

/// A single labelled chart sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Bounded FIFO of chart points.
///
/// Holds at most `capacity` points. Pushing onto a full buffer evicts the
/// point that arrived first, regardless of its label or value.
#[derive(Debug, Clone, Serialize)]
pub struct ChartBuffer {
    points: VecDeque<ChartPoint>,
    capacity: usize,
}

impl ChartBuffer {
    /// Create an empty buffer. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, returning the evicted point if the buffer was full.
    pub fn push(&mut self, point: ChartPoint) -> Option<ChartPoint> {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front()
        } else {
            None
        }
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

    pub fn iter(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    /// Most recent point, if any.
    pub fn latest(&self) -> Option<&ChartPoint> {
        self.points.back()
    }

    /// Points as `(x, y)` pairs with x the position in the buffer.
    pub fn series(&self) -> Vec<(f64, f64)> {
        self.points.iter().enumerate().map(|(i, p)| (i as f64, p.value)).collect()
    }

    /// Largest value in the buffer, or `None` when empty.
    pub fn max_value(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::max)
    }
}
