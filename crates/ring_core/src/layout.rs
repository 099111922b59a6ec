//! Circular layout, a pure function of the label set.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::{Layout, NodeLabel, Position};

/// Canvas the ring is drawn on. The ring is centred on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            radius: 120.0,
        }
    }
}

impl Canvas {
    pub fn center(&self) -> Position {
        Position {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutAssigner {
    pub canvas: Canvas,
}

impl LayoutAssigner {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// Places labels evenly on the ring in lexicographic order, starting at
    /// angle 0 (the right-hand side of the canvas) and going clockwise in
    /// screen coordinates. Input order is irrelevant.
    pub fn assign<'a, I>(&self, labels: I) -> Layout
    where
        I: IntoIterator<Item = &'a NodeLabel>,
    {
        let mut sorted: Vec<&NodeLabel> = labels.into_iter().collect();
        sorted.sort();
        sorted.dedup();

        let count = sorted.len() as f64;
        let center = self.canvas.center();
        let radius = self.canvas.radius;
        sorted
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let angle = TAU * i as f64 / count;
                let position = Position {
                    x: center.x + radius * angle.cos(),
                    y: center.y + radius * angle.sin(),
                };
                (label.clone(), position)
            })
            .collect()
    }
}
