pub mod grid;

pub use grid::{GridLayout, GridMetrics, TilePlacement};
