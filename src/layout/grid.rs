/// Configuration for the square-tile gallery grid.
///
/// Behaves like `repeat(auto-fill, minmax(min_tile, 1fr))`: as many columns as
/// fit at the minimum tile size, then the tiles stretch to fill the row.
#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Minimum tile edge in pixels (default: 200)
    pub min_tile: f32,
    /// Gap between tiles, both axes (default: 15)
    pub gap: f32,
    /// Padding around the grid (default: 10)
    pub padding: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            min_tile: 200.0,
            gap: 15.0,
            padding: 10.0,
        }
    }
}

/// Position of one tile, relative to the grid's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Result of laying out `count` tiles at one container width.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMetrics {
    pub columns: usize,
    pub rows: usize,
    pub tile_size: f32,
    pub total_height: f32,
}

impl GridLayout {
    pub fn new(min_tile: f32, gap: f32, padding: f32) -> Self {
        Self {
            min_tile: min_tile.max(1.0),
            gap: gap.max(0.0),
            padding: padding.max(0.0),
        }
    }

    fn content_width(&self, container_width: f32) -> f32 {
        (container_width - 2.0 * self.padding).max(0.0)
    }

    /// `max(1, floor((width + gap) / (min + gap)))`.
    pub fn columns(&self, container_width: f32) -> usize {
        let width = self.content_width(container_width);
        let columns = ((width + self.gap) / (self.min_tile + self.gap)).floor();
        if columns.is_finite() && columns >= 1.0 {
            columns as usize
        } else {
            1
        }
    }

    /// Tile edge once the columns stretch to fill the row.
    pub fn tile_size(&self, container_width: f32) -> f32 {
        let columns = self.columns(container_width) as f32;
        let width = self.content_width(container_width);
        ((width - self.gap * (columns - 1.0)) / columns).max(1.0)
    }

    pub fn metrics(&self, count: usize, container_width: f32) -> GridMetrics {
        let columns = self.columns(container_width);
        let tile_size = self.tile_size(container_width);
        let rows = count.div_ceil(columns);
        let total_height = if rows == 0 {
            2.0 * self.padding
        } else {
            2.0 * self.padding + rows as f32 * tile_size + (rows - 1) as f32 * self.gap
        };
        GridMetrics {
            columns,
            rows,
            tile_size,
            total_height,
        }
    }

    /// Computes every tile position, in catalog order.
    pub fn compute(&self, count: usize, container_width: f32) -> Vec<TilePlacement> {
        let columns = self.columns(container_width);
        let size = self.tile_size(container_width);
        let stride = size + self.gap;

        (0..count)
            .map(|index| {
                let row = index / columns;
                let column = index % columns;
                TilePlacement {
                    index,
                    row,
                    column,
                    x: self.padding + column as f32 * stride,
                    y: self.padding + row as f32 * stride,
                    size,
                }
            })
            .collect()
    }
}
