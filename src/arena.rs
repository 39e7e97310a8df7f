use rand::Rng;
use ratatui::layout::Rect;

use crate::metrics::Point;

/// Playing field dimensions in arena pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    /// Horizontal distance from the edge that targets never spawn in.
    pub margin_x: f64,
    /// Vertical distance from the edge that targets never spawn in.
    pub margin_y: f64,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            margin_x: 100.0,
            margin_y: 120.0,
        }
    }
}

impl Arena {
    /// Pick a spawn point on whole-pixel coordinates inside the margins.
    pub fn random_spawn<R: Rng>(&self, rng: &mut R) -> Point {
        let x = rng.gen_range(self.margin_x as i64..=(self.width - self.margin_x) as i64);
        let y = rng.gen_range(self.margin_y as i64..=(self.height - self.margin_y) as i64);
        Point::new(x as f64, y as f64)
    }

    pub fn contains(&self, p: Point) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Terminal cell that draws `p` when the arena is stretched over `area`.
    pub fn point_to_cell(&self, area: Rect, p: Point) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 || !self.contains(p) {
            return None;
        }
        let col = ((p.x / self.width) * area.width as f64).floor() as u16;
        let row = ((p.y / self.height) * area.height as f64).floor() as u16;
        Some((
            area.x + col.min(area.width - 1),
            area.y + row.min(area.height - 1),
        ))
    }

    /// Arena point under the centre of terminal cell (`column`, `row`).
    pub fn cell_to_point(&self, area: Rect, column: u16, row: u16) -> Option<Point> {
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let cell_w = self.width / area.width as f64;
        let cell_h = self.height / area.height as f64;
        Some(Point::new(
            (column - area.x) as f64 * cell_w + cell_w / 2.0,
            (row - area.y) as f64 * cell_h + cell_h / 2.0,
        ))
    }

    /// Whether every point of the arena has some cell centre within
    /// `radius`, i.e. any target drawn over `area` can be clicked.
    pub fn fits_hit_radius(&self, area: Rect, radius: f64) -> bool {
        if area.width == 0 || area.height == 0 {
            return false;
        }
        let cell_w = self.width / area.width as f64;
        let cell_h = self.height / area.height as f64;
        cell_w.hypot(cell_h) / 2.0 <= radius
    }

    /// Every cell of `area` whose centre lies within `radius` of `center`.
    /// Clicking any of them lands inside the radius.
    pub fn cells_within(&self, area: Rect, center: Point, radius: f64) -> Vec<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return vec![];
        }
        let cell_w = self.width / area.width as f64;
        let cell_h = self.height / area.height as f64;

        let col_lo = ((center.x - radius) / cell_w).floor().max(0.0) as u16;
        let col_hi = (((center.x + radius) / cell_w).floor().max(0.0) as u16).min(area.width - 1);
        let row_lo = ((center.y - radius) / cell_h).floor().max(0.0) as u16;
        let row_hi = (((center.y + radius) / cell_h).floor().max(0.0) as u16).min(area.height - 1);

        let mut cells = vec![];
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let p = Point::new(
                    col as f64 * cell_w + cell_w / 2.0,
                    row as f64 * cell_h + cell_h / 2.0,
                );
                if p.distance_to(center) <= radius {
                    cells.push((area.x + col, area.y + row));
                }
            }
        }
        cells
    }
}
