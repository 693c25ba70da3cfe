//! Integer line rasterisation used for line-of-sight checks.

use super::Position;

/// Rasterises the straight segment `from → to` with Bresenham stepping.
///
/// The returned path starts at `from`, ends at `to` and contains every tile
/// the segment passes through in between. Stepping always runs from `from`
/// towards `to`, so swapping the endpoints may pick a different tile on exact
/// ties.
pub fn line_between(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut path = Vec::with_capacity(dx.max(-dy) as usize + 1);
    let mut x = from.x;
    let mut y = from.y;
    let mut err = dx + dy;

    loop {
        path.push(Position::new(x, y));
        if x == to.x && y == to.y {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line_visits_every_tile() {
        let path = line_between(Position::new(0, 0), Position::new(3, 0));
        assert_eq!(
            path,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(3, 0),
            ]
        );
    }

    #[test]
    fn single_tile_line() {
        let p = Position::new(4, 4);
        assert_eq!(line_between(p, p), vec![p]);
    }

    #[test]
    fn diagonal_neighbour_has_no_intermediate_tiles() {
        let path = line_between(Position::new(5, 5), Position::new(6, 6));
        assert_eq!(path, vec![Position::new(5, 5), Position::new(6, 6)]);
    }

    #[test]
    fn shallow_slope_steps_once_per_column() {
        let path = line_between(Position::new(0, 0), Position::new(4, 2));
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(4, 2)));
        for pair in path.windows(2) {
            assert_eq!(pair[0].chebyshev(pair[1]), 1);
        }
    }
}
