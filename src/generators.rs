use rand::{Rng, XorShiftRng};

use crate::cells::{Cartesian2DCoordinate, CellState};
use crate::maze::Maze;
use crate::units::{Height, Width};

/// Fill every cell of the maze by an independent random draw.
/// Each cell is one Bernoulli trial: a uniform draw in [0, 1) below the maze's
/// wall probability makes the cell a wall, anything else a space. The cells are
/// visited in row major order taking exactly one draw each, so a generator with
/// a fixed seed reproduces the same fill.
/// Wall probabilities outside [0, 1] are usable, they only bias the fill to all
/// walls or all spaces.
pub fn random_fill(maze: &mut Maze, rng: &mut XorShiftRng) {
    let wall_probability = maze.wall_probability();

    for coord in maze.iter() {
        let state = if rng.gen::<f64>() < wall_probability {
            CellState::Wall
        } else {
            CellState::Space
        };
        *maze.cell_mut(coord).expect("iterated coordinate is in the grid") = state;
    }
}

/// Convert every isolated wall in the interior of the maze to a space.
/// An isolated wall is an interior wall cell whose four axis aligned neighbours
/// (east, south, west, north) are all passable. Border cells are never touched,
/// neither as conversion candidates nor by the sweep.
/// The sweep is a single forward pass in row major order reading the current
/// state of the maze - a wall converted earlier in the pass is seen as a space
/// by the cells checked after it. There is no second pass, so this is not a
/// fixed point iteration.
pub fn remove_isolated_walls(maze: &mut Maze) {
    let (Width(width), Height(height)) = (maze.width(), maze.height());
    if width < 3 || height < 3 {
        return; // no interior cells
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let coord = Cartesian2DCoordinate::new(x as u32, y as u32);
            if maze.cell(coord) != Ok(CellState::Wall) {
                continue;
            }

            let neighbours_to_check = [Cartesian2DCoordinate::new(coord.x + 1, coord.y),
                                       Cartesian2DCoordinate::new(coord.x, coord.y + 1),
                                       Cartesian2DCoordinate::new(coord.x - 1, coord.y),
                                       Cartesian2DCoordinate::new(coord.x, coord.y - 1)];
            let wall_free = neighbours_to_check.iter().all(|&c| {
                maze.cell(c).expect("interior neighbour is in the grid") != CellState::Wall
            });

            if wall_free {
                *maze.cell_mut(coord).expect("interior coordinate is in the grid") =
                    CellState::Space;
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use rand::{SeedableRng, XorShiftRng};

    use super::*;
    use crate::maze::Maze;

    fn test_rng() -> XorShiftRng {
        XorShiftRng::from_seed([1, 2, 3, 4])
    }

    fn cell_states(maze: &Maze) -> Vec<CellState> {
        maze.iter()
            .map(|coord| maze.cell(coord).expect("iterated coordinate is in the grid"))
            .collect()
    }

    #[test]
    fn zero_probability_fills_no_walls() {
        let mut m = Maze::new(Width(8), Height(6), 0.0).unwrap();
        random_fill(&mut m, &mut test_rng());
        assert!(cell_states(&m).iter().all(|&s| s == CellState::Space));

        // clean up only ever converts walls to spaces
        remove_isolated_walls(&mut m);
        assert!(cell_states(&m).iter().all(|&s| s == CellState::Space));
    }

    #[test]
    fn certain_probability_fills_all_walls() {
        let mut m = Maze::new(Width(8), Height(6), 1.0).unwrap();
        random_fill(&mut m, &mut test_rng());
        assert!(cell_states(&m).iter().all(|&s| s == CellState::Wall));

        // no interior cell is isolated when every neighbour is a wall
        remove_isolated_walls(&mut m);
        assert!(cell_states(&m).iter().all(|&s| s == CellState::Wall));
    }

    #[test]
    fn out_of_range_probabilities_saturate() {
        let mut all_walls = Maze::new(Width(5), Height(5), 1.5).unwrap();
        random_fill(&mut all_walls, &mut test_rng());
        assert!(cell_states(&all_walls).iter().all(|&s| s == CellState::Wall));

        let mut no_walls = Maze::new(Width(5), Height(5), -0.5).unwrap();
        random_fill(&mut no_walls, &mut test_rng());
        assert!(cell_states(&no_walls).iter().all(|&s| s == CellState::Space));
    }

    #[test]
    fn isolated_interior_wall_is_removed() {
        let mut m = Maze::new(Width(5), Height(5), 0.0).unwrap();
        let centre = Cartesian2DCoordinate::new(2, 2);
        *m.cell_mut(centre).unwrap() = CellState::Wall;

        remove_isolated_walls(&mut m);
        assert_eq!(m.cell(centre).unwrap(), CellState::Space);
    }

    #[test]
    fn adjacent_interior_walls_are_not_isolated() {
        let mut m = Maze::new(Width(5), Height(5), 0.0).unwrap();
        let a = Cartesian2DCoordinate::new(1, 1);
        let b = Cartesian2DCoordinate::new(2, 1);
        *m.cell_mut(a).unwrap() = CellState::Wall;
        *m.cell_mut(b).unwrap() = CellState::Wall;

        remove_isolated_walls(&mut m);
        assert_eq!(m.cell(a).unwrap(), CellState::Wall);
        assert_eq!(m.cell(b).unwrap(), CellState::Wall);
    }

    #[test]
    fn border_walls_are_never_touched() {
        let mut m = Maze::new(Width(4), Height(4), 0.0).unwrap();
        let border = [Cartesian2DCoordinate::new(0, 1),
                      Cartesian2DCoordinate::new(3, 2),
                      Cartesian2DCoordinate::new(1, 0),
                      Cartesian2DCoordinate::new(2, 3)];
        for &coord in border.iter() {
            *m.cell_mut(coord).unwrap() = CellState::Wall;
        }

        remove_isolated_walls(&mut m);
        for &coord in border.iter() {
            assert_eq!(m.cell(coord).unwrap(), CellState::Wall);
        }
    }

    #[test]
    fn grids_without_an_interior_are_left_alone() {
        for &(w, h) in [(1, 1), (2, 2), (1, 5), (5, 2)].iter() {
            let mut m = Maze::new(Width(w), Height(h), 1.0).unwrap();
            random_fill(&mut m, &mut test_rng());

            remove_isolated_walls(&mut m);
            assert!(cell_states(&m).iter().all(|&s| s == CellState::Wall));
        }
    }

    #[test]
    fn quickcheck_clean_up_never_modifies_the_border() {
        fn prop(w: u8, h: u8, seed: u32) -> TestResult {
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            let (w, h) = (w as usize, h as usize);
            let mut rng = XorShiftRng::from_seed([seed | 1, 0x9E37_79B9, w as u32 + 1, h as u32 + 1]);
            let mut m = Maze::new(Width(w), Height(h), 0.5).unwrap();
            random_fill(&mut m, &mut rng);
            let filled = cell_states(&m);

            remove_isolated_walls(&mut m);

            let border_unchanged = m.iter().all(|coord| {
                let on_border = coord.x == 0 || coord.y == 0 || coord.x as usize == w - 1 ||
                                coord.y as usize == h - 1;
                let index = coord.y as usize * w + coord.x as usize;
                !on_border || m.cell(coord) == Ok(filled[index])
            });
            TestResult::from_bool(border_unchanged)
        }
        quickcheck(prop as fn(u8, u8, u32) -> TestResult);
    }

    #[test]
    fn quickcheck_no_isolated_interior_walls_after_generation() {
        fn prop(w: u8, h: u8, seed: u32) -> TestResult {
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            let mut rng = XorShiftRng::from_seed([seed | 1, 0x2545_F491, w as u32 + 1, h as u32 + 1]);
            let m = Maze::generate(Width(w as usize), Height(h as usize), 0.5, &mut rng).unwrap();
            let (Width(width), Height(height)) = (m.width(), m.height());

            for y in 1..height.saturating_sub(1) {
                for x in 1..width.saturating_sub(1) {
                    let coord = Cartesian2DCoordinate::new(x as u32, y as u32);
                    if m.cell(coord) != Ok(CellState::Wall) {
                        continue;
                    }
                    // an interior wall must keep at least one wall neighbour
                    if m.neighbours(coord).len() == 4 {
                        return TestResult::failed();
                    }
                }
            }
            TestResult::passed()
        }
        quickcheck(prop as fn(u8, u8, u32) -> TestResult);
    }
}
