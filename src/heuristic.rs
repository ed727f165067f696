use std::f64::consts::SQRT_2;

use clap::ValueEnum;

use crate::map::Position;

/// Estimate of the remaining steps between two positions.
///
/// Every variant is no greater than the Manhattan distance, so none of them
/// overestimates the number of orthogonal unit steps left to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Heuristic {
    #[default]
    Euclidean,
    Manhattan,
    Octile,
    Chebyshev,
}

impl Heuristic {
    pub fn all() -> &'static [Heuristic] {
        static ALL_HEURISTICS: [Heuristic; 4] = [
            Heuristic::Euclidean,
            Heuristic::Manhattan,
            Heuristic::Octile,
            Heuristic::Chebyshev,
        ];

        &ALL_HEURISTICS
    }

    pub fn estimate(&self, from: &Position, to: &Position) -> f64 {
        let dx = from.x().abs_diff(to.x()) as f64;
        let dy = from.y().abs_diff(to.y()) as f64;
        match self {
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Manhattan => dx + dy,
            Heuristic::Octile => {
                let f = SQRT_2 - 1.0;
                if dx < dy {
                    f * dx + dy
                } else {
                    f * dy + dx
                }
            }
            Heuristic::Chebyshev => dx.max(dy),
        }
    }
}
