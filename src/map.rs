use std::{collections::LinkedList, error, fmt::Display, str::FromStr};

use clap::ValueEnum;
use log::debug;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    heuristic::Heuristic,
    search::{PathFinder, SearchError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InconsistentRow(usize, usize),
    MultipleStartPosition(Position, Position),
    MultipleEndPosition(Position, Position),
    InvalidCharForMap(char, Position),
    NoStartPosition,
    NoEndPosition,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InconsistentRow(expect_col_n, this_col_n) => write!(
                f,
                "Expect {} column(s) in each row, given {}.",
                expect_col_n, this_col_n
            ),
            Error::MultipleStartPosition(last_pos, pos) => write!(
                f,
                "Expect only one start position, given two({}, {}).",
                last_pos, pos
            ),
            Error::MultipleEndPosition(last_pos, pos) => write!(
                f,
                "Expect only one end position, given two({}, {}).",
                last_pos, pos
            ),
            Error::InvalidCharForMap(c, pos) => {
                write!(f, "Invalid character({}) for map at {}.", c, pos)
            }
            Error::NoStartPosition => write!(f, "No start position in map."),
            Error::NoEndPosition => write!(f, "No end position in map."),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn all_dirs() -> &'static [Direction] {
        static ALL_DIRECTIONS: [Direction; 4] = [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ];

        &ALL_DIRECTIONS
    }

    /// Direction of a single orthogonal step from `from` to `to`, if they are adjacent.
    pub fn between(from: &Position, to: &Position) -> Option<Self> {
        Self::all_dirs()
            .iter()
            .copied()
            .find(|dir| from.neighbor(*dir).is_some_and(|pos| pos == *to))
    }

    pub fn arrow(&self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    x: usize,
    y: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn neighbor(&self, dir: Direction) -> Option<Self> {
        match dir {
            Direction::Up if self.y > 0 => Some(Self::new(self.x, self.y - 1)),
            Direction::Right => Some(Self::new(self.x + 1, self.y)),
            Direction::Down => Some(Self::new(self.x, self.y + 1)),
            Direction::Left if self.x > 0 => Some(Self::new(self.x - 1, self.y)),
            _ => None,
        }
    }
}

/// Height of a square, `a` being 1 and `z` being 26. Level 0 can't be entered or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Elevation(u8);

impl Elevation {
    pub const IMPASSABLE: Elevation = Elevation(0);
    pub const LOWEST: Elevation = Elevation(1);
    pub const HIGHEST: Elevation = Elevation(26);

    pub fn new(level: u8) -> Option<Self> {
        if (Self::LOWEST.0..=Self::HIGHEST.0).contains(&level) {
            Some(Self(level))
        } else {
            None
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='z' => Some(Self(c as u8 - b'a' + 1)),
            'S' => Some(Self::LOWEST),
            'E' => Some(Self::HIGHEST),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn is_passable(&self) -> bool {
        *self != Self::IMPASSABLE
    }

    /// Stepping down or staying level is always fine, climbing is limited to one level.
    pub fn can_step_to(&self, other: Elevation) -> bool {
        self.is_passable() && other.is_passable() && other.0 <= self.0 + 1
    }
}

/// How the fewest steps from any lowest square get searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Strategy {
    /// One A* search per lowest square, run in parallel.
    #[default]
    Independent,
    /// One breadth-first search backwards from the end.
    Reverse,
}

#[derive(Debug)]
pub struct Map {
    elevations: Vec<Elevation>,
    width: usize,
    height: usize,
    start_pos: Position,
    end_pos: Position,
}

impl FromStr for Map {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_map(s, false)
    }
}

impl Map {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_n(&self) -> usize {
        self.elevations.len()
    }

    pub fn start_pos(&self) -> &Position {
        &self.start_pos
    }

    pub fn end_pos(&self) -> &Position {
        &self.end_pos
    }

    pub fn elevation(&self, pos: &Position) -> Option<Elevation> {
        self.pos_to_ind(pos)
            .and_then(|ind| self.elevations.get(ind))
            .copied()
    }

    pub fn is_inside(&self, pos: &Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn can_step(&self, from: &Position, to: &Position) -> bool {
        match (self.elevation(from), self.elevation(to)) {
            (Some(from_elev), Some(to_elev)) => from_elev.can_step_to(to_elev),
            _ => false,
        }
    }

    /// Positions reachable from `pos` in one step.
    pub fn next_positions<'a>(&'a self, pos: &Position) -> impl Iterator<Item = Position> + 'a {
        let from = *pos;
        Direction::all_dirs()
            .iter()
            .flat_map(move |dir| from.neighbor(*dir))
            .filter(move |to| self.can_step(&from, to))
    }

    /// Positions which can reach `pos` in one step.
    pub fn prev_positions<'a>(&'a self, pos: &Position) -> impl Iterator<Item = Position> + 'a {
        let to = *pos;
        Direction::all_dirs()
            .iter()
            .flat_map(move |dir| to.neighbor(*dir))
            .filter(move |from| self.can_step(from, &to))
    }

    pub fn lowest_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.elevations
            .iter()
            .enumerate()
            .filter(|(_, elev)| **elev == Elevation::LOWEST)
            .map(move |(ind, _)| self.ind_to_pos(ind))
    }

    pub fn fewest_steps(
        &self,
        from: &Position,
        heuristic: Heuristic,
    ) -> Result<Option<usize>, SearchError> {
        PathFinder::new(self, heuristic)
            .search(from, &self.end_pos)
            .map(|report| report.steps_n())
    }

    pub fn fewest_steps_from_start(
        &self,
        heuristic: Heuristic,
    ) -> Result<Option<usize>, SearchError> {
        self.fewest_steps(&self.start_pos, heuristic)
    }

    /// Fewest steps to the end from any lowest square, skipping squares with no path.
    pub fn fewest_steps_from_lowest(
        &self,
        heuristic: Heuristic,
        strategy: Strategy,
    ) -> Result<Option<usize>, SearchError> {
        match strategy {
            Strategy::Independent => self.fewest_steps_from_lowest_independent(heuristic),
            Strategy::Reverse => Ok(self.fewest_steps_from_lowest_reverse()),
        }
    }

    pub fn path_view<'a>(&'a self, path: &'a [Position]) -> PathView<'a> {
        PathView { map: self, path }
    }

    pub(crate) fn pos_to_ind(&self, pos: &Position) -> Option<usize> {
        if self.is_inside(pos) {
            Some(pos.y * self.width + pos.x)
        } else {
            None
        }
    }

    pub(crate) fn ind_to_pos(&self, ind: usize) -> Position {
        Position::new(ind % self.width, ind / self.width)
    }

    fn fewest_steps_from_lowest_independent(
        &self,
        heuristic: Heuristic,
    ) -> Result<Option<usize>, SearchError> {
        let finder = PathFinder::new(self, heuristic);
        let lowest_positions = self.lowest_positions().collect::<Vec<_>>();
        debug!(
            "Searching from {} lowest position(s) to {}.",
            lowest_positions.len(),
            self.end_pos
        );
        let steps_ns = lowest_positions
            .par_iter()
            .map(|pos| finder.search(pos, &self.end_pos).map(|report| report.steps_n()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(steps_ns.into_iter().flatten().min())
    }

    fn fewest_steps_from_lowest_reverse(&self) -> Option<usize> {
        let end_ind = self.pos_to_ind(&self.end_pos)?;
        let mut searched = vec![false; self.cell_n()];
        searched[end_ind] = true;
        let mut search_positions = LinkedList::from([(0, self.end_pos)]);
        while let Some((cur_steps_n, cur_pos)) = search_positions.pop_front() {
            if self
                .elevation(&cur_pos)
                .is_some_and(|elev| elev == Elevation::LOWEST)
            {
                return Some(cur_steps_n);
            }

            for prev_pos in self.prev_positions(&cur_pos) {
                if let Some(prev_ind) = self.pos_to_ind(&prev_pos) {
                    if !searched[prev_ind] {
                        searched[prev_ind] = true;
                        search_positions.push_back((cur_steps_n + 1, prev_pos));
                    }
                }
            }
        }

        None
    }
}

/// Draws a path over its map, pointing each step at the next one.
#[derive(Debug)]
pub struct PathView<'a> {
    map: &'a Map,
    path: &'a [Position],
}

impl Display for PathView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut marks = vec!['.'; self.map.cell_n()];
        for step in self.path.windows(2) {
            if let (Some(ind), Some(dir)) = (
                self.map.pos_to_ind(&step[0]),
                Direction::between(&step[0], &step[1]),
            ) {
                marks[ind] = dir.arrow();
            }
        }
        if let Some(end_ind) = self.map.pos_to_ind(&self.map.end_pos) {
            marks[end_ind] = 'E';
        }

        for (ind, row) in marks.chunks(self.map.width.max(1)).enumerate() {
            if ind > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row.iter().collect::<String>())?;
        }

        Ok(())
    }
}

/// Builds a map row by row.
///
/// A lenient builder turns unknown characters into impassable squares instead of failing.
#[derive(Debug, Default)]
pub struct MapBuilder {
    elevations: Vec<Elevation>,
    row_n: usize,
    col_n: Option<usize>,
    start_pos: Option<Position>,
    end_pos: Option<Position>,
    lenient: bool,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn add_row(&mut self, text: &str) -> Result<(), Error> {
        let this_col_n = text.chars().count();
        let col_n = *self.col_n.get_or_insert(this_col_n);
        if col_n != this_col_n {
            return Err(Error::InconsistentRow(col_n, this_col_n));
        }

        for (ind, c) in text.chars().enumerate() {
            let pos = Position::new(ind, self.row_n);
            match c {
                'S' => {
                    if let Some(last_pos) = self.start_pos {
                        return Err(Error::MultipleStartPosition(last_pos, pos));
                    }

                    self.start_pos = Some(pos);
                }
                'E' => {
                    if let Some(last_pos) = self.end_pos {
                        return Err(Error::MultipleEndPosition(last_pos, pos));
                    }

                    self.end_pos = Some(pos);
                }
                _ => (),
            }

            let elevation = match Elevation::from_char(c) {
                Some(elevation) => elevation,
                None if self.lenient => Elevation::IMPASSABLE,
                None => return Err(Error::InvalidCharForMap(c, pos)),
            };
            self.elevations.push(elevation);
        }
        self.row_n += 1;

        Ok(())
    }

    pub fn build(self) -> Result<Map, Error> {
        let Some(start_pos) = self.start_pos else {
            return Err(Error::NoStartPosition);
        };
        let Some(end_pos) = self.end_pos else {
            return Err(Error::NoEndPosition);
        };

        Ok(Map {
            elevations: self.elevations,
            width: self.col_n.unwrap_or(0),
            height: self.row_n,
            start_pos,
            end_pos,
        })
    }
}

pub fn parse_map(text: &str, lenient: bool) -> Result<Map, Error> {
    let mut builder = MapBuilder::new().lenient(lenient);
    for line in text.lines() {
        builder.add_row(line)?;
    }

    builder.build()
}
