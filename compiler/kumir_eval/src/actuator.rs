//! The robot device driven by movement and sensor builtins.
//!
//! The engine treats the device as an opaque, failable, side-effecting
//! collaborator behind the [`Actuator`] trait. [`DetachedActuator`] is the
//! default and fails every call; [`GridActuator`] is an in-memory field
//! for tests and command-line runs.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

/// Movement and sensing direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    const fn delta(self) -> (i64, i64) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    const fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "слева",
            Direction::Right => "справа",
            Direction::Up => "сверху",
            Direction::Down => "снизу",
        })
    }
}

/// Failure reported by the device.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActuatorError {
    #[error("robot crashed into a wall ({0})")]
    Collision(Direction),
    #[error("no robot is attached")]
    Detached,
    #[error("{0}")]
    Device(String),
}

impl From<ActuatorError> for kumir_value::EvalError {
    fn from(err: ActuatorError) -> Self {
        kumir_value::actuator_error(err.to_string())
    }
}

/// Commands, sensors, and probes of the robot.
pub trait Actuator {
    fn step(&mut self, direction: Direction) -> Result<(), ActuatorError>;
    fn paint(&mut self) -> Result<(), ActuatorError>;
    fn place_marker(&mut self) -> Result<(), ActuatorError>;
    fn remove_marker(&mut self) -> Result<(), ActuatorError>;

    fn wall(&mut self, direction: Direction) -> Result<bool, ActuatorError>;
    fn free(&mut self, direction: Direction) -> Result<bool, ActuatorError> {
        self.wall(direction).map(|wall| !wall)
    }
    fn cell_painted(&mut self) -> Result<bool, ActuatorError>;
    fn marker_present(&mut self) -> Result<bool, ActuatorError>;

    fn radiation(&mut self) -> Result<f64, ActuatorError>;
    fn temperature(&mut self) -> Result<i64, ActuatorError>;
}

/// No device: every call fails with [`ActuatorError::Detached`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedActuator;

impl Actuator for DetachedActuator {
    fn step(&mut self, _direction: Direction) -> Result<(), ActuatorError> {
        Err(ActuatorError::Detached)
    }
    fn paint(&mut self) -> Result<(), ActuatorError> {
        Err(ActuatorError::Detached)
    }
    fn place_marker(&mut self) -> Result<(), ActuatorError> {
        Err(ActuatorError::Detached)
    }
    fn remove_marker(&mut self) -> Result<(), ActuatorError> {
        Err(ActuatorError::Detached)
    }
    fn wall(&mut self, _direction: Direction) -> Result<bool, ActuatorError> {
        Err(ActuatorError::Detached)
    }
    fn cell_painted(&mut self) -> Result<bool, ActuatorError> {
        Err(ActuatorError::Detached)
    }
    fn marker_present(&mut self) -> Result<bool, ActuatorError> {
        Err(ActuatorError::Detached)
    }
    fn radiation(&mut self) -> Result<f64, ActuatorError> {
        Err(ActuatorError::Detached)
    }
    fn temperature(&mut self) -> Result<i64, ActuatorError> {
        Err(ActuatorError::Detached)
    }
}

type Cell = (i64, i64);

/// Rectangular field with walls on cell edges. The border is walled.
///
/// Cells are `(column, row)` from the top-left corner `(0, 0)`.
#[derive(Clone, Debug)]
pub struct GridActuator {
    width: i64,
    height: i64,
    position: Cell,
    walls: FxHashSet<(Cell, Direction)>,
    painted: FxHashSet<Cell>,
    markers: FxHashSet<Cell>,
    radiation: FxHashMap<Cell, f64>,
    temperature: FxHashMap<Cell, i64>,
}

impl GridActuator {
    /// A `width` × `height` field with the robot in the top-left cell.
    pub fn new(width: i64, height: i64) -> Self {
        GridActuator {
            width: width.max(1),
            height: height.max(1),
            position: (0, 0),
            walls: FxHashSet::default(),
            painted: FxHashSet::default(),
            markers: FxHashSet::default(),
            radiation: FxHashMap::default(),
            temperature: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_robot_at(mut self, column: i64, row: i64) -> Self {
        if self.in_field((column, row)) {
            self.position = (column, row);
        }
        self
    }

    /// Put a wall on the `direction` edge of a cell (both sides of it).
    pub fn add_wall(&mut self, column: i64, row: i64, direction: Direction) {
        let (dx, dy) = direction.delta();
        self.walls.insert(((column, row), direction));
        self.walls
            .insert(((column + dx, row + dy), direction.opposite()));
    }

    pub fn set_radiation(&mut self, column: i64, row: i64, level: f64) {
        self.radiation.insert((column, row), level);
    }

    pub fn set_temperature(&mut self, column: i64, row: i64, degrees: i64) {
        self.temperature.insert((column, row), degrees);
    }

    pub fn position(&self) -> (i64, i64) {
        self.position
    }

    pub fn is_painted(&self, column: i64, row: i64) -> bool {
        self.painted.contains(&(column, row))
    }

    pub fn has_marker(&self, column: i64, row: i64) -> bool {
        self.markers.contains(&(column, row))
    }

    fn in_field(&self, (column, row): Cell) -> bool {
        (0..self.width).contains(&column) && (0..self.height).contains(&row)
    }

    fn blocked(&self, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        let (column, row) = self.position;
        !self.in_field((column + dx, row + dy)) || self.walls.contains(&(self.position, direction))
    }
}

impl Actuator for GridActuator {
    fn step(&mut self, direction: Direction) -> Result<(), ActuatorError> {
        if self.blocked(direction) {
            return Err(ActuatorError::Collision(direction));
        }
        let (dx, dy) = direction.delta();
        self.position = (self.position.0 + dx, self.position.1 + dy);
        Ok(())
    }

    fn paint(&mut self) -> Result<(), ActuatorError> {
        self.painted.insert(self.position);
        Ok(())
    }

    fn place_marker(&mut self) -> Result<(), ActuatorError> {
        self.markers.insert(self.position);
        Ok(())
    }

    fn remove_marker(&mut self) -> Result<(), ActuatorError> {
        if self.markers.remove(&self.position) {
            Ok(())
        } else {
            Err(ActuatorError::Device("no marker in this cell".to_string()))
        }
    }

    fn wall(&mut self, direction: Direction) -> Result<bool, ActuatorError> {
        Ok(self.blocked(direction))
    }

    fn cell_painted(&mut self) -> Result<bool, ActuatorError> {
        Ok(self.painted.contains(&self.position))
    }

    fn marker_present(&mut self) -> Result<bool, ActuatorError> {
        Ok(self.markers.contains(&self.position))
    }

    fn radiation(&mut self) -> Result<f64, ActuatorError> {
        Ok(self.radiation.get(&self.position).copied().unwrap_or(0.0))
    }

    fn temperature(&mut self) -> Result<i64, ActuatorError> {
        Ok(self.temperature.get(&self.position).copied().unwrap_or(0))
    }
}
