//! The measurement grid: coordinates, cell normalization, progress and
//! ordered persistence of edits.

mod coords;
pub mod normalizer;
mod progress;
mod write_queue;

pub use coords::{Axis, AxisOrder, Coordinate, AXIS_ORDER_KEY, MEASUREMENTS, POINTS};
pub use normalizer::Threshold;
pub use progress::{block_progress, GridProgress, GroupProgress};
pub use write_queue::{CellWriteQueue, FlushReport};
