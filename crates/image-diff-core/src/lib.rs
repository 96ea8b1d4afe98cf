//! Translation search between two equally sized RGB images.
//!
//! Every integer offset inside a bounded window is tried; for each one the
//! pixels whose color distance reaches a threshold are counted and flagged in a
//! [`DiffMask`]. The offset with the fewest differing pixels wins, the earliest
//! one on ties.

pub mod distance;
pub mod error;
pub mod mask;
pub mod partition;
pub mod search;

pub use self::distance::{RangeTally, color_distance, evaluate};
pub use self::error::SearchError;
pub use self::mask::{DiffMask, MaskRows, Offset, offsets};
pub use self::partition::{PartitionRange, partition};
pub use self::search::{OffsetSearch, Progress, SearchParams, SearchResult, search};
