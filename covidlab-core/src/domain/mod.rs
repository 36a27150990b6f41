//! Domain value objects — areas and daily records.

pub mod area;
pub mod record;

pub use area::{Area, DeathsFieldKeys, Nation};
pub use record::{sort_most_recent_first, DailyRecord};
