pub mod archive;
pub mod calendar;
pub mod sample;

pub use archive::{ArchiveError, TaxReturnArchive};
pub use calendar::CalendarMonth;
pub use sample::{SampleData, SampleDataError};
