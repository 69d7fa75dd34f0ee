pub mod report;
pub mod timestamp;
pub mod window;

pub use report::{
    sort_most_recent_first, Attributes, ModificationIndex, ModificationRecord, Report,
    ReportEntry, RunSummary,
};
pub use timestamp::ModDate;
pub use window::DateWindow;
