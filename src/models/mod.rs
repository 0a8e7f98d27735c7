pub mod error_event;
pub mod result_row;
pub mod session_record;
pub mod snapshot;

pub use error_event::ErrorEvent;
pub use result_row::ResultRow;
pub use session_record::SessionRecord;
pub use snapshot::{CharacterSnapshot, Snapshot};
