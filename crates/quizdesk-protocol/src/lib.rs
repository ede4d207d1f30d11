//! Wire types shared by the quizdesk server and its collaborators.
//!
//! The session record is owned by the upstream session API; this crate only
//! describes its shape, the field lists used when resubmitting it, and the
//! events announced on the queue side channel.

pub mod events;
pub mod fields;
mod lenient;
pub mod session;

pub use events::SessionEvent;
pub use fields::{DUPLICATE_STRIPPED_FIELDS, UPDATE_STRIPPED_FIELDS, strip_fields};
pub use session::{MetaData, Purpose, RepeatSchedule, Session};
