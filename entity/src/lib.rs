use uuid::Uuid;

pub mod folders;
pub mod meeting_status;
pub mod meetings;
pub mod users;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
