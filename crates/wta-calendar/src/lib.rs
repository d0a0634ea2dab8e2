//! `wta-calendar`: weekly working-time calendars per resource.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`weekly`]   | `WeekTime`, `WeeklyInterval`, `split_at_midnight`, `weekly_to_absolute` |
//! | [`calendar`] | `ResourceCalendar`, `UNDIFFERENTIATED_POOL`                     |
//! | [`loader`]   | `load_calendar_json`, `load_calendar_reader`                    |
//! | [`error`]    | `CalendarError`, `CalendarResult<T>`                            |
//!
//! # Lookup model (summary)
//!
//! ```text
//! working_hours(r, W) = merge( weekly_to_absolute(slot, piece)
//!                              for (weekday, piece) in split_at_midnight(W)
//!                              for slot in slots(r) if slot.weekday == weekday )
//! ```
//!
//! The result is always a subset of `W`.

pub mod calendar;
pub mod error;
pub mod loader;
pub mod weekly;


pub use calendar::{ResourceCalendar, UNDIFFERENTIATED_POOL};
pub use error::{CalendarError, CalendarResult};
pub use loader::{load_calendar_json, load_calendar_reader};
pub use weekly::{split_at_midnight, weekly_to_absolute, WeekTime, WeeklyInterval};
