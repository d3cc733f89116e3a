pub mod entity;
pub mod invariants;

pub use entity::{
    format_clock, parse_clock, DayOfWeek, NewSchedule, Schedule, ScheduleChanges, ScheduleDetail,
};
pub use invariants::{validate_new_schedule, validate_schedule};
