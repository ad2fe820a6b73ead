use crate::validators::*;
use chrono::NaiveDateTime;
use std::borrow::Cow;
use validator::ValidationError;

pub fn door_time_valid(door_time: NaiveDateTime, event_start: NaiveDateTime) -> Result<(), ValidationError> {
    if door_time > event_start {
        let mut validation_error =
            create_validation_error("door_time_must_not_be_after_event_start", "Door time must not be after the event start");
        validation_error.add_param(Cow::from("door_time"), &door_time);
        validation_error.add_param(Cow::from("event_start"), &event_start);
        return Err(validation_error);
    }
    Ok(())
}
