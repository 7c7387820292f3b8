use chrono::{Days, NaiveDate};

pub(crate) mod helper {
    #[cfg(not(test))]
    pub use super::get_today;
    #[cfg(test)]
    pub use super::mock_chrono::{get_today, set_today};
}


/// today in the server's local calendar, bookings carry no time zone
#[cfg(not(test))]
pub fn get_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `[today, today + window_days]`, saturating at the end of the calendar
pub(crate) fn window_from(today: NaiveDate, window_days: u32) -> (NaiveDate, NaiveDate) {
    let end = today
        .checked_add_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MAX);
    (today, end)
}
