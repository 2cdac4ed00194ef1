//! Best weekday/hour slots to place a collection call.

use chrono::Weekday;

use crate::types::ContactWindow;

const BASE_PROBABILITY: f64 = 0.3;
const MAX_PROBABILITY: f64 = 0.85;
const FIRST_HOUR: u32 = 8;
const LAST_HOUR: u32 = 19;
pub const TOP_WINDOWS: usize = 10;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn day_multiplier(day: Weekday) -> f64 {
    match day {
        Weekday::Sat | Weekday::Sun => 0.8,
        _ => 1.2,
    }
}

fn hour_multiplier(hour: u32) -> f64 {
    match hour {
        10 | 11 => 1.5,
        14..=16 => 1.4,
        _ => 1.0,
    }
}

/// Score every slot from 08:00 to 19:00 across the week and keep the best ten.
///
/// Ties keep Monday-first, earliest-hour-first order.
pub fn optimal_contact_windows() -> Vec<ContactWindow> {
    let mut windows: Vec<ContactWindow> = WEEK
        .iter()
        .flat_map(|&weekday| {
            (FIRST_HOUR..=LAST_HOUR).map(move |hour| ContactWindow {
                weekday,
                hour,
                success_probability: (BASE_PROBABILITY
                    * day_multiplier(weekday)
                    * hour_multiplier(hour))
                .min(MAX_PROBABILITY),
            })
        })
        .collect();

    windows.sort_by(|a, b| b.success_probability.total_cmp(&a.success_probability));
    windows.truncate(TOP_WINDOWS);
    windows
}
