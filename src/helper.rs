use chrono::{DateTime, Datelike, Utc};
use itertools::Itertools;

use crate::view_model::EntryViewModel;

/// The (year, ISO week) bucket a submission made right now would land in.
pub fn current_week(now: DateTime<Utc>) -> (i32, u32) {
    let iso = now.iso_week();
    (iso.year(), iso.week())
}

/// Group entries by their (year, week) bucket for the archive view,
/// newest bucket first.
pub fn entries_by_week(entries: &[EntryViewModel]) -> Vec<((i32, u32), Vec<EntryViewModel>)> {
    entries
        .iter()
        .cloned()
        .into_group_map_by(|entry| (entry.year, entry.week))
        .into_iter()
        .sorted_by(|a, b| b.0.cmp(&a.0))
        .collect()
}
