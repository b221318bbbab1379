use chrono::NaiveTime;
use daystar_core::view::day_view::{group_into_sections, progress_percent, sort_by_time};
use daystar_core::{DaySection, DayView, ScheduleItem, ScheduleStore, SqliteScheduleRepository};
use daystar_core::db::open_db_in_memory;

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn item(id: &str, time: &str) -> ScheduleItem {
    ScheduleItem::with_id(id, time, format!("activity {id}"))
}

fn section_of(view: &DayView, id: &str) -> Option<DaySection> {
    view.sections
        .iter()
        .find(|group| group.items.iter().any(|item| item.id == id))
        .map(|group| group.section)
}

#[test]
fn sort_orders_by_minutes_since_midnight() {
    let items = vec![
        item("d", "23:10"),
        item("a", "0:05"),
        item("c", "12:00"),
        item("b", "09:45"),
    ];
    let sorted = sort_by_time(&items);
    let minutes: Vec<_> = sorted
        .iter()
        .map(|item| item.minutes_since_midnight().unwrap())
        .collect();
    assert_eq!(minutes, [5, 585, 720, 1390]);
}

#[test]
fn section_boundaries_at_noon_and_six_pm() {
    let items = vec![
        item("late_morning", "11:59"),
        item("noon", "12:00"),
        item("late_afternoon", "17:59"),
        item("six", "18:00"),
    ];
    let view = DayView::compute(&items, at(12, 0));

    assert_eq!(section_of(&view, "late_morning"), Some(DaySection::Morning));
    assert_eq!(section_of(&view, "noon"), Some(DaySection::Afternoon));
    assert_eq!(section_of(&view, "late_afternoon"), Some(DaySection::Afternoon));
    assert_eq!(section_of(&view, "six"), Some(DaySection::Evening));
}

#[test]
fn empty_sections_are_omitted_and_early_hours_are_evening() {
    let sorted = sort_by_time(&[item("night", "02:00"), item("lunch", "12:30")]);
    let sections = group_into_sections(&sorted);

    let titles: Vec<_> = sections.iter().map(|group| group.section.title()).collect();
    assert_eq!(titles, ["Afternoon", "Evening"]);
}

#[test]
fn progress_is_fifty_percent_halfway_through_the_day() {
    let items = vec![item("a", "20:00"), item("b", "08:00")];
    assert_eq!(progress_percent(&sort_by_time(&items), at(14, 0)), 50.0);

    let view = DayView::compute(&items, at(14, 0));
    assert_eq!(view.progress_percent, 50.0);
    assert_eq!(view.rounded_progress(), 50);
}

#[test]
fn single_item_has_zero_progress() {
    let view = DayView::compute(&[item("only", "08:00")], at(14, 0));
    assert_eq!(view.progress_percent, 0.0);
    assert_eq!(view.current_item_id.as_deref(), Some("only"));
}

#[test]
fn current_item_tracks_the_running_window() {
    let items = vec![item("wake", "07:00"), item("school", "08:30"), item("home", "15:00")];

    let before = DayView::compute(&items, at(6, 59));
    assert!(before.current_item().is_none());

    let at_start = DayView::compute(&items, at(8, 30));
    assert_eq!(at_start.current_item().map(|i| i.id.as_str()), Some("school"));

    let evening = DayView::compute(&items, at(21, 0));
    assert_eq!(evening.current_item_id.as_deref(), Some("home"));
}

#[test]
fn unparsable_items_are_skipped_and_reported() {
    let items = vec![item("ok", "10:00"), item("broken", "ten")];
    let view = DayView::compute(&items, at(10, 0));

    assert_eq!(view.skipped_ids, ["broken"]);
    assert_eq!(view.sections.len(), 1);
    assert_eq!(view.sections[0].items.len(), 1);
}

#[test]
fn store_view_reflects_mutations() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ScheduleStore::load(SqliteScheduleRepository::try_new(&conn).unwrap());
    assert!(store.day_view(at(9, 0)).is_empty());

    store.insert(item("dinner", "18:30")).unwrap();
    store.insert(item("breakfast", "07:15")).unwrap();

    let view = store.day_view(at(9, 0));
    let titles: Vec<_> = view.sections.iter().map(|group| group.section.title()).collect();
    assert_eq!(titles, ["Morning", "Evening"]);
    assert_eq!(view.current_item_id.as_deref(), Some("breakfast"));
}
