use almanac_core::{lookup, AlmanacEngine, AlmanacFact};
use chrono::{Datelike, NaiveDate};

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

#[test]
fn every_public_holiday_reports_its_name() {
    let engine = AlmanacEngine::builtin();
    let holidays: Vec<(NaiveDate, String)> = engine
        .holidays()
        .map(|(date, name)| (date, name.to_string()))
        .collect();
    assert_eq!(holidays.len(), 21);

    for (date, name) in holidays {
        let fact = lookup(date);
        assert!(fact.is_public_holiday, "{date} should be a public holiday");
        assert_eq!(fact.remark.as_deref(), Some(name.as_str()));
    }
}

#[test]
fn unlisted_dates_have_no_fact() {
    for date in [d(1, 4), d(4, 20), d(7, 1), d(10, 31), d(11, 30)] {
        assert_eq!(lookup(date), AlmanacFact::empty(), "{date}");
    }
    let other_year = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
    assert_eq!(lookup(other_year), AlmanacFact::empty());
}

#[test]
fn chinese_new_year_days_are_holidays_and_beat_ash_wednesday() {
    assert_eq!(lookup(d(2, 17)), AlmanacFact::public_holiday("CNY Day 1"));
    let second_day = lookup(d(2, 18));
    assert!(second_day.is_public_holiday);
    assert_eq!(second_day.remark.as_deref(), Some("CNY Day 2"));
}

#[test]
fn observances_never_set_holiday_flag() {
    assert_eq!(lookup(d(1, 2)), AlmanacFact::remark("King Tide 1712 hrs (6.0 m)"));
    assert_eq!(lookup(d(2, 19)), AlmanacFact::remark("1st day of Ramadan"));
    assert_eq!(lookup(d(5, 16)), AlmanacFact::remark("Miri City Day"));
    assert_eq!(lookup(d(8, 1)), AlmanacFact::remark("Kuching City Day"));
}

#[test]
fn term_one_break_label_yields_to_exact_holiday() {
    for day in 22..=29 {
        assert_eq!(lookup(d(3, day)), AlmanacFact::remark("Cuti Penggal 1"), "2026-03-{day}");
    }
    assert_eq!(
        lookup(d(3, 21)),
        AlmanacFact::public_holiday("Hari Raya Puasa Day 2")
    );
    assert_eq!(lookup(d(3, 20)), AlmanacFact::public_holiday("Hari Raya Puasa"));
}

#[test]
fn holidays_inside_other_breaks_keep_their_names() {
    assert_eq!(lookup(d(5, 31)), AlmanacFact::public_holiday("Wesak Day"));
    assert_eq!(lookup(d(6, 2)), AlmanacFact::public_holiday("Gawai Dayak Day 2"));
    assert_eq!(lookup(d(6, 3)), AlmanacFact::remark("Cuti Pertengahan Tahun"));
    assert_eq!(lookup(d(8, 31)), AlmanacFact::public_holiday("National Day"));
    assert_eq!(lookup(d(9, 6)), AlmanacFact::remark("Cuti Penggal 2"));
    assert_eq!(lookup(d(12, 25)), AlmanacFact::public_holiday("Christmas Day"));
    assert_eq!(lookup(d(12, 24)), AlmanacFact::remark("Cuti Akhir Tahun"));
}

#[test]
fn lookup_is_total_and_repeatable_over_the_whole_year() {
    let engine = AlmanacEngine::builtin();
    let mut holiday_count = 0;
    for date in d(1, 1).iter_days().take_while(|date| date.year() == 2026) {
        let first = engine.lookup(date);
        assert_eq!(first, engine.lookup(date));
        assert_eq!(engine.is_public_holiday(date), first.is_public_holiday);
        assert_eq!(first.is_empty(), first.remark.is_none());
        if first.is_public_holiday {
            holiday_count += 1;
            assert!(first.remark.is_some());
        }
    }
    assert_eq!(holiday_count, 21);
}

#[test]
fn engine_is_shareable_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| lookup(d(7, 22))))
        .collect();
    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            AlmanacFact::public_holiday("Sarawak Day")
        );
    }
}

#[test]
fn builtin_table_metadata() {
    let engine = AlmanacEngine::builtin();
    assert_eq!(engine.year(), 2026);
    assert_eq!(engine.region(), "Sarawak");
    assert_eq!(engine.holidays().count(), 21);

    let labels: Vec<_> = engine
        .school_breaks()
        .iter()
        .map(|range| range.label.as_str())
        .collect();
    assert_eq!(
        labels,
        [
            "Cuti Penggal 1",
            "Cuti Pertengahan Tahun",
            "Cuti Penggal 2",
            "Cuti Akhir Tahun"
        ]
    );
    assert!(engine.school_breaks()[0].contains(d(3, 29)));
    assert!(!engine.school_breaks()[0].contains(d(3, 30)));
}

#[test]
fn unlisted_date_fact_is_empty() {
    assert!(lookup(d(4, 14)).is_empty());
    assert!(!lookup(d(4, 5)).is_empty());
}
