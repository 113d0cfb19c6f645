//! Calendar facets: stem-branch pairs, time slots, day elements and the
//! approximate lunar date shown alongside every report.
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;

use crate::constants::{
    EPOCH_YEAR, LUNAR_BASE_YEAR, LUNAR_DAYS_PER_MONTH, LUNAR_MONTHS_PER_YEAR,
    WRAP_SLOT_END_HOUR, WRAP_SLOT_START_HOUR,
};
use crate::element::Element;
use crate::numbers::{cycle_index, floor_f64_to_i64, i32_to_f64};

pub const HEAVENLY_STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];
pub const EARTHLY_BRANCHES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

// Two consecutive stems per element, in cycle order.
const STEM_ELEMENTS: [Element; 10] = [
    Element::Wood,
    Element::Wood,
    Element::Fire,
    Element::Fire,
    Element::Earth,
    Element::Earth,
    Element::Metal,
    Element::Metal,
    Element::Water,
    Element::Water,
];

const LUNAR_MONTHS: [&str; 12] = [
    "正月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "冬月", "腊月",
];
const NUMERAL_DIGITS: [&str; 10] = ["", "一", "二", "三", "四", "五", "六", "七", "八", "九"];
const NUMERAL_TENS: [&str; 4] = ["", "十", "二十", "三十"];

/// One of the twelve two-hour periods of the traditional day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub label: &'static str,
    pub range: &'static str,
    pub element: Element,
    pub meaning: &'static str,
}

pub static TIME_SLOTS: [TimeSlot; 12] = [
    TimeSlot { label: "子时", range: "23:00-01:00", element: Element::Water, meaning: "夜半，一阳生" },
    TimeSlot { label: "丑时", range: "01:00-03:00", element: Element::Earth, meaning: "鸡鸣，阴气渐消" },
    TimeSlot { label: "寅时", range: "03:00-05:00", element: Element::Wood, meaning: "平旦，阳气初升" },
    TimeSlot { label: "卯时", range: "05:00-07:00", element: Element::Wood, meaning: "日出，万物苏醒" },
    TimeSlot { label: "辰时", range: "07:00-09:00", element: Element::Earth, meaning: "食时，朝气蓬勃" },
    TimeSlot { label: "巳时", range: "09:00-11:00", element: Element::Fire, meaning: "隅中，阳气旺盛" },
    TimeSlot { label: "午时", range: "11:00-13:00", element: Element::Fire, meaning: "日中，阳气最盛" },
    TimeSlot { label: "未时", range: "13:00-15:00", element: Element::Earth, meaning: "日昳，阳气渐衰" },
    TimeSlot { label: "申时", range: "15:00-17:00", element: Element::Metal, meaning: "晡时，凉风习习" },
    TimeSlot { label: "酉时", range: "17:00-19:00", element: Element::Metal, meaning: "日入，万物归息" },
    TimeSlot { label: "戌时", range: "19:00-21:00", element: Element::Earth, meaning: "黄昏，阴气初生" },
    TimeSlot { label: "亥时", range: "21:00-23:00", element: Element::Water, meaning: "人定，夜深人静" },
];

/// A stem-branch pair with the element carried by its stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StemBranch {
    pub stem_index: usize,
    pub branch_index: usize,
    pub stem: &'static str,
    pub branch: &'static str,
    pub element: Element,
}

impl StemBranch {
    #[must_use]
    pub fn from_offset(offset: i64) -> Self {
        let stem_index = cycle_index(offset, HEAVENLY_STEMS.len());
        let branch_index = cycle_index(offset, EARTHLY_BRANCHES.len());
        Self {
            stem_index,
            branch_index,
            stem: HEAVENLY_STEMS[stem_index],
            branch: EARTHLY_BRANCHES[branch_index],
            element: STEM_ELEMENTS[stem_index],
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{}", self.stem, self.branch)
    }
}

impl fmt::Display for StemBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

/// Year and day stem-branch pairs for a moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StemBranchReading {
    pub year: StemBranch,
    pub day: StemBranch,
    pub year_element: Element,
    pub day_element: Element,
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(EPOCH_YEAR, 1, 1).unwrap_or_default()
}

/// Whole days between the 1984-01-01 epoch and `at`, floored.
#[must_use]
pub fn days_since_epoch(at: NaiveDateTime) -> i64 {
    (at.date() - epoch()).num_days()
}

#[must_use]
pub fn derive_stem_branch(at: NaiveDateTime) -> StemBranchReading {
    let year = StemBranch::from_offset(i64::from(at.year() - EPOCH_YEAR));
    let day = StemBranch::from_offset(days_since_epoch(at));
    StemBranchReading {
        year,
        day,
        year_element: year.element,
        day_element: day.element,
    }
}

/// Slot index for an hour of day; 23:00 and 00:00 share the wrap slot.
#[must_use]
pub const fn time_slot_index(hour: u32) -> usize {
    if hour >= WRAP_SLOT_START_HOUR || hour < WRAP_SLOT_END_HOUR {
        0
    } else {
        ((hour + 1) / 2) as usize
    }
}

#[must_use]
pub fn current_time_slot(at: NaiveDateTime) -> &'static TimeSlot {
    &TIME_SLOTS[time_slot_index(at.hour())]
}

/// Element of the day by ordinal day of year. Container scoring uses this
/// instead of the stem-branch day element.
#[must_use]
pub fn day_element(at: NaiveDateTime) -> Element {
    Element::from_index(i64::from(at.ordinal()))
}

#[must_use]
pub fn element_from_birthday(birthday: NaiveDate) -> Element {
    Element::from_index(i64::from(birthday.year()) + i64::from(birthday.month()))
}

/// Approximate lunar month and day used for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: &'static str,
    pub day: String,
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.month, self.day)
    }
}

#[must_use]
pub fn lunar_date(at: NaiveDateTime) -> LunarDate {
    let year = at.year();
    let scaled = i32_to_f64(year - LUNAR_BASE_YEAR) * LUNAR_MONTHS_PER_YEAR;
    let offset = floor_f64_to_i64(scaled) + i64::from(at.month()) - 1;
    let month = LUNAR_MONTHS[cycle_index(offset, LUNAR_MONTHS.len())];
    let day = (i64::from(at.day()) + offset).rem_euclid(LUNAR_DAYS_PER_MONTH) + 1;
    LunarDate {
        year,
        month,
        day: chinese_numeral(u32::try_from(day).unwrap_or(1)),
    }
}

/// Render 1..=30 with Chinese numerals; 0 and 10 both read 十.
#[must_use]
pub fn chinese_numeral(value: u32) -> String {
    let digit = |n: u32| NUMERAL_DIGITS.get(n as usize).copied().unwrap_or("");
    match value {
        1..=9 => digit(value).to_string(),
        0 | 10 => "十".to_string(),
        11..=19 => format!("十{}", digit(value - 10)),
        _ => {
            let tens = NUMERAL_TENS.get((value / 10) as usize).copied().unwrap_or("");
            format!("{tens}{}", digit(value % 10))
        }
    }
}

/// Calendar facets derived once per report and shared by every scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarFacets {
    pub at: NaiveDateTime,
    pub stem_branch: StemBranchReading,
    pub cycle_day_element: Element,
    pub time_slot: &'static TimeSlot,
    pub lunar: LunarDate,
}

impl CalendarFacets {
    #[must_use]
    pub fn derive(at: NaiveDateTime) -> Self {
        Self {
            at,
            stem_branch: derive_stem_branch(at),
            cycle_day_element: day_element(at),
            time_slot: current_time_slot(at),
            lunar: lunar_date(at),
        }
    }

    /// Day element from the stem-branch calendar.
    #[must_use]
    pub const fn day_element(&self) -> Element {
        self.stem_branch.day_element
    }

    #[must_use]
    pub const fn slot_element(&self) -> Element {
        self.time_slot.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 30, 0))
            .unwrap()
    }

    #[test]
    fn epoch_day_is_first_pair() {
        let reading = derive_stem_branch(at(1984, 1, 1, 0));
        assert_eq!(reading.year.label(), "甲子");
        assert_eq!(reading.day.label(), "甲子");
        assert_eq!(reading.day_element, Element::Wood);
    }

    #[test]
    fn dates_before_epoch_floor_instead_of_truncating() {
        let reading = derive_stem_branch(at(1983, 12, 31, 23));
        assert_eq!(days_since_epoch(at(1983, 12, 31, 23)), -1);
        assert_eq!(reading.day.label(), "癸亥");
        assert_eq!(reading.day_element, Element::Water);
        assert_eq!(reading.year.label(), "癸亥");
    }

    #[test]
    fn modern_year_and_day_pairs() {
        let reading = derive_stem_branch(at(2024, 1, 1, 12));
        assert_eq!(reading.year.label(), "甲辰");
        assert_eq!(days_since_epoch(at(2024, 1, 1, 12)), 14_610);
        assert_eq!(reading.day.label(), "甲午");
        assert_eq!(reading.year_element, Element::Wood);
    }

    #[test]
    fn time_slot_boundaries() {
        assert_eq!(time_slot_index(23), 0);
        assert_eq!(time_slot_index(0), 0);
        assert_eq!(time_slot_index(1), 1);
        assert_eq!(time_slot_index(2), 1);
        assert_eq!(time_slot_index(3), 2);
        assert_eq!(time_slot_index(22), 11);
        assert_eq!(current_time_slot(at(2024, 5, 5, 12)).label, "午时");
    }

    #[test]
    fn cycle_day_element_uses_ordinal() {
        assert_eq!(day_element(at(2024, 1, 1, 8)), Element::Fire);
        assert_eq!(day_element(at(2024, 1, 5, 8)), Element::Wood);
    }

    #[test]
    fn lunar_date_and_numerals() {
        let lunar = lunar_date(at(2024, 10, 16, 9));
        assert_eq!(lunar.month, "七月");
        assert_eq!(lunar.day, "二十九");
        assert_eq!(chinese_numeral(10), "十");
        assert_eq!(chinese_numeral(13), "十三");
        assert_eq!(chinese_numeral(20), "二十");
        assert_eq!(chinese_numeral(30), "三十");
    }

    #[test]
    fn birthday_element_cycles_on_year_plus_month() {
        let birthday = NaiveDate::from_ymd_opt(1995, 3, 14).unwrap();
        assert_eq!(element_from_birthday(birthday), Element::Metal);
    }
}
