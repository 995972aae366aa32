use timewics_service::calendar::Calendar;
use timewics_service::export::export;

pub struct EventCase {
    pub name: &'static str,
    /// Content placed between `BEGIN:VCALENDAR` and `END:VCALENDAR`.
    pub body: &'static str,
    pub tags: &'static [&'static str],
    pub expected: &'static [&'static str],
    pub skipped_all_day: &'static [&'static str],
    pub skipped_unbounded: &'static [&'static str],
}

#[expect(clippy::too_many_lines)]
pub fn event_cases() -> Vec<EventCase> {
    vec![
        EventCase {
            name: "single_standup",
            body: "BEGIN:VEVENT\r\n\
SUMMARY:Standup\r\n\
DTSTART:20240101T090000Z\r\n\
DURATION:PT30M\r\n\
END:VEVENT\r\n",
            tags: &[],
            expected: &["inc 20240101T090000Z - 20240101T093000Z # \"Standup\""],
            skipped_all_day: &[],
            skipped_unbounded: &[],
        },
        EventCase {
            name: "weekly_count_byday",
            body: "BEGIN:VEVENT\r\n\
SUMMARY:Planning\r\n\
DTSTART:20240101T100000Z\r\n\
DTEND:20240101T110000Z\r\n\
RRULE:FREQ=WEEKLY;COUNT=2;BYDAY=MO\r\n\
END:VEVENT\r\n",
            tags: &["work"],
            expected: &[
                "inc 20240101T100000Z - 20240101T110000Z # \"Planning\" \"work\"",
                "inc 20240108T100000Z - 20240108T110000Z # \"Planning\" \"work\"",
            ],
            skipped_all_day: &[],
            skipped_unbounded: &[],
        },
        EventCase {
            name: "daily_with_exdate_and_exrule",
            body: "BEGIN:VEVENT\r\n\
SUMMARY:Gym\r\n\
DTSTART:20240101T070000Z\r\n\
DURATION:PT1H\r\n\
RRULE:FREQ=DAILY;UNTIL=20240107T070000Z\r\n\
EXRULE:FREQ=WEEKLY;BYDAY=SA,SU\r\n\
EXDATE:20240103T070000Z\r\n\
END:VEVENT\r\n",
            tags: &[],
            expected: &[
                "inc 20240101T070000Z - 20240101T080000Z # \"Gym\"",
                "inc 20240102T070000Z - 20240102T080000Z # \"Gym\"",
                "inc 20240104T070000Z - 20240104T080000Z # \"Gym\"",
                "inc 20240105T070000Z - 20240105T080000Z # \"Gym\"",
            ],
            skipped_all_day: &[],
            skipped_unbounded: &[],
        },
        EventCase {
            name: "all_day_with_rrule",
            body: "BEGIN:VEVENT\r\n\
SUMMARY:Birthday\r\n\
DTSTART;VALUE=DATE:20240301\r\n\
RRULE:FREQ=YEARLY;COUNT=5\r\n\
END:VEVENT\r\n",
            tags: &[],
            expected: &[],
            skipped_all_day: &["Birthday"],
            skipped_unbounded: &[],
        },
        EventCase {
            name: "until_before_start",
            body: "BEGIN:VEVENT\r\n\
SUMMARY:Never\r\n\
DTSTART:20240101T090000Z\r\n\
DURATION:PT1H\r\n\
RRULE:FREQ=DAILY;UNTIL=20231201T090000Z\r\n\
END:VEVENT\r\n",
            tags: &[],
            expected: &[],
            skipped_all_day: &[],
            skipped_unbounded: &[],
        },
        EventCase {
            name: "unbounded_is_skipped",
            body: "BEGIN:VEVENT\r\n\
SUMMARY:Forever\r\n\
DTSTART:20240101T090000Z\r\n\
DURATION:PT1H\r\n\
RRULE:FREQ=MONTHLY;BYMONTHDAY=1\r\n\
END:VEVENT\r\n",
            tags: &[],
            expected: &[],
            skipped_all_day: &[],
            skipped_unbounded: &["Forever"],
        },
        EventCase {
            name: "zoned_across_dst",
            body: "BEGIN:VEVENT\r\n\
SUMMARY:Call\r\n\
DTSTART;TZID=America/New_York:20240309T093000\r\n\
DTEND;TZID=America/New_York:20240309T100000\r\n\
RRULE:FREQ=DAILY;COUNT=2\r\n\
END:VEVENT\r\n",
            tags: &[],
            expected: &[
                "inc 20240309T143000Z - 20240309T150000Z # \"Call\"",
                "inc 20240310T133000Z - 20240310T140000Z # \"Call\"",
            ],
            skipped_all_day: &[],
            skipped_unbounded: &[],
        },
        EventCase {
            name: "windows_tzid_and_folded_summary",
            body: "BEGIN:VEVENT\r\n\
SUMMARY:Quarterly business\r\n  review\r\n\
DTSTART;TZID=W. Europe Standard Time:20240715T140000\r\n\
DURATION:PT2H\r\n\
END:VEVENT\r\n",
            tags: &["q3"],
            expected: &["inc 20240715T120000Z - 20240715T140000Z # \"Quarterly business review\" \"q3\""],
            skipped_all_day: &[],
            skipped_unbounded: &[],
        },
        EventCase {
            name: "monthly_last_weekday",
            body: "BEGIN:VEVENT\r\n\
SUMMARY:Report\r\n\
DTSTART:20240131T160000Z\r\n\
DURATION:PT45M\r\n\
RRULE:FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1;COUNT=3\r\n\
END:VEVENT\r\n",
            tags: &[],
            expected: &[
                "inc 20240131T160000Z - 20240131T164500Z # \"Report\"",
                "inc 20240229T160000Z - 20240229T164500Z # \"Report\"",
                "inc 20240329T160000Z - 20240329T164500Z # \"Report\"",
            ],
            skipped_all_day: &[],
            skipped_unbounded: &[],
        },
        EventCase {
            name: "alarm_does_not_make_event_timed",
            body: "BEGIN:VEVENT\r\n\
SUMMARY:Reminder\r\n\
DTSTART:20240101T090000Z\r\n\
BEGIN:VALARM\r\n\
TRIGGER:-PT10M\r\n\
DURATION:PT5M\r\n\
END:VALARM\r\n\
END:VEVENT\r\n",
            tags: &[],
            expected: &[],
            skipped_all_day: &["Reminder"],
            skipped_unbounded: &[],
        },
    ]
}

pub fn assert_case(case: &EventCase) {
    let input = format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n{}END:VCALENDAR\r\n", case.body);
    let calendar = Calendar::parse(&input)
        .unwrap_or_else(|err| panic!("Case {} failed to parse: {err}", case.name));

    let tags: Vec<String> = case.tags.iter().map(ToString::to_string).collect();
    let report = export(&calendar, &tags)
        .unwrap_or_else(|err| panic!("Case {} failed to export: {err}", case.name));

    let rendered: Vec<String> = report.entries.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, case.expected, "Case {} did not match", case.name);
    assert_eq!(
        report.skipped_all_day, case.skipped_all_day,
        "Case {} all-day skips",
        case.name
    );
    assert_eq!(
        report.skipped_unbounded, case.skipped_unbounded,
        "Case {} unbounded skips",
        case.name
    );
}
