//! カレンダーフィードの 1 件分のイベントを表す。

use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
    Weekday,
};
use serde::Deserialize;

use crate::classifier::Category;
use crate::error::{Error, Result};
use crate::text::RANGE_SEPARATOR;

/// オフセット付きで解釈する書式。RFC 3339 で読めなかった場合に順に試す。
const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

/// オフセットを持たない書式。
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// フィードから受け取ったままのイベントレコード。
///
/// キーが存在しない場合と `null` の場合はどちらも `None` になる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawEvent {
    pub start: Option<String>,
    pub end: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// イベントの開始・終了時刻。
///
/// フィードがオフセットを含めない場合は `Naive` として保持し、
/// 表示や日付判定のときに指定されたタイムゾーンの壁時計時刻として解釈する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl Timestamp {
    /// 指定したタイムゾーンの時刻に変換する。
    pub fn in_tz<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        match self {
            Timestamp::Aware(dt) => dt.with_timezone(tz),
            // DST の切り替えで存在しない時刻は UTC として読む
            Timestamp::Naive(naive) => tz
                .from_local_datetime(naive)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(naive)),
        }
    }

    /// 指定したタイムゾーンにおける日付を返す。
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.in_tz(tz).date_naive()
    }

    pub fn is_aware(&self) -> bool {
        matches!(self, Timestamp::Aware(_))
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Timestamp::Aware(dt));
        }
        for format in AWARE_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, format) {
                return Ok(Timestamp::Aware(dt));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Timestamp::Naive(naive));
            }
        }

        // 終日イベントは日付のみで届く
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|date| Timestamp::Naive(date.and_time(NaiveTime::MIN)))
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Timestamp::Aware(dt)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Timestamp::Naive(naive)
    }
}

/// カレンダー上の 1 件のイベント。生成後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    start: Timestamp,
    end: Timestamp,
    title: String,
    url: Option<String>,
}

impl Event {
    pub fn new(
        start: impl Into<Timestamp>,
        end: impl Into<Timestamp>,
        title: impl Into<String>,
        url: Option<String>,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            title: title.into(),
            url,
        }
    }

    pub fn start(&self) -> &Timestamp {
        &self.start
    }

    pub fn end(&self) -> &Timestamp {
        &self.end
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// タイトルから決まるカテゴリ。空のタイトルは `None`。
    pub fn category(&self) -> Option<Category> {
        Category::from_title(&self.title)
    }

    /// 開始時刻を `HH:MM` で返す。
    pub fn start_time<Tz: TimeZone>(&self, tz: &Tz) -> String {
        clock(&self.start.in_tz(tz))
    }

    /// 終了時刻を `HH:MM` で返す。
    pub fn end_time<Tz: TimeZone>(&self, tz: &Tz) -> String {
        clock(&self.end.in_tz(tz))
    }

    /// `HH:MM〜HH:MM` 形式の時間帯。
    pub fn time_range<Tz: TimeZone>(&self, tz: &Tz) -> String {
        format!(
            "{}{}{}",
            self.start_time(tz),
            RANGE_SEPARATOR,
            self.end_time(tz)
        )
    }

    /// `MM/DD (曜) HH:MM〜HH:MM` 形式のラベル。
    pub fn day_label<Tz: TimeZone>(&self, tz: &Tz) -> String {
        let start = self.start.in_tz(tz);
        format!(
            "{:02}/{:02} ({}) {}",
            start.month(),
            start.day(),
            weekday_ja(start.weekday()),
            self.time_range(tz)
        )
    }

    /// タイトルを前置したラベル。
    pub fn day_label_with_title<Tz: TimeZone>(&self, tz: &Tz) -> String {
        format!("{} {}", self.title, self.day_label(tz))
    }

    /// 開始・終了時刻がどちらも一致するかどうか。
    ///
    /// オフセットを持たない時刻は `tz` の壁時計時刻として比較する。
    pub fn same_hours_as<Tz: TimeZone>(&self, other: &Event, tz: &Tz) -> bool {
        self.start.in_tz(tz) == other.start.in_tz(tz)
            && self.end.in_tz(tz) == other.end.in_tz(tz)
    }
}

impl TryFrom<RawEvent> for Event {
    type Error = Error;

    fn try_from(raw: RawEvent) -> Result<Self> {
        let start = raw.start.ok_or(Error::MissingField("start"))?;
        let end = raw.end.ok_or(Error::MissingField("end"))?;
        let title = raw.title.ok_or(Error::MissingField("title"))?;

        Ok(Self {
            start: parse_timestamp("start", start)?,
            end: parse_timestamp("end", end)?,
            title,
            url: raw.url,
        })
    }
}

fn parse_timestamp(field: &'static str, value: String) -> Result<Timestamp> {
    value
        .parse()
        .map_err(|_| Error::MalformedTimestamp { field, value })
}

fn clock<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    format!("{:02}:{:02}", dt.hour(), dt.minute())
}

fn weekday_ja(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use chrono_tz::Asia::Tokyo;

    use super::*;

    fn raw(start: &str, end: &str, title: &str, url: Option<&str>) -> RawEvent {
        RawEvent {
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            title: Some(title.to_string()),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_try_from_raw_event() {
        let event = Event::try_from(raw(
            "2015-11-02T17:00:00+09:00",
            "2015-11-02T20:00:00+09:00",
            "Open",
            Some("https://example.com/"),
        ))
        .unwrap();

        assert_eq!(
            event.start().in_tz(&Tokyo),
            Tokyo.with_ymd_and_hms(2015, 11, 2, 17, 0, 0).unwrap()
        );
        assert_eq!(
            event.end().in_tz(&Tokyo),
            Tokyo.with_ymd_and_hms(2015, 11, 2, 20, 0, 0).unwrap()
        );
        assert_eq!(event.title(), "Open");
        assert_eq!(event.url(), Some("https://example.com/"));
    }

    #[test]
    fn test_try_from_raw_event_without_url() {
        let event = Event::try_from(raw(
            "2015-11-02T17:00:00+09:00",
            "2015-11-02T20:00:00+09:00",
            "Open",
            None,
        ))
        .unwrap();

        assert_eq!(event.url(), None);
    }

    #[test]
    fn test_try_from_keeps_instant_of_explicit_offset() {
        let event = Event::try_from(raw(
            "2015-11-02T08:00:00Z",
            "2015-11-02T11:00:00Z",
            "Open",
            None,
        ))
        .unwrap();

        assert_eq!(
            event.start().in_tz(&Utc),
            Utc.with_ymd_and_hms(2015, 11, 2, 8, 0, 0).unwrap()
        );
        assert_eq!(event.start_time(&Tokyo), "17:00");
        assert_eq!(event.end_time(&Tokyo), "20:00");
    }

    #[test]
    fn test_try_from_invalid_time() {
        let result = Event::try_from(raw("ABCDEF", "GHIJK", "Open", None));
        assert_eq!(
            result,
            Err(Error::MalformedTimestamp {
                field: "start",
                value: "ABCDEF".to_string()
            })
        );

        let result = Event::try_from(raw("2015-11-02T17:00:00+09:00", "GHIJK", "Open", None));
        assert!(matches!(
            result,
            Err(Error::MalformedTimestamp { field: "end", .. })
        ));
    }

    #[test]
    fn test_try_from_missing_fields() {
        let result = Event::try_from(RawEvent {
            title: Some("Open".to_string()),
            ..Default::default()
        });
        assert_eq!(result, Err(Error::MissingField("start")));

        let result = Event::try_from(RawEvent {
            start: Some("2015-11-02T17:00:00+09:00".to_string()),
            title: Some("Open".to_string()),
            ..Default::default()
        });
        assert_eq!(result, Err(Error::MissingField("end")));

        let result = Event::try_from(RawEvent {
            start: Some("2015-11-02T17:00:00+09:00".to_string()),
            end: Some("2015-11-02T20:00:00+09:00".to_string()),
            ..Default::default()
        });
        assert_eq!(result, Err(Error::MissingField("title")));
    }

    #[test]
    fn test_empty_title_is_not_an_error() {
        let event = Event::try_from(raw(
            "2015-11-02T17:00:00+09:00",
            "2015-11-02T20:00:00+09:00",
            "",
            None,
        ))
        .unwrap();

        assert_eq!(event.title(), "");
        assert_eq!(event.category(), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let aware: Timestamp = "2021-08-02 15:00:00+09:00".parse().unwrap();
        assert!(aware.is_aware());

        let naive: Timestamp = "2021-08-02T15:00:00".parse().unwrap();
        assert_eq!(
            naive,
            Timestamp::Naive(
                NaiveDate::from_ymd_opt(2021, 8, 2)
                    .unwrap()
                    .and_hms_opt(15, 0, 0)
                    .unwrap()
            )
        );

        let fractional: Timestamp = "2021-08-02T15:00:00.250+09:00".parse().unwrap();
        assert!(fractional.is_aware());

        let date_only: Timestamp = "2021-08-02".parse().unwrap();
        assert_eq!(
            date_only,
            Timestamp::Naive(NaiveDate::from_ymd_opt(2021, 8, 2).unwrap().and_time(NaiveTime::MIN))
        );

        assert!("2021-13-02T15:00:00".parse::<Timestamp>().is_err());
        assert!("".parse::<Timestamp>().is_err());
    }

    #[test]
    fn test_naive_timestamp_is_read_as_wall_clock() {
        let naive: Timestamp = "2021-08-02T15:00:00".parse().unwrap();
        assert_eq!(
            naive.in_tz(&Tokyo),
            Tokyo.with_ymd_and_hms(2021, 8, 2, 15, 0, 0).unwrap()
        );
        assert_eq!(
            naive.date_in(&Tokyo),
            NaiveDate::from_ymd_opt(2021, 8, 2).unwrap()
        );
    }

    #[test]
    fn test_formatting_in_timezone() {
        let event = Event::new(
            Tokyo
                .with_ymd_and_hms(2021, 8, 2, 15, 0, 0)
                .unwrap()
                .fixed_offset(),
            Tokyo
                .with_ymd_and_hms(2021, 8, 2, 19, 0, 0)
                .unwrap()
                .fixed_offset(),
            "Open",
            None,
        );

        assert_eq!(event.start_time(&Tokyo), "15:00");
        assert_eq!(event.end_time(&Tokyo), "19:00");
        assert_eq!(event.time_range(&Tokyo), "15:00〜19:00");
        assert_eq!(event.day_label(&Tokyo), "08/02 (月) 15:00〜19:00");
        assert_eq!(
            event.day_label_with_title(&Tokyo),
            "Open 08/02 (月) 15:00〜19:00"
        );

        // 同じ瞬間でも UTC では日付と時刻が変わる
        assert_eq!(event.day_label(&Utc), "08/02 (月) 06:00〜10:00");
    }

    #[test]
    fn test_day_label_crosses_date_boundary() {
        let event = Event::try_from(raw(
            "2021-08-07T20:00:00Z",
            "2021-08-07T22:00:00Z",
            "Online Open",
            None,
        ))
        .unwrap();

        assert_eq!(event.day_label(&Tokyo), "08/08 (日) 05:00〜07:00");
    }

    #[test]
    fn test_same_hours_as() {
        let open = Event::try_from(raw(
            "2021-08-02T15:00:00+09:00",
            "2021-08-02T19:00:00+09:00",
            "Open",
            None,
        ))
        .unwrap();
        let make_same = Event::try_from(raw(
            "2021-08-02T06:00:00Z",
            "2021-08-02T10:00:00Z",
            "Make",
            None,
        ))
        .unwrap();
        let make_other = Event::try_from(raw(
            "2021-08-02T16:00:00+09:00",
            "2021-08-02T19:00:00+09:00",
            "Make",
            None,
        ))
        .unwrap();

        assert!(open.same_hours_as(&make_same, &Tokyo));
        assert!(!open.same_hours_as(&make_other, &Tokyo));

        // オフセットなしの時刻は比較に使うタイムゾーンの壁時計時刻になる
        let make_naive = Event::try_from(raw(
            "2021-08-02T15:00:00",
            "2021-08-02T19:00:00",
            "Make",
            None,
        ))
        .unwrap();
        assert!(open.same_hours_as(&make_naive, &Tokyo));
        assert!(!open.same_hours_as(&make_naive, &Utc));
    }
}
