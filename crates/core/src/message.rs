//! イベント一覧から告知メッセージを組み立てる。
//!
//! 当日モードではカテゴリごとに 1 件ずつ、週モードでは 7 日間のイベントを
//! カテゴリごとにまとめたメッセージを生成する。

use std::collections::HashSet;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, TimeZone};

use crate::classifier::classify;
use crate::error::{Error, Result};
use crate::event::{Event, Timestamp};
use crate::text::{
    HOUSE, LOCATION, MAKE, ONLINE_DETAILS, PLEASE_REGISTER, SCHEDULE_FOOTER, WELCOME,
};

/// 週モードで対象にする日数。
const WEEK_DAYS: u64 = 7;

/// 当日の告知か、1 週間分の告知か。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Day,
    Week,
}

impl Mode {
    pub fn from_week_flag(week: bool) -> Self {
        if week { Mode::Week } else { Mode::Day }
    }
}

/// 告知メッセージの生成器。
///
/// 「今日」や「今週」の判定はすべて `now` のタイムゾーンで日付に変換してから行う。
pub struct MessageGenerator<Tz: TimeZone> {
    /// 対象期間で絞り込む前のイベント
    events: Vec<Event>,
    /// 基準時刻
    now: DateTime<Tz>,
    /// 日付判定に使うタイムゾーン
    tz: Tz,
    mode: Mode,
}

impl<Tz: TimeZone> MessageGenerator<Tz> {
    pub fn new(events: Vec<Event>, now: DateTime<Tz>, mode: Mode) -> Self {
        let tz = now.timezone();
        Self {
            events,
            now,
            tz,
            mode,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// モードに応じてメッセージを生成する。
    ///
    /// 告知すべきイベントがなければ空の Vec を返す。閉館の案内などは呼び出し側で扱う。
    pub fn generate_messages(&self) -> Result<Vec<String>> {
        match self.mode {
            Mode::Day => self.generate_day_messages(),
            Mode::Week => Ok(self.generate_week_messages()),
        }
    }

    /// 当日のイベントから、開館・オンライン開館・その他の順にメッセージを生成する。
    ///
    /// 同じ日に同じカテゴリのイベントが複数ある場合は、メッセージを 1 件も返さずにエラーとする。
    pub fn generate_day_messages(&self) -> Result<Vec<String>> {
        let today = self.today();
        let todays: Vec<&Event> = self
            .events
            .iter()
            .filter(|event| event.start().date_in(&self.tz) == today)
            .collect();

        tracing::debug!(%today, events = todays.len(), "Generating day messages");

        let classification = classify(todays);
        let open = single(&classification.open, "open", today)?;
        let make = single(&classification.make, "make", today)?;
        let online_open = single(&classification.online_open, "online_open", today)?;
        let other = single(&classification.other, "other", today)?;

        let messages = [
            open.map(|open| self.day_open_message(open, make)),
            online_open.map(|event| self.day_online_open_message(event)),
            other.map(|event| self.day_other_message(event)),
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(messages)
    }

    /// 今日から 7 日間のイベントをカテゴリごとに 1 件のメッセージにまとめる。
    pub fn generate_week_messages(&self) -> Vec<String> {
        let today = self.today();
        let end = today + Days::new(WEEK_DAYS);

        let mut events: Vec<&Event> = self
            .events
            .iter()
            .filter(|event| {
                let date = event.start().date_in(&self.tz);
                today <= date && date < end
            })
            .collect();
        events.sort_by_key(|event| event.start().in_tz(&self.tz));

        tracing::debug!(%today, %end, events = events.len(), "Generating week messages");

        let classification = classify(events);
        let make_dates: HashSet<NaiveDate> = classification
            .make
            .iter()
            .map(|make| make.start().date_in(&self.tz))
            .collect();

        let open = (!classification.open.is_empty()).then(|| {
            let entries = classification.open.iter().map(|open| {
                let label = open.day_label(&self.tz);
                if make_dates.contains(&open.start().date_in(&self.tz)) {
                    format!("{label} (Make)")
                } else {
                    label
                }
            });
            week_message(
                format!("今週の {HOUSE} の開館日です。"),
                entries,
                &[WELCOME, SCHEDULE_FOOTER],
            )
        });

        let online_open = (!classification.online_open.is_empty()).then(|| {
            let entries = classification
                .online_open
                .iter()
                .map(|event| event.day_label(&self.tz));
            week_message(
                format!("今週の {HOUSE} のオンライン開館日です。"),
                entries,
                &[ONLINE_DETAILS, SCHEDULE_FOOTER],
            )
        });

        let other = (!classification.other.is_empty()).then(|| {
            let entries = classification.other.iter().map(|event| {
                let label = event.day_label_with_title(&self.tz);
                match event.url() {
                    Some(url) => format!("{label}\n{url}"),
                    None => label,
                }
            });
            week_message(
                "今週のイベント情報です。".to_string(),
                entries,
                &[PLEASE_REGISTER],
            )
        });

        [open, online_open, other].into_iter().flatten().collect()
    }

    fn day_open_message(&self, open: &Event, make: Option<&Event>) -> String {
        let overlay = make.map(|make| {
            if open.same_hours_as(make, &self.tz) {
                format!("{MAKE} も利用できます。")
            } else {
                format!("{MAKE} は{}に利用できます。", make.time_range(&self.tz))
            }
        });

        join_lines([
            Some(format!(
                "本日の {HOUSE} の開館時間は{}です。",
                open.time_range(&self.tz)
            )),
            overlay,
            Some(WELCOME.to_string()),
            Some(LOCATION.to_string()),
            Some(SCHEDULE_FOOTER.to_string()),
        ])
    }

    fn day_online_open_message(&self, event: &Event) -> String {
        join_lines([
            Some(format!(
                "本日の {HOUSE} のオンライン開館時間は{}です。",
                event.time_range(&self.tz)
            )),
            Some(ONLINE_DETAILS.to_string()),
            Some(SCHEDULE_FOOTER.to_string()),
        ])
    }

    fn day_other_message(&self, event: &Event) -> String {
        join_lines([
            Some(format!(
                "「{}」を{}に開催します!",
                event.title(),
                event.time_range(&self.tz)
            )),
            Some(WELCOME.to_string()),
            event.url().map(str::to_string),
        ])
    }
}

impl MessageGenerator<FixedOffset> {
    /// 型を持たない基準時刻から生成器を作る。
    ///
    /// オフセットを持たない時刻では日付の境界が決まらないため `MissingTimezone` を返す。
    pub fn from_timestamp(events: Vec<Event>, now: Timestamp, mode: Mode) -> Result<Self> {
        match now {
            Timestamp::Aware(now) => Ok(Self::new(events, now, mode)),
            Timestamp::Naive(_) => Err(Error::MissingTimezone),
        }
    }
}

/// 0 件か 1 件であることを確認する。
fn single<'a>(
    events: &[&'a Event],
    category: &'static str,
    date: NaiveDate,
) -> Result<Option<&'a Event>> {
    match events {
        [] => Ok(None),
        [event] => Ok(Some(*event)),
        _ => Err(Error::DuplicateEvent {
            category,
            date,
            count: events.len(),
        }),
    }
}

fn join_lines(fragments: impl IntoIterator<Item = Option<String>>) -> String {
    fragments.into_iter().flatten().collect::<Vec<_>>().join("\n")
}

fn week_message(
    header: String,
    entries: impl Iterator<Item = String>,
    trailer: &[&str],
) -> String {
    std::iter::once(header)
        .chain(entries)
        .chain(trailer.iter().map(|line| line.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}
