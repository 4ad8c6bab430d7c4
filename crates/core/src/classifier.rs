//! イベントをタイトルでカテゴリに振り分ける。

use std::fmt;

use crate::event::Event;

/// イベントのカテゴリ。タイトルから一度だけ決定する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// 開館
    Open,
    /// オンライン開館
    OnlineOpen,
    /// Make の利用枠
    Make,
    /// それ以外のイベント。元のタイトルを保持する。
    Other(String),
}

impl Category {
    /// タイトルからカテゴリを決める。
    ///
    /// 大文字小文字を区別せずに完全一致で比較し、空白のみのタイトルは `None` を返す。
    pub fn from_title(title: &str) -> Option<Self> {
        if title.trim().is_empty() {
            return None;
        }

        let category = match title.to_lowercase().as_str() {
            "open" => Category::Open,
            "online open" => Category::OnlineOpen,
            "make" => Category::Make,
            _ => Category::Other(title.to_string()),
        };
        Some(category)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Open => "open",
            Category::OnlineOpen => "online_open",
            Category::Make => "make",
            Category::Other(_) => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// カテゴリごとのイベント一覧。各リストは入力順を保つ。
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Classification<'a> {
    pub open: Vec<&'a Event>,
    pub online_open: Vec<&'a Event>,
    pub make: Vec<&'a Event>,
    pub other: Vec<&'a Event>,
}

impl Classification<'_> {
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
            && self.online_open.is_empty()
            && self.make.is_empty()
            && self.other.is_empty()
    }
}

/// イベントをカテゴリに振り分ける。
///
/// 日付による絞り込みやタイムゾーン変換は行わないため、呼び出し側で対象期間に絞っておくこと。
pub fn classify<'a, I>(events: I) -> Classification<'a>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut classification = Classification::default();

    for event in events {
        match event.category() {
            Some(Category::Open) => classification.open.push(event),
            Some(Category::OnlineOpen) => classification.online_open.push(event),
            Some(Category::Make) => classification.make.push(event),
            Some(Category::Other(_)) => classification.other.push(event),
            None => {}
        }
    }

    tracing::debug!(
        open = classification.open.len(),
        online_open = classification.online_open.len(),
        make = classification.make.len(),
        other = classification.other.len(),
        "Classified events"
    );

    classification
}
