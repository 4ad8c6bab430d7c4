//! 告知文に埋め込む固定テキスト。

pub const HOUSE: &str = "CAMPHOR- HOUSE";
pub const MAKE: &str = "CAMPHOR- Make";

pub const WELCOME: &str = "みなさんのお越しをお待ちしています!!";
pub const PLEASE_REGISTER: &str = "参加登録をお願いします!!";
pub const LOCATION: &str = "場所: CAMPHOR- HOUSE (https://camph.net/access/)";
pub const ONLINE_DETAILS: &str = "詳しくは CAMPHOR- Channel をご覧ください!!";

/// 開館日を告知するメッセージの末尾に付けるスケジュールへの案内。
pub const SCHEDULE_FOOTER: &str = "その他の開館日はこちら\nhttps://camph.net/schedule/";

/// 時刻範囲の区切り文字。
pub const RANGE_SEPARATOR: &str = "〜";
