//! カレンダーのイベント一覧から開館情報の告知文を生成するライブラリ。
//!
//! フィードの取得や投稿は行わず、イベントと基準時刻を受け取って
//! 投稿するテキストの一覧を返すことだけを担う。

pub mod classifier;
pub mod error;
pub mod event;
pub mod message;
pub mod text;

pub use classifier::{Category, Classification, classify};
pub use error::{Error, Result};
pub use event::{Event, RawEvent, Timestamp};
pub use message::{MessageGenerator, Mode};
