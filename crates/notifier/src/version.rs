use const_format::formatcp;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_SHA: &str = env!("VERGEN_GIT_SHA");
pub const BUILD_DATE: &str = env!("VERGEN_BUILD_DATE");
pub const TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

const NAME: &str = env!("CARGO_PKG_NAME");

/// clap の `--version` に表示する。
pub fn short_version() -> &'static str {
    formatcp!("{VERSION} ({GIT_SHA} {BUILD_DATE})")
}

/// clap の `--version` 詳細表示用。ビルドターゲットも含める。
pub fn long_version() -> &'static str {
    formatcp!("{VERSION} ({GIT_SHA} {BUILD_DATE})\ntarget: {TARGET_TRIPLE}")
}

/// フィード取得時に送る User-Agent。どのビルドからのアクセスかをサーバー側で追えるようにする。
pub fn user_agent() -> &'static str {
    formatcp!("{NAME}/{VERSION} (+{GIT_SHA})")
}
