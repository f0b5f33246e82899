/// アプリケーション層
///
/// 共有ソースの取得・差分確認・一括実行のユースケースをまとめる。
pub mod services;
pub mod use_cases;
