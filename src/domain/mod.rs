/// ドメイン層
///
/// 設定ファイルの内容と同期結果を表す型を提供する。
pub mod entities;
pub mod value_objects;
