use serde::{Deserialize, Serialize};

use super::shared_source::SourceSpec;
use crate::common::error::NeoxError;
use crate::common::result::NeoxResult;

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = "neoX.config.json";

/// 設定ファイル全体
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeoxConfig {
    /// 共有ソースのリスト
    #[serde(default)]
    pub shared: Vec<SourceSpec>,
}

impl NeoxConfig {
    /// 新しいNeoxConfigインスタンスを作成
    pub fn new(shared: Vec<SourceSpec>) -> Self {
        Self { shared }
    }

    /// `shared` が1件以上あることを確認する（違反は実行全体のエラー）
    pub fn ensure_has_sources(&self) -> NeoxResult<()> {
        if self.shared.is_empty() {
            return Err(NeoxError::invalid_config(
                "shared",
                "make sure you defined \"shared\" with at least one entry",
            ));
        }
        Ok(())
    }
}
