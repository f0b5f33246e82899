use std::path::{Path, PathBuf};
use tracing::info;

use crate::common::result::NeoxResult;
use crate::infrastructure::filesystem::config_store::ConfigStore;

/// 設定ファイルの雛形を作成するユースケース
pub struct InitConfigUseCase {
    store: ConfigStore,
}

impl InitConfigUseCase {
    /// 新しいInitConfigUseCaseインスタンスを作成
    pub fn new() -> Self {
        Self {
            store: ConfigStore::new(),
        }
    }

    /// `dir` に `neoX.config.json` を作成する
    ///
    /// 既にファイルが存在する場合は `ConfigExists` を返し、内容は変更しない。
    pub async fn execute(&self, dir: &Path) -> NeoxResult<PathBuf> {
        let config_path = ConfigStore::default_path(dir);
        self.store.write_template(&config_path).await?;
        info!("Initialized {}", config_path.display());
        Ok(config_path)
    }
}

impl Default for InitConfigUseCase {
    fn default() -> Self {
        Self::new()
    }
}
