//! 設定ファイルとディレクトリのフィクスチャ

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use neox::domain::entities::shared_source::SourceSpec;

/// サブモジュールとして扱うエントリ
pub fn submodule(url: &str, out_dir: &str, exclude: &[&str]) -> SourceSpec {
    SourceSpec::new(url)
        .with_out_dir(out_dir)
        .with_submodule(true)
        .with_exclude(exclude.iter().copied())
}

/// `.git` を削除してコピーするエントリ
pub fn detached(url: &str, out_dir: &str, exclude: &[&str]) -> SourceSpec {
    SourceSpec::new(url)
        .with_out_dir(out_dir)
        .with_submodule(false)
        .with_exclude(exclude.iter().copied())
}

/// `neoX.config.json` を書き出す
///
/// `SourceSpec` のシリアライズはURLを伏せるため、JSONを直接組み立てる。
pub fn write_config(dir: &Path, entries: &[Value]) {
    let config = json!({ "shared": entries });
    fs::write(
        dir.join("neoX.config.json"),
        serde_json::to_string_pretty(&config).unwrap(),
    )
    .unwrap();
}

/// 設定ファイルの1エントリ
pub fn entry(repo: &str, out_dir: &str, is_submodule: bool, exclude: &[&str]) -> Value {
    json!({
        "repo": repo,
        "outDir": out_dir,
        "isSubmodule": is_submodule,
        "exclude": exclude,
    })
}

/// `root` 以下のファイルを相対パスで列挙する（ソート済み）
pub fn snapshot(root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(|path| path.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    paths.sort();
    paths
}
