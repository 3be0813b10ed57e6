//! 画像ファイルの読み込みとエンコード
//!
//! MIMEタイプは拡張子から判定し、判定できなければ内容から推定する。

use soil_ai_common::codec::{encode_bytes, mime_type_from_extension};
use soil_ai_common::session::SelectedFile;
use soil_ai_common::{EncodedImage, Error, Result};
use std::path::Path;

/// ファイルを読み込み、選択情報とエンコード済み画像を返す
pub async fn encode_file(path: &Path) -> Result<(SelectedFile, EncodedImage)> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::Encoding(format!("{}: {}", path.display(), e)))?;

    let mime_type = detect_mime_type(path, &bytes).ok_or_else(|| {
        Error::Encoding(format!("画像形式を判定できません: {}", path.display()))
    })?;

    let image = encode_bytes(&bytes, mime_type)?;
    let file = SelectedFile {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        mime_type: mime_type.to_string(),
        size: bytes.len() as u64,
    };

    tracing::debug!(file = %file.name, mime_type, size = file.size, "image encoded");
    Ok((file, image))
}

/// 拡張子 → 内容の順でMIMEタイプを判定
pub fn detect_mime_type(path: &Path, bytes: &[u8]) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_type_from_extension)
        .or_else(|| {
            image::guess_format(bytes)
                .ok()
                .map(|format| format.to_mime_type())
                .filter(|mime| mime.starts_with("image/"))
        })
}
