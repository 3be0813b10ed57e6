//! 画像エンコード
//!
//! ファイル内容を送信用の `EncodedImage`（Base64本体 + MIMEタイプ）へ変換する。
//! ブラウザのFileReaderが返すData URLからは接頭辞を取り除く。

use base64::{engine::general_purpose, Engine as _};

use crate::error::{Error, Result};
use crate::types::EncodedImage;

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// 対応画像形式（拡張子, MIMEタイプ）
pub const SUPPORTED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

/// バイト列をBase64化
pub fn encode_bytes(bytes: &[u8], mime_type: &str) -> Result<EncodedImage> {
    let mime_type = mime_type.trim();
    if mime_type.is_empty() {
        return Err(Error::Encoding("MIMEタイプが不明です".into()));
    }
    Ok(EncodedImage::new(
        general_purpose::STANDARD.encode(bytes),
        mime_type,
    ))
}

/// Base64本体を元のバイト列へ戻す
pub fn decode_payload(image: &EncodedImage) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(image.payload.as_bytes())
        .map_err(|e| Error::Encoding(format!("Base64デコード失敗: {}", e)))
}

/// Data URLからBase64データ部分を抽出
///
/// `"data:image/jpeg;base64,/9j/4AAQ..."` → `Some("/9j/4AAQ...")`
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    let rest = data_url.strip_prefix(DATA_URL_SCHEME)?;
    let (header, payload) = rest.split_once(',')?;
    if !header.ends_with(BASE64_MARKER) {
        return None;
    }
    Some(payload)
}

/// Data URLからMIMEタイプを抽出
pub fn extract_mime_type_from_data_url(data_url: &str) -> Option<&str> {
    let rest = data_url.strip_prefix(DATA_URL_SCHEME)?;
    let header = rest.split(',').next()?;
    let mime = header.split(';').next()?.trim();
    if mime.is_empty() {
        None
    } else {
        Some(mime)
    }
}

/// FileReaderのData URLを `EncodedImage` に変換
///
/// MIMEタイプはファイル側の宣言値を優先し、空ならData URLのヘッダを使う。
pub fn encode_data_url(data_url: &str, declared_mime: &str) -> Result<EncodedImage> {
    let payload = extract_base64_from_data_url(data_url)
        .ok_or_else(|| Error::Encoding("Base64形式のData URLではありません".into()))?;

    let mime_type = match declared_mime.trim() {
        "" => extract_mime_type_from_data_url(data_url)
            .ok_or_else(|| Error::Encoding("MIMEタイプが不明です".into()))?,
        declared => declared,
    };

    Ok(EncodedImage::new(payload, mime_type))
}

/// 拡張子からMIMEタイプを判定（大文字小文字は区別しない）
pub fn mime_type_from_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.to_ascii_lowercase();
    SUPPORTED_IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// 画像のMIMEタイプかどうか
pub fn is_image_mime_type(mime_type: &str) -> bool {
    mime_type.trim().to_ascii_lowercase().starts_with("image/")
}
