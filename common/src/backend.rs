//! 生成AIバックエンド
//!
//! CLIは reqwest、Webは fetch で同じリクエストを送る。
//! テストでは固定応答を返すスタブを差し込む。

use crate::error::Result;
use crate::request::GeminiRequest;

/// generateContent 呼び出しの抽象
///
/// WASMのfutureは `Send` でないため、`Send` 境界は要求しない。
#[allow(async_fn_in_trait)]
pub trait GenerativeBackend {
    /// リクエストを送信し、モデルの応答テキストを返す
    ///
    /// 通信・認証・クォータ・5xxは `Error::Service` で返すこと。
    async fn generate(&self, request: &GeminiRequest) -> Result<String>;
}

impl<B: GenerativeBackend + ?Sized> GenerativeBackend for &B {
    async fn generate(&self, request: &GeminiRequest) -> Result<String> {
        (**self).generate(request).await
    }
}
