/// アクション実行結果
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 各アクションが返す構造化された結果
///
/// 成功時は`result`に書き込みAPIの応答データ、
/// 失敗時は`error`に理由を格納する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    /// 成功結果を作成
    pub fn success(result: Option<Value>) -> Self {
        Self {
            success: true,
            result,
            error: None,
        }
    }

    /// 失敗結果を作成
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}
