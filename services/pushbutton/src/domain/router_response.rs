/// Lambdaの応答
use serde::{Deserialize, Serialize};

use super::ButtonEvent;

/// `{statusCode, body}`形式の応答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterResponse {
    pub status_code: u16,
    pub body: String,
}

impl RouterResponse {
    /// ボタンイベントを処理したことを示す200応答
    ///
    /// アクションの成否にかかわらず同じ応答を返す。
    pub fn event_run(event: &ButtonEvent) -> Self {
        Self {
            status_code: 200,
            body: format!(
                "{} event run for button {}",
                event.click_type, event.serial_number
            ),
        }
    }
}
