/// IoTボタンイベント
///
/// AWS IoT 1-ClickからLambdaに渡されるペイロード。
/// `batteryVoltage`など未使用のフィールドは無視する。
use serde::{Deserialize, Serialize};

use super::ClickType;

/// ボタン押下イベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonEvent {
    /// ボタンのシリアル番号
    pub serial_number: String,
    /// クリック種別
    pub click_type: ClickType,
}

impl ButtonEvent {
    /// 新しいButtonEventを作成
    pub fn new(serial_number: impl Into<String>, click_type: ClickType) -> Self {
        Self {
            serial_number: serial_number.into(),
            click_type,
        }
    }
}
