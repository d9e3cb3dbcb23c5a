/// IoTボタンのクリック種別
///
/// AWS IoT Buttonが送信する`clickType`フィールドの値を型安全に扱う。
use serde::{Deserialize, Serialize};
use std::fmt;

/// ボタンのクリック種別
///
/// ワイヤ上では`SINGLE` / `DOUBLE` / `LONG`の大文字文字列で表現される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClickType {
    /// 1回押し
    Single,
    /// 2回押し
    Double,
    /// 長押し
    Long,
}

impl ClickType {
    /// ワイヤ表現の文字列を返す
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickType::Single => "SINGLE",
            ClickType::Double => "DOUBLE",
            ClickType::Long => "LONG",
        }
    }
}

impl fmt::Display for ClickType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
