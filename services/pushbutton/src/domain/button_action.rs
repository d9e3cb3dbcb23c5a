/// ボタン押下で実行する業務アクションと、クリック種別との対応
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::ClickType;

/// アクション名のパースエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown button action: {0}")]
pub struct ButtonActionParseError(pub String);

/// 業務アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    /// ラインの実績数（actual）を1増やす
    IncrementProductCount,
    /// ラインの不良数（scrap）を1増やす
    IncrementScrapCount,
    /// 設備のサイクルカウントを1増やす
    IncrementMachineCycleCount,
    /// Code Redディスパッチを発行する
    LaunchCodeRedDispatch,
}

impl ButtonAction {
    /// 設定値として使う名前
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonAction::IncrementProductCount => "increment_product_count",
            ButtonAction::IncrementScrapCount => "increment_scrap_count",
            ButtonAction::IncrementMachineCycleCount => "increment_machine_cycle_count",
            ButtonAction::LaunchCodeRedDispatch => "launch_code_red_dispatch",
        }
    }
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ButtonAction {
    type Err = ButtonActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "increment_product_count" => Ok(ButtonAction::IncrementProductCount),
            "increment_scrap_count" => Ok(ButtonAction::IncrementScrapCount),
            "increment_machine_cycle_count" => Ok(ButtonAction::IncrementMachineCycleCount),
            "launch_code_red_dispatch" => Ok(ButtonAction::LaunchCodeRedDispatch),
            other => Err(ButtonActionParseError(other.to_string())),
        }
    }
}

/// クリック種別 -> アクションの対応
///
/// SINGLEとLONGは固定。DOUBLEは不良数加算とサイクルカウント加算の
/// どちらを使うかを設定で選ぶ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionMap {
    double: ButtonAction,
}

impl ActionMap {
    /// DOUBLEに割り当てるアクションを指定して作成
    pub fn with_double_click(double: ButtonAction) -> Self {
        Self { double }
    }

    /// クリック種別に対応するアクションを返す
    pub fn action_for(&self, click_type: ClickType) -> ButtonAction {
        match click_type {
            ClickType::Single => ButtonAction::IncrementProductCount,
            ClickType::Double => self.double,
            ClickType::Long => ButtonAction::LaunchCodeRedDispatch,
        }
    }
}

impl Default for ActionMap {
    fn default() -> Self {
        Self::with_double_click(ButtonAction::IncrementScrapCount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let map = ActionMap::default();

        assert_eq!(
            map.action_for(ClickType::Single),
            ButtonAction::IncrementProductCount
        );
        assert_eq!(
            map.action_for(ClickType::Double),
            ButtonAction::IncrementScrapCount
        );
        assert_eq!(
            map.action_for(ClickType::Long),
            ButtonAction::LaunchCodeRedDispatch
        );
    }

    #[test]
    fn test_double_click_can_select_cycle_count() {
        let map = ActionMap::with_double_click(ButtonAction::IncrementMachineCycleCount);

        assert_eq!(
            map.action_for(ClickType::Double),
            ButtonAction::IncrementMachineCycleCount
        );
        assert_eq!(
            map.action_for(ClickType::Single),
            ButtonAction::IncrementProductCount
        );
    }

    #[test]
    fn test_action_name_parsing() {
        for action in [
            ButtonAction::IncrementProductCount,
            ButtonAction::IncrementScrapCount,
            ButtonAction::IncrementMachineCycleCount,
            ButtonAction::LaunchCodeRedDispatch,
        ] {
            assert_eq!(action.as_str().parse::<ButtonAction>(), Ok(action));
        }
    }

    #[test]
    fn test_unknown_action_name() {
        let result = "reset_counter".parse::<ButtonAction>();
        assert_eq!(
            result,
            Err(ButtonActionParseError("reset_counter".to_string()))
        );
    }
}
