/// ボタンイベントルーター
///
/// シリアル番号から設備を特定し、クリック種別に対応するアクションを
/// 1つだけ実行する。
use thiserror::Error;
use tracing::{info, warn};

use super::action_handler::{ActionHandler, ActionHandlerError};
use crate::domain::{ActionMap, ButtonEvent, RouterResponse, ThingLookupError, ThingRegistry};
use crate::infrastructure::{Clock, OperationsApi};

/// ルーターのエラー型
///
/// いずれもLambdaの呼び出しエラーとしてプラットフォームに返す。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ButtonRouterError {
    /// 対応表に無いボタン
    #[error(transparent)]
    UnknownButton(#[from] ThingLookupError),

    /// アクションの実行に失敗
    #[error("Action failed: {0}")]
    Action(#[from] ActionHandlerError),
}

/// ボタンイベントを処理するルーター
pub struct ButtonRouter<A, C>
where
    A: OperationsApi,
    C: Clock,
{
    registry: ThingRegistry,
    action_map: ActionMap,
    handler: ActionHandler<A, C>,
}

impl<A, C> ButtonRouter<A, C>
where
    A: OperationsApi,
    C: Clock,
{
    /// 新しいButtonRouterを作成
    pub fn new(
        registry: ThingRegistry,
        action_map: ActionMap,
        handler: ActionHandler<A, C>,
    ) -> Self {
        Self {
            registry,
            action_map,
            handler,
        }
    }

    /// ボタンイベントを処理
    ///
    /// # 処理フロー
    /// 1. シリアル番号から設備コードを取得（未登録ならエラー）
    /// 2. クリック種別からアクションを決定
    /// 3. アクションを実行し、結果をログに記録
    /// 4. アクションの成否にかかわらず200応答を返す
    pub async fn handle(&self, event: &ButtonEvent) -> Result<RouterResponse, ButtonRouterError> {
        let thing = self.registry.lookup(&event.serial_number)?;
        let action = self.action_map.action_for(event.click_type);

        info!(
            serial_number = %event.serial_number,
            click_type = %event.click_type,
            machine_code = %thing.machine_code,
            action = %action,
            "ボタンイベント受信"
        );

        let result = self.handler.execute(action, &thing).await?;

        if result.success {
            info!(action = %action, result = ?result.result, "アクション成功");
        } else {
            warn!(action = %action, error = ?result.error, "アクション失敗");
        }

        Ok(RouterResponse::event_run(event))
    }
}
