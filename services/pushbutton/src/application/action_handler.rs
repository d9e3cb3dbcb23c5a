/// アクションハンドラー
///
/// ボタンに紐づく設備に対して、実績加算・不良加算・サイクルカウント加算・
/// Code Redディスパッチ発行のいずれかを実行する。
/// 各アクションは書き込みAPIを高々1回だけ呼び出す。
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::production_lookup::ProductionLookup;
use crate::domain::{
    ActionResult, ButtonAction, CycleCountIncrement, DispatchRequest,
    PitchDetailRecord, ThingData,
};
use crate::infrastructure::{
    format_api_datetime, ApiClientError, Clock, DispatchSettings, OperationsApi, DEFAULT_LIMIT,
};

const RECORD_DETAILS_PATH: &str = "pitchdetails/record_details/";
const INCREMENT_CYCLE_COUNT_PATH: &str = "machines/increment_cycle_count/";
const DISPATCH_OPEN_PATH: &str = "dispatches/open/";

/// オーダーが見つからない場合のエラーメッセージ
pub const NO_ORDER_FOUND: &str = "No order found";

/// アクション実行のエラー型
///
/// 業務的な失敗（オーダー無し等）は`ActionResult`で表現し、
/// ここには処理を続行できない失敗だけを含める。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionHandlerError {
    /// API呼び出しの失敗
    #[error("API error: {0}")]
    Api(#[from] ApiClientError),

    /// 必須のレコードが存在しない
    #[error("{resource} not found: {key}")]
    RecordNotFound { resource: &'static str, key: String },

    /// レコードに必要なフィールドが無い
    #[error("Invalid record from {path}: {message}")]
    InvalidRecord { path: &'static str, message: String },
}

/// ラインに記録する指標
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineMetric {
    Actual,
    Scrap,
}

/// アクションハンドラー
pub struct ActionHandler<A, C>
where
    A: OperationsApi,
    C: Clock,
{
    api: A,
    clock: C,
    time_zone: Tz,
    dispatch: DispatchSettings,
}

impl<A, C> ActionHandler<A, C>
where
    A: OperationsApi,
    C: Clock,
{
    /// 新しいActionHandlerを作成
    pub fn new(api: A, clock: C, time_zone: Tz, dispatch: DispatchSettings) -> Self {
        Self {
            api,
            clock,
            time_zone,
            dispatch,
        }
    }

    /// アクションを実行
    pub async fn execute(
        &self,
        action: ButtonAction,
        thing: &ThingData,
    ) -> Result<ActionResult, ActionHandlerError> {
        match action {
            ButtonAction::IncrementProductCount => self.increment_product_count(thing).await,
            ButtonAction::IncrementScrapCount => self.increment_scrap_count(thing).await,
            ButtonAction::IncrementMachineCycleCount => {
                self.increment_machine_cycle_count(thing).await
            }
            ButtonAction::LaunchCodeRedDispatch => self.launch_code_red_dispatch(thing).await,
        }
    }

    /// 設備が属するラインの実績数（actual）を1増やす
    pub async fn increment_product_count(
        &self,
        thing: &ThingData,
    ) -> Result<ActionResult, ActionHandlerError> {
        self.record_line_metric(thing, LineMetric::Actual).await
    }

    /// 設備が属するラインの不良数（scrap）を1増やす
    pub async fn increment_scrap_count(
        &self,
        thing: &ThingData,
    ) -> Result<ActionResult, ActionHandlerError> {
        self.record_line_metric(thing, LineMetric::Scrap).await
    }

    /// 設備のサイクルカウントを1増やす
    #[instrument(skip(self), fields(machine_code = %thing.machine_code))]
    pub async fn increment_machine_cycle_count(
        &self,
        thing: &ThingData,
    ) -> Result<ActionResult, ActionHandlerError> {
        let request = CycleCountIncrement {
            code: thing.machine_code.clone(),
            cyclecount: 1,
            skip_lastupdated: 1,
        };
        self.write(INCREMENT_CYCLE_COUNT_PATH, &request).await
    }

    /// 設備に対してCode Redディスパッチを発行する
    #[instrument(skip(self), fields(machine_code = %thing.machine_code))]
    pub async fn launch_code_red_dispatch(
        &self,
        thing: &ThingData,
    ) -> Result<ActionResult, ActionHandlerError> {
        let request = DispatchRequest {
            dispatchtypecode: self.dispatch.dispatch_type_code.clone(),
            description: self.dispatch.description.clone(),
            machinecode: thing.machine_code.clone(),
            tradecode: self.dispatch.trade_code.clone(),
            user: self.dispatch.user.clone(),
        };
        self.write(DISPATCH_OPEN_PATH, &request).await
    }

    /// # 処理フロー
    /// 1. 設備からラインコードを取得
    /// 2. ラインの実行中オーダー、無ければ次オーダーを取得
    /// 3. オーダーの製品コードを取得
    /// 4. 開始・終了を現在時刻として指標を1加算
    #[instrument(skip(self), fields(machine_code = %thing.machine_code))]
    async fn record_line_metric(
        &self,
        thing: &ThingData,
        metric: LineMetric,
    ) -> Result<ActionResult, ActionHandlerError> {
        let lookup = ProductionLookup::new(&self.api);

        let machine = lookup.machine_info(&thing.machine_code).await?;

        let Some(order) = lookup.order_for_line(&machine.linecode).await? else {
            warn!(line_code = %machine.linecode, "オーダーが見つからないため記録しない");
            return Ok(ActionResult::failure(NO_ORDER_FOUND));
        };

        let product = lookup.product_info(&order).await?;

        // サイクル途中の所要時間は追跡しないため開始と終了は同時刻
        let now = format_api_datetime(self.clock.now(), self.time_zone);
        let record = PitchDetailRecord {
            linecode: machine.linecode,
            productcode: product.code,
            start: now.clone(),
            end: now,
            actual: (metric == LineMetric::Actual).then_some(1),
            scrap: (metric == LineMetric::Scrap).then_some(1),
        };

        info!(
            line_code = %record.linecode,
            product_code = %record.productcode,
            metric = ?metric,
            "ライン実績を記録"
        );
        self.write(RECORD_DETAILS_PATH, &record).await
    }

    /// 書き込みAPIを1回呼び出す
    ///
    /// APIが`success: false`または空のデータを返した場合は失敗結果にする。
    async fn write<P>(
        &self,
        path: &'static str,
        payload: &P,
    ) -> Result<ActionResult, ActionHandlerError>
    where
        P: Serialize + Sync,
    {
        match self.api.post(path, payload, DEFAULT_LIMIT).await? {
            Some(result) => Ok(ActionResult::success(Some(result))),
            None => {
                warn!(path = path, "書き込みAPIが失敗を返却");
                Ok(ActionResult::failure(format!("{} rejected the request", path)))
            }
        }
    }
}
