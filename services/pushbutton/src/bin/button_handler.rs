/// IoTボタン Lambda関数
///
/// AWS IoT 1-Clickから受け取ったボタンイベントを、
/// Leading2Lean APIへの実績記録・ディスパッチ発行に変換する。
use lambda_runtime::{service_fn, Error, LambdaEvent};
use pushbutton::application::{ActionHandler, ButtonRouter};
use pushbutton::domain::{ButtonEvent, RouterResponse};
use pushbutton::infrastructure::{init_logging, ButtonConfig, L2lApiClient, SystemClock};
use tokio::sync::OnceCell;
use tracing::{error, info};

type Router = ButtonRouter<L2lApiClient, SystemClock>;

/// ButtonRouterの静的インスタンス
///
/// Lambda warm start時にHTTPコネクションと設定を再利用するため、
/// 一度初期化したルーターを静的に保持する。
static ROUTER: OnceCell<Router> = OnceCell::const_new();

/// ButtonRouterを取得（初期化されていなければ初期化）
async fn get_router() -> Result<&'static Router, Error> {
    ROUTER
        .get_or_try_init(|| async {
            let config = ButtonConfig::from_env_with_ssm().await.map_err(|err| {
                error!(error = %err, "設定読み込み失敗");
                err
            })?;

            info!(
                base_url = config.api.base_url(),
                site_id = config.api.site_id(),
                time_zone = %config.time_zone,
                button_count = config.registry.len(),
                "ButtonRouterを初期化"
            );

            let client = L2lApiClient::new(config.api.clone())?;
            let handler =
                ActionHandler::new(client, SystemClock, config.time_zone, config.dispatch);
            Ok::<_, Error>(ButtonRouter::new(config.registry, config.action_map, handler))
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // Lambda関数を初期化して実行
    let func = service_fn(handler);
    lambda_runtime::run(func).await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// 未登録のボタンやAPI呼び出しの失敗は呼び出しエラーとして返す。
/// オーダーが無い等の業務的な失敗は200応答になる。
async fn handler(event: LambdaEvent<ButtonEvent>) -> Result<RouterResponse, Error> {
    let request_id = event.context.request_id.clone();
    let button_event = event.payload;

    let router = get_router().await?;

    match router.handle(&button_event).await {
        Ok(response) => Ok(response),
        Err(err) => {
            error!(
                request_id = %request_id,
                serial_number = %button_event.serial_number,
                click_type = %button_event.click_type,
                error = %err,
                "ボタンイベント処理失敗"
            );
            Err(err.into())
        }
    }
}
