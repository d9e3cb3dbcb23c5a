// ボタンハンドラー設定
//
// Leading2Lean APIの接続情報、タイムゾーン、ボタン対応表、
// ディスパッチの固定値を環境変数から読み込む。

use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

use super::parameter_store::{AwsParameterStore, ParameterStore, ParameterStoreError};
use crate::domain::{
    ActionMap, ButtonAction, ButtonActionParseError, ThingLookupError, ThingRegistry,
};

const ENV_API_BASE_URL: &str = "L2L_API_BASE_URL";
const ENV_API_AUTH_TOKEN: &str = "L2L_API_AUTH_TOKEN";
const ENV_API_AUTH_TOKEN_PARAMETER: &str = "L2L_API_AUTH_TOKEN_PARAMETER";
const ENV_SITE_ID: &str = "L2L_SITE_ID";
const ENV_TIME_ZONE: &str = "L2L_TIME_ZONE";
const ENV_BUTTON_MACHINE_MAP: &str = "BUTTON_MACHINE_MAP";
const ENV_DOUBLE_CLICK_ACTION: &str = "DOUBLE_CLICK_ACTION";
const ENV_DISPATCH_TYPE_CODE: &str = "DISPATCH_TYPE_CODE";
const ENV_DISPATCH_TRADE_CODE: &str = "DISPATCH_TRADE_CODE";
const ENV_DISPATCH_DESCRIPTION: &str = "DISPATCH_DESCRIPTION";
const ENV_DISPATCH_USER: &str = "DISPATCH_USER";

/// デフォルトのタイムゾーン
const DEFAULT_TIME_ZONE: &str = "US/Central";

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ButtonConfigError {
    /// 必須の環境変数が設定されていない
    #[error("必須の環境変数が設定されていません: {0}")]
    MissingEnvVar(String),

    /// APIベースURLが不正
    #[error("APIベースURLが不正です: {0}")]
    InvalidBaseUrl(String),

    /// タイムゾーン名が不正
    #[error("タイムゾーン名が不正です: {0}")]
    InvalidTimeZone(String),

    /// ボタン対応表が不正
    #[error("ボタン対応表が不正です: {0}")]
    InvalidButtonMap(#[from] ThingLookupError),

    /// DOUBLEクリックのアクション名が不正
    #[error("DOUBLEクリックのアクションが不正です: {0}")]
    InvalidDoubleClickAction(String),

    /// APIトークンの取得に失敗
    #[error("APIトークンの取得に失敗しました: {0}")]
    AuthToken(#[from] ParameterStoreError),
}

impl From<ButtonActionParseError> for ButtonConfigError {
    fn from(err: ButtonActionParseError) -> Self {
        ButtonConfigError::InvalidDoubleClickAction(err.0)
    }
}

/// Leading2Lean APIの接続設定
///
/// すべてのリクエストに`auth`と`site`を付与する。
#[derive(Clone)]
pub struct L2lApiConfig {
    base_url: String,
    auth_token: String,
    site_id: String,
}

impl std::fmt::Debug for L2lApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("L2lApiConfig")
            .field("base_url", &self.base_url)
            .field("site_id", &self.site_id)
            .finish_non_exhaustive()
    }
}

impl L2lApiConfig {
    /// 新しい設定を作成
    ///
    /// ベースURLはhttp/httpsの絶対URLである必要がある。
    pub fn new(
        base_url: impl Into<String>,
        auth_token: impl Into<String>,
        site_id: impl Into<String>,
    ) -> Result<Self, ButtonConfigError> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url)
            .map_err(|e| ButtonConfigError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            return Err(ButtonConfigError::InvalidBaseUrl(base_url));
        }

        Ok(Self {
            base_url,
            auth_token: auth_token.into(),
            site_id: site_id.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// 相対パスから完全なURLを構築
    ///
    /// 例: "https://acme.leading2lean.com/api/1.0" + "machines/"
    /// -> "https://acme.leading2lean.com/api/1.0/machines/"
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Code Redディスパッチの固定値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub dispatch_type_code: String,
    pub trade_code: String,
    pub description: String,
    pub user: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            dispatch_type_code: "Code Red".to_string(),
            trade_code: "Mechanic".to_string(),
            description: "Launched by IoT button".to_string(),
            user: "DEMOAPI".to_string(),
        }
    }
}

/// ボタンハンドラー全体の設定
///
/// Lambdaコンテナの起動時に一度だけ構築し、以降は読み取り専用で共有する。
#[derive(Debug, Clone)]
pub struct ButtonConfig {
    pub api: L2lApiConfig,
    pub time_zone: Tz,
    pub registry: ThingRegistry,
    pub action_map: ActionMap,
    pub dispatch: DispatchSettings,
}

impl ButtonConfig {
    /// 環境変数から設定を読み込み
    ///
    /// # 環境変数
    /// - `L2L_API_BASE_URL`: APIのベースURL（必須）
    /// - `L2L_API_AUTH_TOKEN`: APIトークン（必須）
    /// - `L2L_SITE_ID`: サイトID（必須）
    /// - `L2L_TIME_ZONE`: 記録時刻のタイムゾーン（デフォルト: US/Central）
    /// - `BUTTON_MACHINE_MAP`: `SERIAL=MachineCode,...`（デフォルト: デモ用の4台）
    /// - `DOUBLE_CLICK_ACTION`: `increment_scrap_count`（デフォルト）または
    ///   `increment_machine_cycle_count`
    /// - `DISPATCH_TYPE_CODE` / `DISPATCH_TRADE_CODE` / `DISPATCH_DESCRIPTION` / `DISPATCH_USER`
    pub fn from_env() -> Result<Self, ButtonConfigError> {
        let auth_token = required_env(ENV_API_AUTH_TOKEN)?;
        Self::from_env_with_token(auth_token)
    }

    /// 環境変数から設定を読み込み、APIトークンはSSMから取得する
    ///
    /// `L2L_API_AUTH_TOKEN_PARAMETER`が設定されていればそのパラメータを参照し、
    /// 無ければ`from_env`と同じ動作になる。
    pub async fn from_env_with_ssm() -> Result<Self, ButtonConfigError> {
        if optional_env(ENV_API_AUTH_TOKEN_PARAMETER).is_none() {
            return Self::from_env();
        }
        let store = AwsParameterStore::from_config().await;
        Self::from_env_with_parameter_store(&store).await
    }

    /// 指定したパラメータストアからAPIトークンを取得して設定を読み込む
    pub async fn from_env_with_parameter_store<P: ParameterStore>(
        store: &P,
    ) -> Result<Self, ButtonConfigError> {
        let parameter = required_env(ENV_API_AUTH_TOKEN_PARAMETER)?;
        let auth_token = store.get_secure_string(&parameter).await?;
        Self::from_env_with_token(auth_token)
    }

    fn from_env_with_token(auth_token: String) -> Result<Self, ButtonConfigError> {
        let base_url = required_env(ENV_API_BASE_URL)?;
        let site_id = required_env(ENV_SITE_ID)?;
        let api = L2lApiConfig::new(base_url, auth_token, site_id)?;

        let time_zone = parse_time_zone(
            &optional_env(ENV_TIME_ZONE).unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
        )?;

        let registry = match optional_env(ENV_BUTTON_MACHINE_MAP) {
            Some(definition) => ThingRegistry::parse(&definition)?,
            None => ThingRegistry::default(),
        };

        let action_map = match optional_env(ENV_DOUBLE_CLICK_ACTION) {
            Some(name) => ActionMap::with_double_click(parse_double_click_action(&name)?),
            None => ActionMap::default(),
        };

        let defaults = DispatchSettings::default();
        let dispatch = DispatchSettings {
            dispatch_type_code: optional_env(ENV_DISPATCH_TYPE_CODE)
                .unwrap_or(defaults.dispatch_type_code),
            trade_code: optional_env(ENV_DISPATCH_TRADE_CODE).unwrap_or(defaults.trade_code),
            description: optional_env(ENV_DISPATCH_DESCRIPTION).unwrap_or(defaults.description),
            user: optional_env(ENV_DISPATCH_USER).unwrap_or(defaults.user),
        };

        Ok(Self {
            api,
            time_zone,
            registry,
            action_map,
            dispatch,
        })
    }
}

/// IANAタイムゾーン名をパース
pub fn parse_time_zone(name: &str) -> Result<Tz, ButtonConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ButtonConfigError::InvalidTimeZone(name.to_string()))
}

/// DOUBLEクリックに割り当て可能なアクションをパース
///
/// 不良数加算とサイクルカウント加算のみ許可する。
fn parse_double_click_action(name: &str) -> Result<ButtonAction, ButtonConfigError> {
    match name.parse::<ButtonAction>()? {
        action @ (ButtonAction::IncrementScrapCount | ButtonAction::IncrementMachineCycleCount) => {
            Ok(action)
        }
        other => Err(ButtonConfigError::InvalidDoubleClickAction(other.to_string())),
    }
}

fn required_env(key: &str) -> Result<String, ButtonConfigError> {
    optional_env(key).ok_or_else(|| ButtonConfigError::MissingEnvVar(key.to_string()))
}

// 空文字はNone扱い
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}
