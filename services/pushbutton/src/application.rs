// アプリケーション層モジュール
pub mod action_handler;
pub mod button_router;
pub mod production_lookup;

// 再エクスポート
pub use action_handler::{ActionHandler, ActionHandlerError, NO_ORDER_FOUND};
pub use button_router::{ButtonRouter, ButtonRouterError};
pub use production_lookup::ProductionLookup;
