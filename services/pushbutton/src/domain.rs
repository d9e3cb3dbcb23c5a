// Domain layer modules
pub mod action_result;
pub mod button_action;
pub mod button_event;
pub mod click_type;
pub mod operations_model;
pub mod router_response;
pub mod thing_registry;

// Re-exports
pub use action_result::ActionResult;
pub use button_action::{ActionMap, ButtonAction, ButtonActionParseError};
pub use button_event::ButtonEvent;
pub use click_type::ClickType;
pub use operations_model::{
    CurrentOrderQuery, CycleCountIncrement, DispatchRequest, LineInfo, LineQuery, MachineInfo,
    MachineQuery, NextOrderQuery, Order, PitchDetailRecord, Product, ProductQuery, RecordId,
};
pub use router_response::RouterResponse;
pub use thing_registry::{ThingData, ThingLookupError, ThingRegistry};
