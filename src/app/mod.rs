mod event_handler;
mod pipeline;
mod state;
#[cfg(test)]
pub(crate) mod testing;

pub use event_handler::handle_action;
pub use state::{Action, AppState, Outcome, Processed, Services, TextTool, Translation};
