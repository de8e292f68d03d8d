//! Registration trigger path: payload parsing with defaults, the
//! positional template-variable mapping, and the trigger handler that
//! drives the outbound send.

mod payload;
mod template;
mod trigger;

pub use payload::RegistrationPayload;
pub use template::{TemplateVariables, TEMPLATE_VARIABLE_COUNT};
pub use trigger::handle_trigger;
