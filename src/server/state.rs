use std::sync::Arc;

use crate::config::Settings;
use crate::dispatch::Dispatcher;
use crate::queue::{create_queue_backend, WebhookQueue};
use crate::sender::{MessageSender, TwilioSender};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dispatcher: Arc<Dispatcher>,
    pub queue: Option<Arc<dyn WebhookQueue>>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let sender = TwilioSender::from_config(&settings.sender)
            .map(|sender| Arc::new(sender) as Arc<dyn MessageSender>);
        if sender.is_none() {
            tracing::warn!("Sender credentials not configured, trigger sends will fail");
        }

        let queue = create_queue_backend(&settings.queue);
        let dispatcher = Arc::new(Dispatcher::new(&settings, sender, queue.clone()));

        Self {
            settings: Arc::new(settings),
            dispatcher,
            queue,
        }
    }
}
