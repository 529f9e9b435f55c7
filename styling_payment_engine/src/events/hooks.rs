use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::events::{EventHandler, EventProducer, Handler, PaymentConfirmedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub payment_confirmed_producer: Vec<EventProducer<PaymentConfirmedEvent>>,
}

pub struct EventHandlers {
    pub on_payment_confirmed: Option<EventHandler<PaymentConfirmedEvent>>,
}

impl EventHandlers {
    /// Creates one handler per configured hook. Each handler invocation is cancelled after `timeout`.
    pub fn new(buffer_size: usize, timeout: Duration, hooks: EventHooks) -> Self {
        let on_payment_confirmed =
            hooks.on_payment_confirmed.map(|f| EventHandler::new(buffer_size, f).with_timeout(timeout));
        Self { on_payment_confirmed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_payment_confirmed {
            result.payment_confirmed_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns the handler tasks. Each task ends once every producer for it has been dropped and its outstanding
    /// jobs are done.
    pub async fn start_handlers(self) -> Vec<JoinHandle<()>> {
        let mut tasks = Vec::new();
        if let Some(handler) = self.on_payment_confirmed {
            tasks.push(tokio::spawn(async move {
                handler.start_handler().await;
            }));
        }
        tasks
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_payment_confirmed: Option<Handler<PaymentConfirmedEvent>>,
}

impl EventHooks {
    pub fn on_payment_confirmed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PaymentConfirmedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_payment_confirmed = Some(Arc::new(f));
        self
    }
}
