//! Application wiring.
//!
//! Builds the shared state handed to every request handler. All components
//! share one store and one cache; the broker is injected so tests can swap in
//! a fake.

use std::sync::Arc;

use crate::broker::{Broker, Provisioner};
use crate::cache::{Cache, RecentMessages};
use crate::config::Settings;
use crate::persistence::{Persistence, UserStore};
use crate::relay::{Publisher, PushReceiver};
use crate::transport::StatusPage;

#[derive(Clone)]
pub struct AppState {
    pub provisioner: Provisioner,
    pub publisher: Publisher,
    pub receiver: Arc<PushReceiver>,
    pub recent: RecentMessages,
    pub users: Arc<dyn UserStore>,
    pub status_page: Arc<StatusPage>,
}

impl AppState {
    pub fn new(
        settings: &Settings,
        broker: Arc<dyn Broker>,
        persistence: Arc<Persistence>,
        cache: Arc<dyn Cache>,
    ) -> Result<Self, url::ParseError> {
        let endpoint = settings.relay.push_endpoint_url()?;
        let pubsub = &settings.pubsub;
        let recent = RecentMessages::new(cache, persistence.clone(), settings.relay.max_items);

        Ok(Self {
            provisioner: Provisioner::new(
                broker.clone(),
                &pubsub.topic,
                &pubsub.subscription,
                endpoint.as_str(),
            ),
            publisher: Publisher::new(broker, persistence.clone(), &pubsub.topic),
            receiver: Arc::new(PushReceiver::new(
                persistence.clone(),
                recent.clone(),
                &settings.relay.token,
            )),
            recent,
            users: persistence,
            status_page: Arc::new(StatusPage::new(
                &pubsub.project_id,
                &pubsub.topic,
                &pubsub.subscription,
                &endpoint,
            )),
        })
    }
}
