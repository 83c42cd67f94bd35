use std::collections::{HashMap, HashSet};

use tandem_client::ClientSession;
use tandem_shared::{
    EndpointId, MessageFlags, Scratchpad, SessionEvent, SessionEventKind, Uuid,
};

/// An event a [`TestSession`] was asked to send.
#[derive(Debug, Clone)]
pub struct SentEvent {
    pub event: SessionEvent,
    pub destination: EndpointId,
    pub flags: MessageFlags,
}

/// A session that records outgoing events instead of sending them
pub struct TestSession {
    pub endpoint_id: EndpointId,
    pub server_endpoint_id: EndpointId,
    pub outbox: Vec<SentEvent>,
    pub suspended: bool,
    pub registered: HashSet<SessionEventKind>,
    scratchpad: Scratchpad,
    client_scratchpads: HashMap<EndpointId, Scratchpad>,
}

impl TestSession {
    pub fn new() -> Self {
        Self {
            endpoint_id: Uuid::new_v4(),
            server_endpoint_id: Uuid::new_v4(),
            outbox: Vec::new(),
            suspended: false,
            registered: HashSet::new(),
            scratchpad: Scratchpad::new(),
            client_scratchpads: HashMap::new(),
        }
    }

    /// Makes `endpoint_id` a known session member.
    pub fn add_client(&mut self, endpoint_id: EndpointId) {
        self.client_scratchpads
            .entry(endpoint_id)
            .or_default();
    }

    pub fn take_outbox(&mut self) -> Vec<SentEvent> {
        std::mem::take(&mut self.outbox)
    }
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientSession for TestSession {
    fn send_custom_event(
        &mut self,
        event: SessionEvent,
        destination_endpoint_id: EndpointId,
        flags: MessageFlags,
    ) {
        self.outbox.push(SentEvent {
            event,
            destination: destination_endpoint_id,
            flags,
        });
    }

    fn client_endpoint_id(&self) -> EndpointId {
        self.endpoint_id
    }

    fn server_endpoint_id(&self) -> EndpointId {
        self.server_endpoint_id
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn scratchpad(&mut self) -> &mut Scratchpad {
        &mut self.scratchpad
    }

    fn client_scratchpad(&mut self, endpoint_id: &EndpointId) -> Option<&mut Scratchpad> {
        self.client_scratchpads.get_mut(endpoint_id)
    }

    fn register_event_kind(&mut self, kind: SessionEventKind) {
        self.registered.insert(kind);
    }

    fn unregister_event_kind(&mut self, kind: SessionEventKind) {
        self.registered.remove(&kind);
    }
}
