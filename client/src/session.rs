use tandem_shared::{EndpointId, MessageFlags, Scratchpad, SessionEvent, SessionEventKind};

/// Where an inbound session event came from and how it was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEventContext {
    pub source_endpoint_id: EndpointId,
    pub message_flags: MessageFlags,
}

impl SessionEventContext {
    pub fn new(source_endpoint_id: EndpointId, message_flags: MessageFlags) -> Self {
        Self {
            source_endpoint_id,
            message_flags,
        }
    }
}

/// The client side of a collaboration session, as seen by the transaction
/// manager.
///
/// Implementations deliver inbound events of the registered kinds to
/// [`ClientTransactionManager::handle_session_event`](crate::ClientTransactionManager::handle_session_event).
pub trait ClientSession {
    fn send_custom_event(
        &mut self,
        event: SessionEvent,
        destination_endpoint_id: EndpointId,
        flags: MessageFlags,
    );

    fn client_endpoint_id(&self) -> EndpointId;

    fn server_endpoint_id(&self) -> EndpointId;

    /// While suspended, remote transactions are not applied.
    fn is_suspended(&self) -> bool;

    /// This session's own scratchpad.
    fn scratchpad(&mut self) -> &mut Scratchpad;

    /// The scratchpad of a connected endpoint, if it is known.
    fn client_scratchpad(&mut self, endpoint_id: &EndpointId) -> Option<&mut Scratchpad>;

    fn register_event_kind(&mut self, kind: SessionEventKind);

    fn unregister_event_kind(&mut self, kind: SessionEventKind);
}

impl<S: ClientSession + ?Sized> ClientSession for &mut S {
    fn send_custom_event(
        &mut self,
        event: SessionEvent,
        destination_endpoint_id: EndpointId,
        flags: MessageFlags,
    ) {
        (**self).send_custom_event(event, destination_endpoint_id, flags);
    }

    fn client_endpoint_id(&self) -> EndpointId {
        (**self).client_endpoint_id()
    }

    fn server_endpoint_id(&self) -> EndpointId {
        (**self).server_endpoint_id()
    }

    fn is_suspended(&self) -> bool {
        (**self).is_suspended()
    }

    fn scratchpad(&mut self) -> &mut Scratchpad {
        (**self).scratchpad()
    }

    fn client_scratchpad(&mut self, endpoint_id: &EndpointId) -> Option<&mut Scratchpad> {
        (**self).client_scratchpad(endpoint_id)
    }

    fn register_event_kind(&mut self, kind: SessionEventKind) {
        (**self).register_event_kind(kind);
    }

    fn unregister_event_kind(&mut self, kind: SessionEventKind) {
        (**self).unregister_event_kind(kind);
    }
}
