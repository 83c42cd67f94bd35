use bitflags::bitflags;

bitflags! {
    /// Delivery hints passed to the session alongside an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MessageFlags: u8 {
        const RELIABLE_ORDERED = 1 << 0;
    }
}

impl MessageFlags {
    /// Best effort, unordered.
    pub const NONE: MessageFlags = MessageFlags::empty();

    pub fn is_reliable_ordered(&self) -> bool {
        self.contains(MessageFlags::RELIABLE_ORDERED)
    }
}
