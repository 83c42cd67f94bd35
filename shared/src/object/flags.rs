use bitflags::bitflags;

bitflags! {
    /// Persistent object flags carried in an [`ObjectId`](super::ObjectId)
    /// and reapplied to whichever object a remote update settles on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjectFlags: u32 {
        const PUBLIC = 1 << 0;
        const STANDALONE = 1 << 1;
        const TRANSACTIONAL = 1 << 3;
        const ARCHETYPE = 1 << 5;
        const TRANSIENT = 1 << 6;
        const ASSET = 1 << 7;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u32 {
        /// Not saved; skipped by sync archives unless explicitly allowed
        const TRANSIENT = 1 << 0;
        /// Only present in editor builds
        const EDITOR_ONLY = 1 << 1;
    }
}
