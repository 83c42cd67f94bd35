/// Assert that a session sent exactly `$count` events of the given variant
#[macro_export]
macro_rules! assert_sent {
    ($session:expr, $variant:path, $count:expr) => {
        let sent = $session
            .outbox
            .iter()
            .filter(|sent| matches!(sent.event, $variant(_)))
            .count();
        assert_eq!(
            sent, $count,
            "Expected {} {} events, session sent {}",
            $count,
            stringify!($variant),
            sent
        );
    };
}

/// Assert that a world received exactly `$count` notifications matching a pattern
#[macro_export]
macro_rules! assert_notified {
    ($world:expr, $pattern:pat, $count:expr) => {
        let notified = $world.count(|notification| matches!(notification, $pattern));
        assert_eq!(
            notified, $count,
            "Expected {} notifications matching {}, world received {}",
            $count,
            stringify!($pattern),
            notified
        );
    };
}
