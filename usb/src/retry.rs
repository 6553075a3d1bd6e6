use log::warn;

/// Transient transfer errors are retried this many times before the
/// operation aborts.
pub(crate) const RETRY_LIMIT: u32 = 5;

/// What became of one transfer unit after bounded retry.
pub(crate) enum Attempt<T> {
    /// The unit went through.
    Done(T),
    /// The device vanished from the bus. Never retried.
    Gone,
    /// The retry budget is spent; the last transport error is attached.
    Failed(rusb::Error),
}

/// Run `unit` until it succeeds, the device vanishes, or the retry budget
/// is exhausted. Both the send and the read path funnel every packet and
/// frame through this.
pub(crate) fn retry_bounded<T>(
    what: &str,
    mut unit: impl FnMut() -> Result<T, rusb::Error>,
) -> Attempt<T> {
    let mut errors = 0u32;
    loop {
        match unit() {
            Ok(value) => return Attempt::Done(value),
            Err(rusb::Error::NoDevice) => return Attempt::Gone,
            Err(error) => {
                errors += 1;
                warn!("{what}: USB error: {error} ({errors} error(s) so far)");
                if errors > RETRY_LIMIT {
                    warn!("{what}: error limit reached, aborting");
                    return Attempt::Failed(error);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeds_after_exactly_five_failures() {
        let mut failures = 5;
        let outcome = retry_bounded("test", || {
            if failures > 0 {
                failures -= 1;
                Err(rusb::Error::Io)
            } else {
                Ok(42)
            }
        });
        assert!(matches!(outcome, Attempt::Done(42)));
    }

    #[test]
    fn aborts_on_the_sixth_failure() {
        let mut attempts = 0;
        let outcome = retry_bounded("test", || -> Result<(), _> {
            attempts += 1;
            Err(rusb::Error::Pipe)
        });
        assert!(matches!(outcome, Attempt::Failed(rusb::Error::Pipe)));
        assert_eq!(attempts, 6);
    }

    #[test]
    fn no_device_is_never_retried() {
        let mut attempts = 0;
        let outcome = retry_bounded("test", || -> Result<(), _> {
            attempts += 1;
            Err(rusb::Error::NoDevice)
        });
        assert!(matches!(outcome, Attempt::Gone));
        assert_eq!(attempts, 1);
    }
}
