/// One producer, many independent consumers.
///
/// `publish` is fire-and-forget: it must not block on slow consumers and
/// has no way to fail the caller. Implementations drop or log whatever
/// they cannot deliver.
pub trait Publisher: Send + Sync {
    /// Sends a named event with a JSON payload to every current subscriber.
    fn publish(&self, event: &str, json: &str);
}
