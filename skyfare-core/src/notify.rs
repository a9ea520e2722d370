/// User-facing notification channel (toasts in a browser, log lines here).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default notifier: forwards to tracing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "skyfare::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "skyfare::notify", "{}", message);
    }
}
