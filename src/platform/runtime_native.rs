use std::future::Future;

/// Fire-and-forget on the ambient tokio runtime. Outside a runtime the
/// task is dropped with a debug log.
pub fn spawn_detached<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(fut);
        }
        Err(_) => log::debug!("[session] no runtime, dropping detached task"),
    }
}
