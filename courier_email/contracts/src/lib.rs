use std::future::Future;

use courier_models::mail::OutboundMail;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait MailTransport: Send + Sync + 'static {
    /// Deliver a fully composed message.
    ///
    /// Returns `Ok(true)` iff the server accepted the message. Connection and
    /// protocol failures are reported as errors.
    fn send(&self, mail: OutboundMail) -> impl Future<Output = anyhow::Result<bool>> + Send;

    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[cfg(feature = "mock")]
impl MockMailTransport {
    pub fn with_send(mut self, mail: OutboundMail, result: bool) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(mail))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_error(mut self, mail: OutboundMail, error: anyhow::Error) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(mail))
            .return_once(move |_| Box::pin(std::future::ready(Err(error))));
        self
    }
}
