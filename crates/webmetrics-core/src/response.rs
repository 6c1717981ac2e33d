//! Status-observing response decorator.
//!
//! `StatusObservingResponse` composes over any `ResponseSink` and remembers
//! the last status code set through it, forwarding every call unchanged.

use crate::error::Result;

/// Status code reported when nothing was set explicitly.
pub const DEFAULT_STATUS: u16 = 200;

/// Minimal status-setting surface of an outgoing response.
pub trait ResponseSink {
    fn set_status(&mut self, code: u16);
    fn send_error(&mut self, code: u16) -> Result<()>;
    fn send_error_with_message(&mut self, code: u16, message: &str) -> Result<()>;
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    fn set_status(&mut self, code: u16) {
        (**self).set_status(code)
    }
    fn send_error(&mut self, code: u16) -> Result<()> {
        (**self).send_error(code)
    }
    fn send_error_with_message(&mut self, code: u16, message: &str) -> Result<()> {
        (**self).send_error_with_message(code, message)
    }
}

#[derive(Debug)]
pub struct StatusObservingResponse<R> {
    inner: R,
    status: u16,
}

impl<R: ResponseSink> StatusObservingResponse<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            status: DEFAULT_STATUS,
        }
    }

    /// Last status code set, or 200.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: ResponseSink> ResponseSink for StatusObservingResponse<R> {
    fn set_status(&mut self, code: u16) {
        self.status = code;
        self.inner.set_status(code);
    }

    // The code is recorded before forwarding so a failing sink still
    // reports what the handler attempted.
    fn send_error(&mut self, code: u16) -> Result<()> {
        self.status = code;
        self.inner.send_error(code)
    }

    fn send_error_with_message(&mut self, code: u16, message: &str) -> Result<()> {
        self.status = code;
        self.inner.send_error_with_message(code, message)
    }
}
