// ABOUTME: Transport seam between the console session and the wire.
// ABOUTME: One line out, one response block back; `&mut self` forbids overlap.

use super::error::Result;
use async_trait::async_trait;

/// A line-oriented request/response channel to the console.
///
/// The console has no request identifiers, so a reply belongs to whichever
/// line was written last. Taking `&mut self` means a second exchange cannot
/// start until the first one has returned.
#[async_trait]
pub trait Transport: Send {
    /// Write `line` followed by the line delimiter and wait for the complete
    /// response block that answers it.
    async fn exchange(&mut self, line: &str) -> Result<String>;

    /// Close the session. The default does nothing.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn exchange(&mut self, line: &str) -> Result<String> {
        (**self).exchange(line).await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }
}
