//! Call provider abstraction.

use crate::{CallInitiated, CallRequest, RowcallResult};

/// Outbound voice-call service.
///
/// One request starts one call. The returned `execution_id` is the key the
/// provider later echoes back as `id` in webhook events.
#[async_trait::async_trait]
pub trait CallProvider: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &str;

    /// Ask the provider to place a call.
    async fn initiate_call(&self, request: &CallRequest) -> RowcallResult<CallInitiated>;
}
