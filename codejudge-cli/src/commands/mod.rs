//! CLI command implementations

pub mod auth;
pub mod config;
pub mod submit;
pub mod tasks;

use codejudge_sdk::SdkError;

use crate::context::Context;

/// Print any inline field errors and turn the failure into the message shown to the user.
pub(crate) fn report(ctx: &Context, error: SdkError) -> anyhow::Error {
    if let Some(errors) = error.field_errors() {
        ctx.output.field_errors(errors);
    }
    tracing::debug!(error = ?error, "command failed");
    anyhow::anyhow!(error.user_message())
}
