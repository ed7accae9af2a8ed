//! Login command.

use anyhow::Result;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use super::RunContext;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::format::format_session_text;
use crate::util::{build_client, login, write_output};

#[derive(Serialize)]
struct LoginSummary {
    token_id: String,
    expires_at: String,
}

/// Always performs a fresh login and replaces the cached session.
pub async fn cmd_login(ctx: &RunContext, config: &Config) -> Result<()> {
    let client = build_client(config)?;
    let session = login(&client, &ctx.token_cache()).await?;

    let content = match ctx.format {
        OutputFormat::Json => ctx.opts.as_json(&LoginSummary {
            token_id: session.token_id.clone(),
            expires_at: session.expires_at().format(&Rfc3339)?,
        })?,
        OutputFormat::Text => format_session_text(&session),
    };
    write_output(ctx.output.as_ref(), &content)
}
