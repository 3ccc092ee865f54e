//! # Query Subcommand
//!
//! Sends one GraphQL operation to the configured endpoint and prints the
//! JSON reply. Session cookies given with `--cookie` are loaded into the
//! client's session jar, so they travel with the request like any other
//! session credential.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use ksu_client::{Fetched, GraphQlClient, GraphQlRequest, KsuApiConfig};

use crate::EXIT_SIGNED_OUT;

/// Arguments for the `ksu query` subcommand.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// GraphQL document, or `@path` to read it from a file.
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Variables as a JSON object.
    #[arg(long, value_name = "JSON")]
    pub variables: Option<String>,

    /// Operation to run when the document defines several.
    #[arg(long, value_name = "NAME")]
    pub operation_name: Option<String>,

    /// Session cookie to send, as `NAME=VALUE`. May be repeated.
    #[arg(long = "cookie", value_name = "NAME=VALUE", value_parser = parse_cookie)]
    pub cookies: Vec<(String, String)>,
}

/// Execute the query subcommand, writing the reply to `out`.
pub async fn run_query(args: &QueryArgs, config: KsuApiConfig, out: &mut dyn Write) -> Result<u8> {
    let request = build_request(args)?;
    let client = GraphQlClient::new(config)?;
    for (name, value) in &args.cookies {
        client.session().insert(client.endpoint(), name, value);
    }

    tracing::info!(endpoint = %client.endpoint(), "running query");
    match client.execute::<serde_json::Value>(&request).await? {
        Fetched::Data(value) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            Ok(0)
        }
        Fetched::SignedOut(signed_out) => {
            tracing::warn!(
                cleared_cookies = signed_out.cleared_cookies,
                "server rejected the session (403); sign in again"
            );
            Ok(EXIT_SIGNED_OUT)
        }
    }
}

fn build_request(args: &QueryArgs) -> Result<GraphQlRequest> {
    let query = match args.query.strip_prefix('@') {
        Some(path) => load_query(Path::new(path))?,
        None => args.query.clone(),
    };
    if query.trim().is_empty() {
        bail!("query document is empty");
    }

    let mut request = GraphQlRequest::new(query);
    if let Some(raw) = &args.variables {
        let variables: serde_json::Value =
            serde_json::from_str(raw).context("--variables is not valid JSON")?;
        if !variables.is_object() {
            bail!("--variables must be a JSON object");
        }
        request = request.with_variables(variables);
    }
    if let Some(name) = &args.operation_name {
        request = request.with_operation_name(name.clone());
    }
    Ok(request)
}

fn load_query(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("reading query document {}", path.display()))
}

fn parse_cookie(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got `{raw}`")),
    }
}
