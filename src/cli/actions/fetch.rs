use crate::{
    cli::globals::GlobalArgs,
    client::{GatewayResponse, RequestGateway, RequestOptions},
};
use anyhow::{anyhow, bail, Context, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub url: String,
    pub method: String,
    pub headers: Vec<String>,
    pub data: Option<String>,
    pub auth: bool,
}

/// Splits a `Name: value` header argument.
///
/// # Errors
/// Returns an error if there is no `:` or the name is empty.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("invalid header '{raw}', expected 'Name: value'"))?;

    let name = name.trim();
    if name.is_empty() {
        bail!("invalid header '{raw}', missing name");
    }

    Ok((name.to_string(), value.trim().to_string()))
}

fn options(args: &Args) -> Result<RequestOptions> {
    let method = Method::from_bytes(args.method.trim().to_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method: {}", args.method))?;

    let mut options = match &args.data {
        Some(data) => {
            let body: Value =
                serde_json::from_str(data).context("--data must be a JSON document")?;
            RequestOptions::json(method, body)
        }
        None => RequestOptions::with_method(method),
    };

    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        options = options.header(name, value);
    }

    Ok(options)
}

/// Sends the request described by `args` through `gateway`.
///
/// # Errors
/// Returns an error for invalid arguments, an expired session or a transport
/// failure.
pub async fn request(gateway: &RequestGateway, args: &Args) -> Result<GatewayResponse> {
    let options = options(args)?;

    let response = if args.auth {
        gateway.fetch_authenticated(&args.url, options).await
    } else {
        gateway.fetch_with_auth(&args.url, options).await
    };

    response.with_context(|| format!("request to {} failed", args.url))
}

/// Execute the fetch action.
/// # Errors
/// Returns an error if the request fails or the server answers with an error
/// status.
pub async fn execute(args: Args) -> Result<()> {
    let gateway = args.globals.gateway()?;
    let response = request(&gateway, &args).await?;

    debug!("response content type: {:?}", response.content_type());

    match response.json() {
        Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Err(_) => println!("{}", response.text()),
    }

    if response.is_error() {
        bail!("server answered {}", response.status());
    }

    Ok(())
}
