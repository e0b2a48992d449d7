//! services/gateway/src/bin/openapi.rs
//!
//! Dumps the gateway's OpenAPI document. Usage: `openapi [OUT]`, default `openapi.json`.

use gateway_lib::web::rest::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

const DEFAULT_OUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));

    let doc = ApiDoc::openapi();
    let routes = doc.paths.paths.len();
    std::fs::write(&out, doc.to_pretty_json()?)?;

    println!("wrote {} routes to {}", routes, out.display());
    Ok(())
}
