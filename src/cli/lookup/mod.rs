//! One-shot lookups through the configured cache and providers
//!
//! Requests go through the same router as the server, so the printed
//! envelope matches the HTTP response.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request};
use axum::Router;
use reqwest::Url;
use tower::ServiceExt;

use crate::api::create_router;

/// Look up a city and print the envelope
pub async fn city(name: &str) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let app = create_router(crate::create_app_state_with_config(&config).await?);

    execute(app, Method::GET, city_uri(name)?).await
}

/// Look up all lines, or one line, and print the envelope
pub async fn lines(line_id: Option<&str>, refresh: bool) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let app = create_router(crate::create_app_state_with_config(&config).await?);

    let method = if refresh { Method::POST } else { Method::GET };
    execute(app, method, lines_uri(line_id, refresh)?).await
}

fn city_uri(name: &str) -> anyhow::Result<String> {
    let mut url = Url::parse("http://localhost/api/geo/city")?;
    url.query_pairs_mut().append_pair("name", name);

    Ok(path_and_query(&url))
}

fn lines_uri(line_id: Option<&str>, refresh: bool) -> anyhow::Result<String> {
    let mut url = Url::parse("http://localhost/api/transit/lines")?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("invalid base URL"))?;

        if let Some(id) = line_id {
            segments.push(id);
        }

        if refresh {
            segments.push("refresh");
        }
    }

    Ok(path_and_query(&url))
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

async fn execute(app: Router, method: Method, uri: String) -> anyhow::Result<()> {
    let request = Request::builder()
        .method(method)
        .uri(&uri)
        .body(Body::empty())?;

    let response = app.oneshot(request).await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;

    let json: serde_json::Value = serde_json::from_slice(&body)?;
    println!("{}", serde_json::to_string_pretty(&json)?);

    if !status.is_success() {
        anyhow::bail!("Lookup failed with status {}", status);
    }

    Ok(())
}
