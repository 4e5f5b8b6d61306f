//! Authorization-code OAuth against the Spotify accounts service

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;

use anyhow::{Result, anyhow};
use rspotify::{AuthCodeSpotify, Config, Credentials, OAuth, prelude::*};

use crate::config::AppConfig;

pub const SCOPES: [&str; 7] = [
    "user-read-private",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "playlist-read-private",
    "playlist-read-collaborative",
    "user-library-read",
];

const RESPONSE: &str = r#"
<!doctype html>
<html>
<head><title>Success</title></head>
<body><h1>Authentication Successful!</h1><p>You can close this tab.</p><script>window.close();</script></body>
</html>
"#;

fn build_client(config: &AppConfig, token_cache: &Path) -> AuthCodeSpotify {
    let creds = Credentials::new(&config.client_id, &config.client_secret);
    let oauth = OAuth {
        redirect_uri: config.redirect_uri.clone(),
        scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };
    let rs_config = Config {
        token_cached: true,
        token_refreshing: true,
        cache_path: token_cache.to_path_buf(),
        ..Default::default()
    };
    AuthCodeSpotify::with_config(creds, oauth, rs_config)
}

/// Returns an authorized client, reusing the cached token when it still works.
pub async fn authorize(config: &AppConfig, token_cache: &Path) -> Result<AuthCodeSpotify> {
    let spotify = build_client(config, token_cache);

    match spotify.read_token_cache(true).await {
        Ok(Some(token)) => {
            *spotify
                .token
                .lock()
                .await
                .map_err(|_| anyhow!("token lock poisoned"))? = Some(token);
            match spotify.me().await {
                Ok(user) => {
                    tracing::info!(user_id = %user.id, "Using cached token");
                    return Ok(spotify);
                }
                Err(e) => tracing::warn!(error = %e, "Cached token rejected, re-authenticating"),
            }
        }
        Ok(None) => tracing::info!("No cached token found, authentication required"),
        Err(e) => tracing::warn!(error = %e, "Failed to read token cache"),
    }

    browser_auth(&spotify, config).await?;
    Ok(spotify)
}

async fn browser_auth(spotify: &AuthCodeSpotify, config: &AppConfig) -> Result<()> {
    let auth_url = spotify.get_authorize_url(false)?;
    tracing::info!("Starting browser-based OAuth flow");

    println!("\nOpening this URL in your browser:\n{}\n", auth_url);
    if let Err(e) = open::that(&auth_url) {
        println!("Failed to open browser automatically: {}", e);
        println!("Please open the URL above manually.");
    }

    let callback = match config.redirect_port() {
        Some(port) => {
            println!("Waiting for authorization callback on port {}...", port);
            tokio::task::spawn_blocking(move || redirect_uri_web_server(port)).await?
        }
        None => None,
    };

    let url = match callback {
        Some(url) => url,
        None => {
            println!("Enter the URL you were redirected to: ");
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            input
        }
    };

    let code = spotify
        .parse_response_code(url.trim())
        .ok_or_else(|| anyhow!("Failed to parse authorization code from callback URL"))?;
    spotify.request_token(&code).await?;
    tracing::info!("Browser authentication completed successfully");
    Ok(())
}

/// Serve one loopback request and return the full callback URL.
/// `None` when the port cannot be bound.
fn redirect_uri_web_server(port: u16) -> Option<String> {
    let listener = match TcpListener::bind(("127.0.0.1", port)) {
        Ok(listener) => listener,
        Err(e) => {
            tracing::warn!(port, error = %e, "Could not bind redirect listener");
            return None;
        }
    };
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Some(url) = handle_connection(stream, port) {
                    return Some(url);
                }
            }
            Err(e) => tracing::warn!(error = %e, "Redirect listener connection failed"),
        }
    }
    None
}

fn handle_connection(mut stream: TcpStream, port: u16) -> Option<String> {
    // The request line with the code fits easily
    let mut buffer = [0; 2048];
    let read = stream.read(&mut buffer).ok()?;
    let request = String::from_utf8_lossy(&buffer[..read]);

    match callback_url(&request, port) {
        Some(url) => {
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                RESPONSE.len(),
                RESPONSE
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            Some(url)
        }
        None => {
            let body = "400 - Bad Request";
            let response = format!(
                "HTTP/1.1 400 Bad Request\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            None
        }
    }
}

/// Rebuild the redirected URL from a raw HTTP request.
fn callback_url(request: &str, port: u16) -> Option<String> {
    let path = request.lines().next()?.split_whitespace().nth(1)?;
    if !path.contains("code=") {
        return None;
    }
    Some(format!("http://127.0.0.1:{}{}", port, path))
}
