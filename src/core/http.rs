use std::{
    fs::File,
    io::{
        BufWriter,
        Write,
    },
    path::Path,
    time::Duration,
};

use reqwest::{
    blocking::{
        Client,
        Response,
    },
    header::{
        ACCEPT_ENCODING,
        USER_AGENT,
    },
};

use crate::core::UtsushiError;

pub const APP_USER_AGENT: &str = "utsushi/0.1 (+reqwest)";

pub fn http_client() -> Result<Client, UtsushiError> {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| UtsushiError::Custom(format!("HTTP client build failed: {e}")))
}

/// Non-blocking client for short requests made from async code.
pub fn async_http_client() -> Result<reqwest::Client, UtsushiError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(20))
        .user_agent(APP_USER_AGENT)
        .build()
        .map_err(|e| UtsushiError::Custom(format!("HTTP client build failed: {e}")))
}

pub fn download_to_file(client: &Client, url: &str, path: &Path) -> Result<(), UtsushiError> {
    let mut attempts: usize = 0;
    loop {
        attempts += 1;

        let resp = client
            .get(url)
            .header(USER_AGENT, APP_USER_AGENT)
            .header(ACCEPT_ENCODING, "identity")
            .send();

        let mut resp = match resp {
            Ok(r) => r,
            Err(e) => {
                if attempts < 3 {
                    tracing::warn!(attempt = attempts, error = %e, "Download failed, retrying");
                    std::thread::sleep(Duration::from_secs(2 * attempts as u64));
                    continue;
                }
                return Err(UtsushiError::Custom(format!("Failed HTTP GET {}: {}", url, e)));
            }
        };

        ensure_success(&resp)?;

        let mut writer = BufWriter::new(File::create(path).map_err(|e| {
            UtsushiError::Custom(format!("Create download file {:?} failed: {}", path, e))
        })?);

        match resp.copy_to(&mut writer) {
            Ok(n) if n > 0 => {
                writer.flush().ok();
                return Ok(());
            }
            Ok(_) | Err(_) => {
                if attempts < 3 {
                    std::thread::sleep(Duration::from_secs(2 * attempts as u64));
                    continue;
                }
                return Err(UtsushiError::Custom(
                    "Failed to copy response body to file".to_string(),
                ));
            }
        }
    }
}

fn ensure_success(resp: &Response) -> Result<(), UtsushiError> {
    if !resp.status().is_success() {
        return Err(UtsushiError::Custom(format!(
            "HTTP error {} from {}",
            resp.status(),
            resp.url()
        )));
    }
    Ok(())
}
