//! Single-stream HTTP GET for release assets.
//!
//! Uses the curl crate (libcurl) and follows redirects (GitHub release assets
//! redirect to a CDN). Every call is exactly one request; a failed request
//! fails the call.

use crate::config::HttpConfig;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Failure of a single GET.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Curl(#[from] curl::Error),
    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },
    #[error("write download: {0}")]
    Io(#[from] io::Error),
}

pub const USER_AGENT: &str = concat!("setup-actionlint/", env!("CARGO_PKG_VERSION"));

/// Transport knobs applied to every request.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    /// Abort when below this many bytes/sec for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for HttpOptions {
    fn from(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            low_speed_limit: cfg.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
        }
    }
}

/// Download `url` into `dest` (created or truncated). Returns the number of
/// bytes written.
pub fn download_to_file(url: &Url, dest: &Path, opts: &HttpOptions) -> Result<u64> {
    let written = write_to_file(url, dest, opts).with_context(|| format!("download {}", url))?;
    tracing::debug!("downloaded {} bytes to {}", written, dest.display());
    Ok(written)
}

/// GET `url` and return the body as UTF-8 text.
pub fn fetch_text(url: &Url, opts: &HttpOptions) -> Result<String> {
    let mut body = Vec::new();
    get_once(url.as_str(), opts, |data| {
        body.extend_from_slice(data);
        Ok(())
    })
    .with_context(|| format!("fetch {}", url))?;
    String::from_utf8(body).with_context(|| format!("{} is not valid UTF-8", url))
}

fn write_to_file(url: &Url, dest: &Path, opts: &HttpOptions) -> Result<u64, FetchError> {
    let mut file = File::create(dest)?;
    let n = get_once(url.as_str(), opts, |data| file.write_all(data))?;
    file.flush()?;
    Ok(n)
}

fn configure(easy: &mut curl::easy::Easy, url: &str, opts: &HttpOptions) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(USER_AGENT)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.low_speed_limit(opts.low_speed_limit)?;
    easy.low_speed_time(opts.low_speed_time)?;
    easy.timeout(opts.timeout)?;
    Ok(())
}

/// One GET attempt, streaming the body into `sink`.
fn get_once<S>(url: &str, opts: &HttpOptions, mut sink: S) -> Result<u64, FetchError>
where
    S: FnMut(&[u8]) -> io::Result<()>,
{
    let mut easy = curl::easy::Easy::new();
    configure(&mut easy, url, opts)?;

    let mut written = 0u64;
    let mut write_err: Option<io::Error> = None;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match sink(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_err {
        return Err(FetchError::Io(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http {
            url: url.to_string(),
            code,
        });
    }
    Ok(written)
}
