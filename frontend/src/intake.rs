//! Client-side checks applied before anything is sent to a server.

use thiserror::Error;
use url::Url;

pub const BYTES_PER_MB: u64 = 1024 * 1024;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * BYTES_PER_MB;

const VIDEO_URL_EXTENSIONS: [&str; 3] = ["mp4", "webm", "ogg"];

/// What the browser told us about a picked or dropped file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Please select a valid video file")]
    NotVideo,
    #[error("File size exceeds {}MB limit", format_mb(*limit_bytes))]
    TooLarge { size: u64, limit_bytes: u64 },
    #[error("Please enter a valid video URL (must end with .mp4, .webm, or .ogg)")]
    InvalidUrl,
}

/// Type first, then size. A missing file counts as an invalid one.
pub fn check_file(file: Option<&FileCandidate>, max_bytes: u64) -> Result<(), Rejection> {
    let Some(file) = file else {
        return Err(Rejection::NotVideo);
    };
    if !file.mime.starts_with("video/") {
        return Err(Rejection::NotVideo);
    }
    if file.size > max_bytes {
        return Err(Rejection::TooLarge {
            size: file.size,
            limit_bytes: max_bytes,
        });
    }
    Ok(())
}

/// Whole megabytes print bare; anything else keeps one decimal, rounded up so
/// the message never understates the limit.
fn format_mb(bytes: u64) -> String {
    if bytes % BYTES_PER_MB == 0 {
        return (bytes / BYTES_PER_MB).to_string();
    }
    let tenths = (u128::from(bytes) * 10).div_ceil(u128::from(BYTES_PER_MB));
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Returns `Ok(None)` for blank input, which callers ignore without alerting.
pub fn check_video_url(raw: &str) -> Result<Option<String>, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = Url::parse(trimmed).map_err(|_| Rejection::InvalidUrl)?;
    if has_video_extension(&parsed) {
        Ok(Some(trimmed.to_string()))
    } else {
        Err(Rejection::InvalidUrl)
    }
}

/// Looks at the last `/`-separated piece of the path, so opaque paths such as
/// `mailto:clip.mp4` are judged the same way as hierarchical ones.
fn has_video_extension(url: &Url) -> bool {
    let last_segment = url.path().rsplit('/').next().unwrap_or_default();
    last_segment
        .rsplit_once('.')
        .is_some_and(|(_, ext)| {
            VIDEO_URL_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}
