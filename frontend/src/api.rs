use gloo_net::http::Request;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use web_sys::{File, FormData};

/// What the widget displays after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub url: String,
    pub title: String,
    pub share_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The endpoint answered with `success: false`.
    #[error("{0}")]
    Server(String),
    #[error("request failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Upload,
    RegisterUrl,
}

impl SubmissionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::RegisterUrl => "url registration",
        }
    }

    pub fn failure_alert(self, err: &SubmitError) -> String {
        match (self, err) {
            (Self::Upload, SubmitError::Server(message)) => format!("Upload failed: {message}"),
            (Self::Upload, SubmitError::Transport(_)) => {
                "Upload failed. Please try again.".to_string()
            }
            (Self::RegisterUrl, SubmitError::Server(message)) => {
                format!("Failed to save video URL: {message}")
            }
            (Self::RegisterUrl, SubmitError::Transport(_)) => {
                "Failed to save video URL. Please try again.".to_string()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    url: Option<String>,
    filename: Option<String>,
    share_url: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    success: bool,
    url_mp4: Option<String>,
    titulo: Option<String>,
    share_url: Option<String>,
    message: Option<String>,
}

fn server_failure(message: Option<String>) -> SubmitError {
    let message = message
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown error".to_string());
    SubmitError::Server(message)
}

fn parse_body<T>(body: &str) -> Result<T, SubmitError>
where
    T: DeserializeOwned,
{
    serde_json::from_str::<T>(body)
        .map_err(|err| SubmitError::Transport(format!("unexpected response: {err}")))
}

pub fn decode_upload_response(body: &str) -> Result<UploadResult, SubmitError> {
    let payload = parse_body::<UploadResponse>(body)?;
    if !payload.success {
        return Err(server_failure(payload.message));
    }
    Ok(UploadResult {
        url: payload.url.unwrap_or_default(),
        title: payload.filename.unwrap_or_default(),
        share_url: payload.share_url.unwrap_or_default(),
    })
}

pub fn decode_register_response(body: &str) -> Result<UploadResult, SubmitError> {
    let payload = parse_body::<RegisterResponse>(body)?;
    if !payload.success {
        return Err(server_failure(payload.message));
    }
    Ok(UploadResult {
        url: payload.url_mp4.unwrap_or_default(),
        title: payload.titulo.unwrap_or_default(),
        share_url: payload.share_url.unwrap_or_default(),
    })
}

fn transport(context: &str, err: impl std::fmt::Debug) -> SubmitError {
    SubmitError::Transport(format!("{context}: {err:?}"))
}

async fn post_form(endpoint: &str, form: FormData) -> Result<String, SubmitError> {
    let request = Request::post(endpoint)
        .body(form)
        .map_err(|err| transport("building request", err))?;
    let response = request.send().await.map_err(|err| transport("sending request", err))?;
    if !response.ok() {
        log::warn!("{endpoint} answered HTTP {}", response.status());
    }
    response.text().await.map_err(|err| transport("reading response", err))
}

/// Posts the file as multipart field `video`.
pub async fn upload_video(endpoint: &str, file: &File) -> Result<UploadResult, SubmitError> {
    let form = FormData::new().map_err(|err| transport("creating form", err))?;
    form.append_with_blob_and_filename("video", file, &file.name())
        .map_err(|err| transport("attaching file", err))?;
    let body = post_form(endpoint, form).await?;
    decode_upload_response(&body)
}

/// Posts a remote video URL as `url_mp4` with `from_url=1`.
pub async fn register_video_url(endpoint: &str, url: &str) -> Result<UploadResult, SubmitError> {
    let form = FormData::new().map_err(|err| transport("creating form", err))?;
    form.append_with_str("url_mp4", url)
        .map_err(|err| transport("attaching url", err))?;
    form.append_with_str("from_url", "1")
        .map_err(|err| transport("attaching url", err))?;
    let body = post_form(endpoint, form).await?;
    decode_register_response(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_successful_upload() {
        let body = r#"{"success":true,"url":"https://x/y.mp4","filename":"clip","share_url":"https://x/s/1"}"#;
        assert_eq!(
            decode_upload_response(body),
            Ok(UploadResult {
                url: "https://x/y.mp4".to_string(),
                title: "clip".to_string(),
                share_url: "https://x/s/1".to_string(),
            })
        );
    }

    #[test]
    fn decodes_successful_registration_fields() {
        let body = r#"{"success":true,"url_mp4":"https://cdn/a.webm","titulo":"Holiday","share_url":"https://x/s/9"}"#;
        let result = decode_register_response(body).unwrap();
        assert_eq!(result.url, "https://cdn/a.webm");
        assert_eq!(result.title, "Holiday");
        assert_eq!(result.share_url, "https://x/s/9");
    }

    #[test]
    fn server_failure_carries_message_for_both_endpoints() {
        let body = r#"{"success":false,"message":"too big"}"#;
        assert_eq!(
            decode_upload_response(body),
            Err(SubmitError::Server("too big".to_string()))
        );
        assert_eq!(
            decode_register_response(body),
            Err(SubmitError::Server("too big".to_string()))
        );
    }

    #[test]
    fn failure_without_message_still_reports_something() {
        let err = decode_upload_response(r#"{"success":false,"message":null}"#).unwrap_err();
        assert_eq!(err, SubmitError::Server("unknown error".to_string()));

        let err = decode_register_response(r#"{"url_mp4":"x"}"#).unwrap_err();
        assert_eq!(err, SubmitError::Server("unknown error".to_string()));
    }

    #[test]
    fn non_json_body_is_a_transport_failure() {
        let err = decode_upload_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
    }

    #[test]
    fn alerts_match_submission_kind() {
        let server = SubmitError::Server("too big".to_string());
        let network = SubmitError::Transport("offline".to_string());

        assert_eq!(
            SubmissionKind::Upload.failure_alert(&server),
            "Upload failed: too big"
        );
        assert_eq!(
            SubmissionKind::Upload.failure_alert(&network),
            "Upload failed. Please try again."
        );
        assert_eq!(
            SubmissionKind::RegisterUrl.failure_alert(&server),
            "Failed to save video URL: too big"
        );
        assert_eq!(
            SubmissionKind::RegisterUrl.failure_alert(&network),
            "Failed to save video URL. Please try again."
        );
    }
}
