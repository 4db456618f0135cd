//! Binary upload endpoint.
//!
//! Checking size and type before uploading is left to the caller's widget; this
//! module only ships the bytes.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::{ApiRequest, Failure, Notice, RequestError, RequestPipeline};

const PATH_UPLOAD_IMAGE: &str = "/upload/image";

/// Multipart field the backend reads the file from.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct UploadApi {
    pipeline: Arc<RequestPipeline>,
}

impl UploadApi {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Upload one image and return where the backend stored it.
    pub async fn upload_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, RequestError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|err| {
                let failure = Failure::Malformed {
                    reason: format!("invalid content type '{content_type}'"),
                };
                self.pipeline.reject(failure, Some(err))
            })?;

        let form = Form::new().part(FILE_FIELD, part);
        let uploaded: UploadedFile = self
            .pipeline
            .send(ApiRequest::post(PATH_UPLOAD_IMAGE).multipart(form))
            .await?;

        tracing::info!(file_name, url = %uploaded.url, "image uploaded");
        self.pipeline.notify(Notice::success("Upload succeeded"));
        Ok(uploaded)
    }
}
