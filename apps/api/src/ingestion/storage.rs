use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// Parts of this size or less go up as a single PUT; larger payloads use a
/// multipart upload so progress can be reported per part. 5MB is the S3
/// minimum part size.
const PART_SIZE: usize = 5 * 1024 * 1024;

/// Key layout: per-user, per-filename. Re-uploading the same filename lands
/// on the same key, which is the upsert semantic — S3 PUTs overwrite.
pub fn object_key(user_id: uuid::Uuid, file_name: &str) -> String {
    format!("resumes/{user_id}/{file_name}")
}

/// Public URL for a stored object (path-style, MinIO-compatible).
pub fn public_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/'))
}

pub fn part_count(len: usize) -> usize {
    len.div_ceil(PART_SIZE).max(1)
}

/// Uploads a buffered file, reporting integer percentage progress after each
/// completed part (a single-PUT upload reports 100 once, at the end).
pub async fn upload_with_progress(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    content_type: &str,
    bytes: Bytes,
    mut on_progress: impl FnMut(u8),
) -> Result<(), AppError> {
    let total_parts = part_count(bytes.len());

    if total_parts == 1 {
        s3.put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("put_object failed for {key}: {e}")))?;
        on_progress(100);
        info!("Uploaded s3://{bucket}/{key}");
        return Ok(());
    }

    let upload = s3
        .create_multipart_upload()
        .bucket(bucket)
        .key(key)
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("create_multipart_upload failed: {e}")))?;
    let upload_id = upload
        .upload_id()
        .ok_or_else(|| AppError::Storage("multipart upload returned no id".to_string()))?
        .to_string();

    let mut completed = Vec::with_capacity(total_parts);
    for index in 0..total_parts {
        let start = index * PART_SIZE;
        let end = (start + PART_SIZE).min(bytes.len());
        let part_number = (index + 1) as i32;

        let result = s3
            .upload_part()
            .bucket(bucket)
            .key(key)
            .upload_id(&upload_id)
            .part_number(part_number)
            .body(ByteStream::from(bytes.slice(start..end)))
            .send()
            .await;

        let part = match result {
            Ok(p) => p,
            Err(e) => {
                // Orphaned multipart uploads accrue storage until aborted.
                let _ = s3
                    .abort_multipart_upload()
                    .bucket(bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await;
                return Err(AppError::Storage(format!(
                    "upload_part {part_number} failed for {key}: {e}"
                )));
            }
        };

        completed.push(
            CompletedPart::builder()
                .part_number(part_number)
                .set_e_tag(part.e_tag().map(str::to_owned))
                .build(),
        );
        on_progress(((index + 1) * 100 / total_parts) as u8);
    }

    s3.complete_multipart_upload()
        .bucket(bucket)
        .key(key)
        .upload_id(&upload_id)
        .multipart_upload(
            CompletedMultipartUpload::builder()
                .set_parts(Some(completed))
                .build(),
        )
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("complete_multipart_upload failed: {e}")))?;

    info!("Uploaded s3://{bucket}/{key} in {total_parts} parts");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_is_per_user_per_filename() {
        let user = uuid::Uuid::new_v4();
        let key = object_key(user, "resume.pdf");
        assert_eq!(key, format!("resumes/{user}/resume.pdf"));
    }

    #[test]
    fn test_public_url_joins_without_double_slash() {
        assert_eq!(
            public_url("http://minio:9000/", "folios", "resumes/u/f.pdf"),
            "http://minio:9000/folios/resumes/u/f.pdf"
        );
    }

    #[test]
    fn test_part_count() {
        assert_eq!(part_count(0), 1);
        assert_eq!(part_count(PART_SIZE), 1);
        assert_eq!(part_count(PART_SIZE + 1), 2);
        assert_eq!(part_count(2 * PART_SIZE), 2);
    }
}
