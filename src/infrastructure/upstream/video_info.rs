use std::collections::HashMap;

use url::form_urlencoded;

use crate::application::ports::ResolverError;
use crate::domain::{QualityTier, StreamDescriptor, VideoDetails, VideoId};

const STATUS_FIELD: &str = "status";
const REASON_FIELD: &str = "reason";
const STREAM_MAP_FIELD: &str = "url_encoded_fmt_stream_map";

struct FormFields(HashMap<String, Vec<String>>);

impl FormFields {
    fn parse(raw: &str) -> Self {
        let mut fields: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            fields
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Self(fields)
    }

    fn first(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    fn all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Parses the form-encoded body returned by the upstream video info endpoint.
pub fn parse_video_info(id: &VideoId, body: &str) -> Result<VideoDetails, ResolverError> {
    let fields = FormFields::parse(body);

    match fields.first(STATUS_FIELD) {
        None => {
            return Err(ResolverError::UpstreamMalformed(
                "no response status found in the server's answer".to_string(),
            ));
        }
        Some("ok") => {}
        Some("fail") => {
            let reason = fields
                .first(REASON_FIELD)
                .filter(|r| !r.is_empty())
                .unwrap_or("no reason given");
            return Err(ResolverError::UpstreamRejected(reason.to_string()));
        }
        Some(other) => {
            return Err(ResolverError::UpstreamMalformed(format!(
                "unrecognized response status '{}'",
                other
            )));
        }
    }

    let length_seconds = fields
        .first("length_seconds")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0);

    // Each form value is one keyword, commas included.
    let keywords = fields.all("keywords").to_vec();

    let streams = fields
        .first(STREAM_MAP_FIELD)
        .map(parse_stream_map)
        .unwrap_or_default();

    Ok(VideoDetails {
        id: id.clone(),
        title: fields.first("title").unwrap_or_default().to_string(),
        author: fields.first("author").unwrap_or_default().to_string(),
        thumbnail_url: fields.first("thumbnail_url").unwrap_or_default().to_string(),
        length_seconds,
        keywords,
        streams,
    })
}

/// Parses the comma-separated stream map. Entries that lack a field or carry
/// an unknown quality label are skipped.
pub fn parse_stream_map(raw: &str) -> Vec<StreamDescriptor> {
    let mut streams = Vec::new();

    for (position, entry) in raw.split(',').enumerate() {
        if entry.is_empty() {
            continue;
        }
        match parse_stream_entry(entry) {
            Ok(stream) => streams.push(stream),
            Err(reason) => {
                tracing::warn!(position, reason = %reason, "Skipping unparseable stream entry");
            }
        }
    }

    streams
}

fn parse_stream_entry(entry: &str) -> Result<StreamDescriptor, String> {
    let fields = FormFields::parse(entry);
    let quality = fields
        .first("quality")
        .ok_or_else(|| "missing quality".to_string())?
        .parse::<QualityTier>()?;
    let media_type = fields
        .first("type")
        .ok_or_else(|| "missing type".to_string())?;
    let url = fields
        .first("url")
        .filter(|u| !u.is_empty())
        .ok_or_else(|| "missing url".to_string())?;

    Ok(StreamDescriptor::new(quality, media_type, url))
}

/// Scans tiers low to high and every stream within each tier, overwriting the
/// choice on each match. The highest matching tier wins; among equal-tier
/// duplicates the last one in source order wins.
pub fn select_stream<'a>(
    streams: &'a [StreamDescriptor],
    target_type: &str,
) -> Option<&'a StreamDescriptor> {
    let mut selected = None;
    for tier in QualityTier::ASCENDING {
        for stream in streams {
            if stream.quality == tier && stream.matches_type(target_type) {
                selected = Some(stream);
            }
        }
    }
    selected
}
