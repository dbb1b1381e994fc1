use audube::application::ports::ResolverError;
use audube::domain::{QualityTier, StreamDescriptor, VideoId};
use audube::infrastructure::upstream::{parse_stream_map, parse_video_info, select_stream};
use url::form_urlencoded::Serializer;

const MP4: &str = "video/mp4";

fn stream(quality: QualityTier, media_type: &str, url: &str) -> StreamDescriptor {
    StreamDescriptor::new(quality, media_type, url)
}

fn stream_entry(quality: &str, media_type: &str, url: &str) -> String {
    Serializer::new(String::new())
        .append_pair("quality", quality)
        .append_pair("type", media_type)
        .append_pair("url", url)
        .finish()
}

fn id() -> VideoId {
    VideoId::parse("abc123").unwrap()
}

#[test]
fn given_target_streams_at_low_and_high_when_selecting_then_high_wins() {
    let streams = vec![
        stream(QualityTier::Low, MP4, "https://cdn/low"),
        stream(QualityTier::Medium, "video/webm", "https://cdn/medium"),
        stream(QualityTier::High, MP4, "https://cdn/high"),
    ];
    assert_eq!(select_stream(&streams, MP4).unwrap().url, "https://cdn/high");
}

#[test]
fn given_target_streams_at_low_and_medium_when_selecting_then_medium_wins() {
    let streams = vec![
        stream(QualityTier::Medium, MP4, "https://cdn/medium"),
        stream(QualityTier::Low, MP4, "https://cdn/low"),
    ];
    assert_eq!(
        select_stream(&streams, MP4).unwrap().url,
        "https://cdn/medium"
    );
}

#[test]
fn given_no_target_type_stream_when_selecting_then_returns_none() {
    let streams = vec![
        stream(QualityTier::High, "video/webm", "https://cdn/webm"),
        stream(QualityTier::Low, "video/3gpp", "https://cdn/3gp"),
    ];
    assert!(select_stream(&streams, MP4).is_none());
}

#[test]
fn given_equal_tier_duplicates_when_selecting_then_last_in_source_order_wins() {
    let streams = vec![
        stream(QualityTier::High, MP4, "https://cdn/first"),
        stream(QualityTier::Low, MP4, "https://cdn/low"),
        stream(QualityTier::High, MP4, "https://cdn/second"),
    ];
    assert_eq!(
        select_stream(&streams, MP4).unwrap().url,
        "https://cdn/second"
    );
}

#[test]
fn given_type_with_codecs_when_selecting_then_container_prefix_matches() {
    let streams = vec![stream(
        QualityTier::Medium,
        "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"",
        "https://cdn/codecs",
    )];
    assert!(select_stream(&streams, MP4).is_some());
}

#[test]
fn given_stream_map_with_bad_entries_when_parsing_then_they_are_skipped() {
    let raw = [
        stream_entry("hd720", MP4, "https://cdn/hd"),
        stream_entry("hd1080", MP4, "https://cdn/unknown-tier"),
        "quality=small&type=video%2Fmp4".to_string(),
        stream_entry("small", "video/webm", "https://cdn/small"),
    ]
    .join(",");

    let streams = parse_stream_map(&raw);

    assert_eq!(
        streams,
        vec![
            stream(QualityTier::High, MP4, "https://cdn/hd"),
            stream(QualityTier::Low, "video/webm", "https://cdn/small"),
        ]
    );
}

#[test]
fn given_ok_status_when_parsing_info_then_details_are_extracted() {
    let map = stream_entry("medium", MP4, "https://cdn/medium?sig=a,b");
    let body = Serializer::new(String::new())
        .append_pair("status", "ok")
        .append_pair("title", "Some Title")
        .append_pair("author", "Someone")
        .append_pair("thumbnail_url", "https://img/t.jpg")
        .append_pair("length_seconds", "300")
        .append_pair("keywords", "rock")
        .append_pair("keywords", "live, acoustic")
        .append_pair("url_encoded_fmt_stream_map", &map)
        .finish();

    let details = parse_video_info(&id(), &body).unwrap();

    assert_eq!(details.title, "Some Title");
    assert_eq!(details.author, "Someone");
    assert_eq!(details.thumbnail_url, "https://img/t.jpg");
    assert_eq!(details.length_seconds, 300);
    assert_eq!(details.keywords, vec!["rock", "live, acoustic"]);
    assert_eq!(details.streams.len(), 1);
    assert_eq!(details.streams[0].quality, QualityTier::Medium);
}

#[test]
fn given_keyword_with_comma_when_parsing_info_then_value_is_kept_whole() {
    let details =
        parse_video_info(&id(), "status=ok&keywords=live%2C+acoustic&keywords=+spaced+").unwrap();
    assert_eq!(details.keywords, vec!["live, acoustic", " spaced "]);
}

#[test]
fn given_missing_length_when_parsing_info_then_defaults_to_zero() {
    let details = parse_video_info(&id(), "status=ok&title=t").unwrap();
    assert_eq!(details.length_seconds, 0);
    assert!(details.streams.is_empty());
    assert!(details.keywords.is_empty());
}

#[test]
fn given_fail_status_when_parsing_info_then_reason_is_propagated() {
    let err = parse_video_info(&id(), "status=fail&reason=private+video").unwrap_err();
    assert!(matches!(err, ResolverError::UpstreamRejected(ref r) if r == "private video"));
    assert!(err.to_string().contains("private video"));
}

#[test]
fn given_fail_status_without_reason_when_parsing_info_then_still_rejected() {
    let err = parse_video_info(&id(), "status=fail").unwrap_err();
    assert!(matches!(err, ResolverError::UpstreamRejected(_)));
}

#[test]
fn given_missing_status_when_parsing_info_then_is_malformed() {
    let err = parse_video_info(&id(), "title=whatever").unwrap_err();
    assert!(matches!(err, ResolverError::UpstreamMalformed(_)));
}

#[test]
fn given_unknown_status_when_parsing_info_then_is_malformed() {
    let err = parse_video_info(&id(), "status=maybe").unwrap_err();
    assert!(matches!(err, ResolverError::UpstreamMalformed(ref m) if m.contains("maybe")));
}
