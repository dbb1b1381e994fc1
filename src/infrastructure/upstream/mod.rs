mod redirect;
mod video_info;
mod video_info_client;

pub use redirect::{MAX_REDIRECTS, PROBE_TIMEOUT, follow_redirects};
pub use video_info::{parse_stream_map, parse_video_info, select_stream};
pub use video_info_client::{DEFAULT_BASE_URL, DEFAULT_TARGET_TYPE, VideoInfoClient};
