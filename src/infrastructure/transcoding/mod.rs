mod ffmpeg_transcoder;

pub use ffmpeg_transcoder::{AUDIO_BITRATE, AUDIO_CODEC, FfmpegTranscoder, OUTPUT_FORMAT};
