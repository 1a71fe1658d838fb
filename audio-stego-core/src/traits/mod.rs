pub mod audio_codec;
