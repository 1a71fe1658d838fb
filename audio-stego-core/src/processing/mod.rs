pub mod bit_packer;
pub mod capacity;
pub mod cipher;
pub mod fidelity;
pub mod framer;
pub mod positions;
pub mod wav_format;
