pub mod convert;
pub mod convert_dir;
pub mod game_stream;
pub mod inspect;
pub mod pos_encoding;
pub mod report;
pub mod sample;
pub mod schema;
pub mod writer;
