#[macro_use]
extern crate serde;

mod error;
pub use error::CodecError;

mod record;
pub use record::{decode_record, encode_record};

mod event;
pub use event::{TimedEvent, decode_event};

mod line;
pub use line::LineDecoder;
