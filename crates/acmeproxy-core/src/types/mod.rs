mod record;
mod request;
mod spec;

pub use record::*;
pub use request::*;
pub use spec::*;
