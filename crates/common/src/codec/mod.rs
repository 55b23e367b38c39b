pub mod flux;
pub mod line_protocol;
