pub mod strings;

pub use strings::{is_blank, is_xml_whitespace, normalize_space};
