pub mod error;
pub mod print;
pub mod util;
pub mod xml;

pub use error::{NodePrintError, Result, SerializeStage};

pub use indextree::NodeId;
pub use print::{
    render, serialize, strip_insignificant_whitespace, FormattingOptions, NodeSerializer,
};
pub use xml::{parse, parse_bytes, XAttribute, XName, XmlDocument, XmlNodeData};
