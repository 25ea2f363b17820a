pub mod arena;
pub mod namespaces;
pub mod node;
pub mod parser;
pub mod xname;

pub use arena::XmlDocument;
pub use node::XmlNodeData;
pub use parser::{parse, parse_bytes};
pub use xname::{XAttribute, XName};
