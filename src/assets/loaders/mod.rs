pub mod obj;
pub mod obj_parser;

pub use obj::{ObjImport, Unwelded, normalize_vertices, resolve_texture_path};
pub use obj_parser::{ObjDocument, parse_obj};
