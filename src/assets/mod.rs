//! Asset import.
//!
//! File access goes through a [`FileReader`] and image decoding through an
//! [`ImageDecoder`], so every loader can run against the filesystem, an
//! in-memory table or a caller supplied closure.

pub mod image;
pub mod io;
pub mod loaders;

pub use image::{DecodedImage, ImageCrateDecoder, ImageDecoder};
pub use io::{FileReader, FsFileReader, MemoryFileReader};
pub use loaders::{ObjDocument, ObjImport, parse_obj, resolve_texture_path};
