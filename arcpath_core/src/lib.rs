//! # Arcpath Core
//!
//! Path utilities for writing out archive entries.
//!
//! Archive metadata hands over entry names that may be relative, deeply
//! nested or use either `/` or `\` as separator. This library turns those
//! names into usable output paths and checks extracted data, without ever
//! loading a whole file into memory.
//!
//! ## Features
//!
//! - Lexical path resolution: `.` and `..` removed without touching the filesystem
//! - Bounded path composition and filename/parent splitting
//! - Recursive directory creation tolerant of partially existing hierarchies
//! - Streaming CRC-32 over file contents
//!
//! ## Example
//!
//! ```no_run
//! use arcpath_core::{FsDirCreator, file_checksum, prepare_entry_path, resolve};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! assert_eq!(resolve("docs/./old/../README", 256)?, "docs/README");
//!
//! // Create `out/docs` and get the path to write the entry to
//! let target = prepare_entry_path(&FsDirCreator, "out", "docs/README", 256)?;
//!
//! // ... write the entry, then check it
//! let crc = file_checksum(Path::new(&target))?;
//! println!("{target}: {crc:08x}");
//! # Ok(())
//! # }
//! ```

mod checksum;
mod config;
mod error;
mod extract;
mod mkdir;
mod path;
mod separator;

pub use checksum::{
    Crc32Reader, DEFAULT_CHUNK_SIZE, FileChecksum, checksum_reader, checksum_tree, crc32_from_hex,
    crc32_to_hex, file_checksum, file_checksum_with, verify_file,
};
pub use config::{
    Config, DEFAULT_MAX_PATH, ENV_CHUNK_SIZE, ENV_MAX_PATH, MAX_CHUNK_SIZE, check_chunk_size,
};
pub use error::{Error, Result};
pub use extract::prepare_entry_path;
pub use mkdir::{DirCreator, FsDirCreator, make_dir, make_dir_with};
pub use path::{combine, get_filename, resolve, truncate_to_parent};
pub use separator::{DEFAULT_SEPARATOR, is_separator, is_separator_char};
