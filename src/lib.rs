//! # Huffpress Library
//!
//! Compress or expand byte streams with the FGK (Faller-Gallager-Knuth)
//! adaptive Huffman code.  The coder and decoder grow an identical Huffman
//! tree one symbol at a time, so no frequency table travels with the data;
//! a previously unseen byte is introduced through the zero node escape.
//!
//! The compression/expansion functions are generics that operate on trait
//! objects with bounds `Read` or `Write + Seek`.  There are convenience
//! functions for working directly with buffers.
//!
//! ## File Example
//!
//! ```rs
//! use huffpress::*;
//! let mut in_file = std::fs::File::open("some_input_path").expect("open failed");
//! let mut out_file = std::fs::File::create("some_output_path").expect("create failed");
//! let (in_size,out_size) = fgk::compress(&mut in_file,&mut out_file)
//!     .expect("compression failed");
//! eprintln!("compressed {} into {}",in_size,out_size);
//! ```
//!
//! ## Buffer Example
//!
//! ```rs
//! use huffpress::*;
//! let test_data = "This is the chaunt of the priests.  The chaunt of the priests of Mung.".as_bytes();
//! let compressed = fgk::compress_slice(test_data).expect("compression failed");
//! ```

mod tools;
pub mod fgk;

type DYNERR = Box<dyn std::error::Error>;

/// Stream Errors
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("file format mismatch")]
    FileFormatMismatch,
    #[error("truncated bit stream")]
    TruncatedStream
}
