//! FGK Adaptive Huffman Compression
//!
//! Single-pass compression producing a self-describing stream: a 12 byte
//! stamp (algorithm tag plus the expanded length) followed by the coded
//! payload.  The first input byte travels verbatim since the fresh tree has
//! no codes yet; every later byte is either the code of an already-seen
//! symbol, or the zero node's code followed by 8 raw bits introducing a new
//! one.  Both sides update the tree after every symbol, which keeps the
//! decoder's tree identical to the coder's without any side information.
//!
//! The stamp is written twice: a placeholder up front, then the real
//! expanded length once the input is exhausted, which is why compression
//! needs a seekable output.

use std::io::{Cursor,Read,Write,Seek,SeekFrom,BufReader,BufWriter,ErrorKind};
use crate::tools::bitio::{BitReader,BitWriter};
use crate::tools::fgk_tree::{FgkTree,ZERO_NODE_SYMBOL};
use crate::DYNERR;

/// algorithm tag opening every compressed stream
const STAMP_TAG: [u8;4] = *b"FGK\0";
/// tag plus the 64 bit expanded length
const STAMP_SIZE: u64 = 12;

fn write_stamp<W: Write>(writer: &mut W,file_size: i64) -> std::io::Result<()> {
    writer.write_all(&STAMP_TAG)?;
    writer.write_all(&i64::to_le_bytes(file_size))
}

/// Main compression function.
/// `expanded_in` is an object with the `Read` trait, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `compressed_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// The stamp lands at the output's current position, so the stream can follow an outer header.
/// Returns (in_size,out_size) or error, the out_size counting the stamp.
pub fn compress<R,W>(expanded_in: &mut R, compressed_out: &mut W) -> Result<(u64,u64),DYNERR>
where R: Read, W: Write + Seek {
    let mut reader = BufReader::new(expanded_in);
    let stamp_pos = compressed_out.stream_position()?;
    // placeholder, rewritten once the expanded length is known
    write_stamp(compressed_out,0)?;
    let mut in_count: u64 = 0;
    let mut byte_in: [u8;1] = [0];
    let payload = {
        let mut writer = BitWriter::new(compressed_out);
        let mut tree = FgkTree::new();
        log::debug!("entering symbol loop");
        loop {
            match reader.read_exact(&mut byte_in) {
                Ok(()) => {},
                Err(e) if e.kind()==ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(Box::new(e))
            }
            let sym = byte_in[0];
            in_count += 1;
            if in_count == 1 {
                // the tree is empty, the first byte goes out verbatim
                writer.put_nbits(sym as u32,8)?;
            } else {
                match tree.leaf_for(sym) {
                    Some(leaf) => tree.write_code(leaf,&mut writer)?,
                    None => {
                        // the zero node's code announces a raw byte
                        tree.write_code(tree.zero(),&mut writer)?;
                        writer.put_nbits(sym as u32,8)?;
                    }
                }
            }
            tree.update(sym);
        }
        writer.flush()?;
        writer.bytes_written()
    };
    log::debug!("coded {} bytes into {} plus stamp",in_count,payload);
    // rewrite the stamp with the true expanded length
    compressed_out.seek(SeekFrom::Start(stamp_pos))?;
    write_stamp(compressed_out,in_count as i64)?;
    compressed_out.seek(SeekFrom::End(0))?;
    Ok((in_count,STAMP_SIZE + payload))
}

/// Main expansion function.
/// `compressed_in` is an object with the `Read` trait, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `expanded_out` is an object with the `Write` trait, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn expand<R,W>(compressed_in: &mut R, expanded_out: &mut W) -> Result<(u64,u64),DYNERR>
where R: Read, W: Write {
    let mut writer = BufWriter::new(expanded_out);
    let mut stamp: [u8;12] = [0;12];
    compressed_in.read_exact(&mut stamp)?;
    if stamp[0..4] != STAMP_TAG {
        log::error!("unrecognized algorithm tag");
        return Err(Box::new(crate::Error::FileFormatMismatch));
    }
    let file_size = i64::from_le_bytes(stamp[4..12].try_into()?);
    if file_size < 0 {
        log::error!("stamp carries a negative length");
        return Err(Box::new(crate::Error::FileFormatMismatch));
    }
    if file_size == 0 {
        writer.flush()?;
        return Ok((STAMP_SIZE,0));
    }
    let mut byte_in: [u8;1] = [0];
    match compressed_in.read_exact(&mut byte_in) {
        Ok(()) => {},
        Err(e) if e.kind()==ErrorKind::UnexpectedEof => return Err(Box::new(crate::Error::TruncatedStream)),
        Err(e) => return Err(Box::new(e))
    }
    // first byte is verbatim, the bit stream starts after it
    writer.write_all(&byte_in)?;
    let mut tree = FgkTree::new();
    tree.update(byte_in[0]);
    let mut reader = BitReader::new(compressed_in);
    let mut remaining = file_size as u64 - 1;
    log::debug!("entering symbol loop, {} bytes to decode",remaining);
    while remaining > 0 {
        let sym = match tree.read_code(&mut reader)? {
            Some(ZERO_NODE_SYMBOL) => match reader.get_nbits(8)? {
                Some(raw) => raw as u8,
                None => return Err(Box::new(crate::Error::TruncatedStream))
            },
            Some(sym) => sym as u8,
            None => return Err(Box::new(crate::Error::TruncatedStream))
        };
        writer.write_all(&[sym])?;
        tree.update(sym);
        remaining -= 1;
    }
    writer.flush()?;
    Ok((STAMP_SIZE + 1 + reader.bytes_read(),file_size as u64))
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8]) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src,&mut ans)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8]) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src,&mut ans)?;
    Ok(ans.into_inner())
}


// *************** TESTS *****************

#[test]
fn empty_input_is_a_bare_stamp() {
    let compressed = compress_slice(&[]).expect("compression failed");
    assert_eq!(compressed,hex::decode("46474b000000000000000000").unwrap());
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(expanded,Vec::<u8>::new());
}

#[test]
fn single_byte() {
    let compressed = compress_slice(b"A").expect("compression failed");
    assert_eq!(compressed,hex::decode("46474b00010000000000000041").unwrap());
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(expanded,b"A".to_vec());
}

#[test]
fn two_distinct_bytes() {
    // 'A' raw, then the zero node's 1-bit code and 'B' raw: 1 01000010 + pad
    let compressed = compress_slice(b"AB").expect("compression failed");
    assert_eq!(compressed,hex::decode("46474b00020000000000000041a100").unwrap());
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(expanded,b"AB".to_vec());
}

#[test]
fn repeated_byte_costs_one_bit() {
    // after the raw first byte, each of the 7 repeats is the 1-bit code 0
    let compressed = compress_slice(&[0x41;8]).expect("compression failed");
    assert_eq!(compressed,hex::decode("46474b0008000000000000004100").unwrap());
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(expanded,vec![0x41;8]);
}

#[test]
fn all_byte_values_round_trip() {
    let test_data: Vec<u8> = (0..=255).collect();
    let compressed = compress_slice(&test_data).expect("compression failed");
    assert_eq!(compressed[4..12],u64::to_le_bytes(256));
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(expanded,test_data);
}

#[test]
fn adversarial_alternation_round_trips() {
    let test_data: Vec<u8> = [0xaa,0x55].iter().cycle().take(2000).copied().collect();
    let compressed = compress_slice(&test_data).expect("compression failed");
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(expanded,test_data);
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = compress_slice(test_data).expect("compression failed");
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);

    let test_data = include_bytes!("fgk.rs");
    let compressed = compress_slice(test_data).expect("compression failed");
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
}

#[test]
fn coding_is_deterministic() {
    let test_data = include_bytes!("tools/fgk_tree.rs");
    let first = compress_slice(test_data).expect("compression failed");
    let second = compress_slice(test_data).expect("compression failed");
    assert_eq!(first,second);
}

#[test]
fn foreign_stream_is_refused() {
    let compressed = hex::decode("4c5a57000100000000000000").unwrap();
    assert!(expand_slice(&compressed).is_err());
}

#[test]
fn truncated_stream_is_refused() {
    let test_data = "the chaunt of the priests of Mung".as_bytes();
    let compressed = compress_slice(test_data).expect("compression failed");
    // cut into the coded payload
    assert!(expand_slice(&compressed[0..14]).is_err());
    // cut the stamp itself
    assert!(expand_slice(&compressed[0..8]).is_err());
}
