//! Buffered bit-level reading and writing.
//!
//! Within every byte, bit 7 is transferred first, then bit 6, down to
//! bit 0.  Multi-bit fields travel most significant bit first inside that
//! stream.  Both sides block up their byte traffic in 32 KiB chunks; the
//! chunking never changes the bit sequence.

use std::io::{ErrorKind,Read,Write};

/// size of the byte buffer between the bit layer and the underlying stream
pub const BUF_SIZE: usize = 32 * 1024;

/// Packs bits into bytes and hands complete chunks to the underlying writer.
pub struct BitWriter<'a,W: Write> {
    sink: &'a mut W,
    buf: Vec<u8>,
    /// partial byte being assembled, low bits are the newest
    acc: u8,
    /// count of bits in `acc`
    used: u32,
    bytes_out: u64
}

impl <'a,W: Write> BitWriter<'a,W> {
    pub fn new(sink: &'a mut W) -> Self {
        Self {
            sink,
            buf: Vec::with_capacity(BUF_SIZE),
            acc: 0,
            used: 0,
            bytes_out: 0
        }
    }
    /// append one bit to the stream
    pub fn put_bit(&mut self,bit: bool) -> std::io::Result<()> {
        self.acc = self.acc << 1 | bit as u8;
        self.used += 1;
        if self.used == 8 {
            let byte = self.acc;
            self.acc = 0;
            self.used = 0;
            self.push_byte(byte)?;
        }
        Ok(())
    }
    /// append the low `n` bits of `val`, most significant first, `n` in 1..=32
    pub fn put_nbits(&mut self,val: u32,n: u32) -> std::io::Result<()> {
        for i in (0..n).rev() {
            self.put_bit(val >> i & 1 > 0)?;
        }
        Ok(())
    }
    /// pad any partial byte with zero bits and drain everything to the sink
    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.used > 0 {
            let byte = self.acc << (8 - self.used);
            self.acc = 0;
            self.used = 0;
            self.push_byte(byte)?;
        }
        self.sink.write_all(&self.buf)?;
        self.buf.clear();
        self.sink.flush()
    }
    /// count of whole bytes emitted so far, a partial byte is not counted
    pub fn bytes_written(&self) -> u64 {
        self.bytes_out
    }
    fn push_byte(&mut self,byte: u8) -> std::io::Result<()> {
        self.buf.push(byte);
        self.bytes_out += 1;
        if self.buf.len() >= BUF_SIZE {
            self.sink.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }
}

/// Unpacks bits from the underlying reader through a block buffer.
pub struct BitReader<'a,R: Read> {
    src: &'a mut R,
    buf: Vec<u8>,
    pos: usize,
    end: usize,
    /// byte being consumed, `left` bits of it remain
    acc: u8,
    left: u32,
    bytes_in: u64,
    eof: bool
}

impl <'a,R: Read> BitReader<'a,R> {
    pub fn new(src: &'a mut R) -> Self {
        Self {
            src,
            buf: vec![0;BUF_SIZE],
            pos: 0,
            end: 0,
            acc: 0,
            left: 0,
            bytes_in: 0,
            eof: false
        }
    }
    /// next bit, or None once the byte source is exhausted
    pub fn get_bit(&mut self) -> std::io::Result<Option<bool>> {
        if self.left == 0 {
            match self.next_byte()? {
                Some(byte) => {
                    self.acc = byte;
                    self.left = 8;
                },
                None => return Ok(None)
            }
        }
        self.left -= 1;
        Ok(Some(self.acc >> self.left & 1 > 0))
    }
    /// assemble an `n` bit field most significant bit first, `n` in 1..=32,
    /// None if the source runs out mid-field
    pub fn get_nbits(&mut self,n: u32) -> std::io::Result<Option<u32>> {
        let mut ans: u32 = 0;
        for _i in 0..n {
            match self.get_bit()? {
                Some(bit) => ans = ans << 1 | bit as u32,
                None => return Ok(None)
            }
        }
        Ok(Some(ans))
    }
    /// count of bytes consumed from the source so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_in
    }
    fn next_byte(&mut self) -> std::io::Result<Option<u8>> {
        if self.pos == self.end {
            if self.eof {
                return Ok(None);
            }
            loop {
                match self.src.read(&mut self.buf) {
                    Ok(0) => {
                        self.eof = true;
                        return Ok(None);
                    },
                    Ok(n) => {
                        self.pos = 0;
                        self.end = n;
                        break;
                    },
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e)
                }
            }
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        self.bytes_in += 1;
        Ok(Some(byte))
    }
}

#[test]
fn writer_packs_msb_first() {
    let mut sink: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut sink);
    for bit in [true,false,true,true] {
        writer.put_bit(bit).expect("write failed");
    }
    assert_eq!(writer.bytes_written(),0);
    writer.flush().expect("flush failed");
    assert_eq!(writer.bytes_written(),1);
    assert_eq!(sink,vec![0xb0]);
}

#[test]
fn fields_cross_byte_boundaries() {
    let mut sink: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut sink);
    writer.put_nbits(0b101,3).expect("write failed");
    writer.put_nbits(0x1ff,9).expect("write failed");
    writer.put_nbits(0xbeef,16).expect("write failed");
    writer.flush().expect("flush failed");
    // 101 111111111 1011111011101111 + 4 pad bits
    assert_eq!(writer.bytes_written(),4);
    assert_eq!(sink,vec![0xbf,0xfb,0xee,0xf0]);
}

#[test]
fn reader_unpacks_msb_first() {
    let mut src = std::io::Cursor::new(vec![0xb0,0x12]);
    let mut reader = BitReader::new(&mut src);
    assert_eq!(reader.get_bit().unwrap(),Some(true));
    assert_eq!(reader.get_bit().unwrap(),Some(false));
    assert_eq!(reader.get_bit().unwrap(),Some(true));
    assert_eq!(reader.get_bit().unwrap(),Some(true));
    assert_eq!(reader.get_nbits(12).unwrap(),Some(0x012));
    assert_eq!(reader.bytes_read(),2);
    assert_eq!(reader.get_bit().unwrap(),None);
    assert_eq!(reader.get_nbits(8).unwrap(),None);
}

#[test]
fn field_truncated_at_end_of_stream() {
    let mut src = std::io::Cursor::new(vec![0xff]);
    let mut reader = BitReader::new(&mut src);
    assert_eq!(reader.get_nbits(4).unwrap(),Some(0xf));
    // only 4 bits remain
    assert_eq!(reader.get_nbits(8).unwrap(),None);
}

#[test]
fn round_trip_across_buffer_boundaries() {
    let mut sink: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut sink);
    for i in 0..40_000u32 {
        writer.put_nbits(i,17).expect("write failed");
    }
    writer.flush().expect("flush failed");
    assert_eq!(writer.bytes_written(),(40_000*17+7)/8);
    let mut src = std::io::Cursor::new(sink);
    let mut reader = BitReader::new(&mut src);
    for i in 0..40_000u32 {
        assert_eq!(reader.get_nbits(17).unwrap(),Some(i));
    }
}
