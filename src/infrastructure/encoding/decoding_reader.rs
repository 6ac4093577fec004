// ============================================================
// DECODING READER
// ============================================================
// Streaming transcoder: any encoding in, UTF-8 out, fail on malformed input

use std::io::{self, Read};

use encoding_rs::{Decoder, DecoderResult, Encoding};

const INPUT_BUFFER_LEN: usize = 8 * 1024;
const OUTPUT_BUFFER_LEN: usize = 16 * 1024;

/// Marker carried inside the `io::Error` raised for malformed input
#[derive(Debug)]
pub struct MalformedInput {
    pub encoding: &'static str,
    pub offset: u64,
}

impl std::fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "malformed {} input near byte {}",
            self.encoding, self.offset
        )
    }
}

impl std::error::Error for MalformedInput {}

/// True when `err` was raised by a `DecodingReader` for malformed input
pub fn is_malformed_input(err: &io::Error) -> bool {
    err.get_ref()
        .map(|inner| inner.is::<MalformedInput>())
        .unwrap_or(false)
}

/// Wraps a byte source and yields UTF-8.
/// BOM handling is left to the caller; the decoder never sniffs or strips one.
pub struct DecodingReader<R> {
    inner: R,
    encoding: &'static Encoding,
    decoder: Decoder,
    input: Vec<u8>,
    input_pos: usize,
    input_len: usize,
    consumed: u64,
    eof: bool,
    finished: bool,
    output: Vec<u8>,
    output_pos: usize,
    scratch: Vec<u8>,
}

impl<R: Read> DecodingReader<R> {
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            decoder: encoding.new_decoder_without_bom_handling(),
            input: vec![0; INPUT_BUFFER_LEN],
            input_pos: 0,
            input_len: 0,
            consumed: 0,
            eof: false,
            finished: false,
            output: Vec::with_capacity(OUTPUT_BUFFER_LEN),
            output_pos: 0,
            scratch: vec![0; OUTPUT_BUFFER_LEN],
        }
    }

    /// Decode until some output is pending or the input is exhausted
    fn fill_output(&mut self) -> io::Result<()> {
        self.output.clear();
        self.output_pos = 0;

        while self.output.is_empty() && !self.finished {
            if self.input_pos == self.input_len && !self.eof {
                self.input_len = self.inner.read(&mut self.input)?;
                self.input_pos = 0;
                self.eof = self.input_len == 0;
            }

            let last = self.eof;
            let (result, read, written) = self.decoder.decode_to_utf8_without_replacement(
                &self.input[self.input_pos..self.input_len],
                &mut self.scratch,
                last,
            );
            self.input_pos += read;
            self.consumed += read as u64;
            self.output.extend_from_slice(&self.scratch[..written]);

            match result {
                DecoderResult::InputEmpty => {
                    if last {
                        self.finished = true;
                    }
                }
                DecoderResult::OutputFull => {}
                DecoderResult::Malformed(_, _) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        MalformedInput {
                            encoding: self.encoding.name(),
                            offset: self.consumed,
                        },
                    ));
                }
            }
        }

        Ok(())
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.output_pos == self.output.len() {
            self.fill_output()?;
        }

        let pending = &self.output[self.output_pos..];
        let n = pending.len().min(buf.len());
        buf[..n].copy_from_slice(&pending[..n]);
        self.output_pos += n;
        Ok(n)
    }
}
