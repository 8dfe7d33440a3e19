//! WAV duration from the RIFF chunk structure
//!
//! Walks the chunk list for `fmt ` (sample rate, block align) and `data`
//! (payload size). Duration is `data_size / (sample_rate * block_align)`,
//! which holds for any PCM layout because block align already folds in
//! channel count and sample width.

use crate::error::{Result, SongprobeError};
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// The `fmt ` body is read up to this many bytes; enough for WAVE_FORMAT_EXTENSIBLE
const FMT_BODY_MAX: u32 = 40;

pub(crate) fn duration(path: &Path) -> Result<f64> {
    let mut file = File::open(path)?;

    let mut riff = [0u8; 12];
    file.read_exact(&mut riff)
        .map_err(|_| SongprobeError::parse(path, "missing RIFF header"))?;
    if &riff[..4] != b"RIFF" || &riff[8..12] != b"WAVE" {
        return Err(SongprobeError::parse(path, "not a RIFF/WAVE file"));
    }

    let mut sample_rate = 0u32;
    let mut block_align = 0u16;
    let mut data_size: Option<u32> = None;

    loop {
        let mut chunk = [0u8; 8];
        match file.read_exact(&mut chunk) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
        let size = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);

        if &chunk[..4] == b"fmt " {
            let take = size.min(FMT_BODY_MAX);
            let mut body = vec![0u8; take as usize];
            file.read_exact(&mut body)
                .map_err(|_| SongprobeError::parse(path, "truncated fmt chunk"))?;
            if body.len() >= 14 {
                sample_rate = u32::from_le_bytes([body[4], body[5], body[6], body[7]]);
                block_align = u16::from_le_bytes([body[12], body[13]]);
            }
            // Skip whatever remains of an oversized fmt chunk, pad byte included
            let remainder = u64::from(size - take) + u64::from(size & 1);
            if remainder > 0 {
                file.seek(SeekFrom::Current(remainder as i64))?;
            }
        } else if &chunk[..4] == b"data" {
            data_size = Some(size);
            break;
        } else {
            // RIFF chunks are word-aligned: an odd size carries a pad byte
            file.seek(SeekFrom::Current(i64::from(size) + i64::from(size & 1)))?;
        }
    }

    let data_size =
        data_size.ok_or_else(|| SongprobeError::parse(path, "no data chunk found"))?;
    if sample_rate == 0 || block_align == 0 {
        return Err(SongprobeError::parse(path, "fmt chunk missing or zeroed"));
    }

    Ok(f64::from(data_size) / (f64::from(sample_rate) * f64::from(block_align)))
}
