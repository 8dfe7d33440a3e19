//! MP3 duration from MPEG audio frame headers
//!
//! Handles ID3v2/ID3v1 tag skipping, both de-facto VBR header conventions
//! (Xing/Info and VBRI), and a constant-bitrate estimate as the fallback.
//! Only Layer III streams are accepted; everything a song upload produces in
//! practice is Layer III, and restricting the sync scan this way avoids
//! false positives on tag padding.

use crate::error::{Result, SongprobeError};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// How far past the ID3v2 tag the first frame sync is searched for
const SYNC_SCAN_WINDOW: u64 = 8 * 1024;

/// Layer III bitrates in kbps, indexed by the raw 4-bit bitrate field.
/// Index 0 (free format) and 15 (reserved) are unusable and left at 0.
const BITRATES_V1: [u32; 16] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0,
];
const BITRATES_V2: [u32; 16] = [
    0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0,
];

/// Sample rates in Hz, indexed by the raw 2-bit sample-rate field.
/// Index 3 is reserved and rejected before lookup.
const SAMPLE_RATES_V1: [u32; 3] = [44_100, 48_000, 32_000];
const SAMPLE_RATES_V2: [u32; 3] = [22_050, 24_000, 16_000];
const SAMPLE_RATES_V25: [u32; 3] = [11_025, 12_000, 8_000];

/// Decoded MPEG Layer III frame header
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameHeader {
    bitrate_kbps: u32,
    sample_rate: u32,
    samples_per_frame: u32,
    mono: bool,
}

impl FrameHeader {
    /// Decode 4 raw header bytes. Returns `None` for anything that is not a
    /// valid Layer III header with usable bitrate and sample-rate fields.
    fn decode(raw: [u8; 4]) -> Option<FrameHeader> {
        let hdr = u32::from_be_bytes(raw);

        // Frame sync: top 11 bits all set
        if hdr >> 21 != 0x7FF {
            return None;
        }

        // Version field per the ISO table: 00 = MPEG 2.5, 01 = reserved,
        // 10 = MPEG 2, 11 = MPEG 1. Not a linear enumeration.
        let version = (hdr >> 19) & 0x3;
        if version == 0b01 {
            return None;
        }
        let is_v1 = version == 0b11;

        // Layer field: 01 = Layer III
        if (hdr >> 17) & 0x3 != 0b01 {
            return None;
        }

        let bitrate_index = ((hdr >> 12) & 0xF) as usize;
        if bitrate_index == 0 || bitrate_index == 15 {
            return None;
        }

        let rate_index = ((hdr >> 10) & 0x3) as usize;
        if rate_index == 3 {
            return None;
        }

        let bitrate_kbps = if is_v1 {
            BITRATES_V1[bitrate_index]
        } else {
            BITRATES_V2[bitrate_index]
        };

        let sample_rate = match version {
            0b11 => SAMPLE_RATES_V1[rate_index],
            0b10 => SAMPLE_RATES_V2[rate_index],
            _ => SAMPLE_RATES_V25[rate_index],
        };

        // 1152 samples per frame for MPEG-1 Layer III, 576 for MPEG-2/2.5
        let samples_per_frame = if is_v1 { 1152 } else { 576 };

        // Channel mode 11 = mono; every other mode carries two channels
        let mono = (hdr >> 6) & 0x3 == 0b11;

        Some(FrameHeader {
            bitrate_kbps,
            sample_rate,
            samples_per_frame,
            mono,
        })
    }

    /// Length of the side information that precedes a Xing/Info header.
    /// Asymmetric by channel mode: 17 bytes for mono, 32 for stereo.
    fn side_info_len(&self) -> usize {
        if self.mono {
            17
        } else {
            32
        }
    }
}

pub(crate) fn duration(path: &Path) -> Result<f64> {
    let mut file = File::open(path)?;
    let file_len = file.metadata()?.len();

    let audio_start = skip_id3v2(path, &mut file)?;
    let audio_end = audio_end(&mut file, file_len)?;
    if audio_start >= audio_end {
        return Err(SongprobeError::parse(path, "no audio data between tags"));
    }

    // Bounded forward scan for the first valid frame sync
    file.seek(SeekFrom::Start(audio_start))?;
    let window_len = (audio_end - audio_start).min(SYNC_SCAN_WINDOW);
    let mut window = Vec::with_capacity(window_len as usize);
    (&mut file).take(window_len).read_to_end(&mut window)?;

    let (frame_start, header) = find_frame(&window, audio_start)
        .ok_or_else(|| SongprobeError::parse(path, "no MPEG frame sync within scan window"))?;

    // Both VBR headers live inside the first frame; 64 bytes covers the
    // Xing/Info and VBRI layouts
    file.seek(SeekFrom::Start(frame_start))?;
    let mut head = Vec::with_capacity(64);
    (&mut file).take(64).read_to_end(&mut head)?;

    if let Some(seconds) = vbr_duration(&head, &header) {
        return Ok(seconds);
    }

    // CBR fallback: audio byte length over bit rate
    let audio_bytes = (audio_end - frame_start) as f64;
    Ok(audio_bytes * 8.0 / (f64::from(header.bitrate_kbps) * 1000.0))
}

/// Compute the read offset past an optional ID3v2 tag at the file start.
///
/// The tag size field is synchsafe (7 bits per byte); the 10-byte header is
/// not included in it, nor is the optional 10-byte footer signalled by flag
/// bit 0x10.
fn skip_id3v2(path: &Path, file: &mut File) -> Result<u64> {
    let mut header = Vec::with_capacity(10);
    (&mut *file).take(10).read_to_end(&mut header)?;

    if header.len() < 10 || &header[..3] != b"ID3" {
        return Ok(0);
    }

    let size = synchsafe(&header[6..10])
        .ok_or_else(|| SongprobeError::parse(path, "corrupt synchsafe tag size"))?;

    let mut skip = 10 + u64::from(size);
    if header[5] & 0x10 != 0 {
        skip += 10;
    }
    Ok(skip)
}

/// Decode a 4-byte synchsafe integer. The top bit of each byte is always
/// zero; a set bit means the tag is corrupt.
fn synchsafe(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 4 || bytes.iter().any(|b| b & 0x80 != 0) {
        return None;
    }
    Some(
        (u32::from(bytes[0]) << 21)
            | (u32::from(bytes[1]) << 14)
            | (u32::from(bytes[2]) << 7)
            | u32::from(bytes[3]),
    )
}

/// End of the audio region: the file length, minus a trailing 128-byte ID3v1
/// tag when one is present.
fn audio_end(file: &mut File, file_len: u64) -> std::io::Result<u64> {
    if file_len < 128 {
        return Ok(file_len);
    }
    file.seek(SeekFrom::Start(file_len - 128))?;
    let mut marker = [0u8; 3];
    file.read_exact(&mut marker)?;
    Ok(if &marker == b"TAG" {
        file_len - 128
    } else {
        file_len
    })
}

/// Scan the window byte-by-byte for the first decodable frame header.
/// Returns the absolute offset of its first sync byte.
fn find_frame(window: &[u8], base: u64) -> Option<(u64, FrameHeader)> {
    let last = window.len().checked_sub(4)?;
    for i in 0..=last {
        if window[i] != 0xFF || window[i + 1] & 0xE0 != 0xE0 {
            continue;
        }
        let raw = [window[i], window[i + 1], window[i + 2], window[i + 3]];
        if let Some(header) = FrameHeader::decode(raw) {
            return Some((base + i as u64, header));
        }
    }
    None
}

/// Exact duration from a VBR header's frame count, if the first frame
/// carries one. `buf` starts at the frame sync.
fn vbr_duration(buf: &[u8], header: &FrameHeader) -> Option<f64> {
    let spf = f64::from(header.samples_per_frame);
    let rate = f64::from(header.sample_rate);

    // Xing/Info sits behind the side information
    let off = 4 + header.side_info_len();
    if let Some(marker) = buf.get(off..off + 4) {
        if marker == b"Xing" || marker == b"Info" {
            let flags = read_be_u32(buf, off + 4)?;
            // Flag bit 0: total frame count field present
            if flags & 0x1 != 0 {
                let frames = read_be_u32(buf, off + 8)?;
                return Some(f64::from(frames) * spf / rate);
            }
        }
    }

    // VBRI sits at a fixed 32 bytes from the frame start regardless of
    // channel mode; the frame count follows the marker, version, delay,
    // quality and byte-count fields
    if buf.get(32..36) == Some(b"VBRI".as_slice()) {
        let frames = read_be_u32(buf, 46)?;
        return Some(f64::from(frames) * spf / rate);
    }

    None
}

fn read_be_u32(buf: &[u8], off: usize) -> Option<u32> {
    let bytes: [u8; 4] = buf.get(off..off + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    // MPEG-1 Layer III, 128 kbps, 44100 Hz, stereo, no padding
    const V1_STEREO: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];

    #[test]
    fn test_decode_mpeg1_stereo() {
        let header = FrameHeader::decode(V1_STEREO).expect("valid header");
        assert_eq!(header.bitrate_kbps, 128);
        assert_eq!(header.sample_rate, 44_100);
        assert_eq!(header.samples_per_frame, 1152);
        assert!(!header.mono);
        assert_eq!(header.side_info_len(), 32);
    }

    #[test]
    fn test_decode_mpeg2_mono() {
        // MPEG-2 Layer III, 64 kbps (index 8), 22050 Hz, mono
        let header = FrameHeader::decode([0xFF, 0xF3, 0x80, 0xC0]).expect("valid header");
        assert_eq!(header.bitrate_kbps, 64);
        assert_eq!(header.sample_rate, 22_050);
        assert_eq!(header.samples_per_frame, 576);
        assert!(header.mono);
        assert_eq!(header.side_info_len(), 17);
    }

    #[test]
    fn test_decode_rejects_bad_sync() {
        assert_eq!(FrameHeader::decode([0xFE, 0xFB, 0x90, 0x00]), None);
        assert_eq!(FrameHeader::decode([0xFF, 0x7B, 0x90, 0x00]), None);
    }

    #[test]
    fn test_decode_rejects_reserved_version() {
        // Version bits 01 are reserved
        assert_eq!(FrameHeader::decode([0xFF, 0xEB, 0x90, 0x00]), None);
    }

    #[test]
    fn test_decode_rejects_non_layer3() {
        // Layer II (bits 10) and Layer I (bits 11)
        assert_eq!(FrameHeader::decode([0xFF, 0xFD, 0x90, 0x00]), None);
        assert_eq!(FrameHeader::decode([0xFF, 0xFF, 0x90, 0x00]), None);
    }

    #[test]
    fn test_decode_rejects_reserved_rate_fields() {
        // Bitrate index 15
        assert_eq!(FrameHeader::decode([0xFF, 0xFB, 0xF0, 0x00]), None);
        // Free-format bitrate (index 0)
        assert_eq!(FrameHeader::decode([0xFF, 0xFB, 0x00, 0x00]), None);
        // Sample-rate index 3
        assert_eq!(FrameHeader::decode([0xFF, 0xFB, 0x9C, 0x00]), None);
    }

    #[test]
    fn test_synchsafe_decoding() {
        // Each byte contributes 7 bits; this is not a big-endian u32
        assert_eq!(synchsafe(&[0x00, 0x00, 0x02, 0x01]), Some(257));
        assert_eq!(synchsafe(&[0x7F, 0x7F, 0x7F, 0x7F]), Some(0x0FFF_FFFF));
        assert_eq!(synchsafe(&[0x00, 0x00, 0x80, 0x01]), None);
        assert_eq!(synchsafe(&[0x00, 0x00, 0x01]), None);
    }

    #[test]
    fn test_find_frame_skips_lone_sync_bytes() {
        // A stray 0xFF that does not begin a valid header must be passed over
        let mut window = vec![0u8; 32];
        window[3] = 0xFF;
        window[4] = 0xE0; // sync bits but a reserved layer field
        window[10..14].copy_from_slice(&V1_STEREO);

        let (offset, header) = find_frame(&window, 100).expect("frame located");
        assert_eq!(offset, 110);
        assert_eq!(header.bitrate_kbps, 128);
    }
}
