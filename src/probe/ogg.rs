//! Ogg/Vorbis duration from page granule positions
//!
//! Two bounded windows instead of a full read: the identification header is
//! required to sit in the first pages of the stream, and the final granule
//! position in the last ones. The fixed tail window is a deliberate
//! approximation - a pathological file whose last page starts more than
//! 64 KB before EOF would be missed - traded for bounded memory on large
//! files.

use crate::error::{Result, SongprobeError};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Window searched for the Vorbis identification header
const HEAD_WINDOW: u64 = 4 * 1024;

/// Window searched backwards from EOF for the last page
const TAIL_WINDOW: u64 = 64 * 1024;

/// Packet-type byte plus codec name: start of the identification header
const VORBIS_ID_MARKER: &[u8] = b"\x01vorbis";

/// Capture pattern that opens every Ogg page
const PAGE_MARKER: &[u8] = b"OggS";

pub(crate) fn duration(path: &Path) -> Result<f64> {
    let mut file = File::open(path)?;
    let file_len = file.metadata()?.len();

    let mut head = Vec::with_capacity(HEAD_WINDOW as usize);
    (&mut file).take(HEAD_WINDOW).read_to_end(&mut head)?;

    let sample_rate = id_header_sample_rate(&head)
        .ok_or_else(|| SongprobeError::parse(path, "no Vorbis identification header"))?;
    if sample_rate == 0 {
        return Err(SongprobeError::parse(path, "identification header has zero sample rate"));
    }

    file.seek(SeekFrom::Start(file_len.saturating_sub(TAIL_WINDOW)))?;
    let mut tail = Vec::with_capacity(TAIL_WINDOW as usize);
    file.read_to_end(&mut tail)?;

    let granule = last_granule_position(&tail)
        .ok_or_else(|| SongprobeError::parse(path, "no valid Ogg page in tail window"))?;

    Ok(granule as f64 / f64::from(sample_rate))
}

/// Locate the identification header packet and pull out its sample-rate
/// field, a little-endian u32 at 12 bytes past the marker start (after the
/// packet type, codec name, version and channel-count fields).
fn id_header_sample_rate(head: &[u8]) -> Option<u32> {
    let marker = find(head, VORBIS_ID_MARKER)?;
    read_le_u32(head, marker + 12)
}

/// Greatest valid granule position among the pages in the tail window.
///
/// The granule is stored at header-relative bytes 6-13 as two little-endian
/// 32-bit halves, low then high. The all-ones pattern (-1) marks a page with
/// no finished packet and is skipped.
fn last_granule_position(tail: &[u8]) -> Option<u64> {
    let mut best: Option<u64> = None;
    let mut at = 0usize;

    while let Some(rel) = find(&tail[at..], PAGE_MARKER) {
        let page = at + rel;
        at = page + 1;

        let low = match read_le_u32(tail, page + 6) {
            Some(v) => v,
            None => break, // marker too close to EOF for a full granule field
        };
        let high = match read_le_u32(tail, page + 10) {
            Some(v) => v,
            None => break,
        };

        let granule = (u64::from(high) << 32) | u64::from(low);
        if granule == u64::MAX {
            continue;
        }
        best = Some(best.map_or(granule, |b| b.max(granule)));
    }

    best
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn read_le_u32(buf: &[u8], off: usize) -> Option<u32> {
    let bytes: [u8; 4] = buf.get(off..off + 4)?.try_into().ok()?;
    Some(u32::from_le_bytes(bytes))
}
