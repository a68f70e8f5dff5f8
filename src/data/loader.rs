// ============================================================
// Layer 4 — Raw IDX Loader
// ============================================================
// Reads raw digit data files in the IDX layout, the binary
// format the MNIST distribution uses.
//
// How an IDX image file is laid out (all integers big-endian):
//
//   offset 0   u32  magic  = 2051
//   offset 4   u32  number of images
//   offset 8   u32  rows per image
//   offset 12  u32  cols per image
//   offset 16  u8   pixel bytes, row-major, rows*cols per image
//
// A label file is the same idea with a shorter header:
//
//   offset 0   u32  magic  = 2049
//   offset 4   u32  number of labels
//   offset 8   u8   one label byte per record
//
// We read the whole file once, validate the header against the
// actual byte count, then slice the payload into records. A
// missing file is its own error variant so callers can tell
// "not there" apart from "there but broken".
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §8 (Collections)

use std::io;
use std::path::Path;
use std::{fs, path::PathBuf};

use crate::domain::error::{DigitError, DigitResult};
use crate::domain::raw::RawImage;

/// Magic number opening every IDX image file
const IMAGE_MAGIC: u32 = 2051;

/// Magic number opening every IDX label file
const LABEL_MAGIC: u32 = 2049;

/// Header bytes before the pixel payload of an image file
const IMAGE_HEADER_LEN: usize = 16;

/// Header bytes before the label payload of a label file
const LABEL_HEADER_LEN: usize = 8;

/// Read an IDX image file into one RawImage per record.
pub fn read_images(path: &Path) -> DigitResult<Vec<RawImage>> {
    let bytes = read_file(path)?;

    let magic = be_u32(&bytes, 0).ok_or_else(|| format_err(path, "truncated header"))?;
    if magic != IMAGE_MAGIC {
        return Err(format_err(path, format!("bad image magic {magic}")));
    }

    let count = be_u32(&bytes, 4).ok_or_else(|| format_err(path, "truncated header"))? as usize;
    let rows  = be_u32(&bytes, 8).ok_or_else(|| format_err(path, "truncated header"))? as usize;
    let cols  = be_u32(&bytes, 12).ok_or_else(|| format_err(path, "truncated header"))? as usize;

    // Header fields can claim sizes far past the real file, and
    // their products can overflow usize, so multiply checked.
    let per_image = rows
        .checked_mul(cols)
        .ok_or_else(|| format_err(path, "image dimensions overflow"))?;
    let expected = count
        .checked_mul(per_image)
        .and_then(|n| n.checked_add(IMAGE_HEADER_LEN))
        .ok_or_else(|| format_err(path, "image count overflows"))?;
    if bytes.len() != expected {
        return Err(format_err(
            path,
            format!("expected {expected} bytes, found {}", bytes.len()),
        ));
    }
    if count > 0 && per_image == 0 {
        return Err(format_err(path, "image dimensions are zero"));
    }

    let images = if count == 0 {
        Vec::new()
    } else {
        bytes[IMAGE_HEADER_LEN..]
            .chunks(per_image)
            .map(|pixels| RawImage::new(pixels.to_vec(), rows, cols))
            .collect()
    };

    tracing::debug!(
        "Read {} images ({}x{}) from '{}'",
        images.len(),
        rows,
        cols,
        path.display()
    );
    Ok(images)
}

/// Read an IDX label file into one byte per record.
pub fn read_labels(path: &Path) -> DigitResult<Vec<u8>> {
    let bytes = read_file(path)?;

    let magic = be_u32(&bytes, 0).ok_or_else(|| format_err(path, "truncated header"))?;
    if magic != LABEL_MAGIC {
        return Err(format_err(path, format!("bad label magic {magic}")));
    }

    let count = be_u32(&bytes, 4).ok_or_else(|| format_err(path, "truncated header"))? as usize;
    let expected = count
        .checked_add(LABEL_HEADER_LEN)
        .ok_or_else(|| format_err(path, "label count overflows"))?;
    if bytes.len() != expected {
        return Err(format_err(
            path,
            format!("expected {expected} bytes, found {}", bytes.len()),
        ));
    }

    let labels = bytes[LABEL_HEADER_LEN..].to_vec();
    tracing::debug!("Read {} labels from '{}'", labels.len(), path.display());
    Ok(labels)
}

/// Read a whole raw file, mapping the missing-file case to its
/// dedicated variant.
fn read_file(path: &Path) -> DigitResult<Vec<u8>> {
    fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            DigitError::DataNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DigitError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Decode the big-endian u32 starting at `offset`, or None if
/// the buffer ends before the field does.
fn be_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let field: [u8; 4] = bytes.get(offset..offset + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(field))
}

fn format_err(path: &Path, reason: impl Into<String>) -> DigitError {
    DigitError::Format {
        path: PathBuf::from(path),
        reason: reason.into(),
    }
}
