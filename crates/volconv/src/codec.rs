//! Encoding and decoding of `.vol` volume files.
//!
//! Binary layout, little-endian, 48 byte header followed by the samples:
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 3 | magic `VOL` |
//! | 3 | 1 | version `3` |
//! | 4 | 4 | i32 type, `1` = float |
//! | 8 | 12 | i32 dims x, y, z |
//! | 20 | 4 | i32 channel count, `1` |
//! | 24 | 12 | f32 world min x, y, z |
//! | 36 | 12 | f32 world max x, y, z |
//! | 48 | 4·N | f32 samples, x fastest |
//!
//! The ASCII twin is the samples alone as `{:.6}` decimals joined by `", "`.
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use glam::{IVec3, Vec3};
use tracing::debug;

use crate::error::{Error, Result};
use crate::volume::{sample_count, SampleVolume, VolumeFormat};

/// File magic.
pub const MAGIC: [u8; 3] = *b"VOL";
/// Format version written and accepted.
pub const VERSION: u8 = 3;
/// Type tag for 32-bit float samples.
pub const TYPE_FLOAT32: i32 = 1;
/// Number of channels per sample.
pub const CHANNELS: i32 = 1;
/// Bytes before the sample payload.
pub const HEADER_LEN: usize = 48;

const ASCII_SEPARATOR: &str = ", ";

/// Writes the binary layout of `volume`.
pub fn encode_binary<W: Write>(volume: &SampleVolume, writer: &mut W) -> Result<()> {
    let mut header = [0u8; HEADER_LEN];
    header[..3].copy_from_slice(&MAGIC);
    header[3] = VERSION;
    LittleEndian::write_i32_into(
        &[
            TYPE_FLOAT32,
            volume.dims.x,
            volume.dims.y,
            volume.dims.z,
            CHANNELS,
        ],
        &mut header[4..24],
    );
    LittleEndian::write_f32_into(
        &[
            volume.world_min.x,
            volume.world_min.y,
            volume.world_min.z,
            volume.world_max.x,
            volume.world_max.y,
            volume.world_max.z,
        ],
        &mut header[24..48],
    );
    writer.write_all(&header)?;

    for v in &volume.values {
        writer.write_f32::<LittleEndian>(*v)?;
    }
    Ok(())
}

/// Writes the samples of `volume` as comma separated text.
pub fn encode_ascii<W: Write>(volume: &SampleVolume, writer: &mut W) -> Result<()> {
    for (i, v) in volume.values.iter().enumerate() {
        if i > 0 {
            writer.write_all(ASCII_SEPARATOR.as_bytes())?;
        }
        write!(writer, "{v:.6}")?;
    }
    Ok(())
}

/// Writes `volume` in the requested format.
pub fn encode<W: Write>(volume: &SampleVolume, format: VolumeFormat, writer: &mut W) -> Result<()> {
    match format {
        VolumeFormat::Ascii => encode_ascii(volume, writer),
        VolumeFormat::Binary => encode_binary(volume, writer),
    }
}

/// Encodes `volume` into a byte vector.
pub fn encode_to_vec(volume: &SampleVolume, format: VolumeFormat) -> Result<Vec<u8>> {
    let capacity = match format {
        VolumeFormat::Binary => HEADER_LEN + 4 * volume.len(),
        VolumeFormat::Ascii => 10 * volume.len(),
    };
    let mut out = Vec::with_capacity(capacity);
    encode(volume, format, &mut out)?;
    Ok(out)
}

/// Writes `volume` to `path`.
///
/// Data goes to a sibling temporary file that is synced and then renamed over `path`, so
/// a failure never leaves a truncated file under the final name.
pub fn write_volume(volume: &SampleVolume, format: VolumeFormat, path: &Path) -> Result<()> {
    let tmp = temporary_path(path);
    let result = write_then_rename(volume, format, &tmp, path);
    if result.is_err() {
        // The temporary may not exist if the open itself failed.
        let _ = fs::remove_file(&tmp);
    }
    result.map_err(|e| Error::write(path, e))
}

fn write_then_rename(
    volume: &SampleVolume,
    format: VolumeFormat,
    tmp: &Path,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(tmp)?;
    let mut writer = BufWriter::new(file);
    encode(volume, format, &mut writer).map_err(into_io)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, path)?;
    debug!("Wrote {} samples to {}", volume.len(), path.display());
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

fn into_io(err: Error) -> io::Error {
    match err {
        Error::Io(e) => e,
        other => io::Error::other(other.to_string()),
    }
}

/// Header fields of a binary volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeHeader {
    pub version: u8,
    pub dims: IVec3,
    pub world_min: Vec3,
    pub world_max: Vec3,
}

impl VolumeHeader {
    /// Number of samples announced by the header, `None` if it does not fit in `usize`.
    pub fn sample_count(&self) -> Option<usize> {
        sample_count(self.dims)
    }
}

/// Reads and validates the 48 byte header.
pub fn decode_header<R: Read>(reader: &mut R) -> Result<VolumeHeader> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).map_err(truncated)?;

    if header[..3] != MAGIC {
        return Err(Error::InvalidVolume(format!(
            "bad magic {:?}, expected \"VOL\"",
            String::from_utf8_lossy(&header[..3])
        )));
    }
    let version = header[3];
    if version != VERSION {
        return Err(Error::InvalidVolume(format!(
            "unsupported version {version}, expected {VERSION}"
        )));
    }

    let int = |i: usize| LittleEndian::read_i32(&header[4 + 4 * i..]);
    let float = |i: usize| LittleEndian::read_f32(&header[4 + 4 * i..]);

    let ty = int(0);
    if ty != TYPE_FLOAT32 {
        return Err(Error::InvalidVolume(format!("unsupported sample type {ty}")));
    }
    let channels = int(4);
    if channels != CHANNELS {
        return Err(Error::InvalidVolume(format!(
            "unsupported channel count {channels}"
        )));
    }
    let dims = IVec3::new(int(1), int(2), int(3));
    if dims.cmplt(IVec3::ZERO).any() {
        return Err(Error::InvalidVolume(format!("negative dimensions {dims}")));
    }

    Ok(VolumeHeader {
        version,
        dims,
        world_min: Vec3::new(float(5), float(6), float(7)),
        world_max: Vec3::new(float(8), float(9), float(10)),
    })
}

/// Decodes a full binary volume. Trailing bytes after the payload are rejected.
pub fn decode_binary<R: Read>(reader: &mut R) -> Result<SampleVolume> {
    let header = decode_header(reader)?;
    let (count, expected) = header
        .sample_count()
        .and_then(|n| Some((n, n.checked_mul(4)?)))
        .ok_or_else(|| {
            Error::InvalidVolume(format!("dimensions {} are too large", header.dims))
        })?;

    let mut payload = Vec::new();
    reader
        .by_ref()
        .take(expected as u64)
        .read_to_end(&mut payload)?;
    if payload.len() != expected {
        return Err(Error::InvalidVolume("file is truncated".into()));
    }
    let mut extra = [0u8; 1];
    if reader.read(&mut extra)? != 0 {
        return Err(Error::InvalidVolume(format!(
            "unexpected data after {count} samples"
        )));
    }

    let mut values = vec![0.0f32; count];
    LittleEndian::read_f32_into(&payload, &mut values);
    SampleVolume::new(header.dims, header.world_min, header.world_max, values)
}

/// Reads a binary volume from `path`.
pub fn read_volume(path: &Path) -> Result<SampleVolume> {
    let mut reader = BufReader::new(File::open(path)?);
    decode_binary(&mut reader)
}

fn truncated(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::InvalidVolume("file is truncated".into())
    } else {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume_231() -> SampleVolume {
        SampleVolume::new(
            IVec3::new(2, 3, 1),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5],
        )
        .unwrap()
    }

    fn le_i32(v: i32) -> [u8; 4] {
        v.to_le_bytes()
    }

    #[test]
    fn binary_header_is_bit_exact() {
        let bytes = encode_to_vec(&volume_231(), VolumeFormat::Binary).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 6 * 4);

        let mut expected = vec![b'V', b'O', b'L', 0x03];
        for v in [1, 2, 3, 1, 1] {
            expected.extend_from_slice(&le_i32(v));
        }
        for v in [0.0f32, 0.0, 0.0, 1.0, 1.0, 0.0] {
            expected.extend_from_slice(&v.to_le_bytes());
        }
        for v in [0.0f32, 0.5, 1.0, 1.5, 2.0, 2.5] {
            expected.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(bytes, expected);
    }

    #[test]
    fn binary_roundtrip_is_bit_identical() {
        let original = SampleVolume::new(
            IVec3::new(3, 1, 2),
            Vec3::new(-1.25, 0.1, 7.0),
            Vec3::new(3.5, 0.1, 9.75),
            vec![f32::MIN_POSITIVE, -0.0, 1.0e-30, 1.2345, f32::MAX, -7.5],
        )
        .unwrap();
        let bytes = encode_to_vec(&original, VolumeFormat::Binary).unwrap();
        let decoded = decode_binary(&mut bytes.as_slice()).unwrap();

        assert_eq!(decoded.dims, original.dims);
        assert_eq!(decoded.world_min, original.world_min);
        assert_eq!(decoded.world_max, original.world_max);
        let bits = |v: &SampleVolume| v.values.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&decoded), bits(&original));
    }

    #[test]
    fn ascii_uses_single_separators() {
        let v = SampleVolume::new(IVec3::new(2, 1, 1), Vec3::ZERO, Vec3::ZERO, vec![1.0, 2.5])
            .unwrap();
        let text = encode_to_vec(&v, VolumeFormat::Ascii).unwrap();
        assert_eq!(String::from_utf8(text).unwrap(), "1.000000, 2.500000");

        let single =
            SampleVolume::new(IVec3::ONE, Vec3::ZERO, Vec3::ZERO, vec![-0.125]).unwrap();
        let text = encode_to_vec(&single, VolumeFormat::Ascii).unwrap();
        assert_eq!(String::from_utf8(text).unwrap(), "-0.125000");
    }

    #[test]
    fn decoder_rejects_corrupt_input() {
        let good = encode_to_vec(&volume_231(), VolumeFormat::Binary).unwrap();

        let mut bad_magic = good.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            decode_binary(&mut bad_magic.as_slice()),
            Err(Error::InvalidVolume(_))
        ));

        let mut bad_version = good.clone();
        bad_version[3] = 2;
        assert!(matches!(
            decode_binary(&mut bad_version.as_slice()),
            Err(Error::InvalidVolume(_))
        ));

        let short = &good[..good.len() - 2];
        assert!(matches!(
            decode_binary(&mut &short[..]),
            Err(Error::InvalidVolume(ref m)) if m.contains("truncated")
        ));

        let mut long = good.clone();
        long.push(0);
        assert!(matches!(
            decode_binary(&mut long.as_slice()),
            Err(Error::InvalidVolume(_))
        ));
    }

    #[test]
    fn decoder_rejects_oversized_dimensions() {
        let mut bytes = encode_to_vec(&volume_231(), VolumeFormat::Binary).unwrap();
        for i in 0..3 {
            let at = 8 + 4 * i;
            bytes[at..at + 4].copy_from_slice(&le_i32(i32::MAX));
        }
        assert!(matches!(
            decode_binary(&mut bytes.as_slice()),
            Err(Error::InvalidVolume(ref m)) if m.contains("too large")
        ));

        let header = decode_header(&mut bytes.as_slice()).unwrap();
        assert_eq!(header.dims, IVec3::splat(i32::MAX));
        assert_eq!(header.sample_count(), None);
    }

    #[test]
    fn write_volume_replaces_target_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene_density.vol");
        fs::write(&path, b"stale").unwrap();

        write_volume(&volume_231(), VolumeFormat::Binary, &path).unwrap();

        let decoded = read_volume(&path).unwrap();
        assert_eq!(decoded, volume_231());
        assert!(!temporary_path(&path).exists());
    }

    #[test]
    fn write_volume_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.vol");
        let err = write_volume(&volume_231(), VolumeFormat::Ascii, &path).unwrap_err();
        assert!(matches!(err, Error::Write { path: ref p, .. } if *p == path));
        assert!(!path.exists());
    }
}
