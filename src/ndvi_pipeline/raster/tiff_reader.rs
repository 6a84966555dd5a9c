//! Raster reader implementation using the tiff library.
//!
//! Handles the two layouts NDVI needs: one page with several samples per
//! pixel, and several single-sample pages each labeled by a description or
//! name tag. Reduced-resolution overviews and transparency masks are skipped.
//! Band-interleaved pages are decoded plane by plane and re-interleaved.

use std::io::{Cursor, Read, Seek};

use tiff::TiffError;
use tiff::decoder::{ChunkType, Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::{debug, warn};

use crate::ndvi_pipeline::common::error::{AnalysisError, Result};
use crate::ndvi_pipeline::config::AnalysisConfig;
use crate::ndvi_pipeline::raster::reader::RasterReader;
use crate::ndvi_pipeline::raster::types::{RasterContainer, RasterPage};

/// NewSubfileType bits: 0x1 reduced-resolution image, 0x4 transparency mask.
const SKIPPED_SUBFILE_MASK: u32 = 0x1 | 0x4;

/// PageName, not part of the tiff crate's named tag set.
const PAGE_NAME_TAG: u16 = 285;

/// PlanarConfiguration value for one plane per sample.
const PLANAR_SEPARATE: u16 = 2;

pub struct TiffRasterReader;

fn malformed(e: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::MalformedContainer(e.to_string())
}

/// A page too large for the decode buffer is a size problem, not a corrupt file.
fn decode_error(e: TiffError, width: usize, height: usize) -> AnalysisError {
    match e {
        TiffError::LimitsExceeded => AnalysisError::InvalidDimensions(width, height),
        other => malformed(other),
    }
}

/// Decoder limits for `config`. Without a configured cap the tiff crate's
/// 256 MiB default is lifted, since `max_dimension` already bounds page size.
pub fn decoder_limits(config: &AnalysisConfig) -> Limits {
    let mut limits = Limits::unlimited();
    if let Some(limit) = config.decode_buffer_limit {
        limits.decoding_buffer_size = limit;
    }
    limits
}

fn check_dimensions(width: usize, height: usize, config: &AnalysisConfig) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(AnalysisError::InvalidDimensions(width, height));
    }
    if !config.validate_dimensions {
        return Ok(());
    }
    if let Some(max) = config.max_dimension {
        if width > max || height > max {
            warn!("Page dimensions {}x{} exceed maximum {}", width, height, max);
            return Err(AnalysisError::InvalidDimensions(width, height));
        }
    }
    Ok(())
}

macro_rules! samples_as_f32 {
    ($buf:expr) => {
        $buf.into_iter().map(|v| v as f32).collect()
    };
}

fn decode_samples(result: DecodingResult) -> Result<Vec<f32>> {
    let samples: Vec<f32> = match result {
        DecodingResult::U8(buf) => samples_as_f32!(buf),
        DecodingResult::U16(buf) => samples_as_f32!(buf),
        DecodingResult::U32(buf) => samples_as_f32!(buf),
        DecodingResult::U64(buf) => samples_as_f32!(buf),
        DecodingResult::I8(buf) => samples_as_f32!(buf),
        DecodingResult::I16(buf) => samples_as_f32!(buf),
        DecodingResult::I32(buf) => samples_as_f32!(buf),
        DecodingResult::I64(buf) => samples_as_f32!(buf),
        DecodingResult::F16(buf) => buf.into_iter().map(|v| v.to_f32()).collect(),
        DecodingResult::F32(buf) => buf,
        DecodingResult::F64(buf) => samples_as_f32!(buf),
        #[allow(unreachable_patterns)]
        _ => return Err(malformed("unsupported sample format")),
    };
    Ok(samples)
}

fn read_label<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<String> {
    let tags = [Tag::ImageDescription, Tag::from_u16_exhaustive(PAGE_NAME_TAG)];
    tags.into_iter()
        .filter_map(|tag| decoder.get_tag_ascii_string(tag).ok())
        .map(|text| text.trim_end_matches('\0').trim().to_string())
        .find(|text| !text.is_empty())
}

fn is_band_interleaved<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<bool> {
    let planar = decoder
        .find_tag_unsigned::<u16>(Tag::PlanarConfiguration)
        .map_err(malformed)?;
    Ok(planar == Some(PLANAR_SEPARATE))
}

/// Reads every plane of a band-interleaved page into pixel-interleaved order.
///
/// `read_image` only returns the first plane of such a page, so the strips of
/// each plane are read one by one. Strip indices run plane after plane.
fn read_planes<R: Read + Seek>(decoder: &mut Decoder<R>, width: usize, height: usize) -> Result<Vec<f32>> {
    if !matches!(decoder.get_chunk_type(), ChunkType::Strip) {
        return Err(malformed("tiled band-interleaved layout is not supported"));
    }

    let planes = decoder
        .find_tag_unsigned::<u16>(Tag::SamplesPerPixel)
        .map_err(malformed)?
        .unwrap_or(1)
        .max(1);
    let strips = decoder.strip_count().map_err(malformed)?;
    let strips_per_plane = strips / u32::from(planes);

    let channels = usize::from(planes);
    let pixels = width * height;
    let mut samples = vec![0.0f32; pixels * channels];

    for plane in 0..planes {
        let mut pixel = 0;
        for strip in 0..strips_per_plane {
            let chunk = u32::from(plane) * strips_per_plane + strip;
            let result = decoder
                .read_chunk(chunk)
                .map_err(|e| decode_error(e, width, height))?;
            let values = decode_samples(result)?;

            if pixel + values.len() > pixels {
                return Err(malformed(format!(
                    "plane {} holds more than {}x{} samples",
                    plane, width, height
                )));
            }
            let plane = usize::from(plane);
            for (offset, value) in values.iter().enumerate() {
                samples[(pixel + offset) * channels + plane] = *value;
            }
            pixel += values.len();
        }

        if pixel != pixels {
            return Err(malformed(format!(
                "plane {} holds {} of {} samples",
                plane, pixel, pixels
            )));
        }
    }

    debug!(planes, strips_per_plane, "Re-interleaved band-interleaved page");
    Ok(samples)
}

fn read_page<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    index: usize,
    config: &AnalysisConfig,
) -> Result<RasterPage> {
    let (width, height) = decoder.dimensions().map_err(malformed)?;
    let (width, height) = (width as usize, height as usize);
    check_dimensions(width, height, config)?;

    let label = read_label(decoder);

    let samples = if is_band_interleaved(decoder)? {
        read_planes(decoder, width, height)?
    } else {
        let result = decoder
            .read_image()
            .map_err(|e| decode_error(e, width, height))?;
        decode_samples(result)?
    };

    let pixels = width * height;
    if samples.len() % pixels != 0 || samples.len() < pixels {
        return Err(malformed(format!(
            "page {}: {} samples do not fit {}x{} pixels",
            index,
            samples.len(),
            width,
            height
        )));
    }
    let channels = samples.len() / pixels;

    debug!(page = index, width, height, channels, label = ?label, "Decoded raster page");

    Ok(RasterPage {
        width,
        height,
        channels,
        samples,
        label,
    })
}

impl RasterReader for TiffRasterReader {
    /// Decodes every full-resolution page of a TIFF container.
    ///
    /// Page sizes are checked against `config` from the page header, before
    /// any pixel data is decoded.
    ///
    /// # Returns
    ///
    /// * `Ok(RasterContainer)` - At least one page was decoded
    /// * `Err(AnalysisError::MalformedContainer)` - The bytes are not a readable TIFF
    /// * `Err(AnalysisError::InvalidDimensions)` - A page is empty or too large
    fn read_container(&self, data: &[u8], config: &AnalysisConfig) -> Result<RasterContainer> {
        debug!("Decoding raster container, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(malformed)?
            .with_limits(decoder_limits(config));
        let mut pages = Vec::new();
        let mut index = 0;

        loop {
            let subfile_type = decoder.get_tag_u32(Tag::NewSubfileType).unwrap_or(0);
            if subfile_type & SKIPPED_SUBFILE_MASK != 0 {
                debug!(page = index, subfile_type, "Skipping overview or mask page");
            } else {
                pages.push(read_page(&mut decoder, index, config)?);
            }

            if !decoder.more_images() {
                break;
            }
            decoder.next_image().map_err(malformed)?;
            index += 1;
        }

        if pages.is_empty() {
            return Err(malformed("no full-resolution pages"));
        }

        debug!("Decoded {} of {} pages", pages.len(), index + 1);
        Ok(RasterContainer::new(pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{TiffEncoder, colortype};

    fn encode_pages(pages: &[(Option<&str>, u32, Vec<u16>)]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
            for (label, subfile_type, data) in pages {
                let mut image = encoder.new_image::<colortype::Gray16>(4, 2).unwrap();
                if let Some(label) = label {
                    image.encoder().write_tag(Tag::ImageDescription, *label).unwrap();
                }
                if *subfile_type != 0 {
                    image.encoder().write_tag(Tag::NewSubfileType, *subfile_type).unwrap();
                }
                image.write_data(data).unwrap();
            }
        }
        cursor.into_inner()
    }

    /// Little-endian 8-bit TIFF with one plane per band, `rows_per_strip`
    /// rows in each strip. Needs at least three bands so every array tag is
    /// stored out of line.
    fn encode_band_interleaved(width: u16, height: u16, rows_per_strip: u16, bands: &[Vec<u8>]) -> Vec<u8> {
        assert!(bands.len() >= 3);
        let band_count = bands.len() as u32;
        let strips_per_band = u32::from(height.div_ceil(rows_per_strip));
        let strip_count = band_count * strips_per_band;

        let entries: u16 = 10;
        let bits_offset = 8 + 2 + 12 * u32::from(entries) + 4;
        let offsets_offset = bits_offset + 2 * band_count;
        let counts_offset = offsets_offset + 4 * strip_count;
        let data_offset = counts_offset + 4 * strip_count;

        let mut strip_offsets = Vec::new();
        let mut strip_counts = Vec::new();
        let mut data = Vec::new();
        for band in bands {
            for strip in band.chunks(usize::from(width) * usize::from(rows_per_strip)) {
                strip_offsets.push(data_offset + data.len() as u32);
                strip_counts.push(strip.len() as u32);
                data.extend_from_slice(strip);
            }
        }

        let mut out = b"II*\0".to_vec();
        out.extend(8u32.to_le_bytes());
        out.extend(entries.to_le_bytes());
        let ifd: [(u16, u16, u32, u32); 10] = [
            (256, 3, 1, u32::from(width)),
            (257, 3, 1, u32::from(height)),
            (258, 3, band_count, bits_offset),
            (259, 3, 1, 1),
            (262, 3, 1, 1),
            (273, 4, strip_count, offsets_offset),
            (277, 3, 1, band_count),
            (278, 3, 1, u32::from(rows_per_strip)),
            (279, 4, strip_count, counts_offset),
            (284, 3, 1, u32::from(PLANAR_SEPARATE)),
        ];
        for (tag, field_type, count, value) in ifd {
            out.extend(tag.to_le_bytes());
            out.extend(field_type.to_le_bytes());
            out.extend(count.to_le_bytes());
            out.extend(value.to_le_bytes());
        }
        out.extend(0u32.to_le_bytes());
        for _ in 0..band_count {
            out.extend(8u16.to_le_bytes());
        }
        strip_offsets.iter().for_each(|v| out.extend(v.to_le_bytes()));
        strip_counts.iter().for_each(|v| out.extend(v.to_le_bytes()));
        out.extend(data);
        out
    }

    #[test]
    fn test_reads_labeled_pages() {
        let bytes = encode_pages(&[
            (Some("Band 4: Red"), 0, vec![100; 8]),
            (Some("Band 8: NIR"), 0, vec![3000; 8]),
        ]);

        let container = TiffRasterReader.read_container(&bytes, &AnalysisConfig::default()).unwrap();

        assert_eq!(container.page_count(), 2);
        assert_eq!(container.pages[0].label.as_deref(), Some("Band 4: Red"));
        assert_eq!(container.pages[1].label.as_deref(), Some("Band 8: NIR"));
        assert_eq!(container.pages[1].shape(), (2, 4));
        assert_eq!(container.pages[1].channels, 1);
        assert!(container.pages[1].samples.iter().all(|&v| v == 3000.0));
    }

    #[test]
    fn test_page_name_labels_page_without_description() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
            let mut image = encoder.new_image::<colortype::Gray16>(4, 2).unwrap();
            image
                .encoder()
                .write_tag(Tag::from_u16_exhaustive(PAGE_NAME_TAG), "Band 5: NIR")
                .unwrap();
            image.write_data(&[7u16; 8]).unwrap();
        }

        let container = TiffRasterReader
            .read_container(cursor.get_ref(), &AnalysisConfig::default())
            .unwrap();

        assert_eq!(container.pages[0].label.as_deref(), Some("Band 5: NIR"));
    }

    #[test]
    fn test_skips_reduced_resolution_pages() {
        let bytes = encode_pages(&[
            (Some("red"), 0, vec![1; 8]),
            (Some("red overview"), 1, vec![2; 8]),
            (None, 0, vec![3; 8]),
        ]);

        let container = TiffRasterReader.read_container(&bytes, &AnalysisConfig::default()).unwrap();

        assert_eq!(container.page_count(), 2);
        assert_eq!(container.pages[1].label, None);
        assert_eq!(container.pages[1].samples[0], 3.0);
    }

    #[test]
    fn test_reads_interleaved_channels() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
            let data: Vec<u8> = (0..2 * 2 * 4).map(|v| v as u8).collect();
            encoder.write_image::<colortype::RGBA8>(2, 2, &data).unwrap();
        }

        let container = TiffRasterReader
            .read_container(cursor.get_ref(), &AnalysisConfig::default())
            .unwrap();
        let page = container.primary().unwrap();

        assert_eq!(page.channels, 4);
        assert_eq!(page.channel(3), Some(vec![3.0, 7.0, 11.0, 15.0]));
    }

    #[test]
    fn test_reads_every_band_interleaved_plane() {
        // One row per strip, so each plane spans two strips.
        let bands: Vec<Vec<u8>> = [20u8, 40, 50, 150]
            .iter()
            .map(|&base| (0..4).map(|i| base + i).collect())
            .collect();
        let bytes = encode_band_interleaved(2, 2, 1, &bands);

        let container = TiffRasterReader.read_container(&bytes, &AnalysisConfig::default()).unwrap();
        let page = container.primary().unwrap();

        assert_eq!(page.channels, 4);
        assert_eq!(page.channel(0), Some(vec![20.0, 21.0, 22.0, 23.0]));
        assert_eq!(page.channel(2), Some(vec![50.0, 51.0, 52.0, 53.0]));
        assert_eq!(page.channel(3), Some(vec![150.0, 151.0, 152.0, 153.0]));
    }

    #[test]
    fn test_oversized_page_rejected_before_decoding() {
        let bands = vec![vec![1u8; 4]; 4];
        let mut bytes = encode_band_interleaved(2, 2, 2, &bands);
        // Cut the last plane short: decoding it would fail.
        bytes.truncate(bytes.len() - 2);

        let config = AnalysisConfig::builder().max_dimension(Some(1)).build();
        let rejected = TiffRasterReader.read_container(&bytes, &config);
        let decoded = TiffRasterReader.read_container(&bytes, &AnalysisConfig::default());

        assert!(matches!(rejected.unwrap_err(), AnalysisError::InvalidDimensions(2, 2)));
        assert!(matches!(decoded.unwrap_err(), AnalysisError::MalformedContainer(_)));
    }

    #[test]
    fn test_decode_buffer_limit_is_invalid_dimensions() {
        let bytes = encode_pages(&[(None, 0, vec![9; 8])]);
        let config = AnalysisConfig::builder().decode_buffer_limit(Some(8)).build();

        let result = TiffRasterReader.read_container(&bytes, &config);

        assert!(matches!(result.unwrap_err(), AnalysisError::InvalidDimensions(4, 2)));
    }

    #[test]
    fn test_default_limits_lift_decoder_cap() {
        let limits = decoder_limits(&AnalysisConfig::default());
        assert_eq!(limits.decoding_buffer_size, usize::MAX);

        let config = AnalysisConfig::builder().decode_buffer_limit(Some(1024)).build();
        assert_eq!(decoder_limits(&config).decoding_buffer_size, 1024);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let result = TiffRasterReader.read_container(b"definitely not a tiff", &AnalysisConfig::default());

        assert!(matches!(result.unwrap_err(), AnalysisError::MalformedContainer(_)));
    }
}
