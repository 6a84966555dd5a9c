//! Acquisition source and storage format guessed from file extensions.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataSource {
    Satellite,
    Drone,
    Specialized,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Satellite => "Satellite",
            DataSource::Drone => "Drone",
            DataSource::Specialized => "Specialized",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatType {
    #[serde(rename = "GeoTIFF")]
    GeoTiff,
    #[serde(rename = "HDF5")]
    Hdf5,
    #[serde(rename = "NetCDF")]
    NetCdf,
    #[serde(rename = "JPEG/PNG")]
    JpegPng,
}

impl FormatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatType::GeoTiff => "GeoTIFF",
            FormatType::Hdf5 => "HDF5",
            FormatType::NetCdf => "NetCDF",
            FormatType::JpegPng => "JPEG/PNG",
        }
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension groups in precedence order.
const RULES: &[(&[&str], DataSource, FormatType)] = &[
    (&[".tif", ".tiff", ".geotiff"], DataSource::Satellite, FormatType::GeoTiff),
    (&[".hdf", ".h5"], DataSource::Specialized, FormatType::Hdf5),
    (&[".nc"], DataSource::Specialized, FormatType::NetCdf),
    (&[".jpg", ".jpeg", ".png"], DataSource::Drone, FormatType::JpegPng),
];

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') { ext } else { format!(".{}", ext) }
}

/// Lowercase dotted extension of a path, e.g. `".tif"`.
pub fn extension_of<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(normalize_extension)
}

/// First matching (source, format) for a set of extensions.
pub fn guess<I, S>(extensions: I) -> Option<(DataSource, FormatType)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let seen: HashSet<String> = extensions
        .into_iter()
        .map(|ext| normalize_extension(ext.as_ref()))
        .collect();

    RULES
        .iter()
        .find(|(group, _, _)| group.iter().any(|ext| seen.contains(*ext)))
        .map(|&(_, source, format)| (source, format))
}

/// Fills whichever of source and format is unset; set values are never overwritten.
pub fn classify<I, S>(
    extensions: I,
    current_source: Option<DataSource>,
    current_format: Option<FormatType>,
) -> (Option<DataSource>, Option<FormatType>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if current_source.is_some() && current_format.is_some() {
        return (current_source, current_format);
    }
    match guess(extensions) {
        Some((source, format)) => (current_source.or(Some(source)), current_format.or(Some(format))),
        None => (current_source, current_format),
    }
}
