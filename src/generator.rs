use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, ImageEncoder, RgbaImage};

use crate::config::GeneratorConfig;
use crate::error::IconError;
use crate::mask::masked_source;

const ROOT_PNG_NAME: &str = "icon.png";
const ICO_NAME: &str = "icon.ico";
const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Generates the icon set for `source_path` into `output_dir` with default settings.
pub fn generate(source_path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, IconError> {
    IconAssetGenerator::new(GeneratorConfig::for_paths(source_path, output_dir)).run()
}

pub struct IconAssetGenerator {
    config: GeneratorConfig,
}

impl IconAssetGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Writes every PNG size, the unscaled `icon.png` and `icon.ico`.
    /// Returns the written paths in write order.
    pub fn run(&self) -> Result<Vec<PathBuf>, IconError> {
        self.config.validate()?;
        let source = &self.config.source_path;
        let output_dir = &self.config.output_dir;

        // Decode before touching the output directory.
        let masked = masked_source(source, self.config.corner_ratio)?;
        fs::create_dir_all(output_dir).map_err(|e| filesystem_error(output_dir, e))?;

        let mut written = Vec::with_capacity(self.config.png_sizes.len() + 2);
        for &size in &self.config.png_sizes {
            let path = output_dir.join(format!("icon_{size}.png"));
            write_png(&resize_square(&masked, size), &path)?;
            log::info!("Generated transparent: {}", path.display());
            written.push(path);
        }

        let root = output_dir.join(ROOT_PNG_NAME);
        write_png(&masked, &root)?;
        log::info!("Generated transparent: {}", root.display());
        written.push(root);
        drop(masked);

        // The ICO gets its own freshly masked copy of the source.
        let ico_source = masked_source(source, self.config.corner_ratio)?;
        let ico_path = output_dir.join(ICO_NAME);
        write_ico(&ico_source, &self.config.ico_sizes, &ico_path)?;
        log::info!("Generated transparent ICO: {}", ico_path.display());
        written.push(ico_path);

        Ok(written)
    }
}

/// Resamples colour and alpha together. A matching size is copied as-is.
fn resize_square(image: &RgbaImage, size: u32) -> RgbaImage {
    if image.dimensions() == (size, size) {
        image.clone()
    } else {
        imageops::resize(image, size, size, RESAMPLE_FILTER)
    }
}

fn write_png(image: &RgbaImage, path: &Path) -> Result<(), IconError> {
    let file = File::create(path).map_err(|e| filesystem_error(path, e))?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new(&mut writer)
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
        .map_err(|e| encode_error(path, e))?;
    writer.flush().map_err(|e| filesystem_error(path, e))
}

fn write_ico(image: &RgbaImage, sizes: &[u32], path: &Path) -> Result<(), IconError> {
    let mut frames = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let resized = resize_square(image, size);
        let frame = IcoFrame::as_png(resized.as_raw(), size, size, ColorType::Rgba8)
            .map_err(|e| encode_error(path, e))?;
        frames.push(frame);
    }

    let file = File::create(path).map_err(|e| filesystem_error(path, e))?;
    let mut writer = BufWriter::new(file);
    IcoEncoder::new(&mut writer)
        .encode_images(&frames)
        .map_err(|e| encode_error(path, e))?;
    writer.flush().map_err(|e| filesystem_error(path, e))
}

fn filesystem_error(path: &Path, source: std::io::Error) -> IconError {
    IconError::Filesystem {
        path: path.to_path_buf(),
        source,
    }
}

fn encode_error(path: &Path, source: image::ImageError) -> IconError {
    IconError::Encode {
        path: path.to_path_buf(),
        source,
    }
}
