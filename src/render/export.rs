use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PlotError, PlotResult};
use crate::render::{RenderFrame, Renderer, SvgRenderer};

/// Output encodings selected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    /// Files without an extension are written as SVG.
    pub fn from_path(path: &Path) -> PlotResult<Self> {
        let Some(extension) = path.extension() else {
            return Ok(Self::Svg);
        };
        let extension = extension.to_string_lossy().to_ascii_lowercase();
        match extension.as_str() {
            "svg" => Ok(Self::Svg),
            "png" if cfg!(feature = "cairo-backend") => Ok(Self::Png),
            "pdf" if cfg!(feature = "cairo-backend") => Ok(Self::Pdf),
            _ => Err(PlotError::UnsupportedFormat { extension }),
        }
    }
}

fn ensure_parent_dir(path: &Path) -> PlotResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|err| PlotError::io(parent, err))
        }
        _ => Ok(()),
    }
}

/// Encodes `frame` into `path`. Nothing is written unless the format is
/// supported and rendering succeeds.
pub fn export_frame(frame: &RenderFrame, path: &Path, font_family: &str) -> PlotResult<()> {
    if path.as_os_str().is_empty() {
        return Err(PlotError::MissingOutputPath);
    }
    let format = OutputFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, "exporting figure");

    match format {
        OutputFormat::Svg => {
            let mut renderer = SvgRenderer::new(font_family);
            renderer.render(frame)?;
            ensure_parent_dir(path)?;
            fs::write(path, renderer.document()).map_err(|err| PlotError::io(path, err))
        }
        #[cfg(feature = "cairo-backend")]
        OutputFormat::Png => {
            let mut renderer = crate::render::CairoRenderer::for_frame(frame, font_family)?;
            renderer.render(frame)?;
            ensure_parent_dir(path)?;
            renderer.write_png(path)
        }
        #[cfg(feature = "cairo-backend")]
        OutputFormat::Pdf => {
            frame.validate()?;
            ensure_parent_dir(path)?;
            crate::render::render_pdf(frame, font_family, path).map(|_| ())
        }
        #[cfg(not(feature = "cairo-backend"))]
        OutputFormat::Png | OutputFormat::Pdf => Err(PlotError::UnsupportedFormat {
            extension: format!("{format:?}").to_ascii_lowercase(),
        }),
    }
}
