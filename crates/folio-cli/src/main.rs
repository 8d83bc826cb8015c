// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — images in, one PDF out.
//
// Entry point. Initialises logging, loads preferences, acquires the image
// files, and runs the conversion.

mod acquire;
mod config_dir;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use folio_core::error::Result;
use folio_core::{AppConfig, PageSize};
use folio_document::{PageAssembler, PdfReader};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Convert images into a single PDF, one image per page")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (defaults to $XDG_CONFIG_HOME/folio/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert images to a PDF, in the order given
    Convert {
        /// Image files
        files: Vec<PathBuf>,

        /// Page size: a4, a3, letter or legal
        #[arg(short, long)]
        page_size: Option<String>,

        /// Output PDF path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show page count and page sizes of a PDF
    Inspect {
        /// PDF file
        pdf: PathBuf,
    },

    /// Show or change saved preferences
    Config {
        /// New default page size
        #[arg(long)]
        set_page_size: Option<String>,

        /// New default output file name
        #[arg(long)]
        set_output: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config_dir::default_config_path);

    let result = match cli.command {
        Commands::Convert {
            files,
            page_size,
            output,
        } => convert(&config_path, &files, page_size.as_deref(), output),
        Commands::Inspect { pdf } => inspect(&pdf),
        Commands::Config {
            set_page_size,
            set_output,
        } => configure(&config_path, set_page_size.as_deref(), set_output),
    };

    match result {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Folio failed");
            eprintln!("{}", report::error_report(&err));
            ExitCode::FAILURE
        }
    }
}

fn convert(
    config_path: &Path,
    files: &[PathBuf],
    page_size: Option<&str>,
    output: Option<PathBuf>,
) -> Result<String> {
    let config = AppConfig::load_or_default(config_path)?;
    let page_size = match page_size {
        Some(name) => name.parse::<PageSize>()?,
        None => config.default_page_size,
    };
    let output = output.unwrap_or_else(|| PathBuf::from(&config.output_file_name));

    let acquired = acquire::acquire(files)?;
    if acquired.images.is_empty() && !acquired.rejected.is_empty() {
        tracing::warn!("Invalid files: please select only image files");
    }

    let outcome = PageAssembler::new().assemble(&acquired.images, page_size, &report::LogProgress)?;
    std::fs::write(&output, &outcome.document)?;
    tracing::info!(path = %output.display(), bytes = outcome.document.len(), "PDF written");

    Ok(format!(
        "{}\nWrote {} ({} pages, {page_size})",
        report::outcome_summary(&outcome),
        output.display(),
        outcome.page_count()
    ))
}

fn inspect(pdf: &Path) -> Result<String> {
    let reader = PdfReader::open(pdf)?;
    let mut lines = vec![format!("{}: {} pages", pdf.display(), reader.page_count())];
    for (number, (width, height)) in reader.page_sizes_mm().into_iter().enumerate() {
        lines.push(format!("  page {}: {width:.1} x {height:.1} mm", number + 1));
    }
    for image in reader.embedded_images() {
        lines.push(format!(
            "  image: {} x {} px, {}, {} bytes",
            image.width,
            image.height,
            image.filter.as_deref().unwrap_or("unfiltered"),
            image.stream_len
        ));
    }
    Ok(lines.join("\n"))
}

fn configure(
    config_path: &Path,
    set_page_size: Option<&str>,
    set_output: Option<String>,
) -> Result<String> {
    let mut config = AppConfig::load_or_default(config_path)?;
    let changed = set_page_size.is_some() || set_output.is_some();

    if let Some(name) = set_page_size {
        config.default_page_size = name.parse()?;
    }
    if let Some(file_name) = set_output {
        config.output_file_name = file_name;
    }
    if changed {
        config.save(config_path)?;
        tracing::info!(path = %config_path.display(), "Config saved");
    }

    Ok(serde_json::to_string_pretty(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            width,
            height,
            image::Luma([128u8]),
        ));
        img.save_with_format(path, image::ImageFormat::Png).unwrap();
    }

    #[test]
    fn convert_writes_pdf_and_reports_skips() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.jpg");
        let output = dir.path().join("out.pdf");
        write_png(&good, 12, 8);
        std::fs::write(&bad, b"\xFF\xD8\xFF\x00broken").unwrap();

        let message = convert(
            &dir.path().join("config.json"),
            &[good, bad],
            Some("letter"),
            Some(output.clone()),
        )
        .unwrap();

        assert!(message.contains("1 of 2 images converted, skipped: bad.jpg"));
        let reader = PdfReader::open(&output).unwrap();
        assert_eq!(reader.page_count(), 1);
    }

    #[test]
    fn inspect_lists_pages_and_images() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("photo.png");
        let output = dir.path().join("out.pdf");
        write_png(&photo, 40, 30);

        convert(
            &dir.path().join("config.json"),
            &[photo],
            Some("a4"),
            Some(output.clone()),
        )
        .unwrap();

        let listing = inspect(&output).unwrap();
        assert!(listing.contains(": 1 pages"));
        assert!(listing.contains("page 1: 210.0 x 297.0 mm"));
        assert!(listing.contains("image: 40 x 30 px, DCTDecode"));
    }

    #[test]
    fn convert_without_images_is_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"hello").unwrap();

        let err = convert(&dir.path().join("config.json"), &[notes], None, None).unwrap_err();
        assert!(matches!(err, folio_core::FolioError::EmptyBatch));
    }

    #[test]
    fn configure_persists_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        configure(&path, Some("legal"), Some("album.pdf".into())).unwrap();
        let saved = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(saved.default_page_size, PageSize::Legal);
        assert_eq!(saved.output_file_name, "album.pdf");

        assert!(configure(&path, Some("b5"), None).is_err());
    }
}
