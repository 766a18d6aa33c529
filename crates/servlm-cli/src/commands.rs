//! Client subcommands: call a running server on an image file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use servlm_client::{VisionClient, VisionRequest, VisionResponse};
use servlm_core::{CaptionFormat, CaptionOptions, OcrOptions, Task};
use servlm_image::{DecodedImage, draw_boxes, draw_polys};

use crate::TRACING_TARGET_CLIENT;

/// Arguments shared by every client subcommand.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Path to the image file.
    pub image: PathBuf,

    /// Base URL of the servlm server.
    #[arg(long, env = "SERVLM_URL", default_value = "http://127.0.0.1:8000")]
    pub server: String,

    /// Model selector; the server's default model when omitted.
    #[arg(long)]
    pub model: Option<String>,
}

/// Arguments for the caption subcommand.
#[derive(Debug, Args)]
pub struct CaptionArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Caption detail level: short, medium, long, or dense.
    #[arg(long, default_value = "short")]
    pub format: CaptionFormat,

    /// Write a copy of the image annotated with region boxes (dense format).
    #[arg(long)]
    pub draw: Option<PathBuf>,
}

/// Arguments for the ocr subcommand.
#[derive(Debug, Args)]
pub struct OcrArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Return text regions as polygons instead of a plain transcript.
    #[arg(long)]
    pub polys: bool,

    /// Write a copy of the image annotated with region polygons.
    #[arg(long)]
    pub draw: Option<PathBuf>,
}

/// Arguments for the detect subcommand.
#[derive(Debug, Args)]
pub struct DetectArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Detection targets as free text; switches to open-vocabulary mode.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Write a copy of the image annotated with detection boxes.
    #[arg(long)]
    pub draw: Option<PathBuf>,
}

/// Runs the caption subcommand.
pub async fn caption(args: CaptionArgs) -> anyhow::Result<()> {
    let (client, image, decoded) = prepare(&args.common)?;

    let request = base_request(&args.common, &image)
        .with_task(Task::Caption)
        .with_options(CaptionOptions {
            format: args.format,
        });
    let response = client.vision(&request).await?;
    print_response(&response)?;

    if let Some(path) = &args.draw {
        let boxes = response
            .results
            .caption
            .as_ref()
            .and_then(|caption| caption.boxes.as_deref())
            .unwrap_or_default();
        save_annotated(path, draw_boxes(&decoded.image, boxes))?;
    }

    Ok(())
}

/// Runs the ocr subcommand.
pub async fn ocr(args: OcrArgs) -> anyhow::Result<()> {
    let (client, image, decoded) = prepare(&args.common)?;

    let request = base_request(&args.common, &image)
        .with_task(Task::Ocr)
        .with_options(OcrOptions { polys: args.polys });
    let response = client.vision(&request).await?;
    print_response(&response)?;

    if let Some(path) = &args.draw {
        let polys = response
            .results
            .ocr
            .as_ref()
            .and_then(|ocr| ocr.polys.as_deref())
            .unwrap_or_default();
        save_annotated(path, draw_polys(&decoded.image, polys))?;
    }

    Ok(())
}

/// Runs the detect subcommand.
pub async fn detect(args: DetectArgs) -> anyhow::Result<()> {
    let (client, image, decoded) = prepare(&args.common)?;

    let mut request = base_request(&args.common, &image).with_task(Task::Detection);
    if let Some(prompt) = &args.prompt {
        request = request.with_prompt(prompt);
    }
    let response = client.vision(&request).await?;
    print_response(&response)?;

    if let Some(path) = &args.draw {
        let boxes = response
            .results
            .detection
            .as_ref()
            .map(|detection| detection.boxes.as_slice())
            .unwrap_or_default();
        save_annotated(path, draw_boxes(&decoded.image, boxes))?;
    }

    Ok(())
}

/// Builds the client and encodes the image file as a `data:` URL.
fn prepare(common: &CommonArgs) -> anyhow::Result<(VisionClient, String, DecodedImage)> {
    let client = VisionClient::with_defaults(&common.server)
        .with_context(|| format!("failed to create client for {}", common.server))?;

    let bytes = std::fs::read(&common.image)
        .with_context(|| format!("failed to read {}", common.image.display()))?;
    let image = servlm_image::data_url(&bytes)
        .with_context(|| format!("{} is not a supported image", common.image.display()))?;
    let decoded = servlm_image::decode_base64(&image)?;

    tracing::debug!(
        target: TRACING_TARGET_CLIENT,
        file = %common.image.display(),
        width = decoded.width(),
        height = decoded.height(),
        "image loaded"
    );

    Ok((client, image, decoded))
}

fn base_request(common: &CommonArgs, image: &str) -> VisionRequest {
    let mut request = VisionRequest::new(image);
    if let Some(model) = &common.model {
        request = request.with_model(model);
    }
    request
}

fn print_response(response: &VisionResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

fn save_annotated(path: &Path, annotated: servlm_image::DynamicImage) -> anyhow::Result<()> {
    annotated
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}
