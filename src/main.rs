// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! PANFRAME - keyframed pan/zoom presentations over a single image
//!
//! A cross-platform desktop application for framing regions of an image
//! as keyframes and presenting them with animated camera moves.

mod app;
mod ui;

use anyhow::Result;
use app::{PanframeApp, Startup};
use clap::Parser;
use panframe::models::keyframe::KeyframeId;
use std::path::PathBuf;

/// Keyframed pan/zoom presentations over a single image.
#[derive(Parser, Debug)]
#[command(name = "panframe", version, about)]
struct Cli {
    /// Project file to open (.yaml, .yml or .json)
    project: Option<PathBuf>,

    /// Start a new project from this image
    #[arg(short, long, conflicts_with = "project")]
    image: Option<PathBuf>,

    /// Open straight into presentation mode
    #[arg(long)]
    present: bool,

    /// Keyframe id to start presenting from
    #[arg(long, requires = "present")]
    keyframe: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    let startup = Startup {
        project: cli.project,
        image: cli.image,
        present: cli.present,
        keyframe: cli.keyframe.map(KeyframeId),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("PANFRAME"),
        ..Default::default()
    };

    eframe::run_native(
        "PANFRAME",
        options,
        Box::new(move |_cc| Ok(Box::new(PanframeApp::new(startup)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
