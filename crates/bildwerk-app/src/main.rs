// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — batch circle detection, pencil sketch, augmentation and feature
// matching for still images.
//
// Entry point. Initialises logging, loads the optional config file and
// dispatches to a subcommand.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use bildwerk_core::BildwerkConfig;
use bildwerk_core::config::CONFIG_FILE;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bildwerk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file with directory and detector overrides
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect circles in every image of the input directory and write
    /// annotated copies
    Circles,

    /// Turn one image into a pencil sketch
    Sketch {
        /// Image to sketch; relative paths also resolve against the last used directory
        image: PathBuf,

        /// Produce a grayscale sketch instead of a colour one
        #[arg(long, conflicts_with = "color")]
        gray: bool,

        /// Produce a colour sketch even if the config file says otherwise
        #[arg(long)]
        color: bool,

        /// Gaussian blur kernel size (odd)
        #[arg(long)]
        blur_kernel: Option<u32>,

        /// Do not write the sketch to disk
        #[arg(long, conflicts_with = "save")]
        no_save: bool,

        /// Write the sketch even if the config file says otherwise
        #[arg(long)]
        save: bool,
    },

    /// Write a contact sheet of augmentations for every image of the input directory
    Augment,

    /// Match keypoints between two images and draw the best matches
    Match {
        #[arg(default_value = "test_images/image1.jpg")]
        first: PathBuf,

        #[arg(default_value = "test_images/image2.jpg")]
        second: PathBuf,
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
    let config = BildwerkConfig::load_or_default(&cli.config);
    tracing::debug!(command = ?cli.command, "Bildwerk starting");

    let result = match cli.command {
        Command::Circles => commands::circles::run(&config),
        Command::Sketch {
            image,
            gray,
            color,
            blur_kernel,
            no_save,
            save,
        } => {
            let options = commands::sketch::options_from_flags(
                config.sketch,
                commands::sketch::switch(color, gray),
                blur_kernel,
                commands::sketch::switch(save, no_save),
            );
            commands::sketch::run(&config, &image, &options)
        }
        Command::Augment => commands::augment::run(&config),
        Command::Match { first, second } => commands::matching::run(&config, &first, &second),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
