// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `bildwerk augment` — augmentation contact sheets for the input directory.

use bildwerk_batch::{AugmentBatch, ConsoleReporter};
use bildwerk_core::BildwerkConfig;
use bildwerk_core::error::Result;

pub fn run(config: &BildwerkConfig) -> Result<()> {
    AugmentBatch::from_config(config).run(&mut ConsoleReporter)?;
    Ok(())
}
