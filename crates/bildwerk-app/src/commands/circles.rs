// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `bildwerk circles` — batch circle detection over the input directory.

use bildwerk_batch::{CircleBatch, ConsoleReporter};
use bildwerk_core::BildwerkConfig;
use bildwerk_core::error::Result;
use tracing::info;

pub fn run(config: &BildwerkConfig) -> Result<()> {
    let report = CircleBatch::from_config(config).run(&mut ConsoleReporter)?;
    info!(
        discovered = report.discovered,
        written = report.written().len(),
        "Circle detection finished"
    );
    Ok(())
}
