//
//  build-center-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output
//!
//! Results go to stdout as indented camelCase JSON so they can be piped
//! back into `update` commands or into other tools. Status messages go to
//! stderr and are colored when the terminal supports it.

use std::io::Write;

use console::style;
use serde::Serialize;

use crate::api::encoding;

pub struct OutputWriter {
    color: bool,
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWriter {
    pub fn new() -> Self {
        Self {
            color: console::colors_enabled_stderr(),
        }
    }

    /// Prints `value` in the wire encoding, private fields removed.
    pub fn write<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        let stdout = std::io::stdout();
        write_encoded(&mut stdout.lock(), value)
    }

    pub fn write_error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    pub fn write_warning(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    pub fn write_success(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("✓").green().bold(), msg);
        } else {
            eprintln!("✓ {}", msg);
        }
    }
}

/// Writes the encoded form of `value` followed by a newline.
pub fn write_encoded<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> anyhow::Result<()> {
    let text = encoding::encode(value)?;
    writeln!(writer, "{}", text)?;
    Ok(())
}
