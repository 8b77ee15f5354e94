//! Terminal output helpers for the CLI.

use hwcheck_core::{CodecKind, HardwareCapabilities};
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Print a heading with colored styling and clear separation
pub fn print_heading(text: &str) {
    let line = "=".repeat(40);
    println!("{}", line.bright_blue());
    println!(" {}", text.bold().bright_white());
    println!("{}", line.bright_blue());
}

/// Print an info line with label and value, with the label colored
pub fn print_info<T: Display>(label: &str, value: T) {
    println!("{}: {}", label.bright_cyan(), value);
}

/// Formats a signature the way the host application logs it.
#[must_use]
pub fn format_signature(signature: u64) -> String {
    format!("{:#018x}", signature)
}

fn mark(present: bool) -> String {
    if present {
        "yes".bright_green().to_string()
    } else {
        "no".bright_red().to_string()
    }
}

/// Print one row per codec with encoder and decoder availability.
pub fn print_capability_table(caps: &HardwareCapabilities) {
    println!("{:<8} {:<8} {:<8}", "Codec".bold(), "Encoder".bold(), "Decoder".bold());
    for codec in CodecKind::ALL {
        println!(
            "{:<8} {:<8} {:<8}",
            codec.name(),
            mark(caps.encoder(codec)),
            mark(caps.decoder(codec))
        );
    }
}
