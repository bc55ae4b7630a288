use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use camscout_common::config::{Config, Credentials};
use camscout_common::device::DiscoveredDevice;
use camscout_common::success;
use camscout_core::InventoryService;
use colored::*;

use crate::commands::OutputFormat;
use crate::cprint;
use crate::terminal::{colors, format, print, spinner};

pub async fn inventory(
    target: Option<&str>,
    output: OutputFormat,
    cfg: &Config,
    credentials: &Credentials,
) -> anyhow::Result<()> {
    let service = InventoryService::from_config(cfg)?;

    match output {
        OutputFormat::Json => {
            let devices = service.run(target, credentials, cfg.discovery_timeout).await?;
            write_json(&mut io::stdout().lock(), &devices)
        }
        OutputFormat::Text => {
            print::banner(cfg.no_banner, cfg.quiet);
            print::header("getting ready for discovery", cfg.quiet);

            spinner::start();
            let service = service.with_progress(spinner::report_progress);

            let start_time: Instant = Instant::now();
            let result = service.run(target, credentials, cfg.discovery_timeout).await;
            spinner::finish();

            inventory_ends(&result?, start_time.elapsed(), cfg);
            Ok(())
        }
    }
}

fn write_json<W: Write>(out: &mut W, devices: &[DiscoveredDevice]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, devices).context("failed to encode devices as JSON")?;
    writeln!(out)?;
    Ok(())
}

fn inventory_ends(devices: &[DiscoveredDevice], total_time: Duration, cfg: &Config) {
    if devices.is_empty() {
        no_devices_found(cfg);
        return;
    }

    if cfg.quiet > 0 {
        cprint!();
    }

    print::header("ONVIF Inventory", cfg.quiet);
    print_devices(devices, cfg);
    print_summary(devices, total_time, cfg);
}

fn no_devices_found(cfg: &Config) {
    print::header("ZERO CAMERAS DETECTED", cfg.quiet);
    print::no_results();
}

fn print_devices(devices: &[DiscoveredDevice], cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }

    for (idx, device) in devices.iter().enumerate() {
        print::tree_head(idx, &format::device_title(device));
        print::as_tree_one_level(format::device_to_details(device));
        if idx + 1 != devices.len() {
            cprint!();
        }
    }
}

fn print_summary(devices: &[DiscoveredDevice], total_time: Duration, cfg: &Config) {
    let streams: usize = devices.iter().map(DiscoveredDevice::streamable_profiles).sum();
    let cameras: ColoredString = format!("{} cameras", devices.len()).bold().green();
    let streams: ColoredString = format!("{streams} streams").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString = &format!("Inventory Complete: {cameras} with {streams} in {total_time}")
        .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(output);
        }
        _ => {
            cprint!();
            success!("{}", output)
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
