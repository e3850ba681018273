use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use ecsfs::ecs::*;
use ecsio::prelude::StdBlockIO;
use log::{info, warn};

use crate::utils::{LogLevel, log_level};

type DiskVolume = Volume<StdBlockIO<File>>;

/// Mounts `disk`, runs `f`, then unmounts even if `f` failed.
fn with_volume<T>(disk: &Path, f: impl FnOnce(&mut DiskVolume) -> Result<T>) -> Result<T> {
    let io = StdBlockIO::open(disk)
        .with_context(|| format!("Failed to open disk image {}", disk.display()))?;
    let mut vol =
        Volume::mount(io).with_context(|| format!("Failed to mount {}", disk.display()))?;
    let out = f(&mut vol);
    vol.unmount().context("Failed to unmount volume")?;
    out
}

pub fn make(
    disk: &Path,
    data_blocks: Option<u16>,
    total_blocks: Option<usize>,
    full: bool,
) -> Result<()> {
    let meta = match (data_blocks, total_blocks) {
        (_, Some(total)) => EcsMeta::for_total_blocks(total)?,
        (Some(data), None) => EcsMeta::new(data)?,
        (None, None) => EcsMeta::new(crate::DEFAULT_DATA_BLOCKS)?,
    };

    let mut io = StdBlockIO::create(disk, meta.total_blocks as usize)
        .with_context(|| format!("Failed to create disk image {}", disk.display()))?;
    EcsFormatter::new(&mut io, &meta)
        .format(full)
        .context("Failed to format volume")?;
    io.close()?;

    info!(
        "Created {} ({} blocks, {} data blocks)",
        disk.display(),
        meta.total_blocks,
        meta.data_blocks
    );
    Ok(())
}

pub fn info(disk: &Path) -> Result<()> {
    with_volume(disk, |vol| {
        println!("{}", vol.info());
        Ok(())
    })
}

pub fn ls(disk: &Path) -> Result<()> {
    with_volume(disk, |vol| {
        println!("FS Ls:");
        for file in vol.list() {
            println!("{file}");
        }
        Ok(())
    })
}

pub fn add(disk: &Path, host_file: &Path, name: Option<&str>) -> Result<()> {
    let data = std::fs::read(host_file)
        .with_context(|| format!("Failed to read {}", host_file.display()))?;
    let name = match name {
        Some(name) => name.to_owned(),
        None => host_file
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .context("Host file has no usable file name")?,
    };

    with_volume(disk, |vol| {
        vol.create(&name)
            .with_context(|| format!("Cannot create '{name}'"))?;
        let fd = vol.open(&name)?;
        let written = match vol.write(fd, &data) {
            Ok(n) => n,
            Err(FsError::DiskFull) => 0,
            Err(e) => return Err(e.into()),
        };
        vol.close(fd)?;

        if written < data.len() {
            warn!(
                "Disk full: wrote {written} of {} bytes to '{name}'",
                data.len()
            );
        } else {
            info!("Added '{name}' ({written} bytes)");
        }
        Ok(())
    })
}

pub fn cat(disk: &Path, name: &str) -> Result<()> {
    let data = with_volume(disk, |vol| {
        let fd = vol
            .open(name)
            .with_context(|| format!("Cannot open '{name}'"))?;
        let mut data = vec![0u8; vol.stat(fd)?];
        let read = vol.read(fd, &mut data)?;
        data.truncate(read);
        vol.close(fd)?;
        Ok(data)
    })?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&data)?;
    stdout.flush()?;
    Ok(())
}

pub fn rm(disk: &Path, name: &str) -> Result<()> {
    with_volume(disk, |vol| {
        vol.delete(name)
            .with_context(|| format!("Cannot delete '{name}'"))?;
        info!("Removed '{name}'");
        Ok(())
    })
}

pub fn stat(disk: &Path, name: &str) -> Result<()> {
    with_volume(disk, |vol| {
        let fd = vol
            .open(name)
            .with_context(|| format!("Cannot open '{name}'"))?;
        let size = vol.stat(fd)?;
        vol.close(fd)?;
        println!("Size of file '{name}' is {size} bytes");
        Ok(())
    })
}

pub fn check(disk: &Path) -> Result<()> {
    let report = with_volume(disk, |vol| Ok(vol.check()?))?;

    let min_level = if log_level() == LogLevel::Verbose {
        Severity::Info
    } else {
        Severity::Warn
    };
    for finding in report.findings.iter().filter(|f| f.sev >= min_level) {
        let tag = match finding.sev {
            Severity::Info => "INFO".green(),
            Severity::Warn => "WARN".yellow(),
            Severity::Error => "ERR ".red().bold(),
        };
        println!("{tag} {:<12} {}", finding.code, finding.msg);
    }

    let errors = report.count(Severity::Error);
    let warns = report.count(Severity::Warn);
    if errors > 0 {
        bail!("{errors} error(s), {warns} warning(s) in {}", disk.display());
    }
    println!(
        "{} {} ({warns} warning(s))",
        "clean:".green().bold(),
        disk.display()
    );
    Ok(())
}
