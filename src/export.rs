//! # Save/export utilities for the current artifact.
//!
//! Companion helpers for the "keep this one" and "export a raster" gestures
//! of an outer application. They operate on an artifact path obtained via
//! [`ControllerHandle::artifact_path`](crate::ControllerHandle::artifact_path)
//! and never touch controller state.
//!
//! - [`save_liked`] copies the artifact into `liked/` under the working
//!   directory, then runs a best-effort `vpype` optimization pass over the
//!   copy (`linesimplify`, `linemerge`, `linesort`). A missing or failing
//!   `vpype` is logged and swallowed; the unoptimized copy survives.
//! - [`export_png`] rasterizes the artifact into `png/` with `inkscape`.
//!
//! Both shell-outs inherit the parent environment and block only their own
//! task. The `*_in` variants take an explicit root directory instead of the
//! working directory.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::process::Command;

/// Destination inside `root` for a liked copy of `artifact`.
///
/// `None` when the artifact path has no file name component.
pub fn liked_path(root: &Path, artifact: &Path) -> Option<PathBuf> {
    artifact
        .file_name()
        .map(|name| root.join("liked").join(name))
}

/// Destination inside `root` for a PNG export of `artifact`.
///
/// The file stem is kept and the extension replaced. `None` when the artifact
/// path has no file stem.
pub fn png_path(root: &Path, artifact: &Path) -> Option<PathBuf> {
    artifact.file_stem().map(|stem| {
        let mut name = stem.to_os_string();
        name.push(".png");
        root.join("png").join(name)
    })
}

/// Copies `artifact` into `liked/` under the current directory and optimizes
/// the copy in place. Returns the path of the copy.
pub async fn save_liked(artifact: &Path) -> io::Result<PathBuf> {
    save_liked_in(&std::env::current_dir()?, artifact).await
}

/// Like [`save_liked`] with an explicit root directory.
pub async fn save_liked_in(root: &Path, artifact: &Path) -> io::Result<PathBuf> {
    let dest = liked_path(root, artifact).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "artifact path has no file name")
    })?;

    if let Some(dir) = dest.parent() {
        fs::create_dir_all(dir).await?;
    }
    fs::copy(artifact, &dest).await?;

    // Optimization is opportunistic; the plain copy is already saved.
    if let Err(err) = optimize_svg(&dest).await {
        log::warn!("vpype optimization skipped for {}: {err}", dest.display());
    }

    Ok(dest)
}

/// Rasterizes `artifact` into `png/` under the current directory with
/// `inkscape`. Returns the path of the PNG.
pub async fn export_png(artifact: &Path) -> io::Result<PathBuf> {
    export_png_in(&std::env::current_dir()?, artifact).await
}

/// Like [`export_png`] with an explicit root directory.
pub async fn export_png_in(root: &Path, artifact: &Path) -> io::Result<PathBuf> {
    let dest = png_path(root, artifact).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "artifact path has no file stem")
    })?;

    if let Some(dir) = dest.parent() {
        fs::create_dir_all(dir).await?;
    }

    let status = Command::new("inkscape")
        .arg("-o")
        .arg(&dest)
        .arg(artifact)
        .status()
        .await?;

    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("inkscape exited with status {}", status.code().unwrap_or(-1)),
        ));
    }

    Ok(dest)
}

/// Rewrites the SVG in place through vpype's simplify/merge/sort pipeline.
async fn optimize_svg(svg: &Path) -> io::Result<()> {
    let status = Command::new("vpype")
        .arg("read")
        .arg(svg)
        .args(["linesimplify", "linemerge", "linesort", "write"])
        .arg(svg)
        .status()
        .await?;

    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("vpype exited with status {}", status.code().unwrap_or(-1)),
        ));
    }

    Ok(())
}
