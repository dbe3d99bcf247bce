//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::error::StegoError;
use crate::image_io;
use crate::steganography::{capacity_bytes, extract, hide_file, payload_capacity};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 目标文件已存在且未指定 `--force` 时拒绝写入。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}\nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 取路径的最后一个组成部分作为嵌入的文件名。
fn embedded_name(data: &Path) -> Result<String> {
    let name = data.file_name().with_context(|| {
        format!(
            "Data path has no file name: {}",
            data.to_string_lossy().red().bold()
        )
    })?;

    name.to_str().map(str::to_owned).with_context(|| {
        format!(
            "Data file name is not valid UTF-8: {}",
            data.to_string_lossy().red().bold()
        )
    })
}

/// 把解码出的文件名收敛为图像所在目录下的单个文件，
/// 丢弃其中的目录部分，防止写到图像目录之外。
fn recovered_path(image: &Path, decoded_name: &str) -> Result<PathBuf> {
    let name = Path::new(decoded_name)
        .file_name()
        .with_context(|| {
            format!(
                "Embedded file name {} cannot be used as an output file name.\nPass --output to choose one.",
                decoded_name.red().bold()
            )
        })?;

    let dir = image.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(name))
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和数据文件、检查隐写空间是否足够、嵌入签名与数据，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或数据文件，或图像不是 8 位 RGB/RGBA。
/// * 图像没有足够的空间来隐藏数据 (此时不会写出任何文件)。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    ensure_writable(&args.dest, args.force)?;

    let mut picture = image_io::load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let data = fs::read(&args.data).with_context(|| {
        format!(
            "Unable to read data file: {}",
            args.data.to_string_lossy().red().bold()
        )
    })?;

    let filename = embedded_name(&args.data)?;
    debug!(filename = %filename, bytes = data.len(), "hiding data file");

    let signature = hide_file(&mut picture, &filename, &data).map_err(|err| match err {
        StegoError::Capacity {
            required,
            available,
        } => anyhow::anyhow!(
            "Not enough space in the image to hide the file. \nRequired: {} bytes, Available: {} bytes",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        ),
        other => anyhow::Error::new(other).context(format!(
            "Failed to hide {} in {}",
            filename.red().bold(),
            args.image.to_string_lossy().red().bold()
        )),
    })?;

    image_io::save(&picture, &args.dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            args.dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} ({} bytes) has been successfully hidden and saved: {}",
        signature.filename().cyan(),
        signature.payload_size().to_string().cyan(),
        args.dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、解码签名与数据，
/// 最后将恢复的数据写入 `--output` 或嵌入的文件名。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有可信的隐藏数据。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let picture = image_io::load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let (filename, data) = extract(&picture).with_context(|| {
        format!(
            "Failed to recover hidden data from '{}'. \nThe image may not contain a hidden file or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let dest = match args.output {
        Some(path) => path,
        None => recovered_path(&args.image, &filename)?,
    };
    ensure_writable(&dest, args.force)?;

    fs::write(&dest, &data).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} ({} bytes) has been successfully recovered and saved: {}",
        filename.cyan(),
        data.len().to_string().cyan(),
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 打印图像的总容量以及扣除签名后可隐藏的最大数据字节数。
///
/// # Errors
///
/// 无法读取输入的图像文件，或图像不是 8 位 RGB/RGBA。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = image_io::load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let total = capacity_bytes(picture.width(), picture.height());
    let payload = payload_capacity(picture.width(), picture.height(), args.filename_len);

    println!(
        "{}x{} {} image: {} bytes total, up to {} bytes of data with a {}-byte file name",
        picture.width(),
        picture.height(),
        picture.layout(),
        total.to_string().green().bold(),
        payload.to_string().green().bold(),
        args.filename_len.max(1)
    );
    Ok(())
}
