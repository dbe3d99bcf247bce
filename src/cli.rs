//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// 一款把任意文件隐藏在无损图像 (如 PNG, BMP) RGB 通道最低 2 位中的命令行工具。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款把任意文件隐藏在无损图像 (如 PNG, BMP) RGB 通道最低 2 位中的命令行工具。\n文件名与文件长度随数据一同嵌入，恢复时无需额外信息。"
)]
pub struct Cli {
    /// 输出更多日志 (-v 为 info，-vv 为 debug)。RUST_LOG 优先。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量查询)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像中隐藏一个数据文件。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文件。
    Recover(RecoverArgs),

    /// 查询图像最多能隐藏多少字节。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (8 位 RGB 或 RGBA)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的数据文件路径，其文件名也会被嵌入。
    #[arg(short, long)]
    pub data: PathBuf,

    /// 隐写完成后保存结果图像的路径，扩展名必须对应无损格式。
    #[arg(short = 'o', long)]
    pub dest: PathBuf,

    /// 目标文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文件的保存路径。省略时使用嵌入的文件名，保存在图像所在目录。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 目标文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要查询的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 计划嵌入的文件名长度 (字节)，会从可用空间中扣除。
    #[arg(short = 'n', long, default_value_t = 0)]
    pub filename_len: usize,
}
