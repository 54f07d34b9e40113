use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use hand_views::config::Config;
use hand_views::dataset::{load_calibration, load_joints, DatasetPaths};
use hand_views::export::{write_scene, SceneExport};
use hand_views::projection::project_views;
use hand_views::report::{
    format_bone_line, format_camera_line, format_pixel_line, format_shape_header,
    format_view_line, format_view_line_precise,
};
use hand_views::rig::Rig;

const CONFIG_PATH: &str = "config.toml";

/// 収録済みの手の関節を各カメラ座標系へ変換して表示する
#[derive(Debug, Parser)]
#[command(version = env!("GIT_VERSION"), about)]
struct Args {
    /// 設定ファイル
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// データセットのルート（設定より優先）
    #[arg(long)]
    root: Option<String>,

    /// シーケンス名（設定より優先）
    #[arg(long)]
    sequence: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 関節を全カメラへ変換し、1フレーム分を表示
    Project {
        #[arg(long)]
        frame: Option<usize>,
        /// 整数に切り捨てず小数で表示
        #[arg(long)]
        precise: bool,
        /// ピクセル座標も表示
        #[arg(long)]
        pixels: bool,
    },
    /// キャリブレーション pickle の概要を表示
    Calib,
    /// 3Dビューア用の data.json を書き出す
    Export {
        #[arg(long, default_value = "data.json")]
        out: PathBuf,
        #[arg(long)]
        frame: Option<usize>,
    },
    /// カメラ中心と姿勢を表示
    Rig,
}

impl Args {
    fn load_config(&self) -> Config {
        let mut config = Config::load_or_default(&self.config);
        if let Some(root) = &self.root {
            config.dataset.root = root.clone();
        }
        if let Some(sequence) = &self.sequence {
            config.dataset.sequence = sequence.clone();
        }
        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let config = args.load_config();
    log::debug!("hand-views {}", env!("GIT_VERSION"));

    match args.command.unwrap_or(Command::Project { frame: None, precise: false, pixels: false }) {
        Command::Project { frame, precise, pixels } => {
            let frame = frame.unwrap_or(config.output.frame);
            run_project(&config, frame, precise || config.output.precise, pixels)
        }
        Command::Calib => run_calib(&config),
        Command::Export { out, frame } => {
            run_export(&config, &out, frame.unwrap_or(config.output.frame))
        }
        Command::Rig => {
            run_rig(&config);
            Ok(())
        }
    }
}

fn run_project(config: &Config, frame: usize, precise: bool, pixels: bool) -> Result<()> {
    let paths = DatasetPaths::new(&config.dataset);

    // キャリブレーションは確認のみ（変換はリグ設定を使う）
    match load_calibration(&paths.calib) {
        Ok(dump) => log::debug!("Calibration: {}", dump.summary()),
        Err(e) => log::warn!("{}", e),
    }

    let joints = load_joints(&paths.joints).context("Failed to load joints")?;
    let rig = Rig::from_config(&config.rig);
    let views = project_views(&rig, &joints)?;

    println!("Joints data:");
    println!("{}", format_shape_header(&joints.source_shape, &views.array_shape()));

    for (i, serial) in views.serials.iter().enumerate() {
        let line = if precise {
            format_view_line_precise(serial, &views.xyz(i, frame)?)
        } else {
            format_view_line(serial, &views.xyz_truncated(i, frame)?)
        };
        println!("{}", line);

        if pixels {
            let px = views.pixels(&rig, i, frame)?;
            println!("{}", format_pixel_line(serial, &px, |u, v| rig.contains_pixel(u, v)));
        }
    }

    if precise {
        // 骨の長さは剛体変換で変わらないのでワールド座標で1回だけ
        println!("{}", format_bone_line(&joints.frame(frame)?.bone_lengths()));
    }
    Ok(())
}

fn run_calib(config: &Config) -> Result<()> {
    let paths = DatasetPaths::new(&config.dataset);
    let dump = load_calibration(&paths.calib)?;
    println!("Calibration data:");
    println!("{}", dump.summary());
    Ok(())
}

fn run_export(config: &Config, out: &Path, frame: usize) -> Result<()> {
    let paths = DatasetPaths::new(&config.dataset);
    let joints = load_joints(&paths.joints).context("Failed to load joints")?;
    let rig = Rig::from_config(&config.rig);
    let views = project_views(&rig, &joints)?;
    let scene = SceneExport::build(&rig, &views, frame)?;
    write_scene(out, &scene)?;
    println!("{} ({} cameras, frame {})", out.display(), scene.cameras.len(), frame);
    Ok(())
}

fn run_rig(config: &Config) {
    let rig = Rig::from_config(&config.rig);
    println!("Rig: {} cameras, {}x{}", rig.len(), rig.width, rig.height);
    for cam in &rig.views {
        println!("{}", format_camera_line(cam));
    }
}
