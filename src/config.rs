use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub rig: RigConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// データセットのルートディレクトリ
    #[serde(default = "default_root")]
    pub root: String,
    /// 収録シーケンス名 (e.g. "7-14-1-2")
    #[serde(default = "default_sequence")]
    pub sequence: String,
    /// キャリブレーションファイルの接尾辞
    #[serde(default = "default_calib_suffix")]
    pub calib_suffix: String,
    /// 関節ファイルの接尾辞
    #[serde(default = "default_joints_suffix")]
    pub joints_suffix: String,
}

fn default_root() -> String { "/mnt/d/hand_data".to_string() }
fn default_sequence() -> String { "7-14-1-2".to_string() }
fn default_calib_suffix() -> String { "_calib.pkl".to_string() }
fn default_joints_suffix() -> String { "_joints.npy".to_string() }

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            sequence: default_sequence(),
            calib_suffix: default_calib_suffix(),
            joints_suffix: default_joints_suffix(),
        }
    }
}

/// 単一カメラの設定
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CameraConfig {
    /// RealSense シリアル番号
    pub serial: String,
    /// カメラ→ワールド変換 (row-major 4x4)
    pub extrinsics: [[f64; 4]; 4],
    /// [fx, fy, cx, cy]
    pub intrinsics: [f64; 4],
    /// ビューア表示色
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String { "rgb(255, 0, 0)".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct RigConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// 処理順のカメラ一覧
    #[serde(default = "default_cameras")]
    pub cameras: Vec<CameraConfig>,
}

fn default_width() -> u32 { 640 }
fn default_height() -> u32 { 480 }

/// 収録時の4台構成（840412062076 が原点）
fn default_cameras() -> Vec<CameraConfig> {
    vec![
        CameraConfig {
            serial: "840412062035".to_string(),
            extrinsics: [
                [0.5500, 0.5663, -0.6138, 175.2400],
                [0.3317, 0.5263, 0.7829, -535.2004],
                [0.7664, -0.6342, 0.1016, 573.3568],
                [0.0, 0.0, 0.0, 1.0],
            ],
            intrinsics: [619.598, 619.116, 325.345, 245.441],
            color: "rgb(255, 0, 0)".to_string(),
        },
        CameraConfig {
            serial: "840412062037".to_string(),
            extrinsics: [
                [-0.9723, 0.2301, -0.0401, -101.9152],
                [0.1365, 0.4205, -0.8970, 571.4364],
                [-0.1895, -0.8776, -0.4403, 826.8667],
                [0.0, 0.0, 0.0, 1.0],
            ],
            intrinsics: [615.85, 615.477, 316.062, 247.156],
            color: "rgb(0, 160, 0)".to_string(),
        },
        CameraConfig {
            serial: "840412062038".to_string(),
            extrinsics: [
                [0.1988, -0.3278, 0.9236, -655.83842],
                [-0.5362, 0.7524, 0.3825, -250.0468],
                [-0.8203, -0.5712, -0.02620, 719.1969],
                [0.0, 0.0, 0.0, 1.0],
            ],
            intrinsics: [619.475, 619.189, 313.715, 223.921],
            color: "rgb(0, 0, 255)".to_string(),
        },
        CameraConfig {
            serial: "840412062076".to_string(),
            extrinsics: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            intrinsics: [615.665, 615.09, 306.514, 240.344],
            color: "rgb(255, 140, 0)".to_string(),
        },
    ]
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            cameras: default_cameras(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// 表示するフレーム番号
    #[serde(default = "default_frame")]
    pub frame: usize,
    /// false なら整数に切り捨てて表示
    #[serde(default)]
    pub precise: bool,
}

fn default_frame() -> usize { 1 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            frame: default_frame(),
            precise: false,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// 読み込みに失敗したらデフォルト値を使う
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("{} not found, using built-in rig", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{:#}; falling back to defaults", e);
                Self::default()
            }
        }
    }
}
