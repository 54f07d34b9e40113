use ndarray::ArrayD;
use ndarray_npy::ReadNpyError;
use serde_pickle::{DeOptions, HashableValue, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::DatasetConfig;
use crate::error::{Error, Result};
use crate::hand::{HandFrame, HandJoint};

// --- パス ---

/// シーケンスの入力ファイル
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetPaths {
    pub calib: PathBuf,
    pub joints: PathBuf,
}

impl DatasetPaths {
    pub fn new(config: &DatasetConfig) -> Self {
        let root = Path::new(&config.root);
        Self {
            calib: root.join(format!("{}{}", config.sequence, config.calib_suffix)),
            joints: root.join(format!("{}{}", config.sequence, config.joints_suffix)),
        }
    }
}

// --- 関節データ ---

/// 全フレームの手の関節（ワールド座標）
#[derive(Debug, Clone)]
pub struct JointSequence {
    pub frames: Vec<HandFrame>,
    /// 読み込んだ配列の形状 (e.g. [N, 21, 4, 1])
    pub source_shape: Vec<usize>,
}

impl JointSequence {
    pub fn new(frames: Vec<HandFrame>) -> Self {
        let source_shape = vec![frames.len(), HandJoint::COUNT, 4];
        Self { frames, source_shape }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Result<&HandFrame> {
        self.frames.get(index).ok_or(Error::FrameOutOfRange {
            index,
            count: self.frames.len(),
        })
    }

    /// 配列から変換
    ///
    /// 対応形状: (N, 21, 4, 1) / (N, 21, 4) / (N, 21, 3)。3成分なら w=1 を補う。
    pub fn from_array(array: &ArrayD<f64>) -> Result<Self> {
        let shape = array.shape();
        let components = match shape {
            [_, j, 4, 1] if *j == HandJoint::COUNT => 4,
            [_, j, c] if *j == HandJoint::COUNT && (*c == 4 || *c == 3) => *c,
            _ => return Err(Error::JointShape(shape.to_vec())),
        };
        let trailing_one = shape.len() == 4;

        let at = |n: usize, j: usize, c: usize| -> f64 {
            if trailing_one {
                array[[n, j, c, 0].as_slice()]
            } else {
                array[[n, j, c].as_slice()]
            }
        };

        let frames = (0..shape[0])
            .map(|n| {
                let mut frame = HandFrame::default();
                for (j, joint) in frame.joints.iter_mut().enumerate() {
                    for c in 0..components {
                        joint[c] = at(n, j, c);
                    }
                }
                frame
            })
            .collect();

        Ok(Self { frames, source_shape: shape.to_vec() })
    }
}

impl Default for JointSequence {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// .npy から関節を読み込む（f64 / f32）
pub fn load_joints<P: AsRef<Path>>(path: P) -> Result<JointSequence> {
    let path = path.as_ref();
    let npy_err = |source: ReadNpyError| Error::Npy { path: path.to_path_buf(), source };

    let array: ArrayD<f64> = match ndarray_npy::read_npy(path) {
        Ok(a) => a,
        Err(ReadNpyError::WrongDescriptor(descr)) => {
            log::debug!("{} is not f64 ({:?}), retrying as f32", path.display(), descr);
            let a: ArrayD<f32> = ndarray_npy::read_npy(path).map_err(npy_err)?;
            a.mapv(f64::from)
        }
        Err(e) => return Err(npy_err(e)),
    };

    log::info!("Loaded joints {} shape {:?}", path.display(), array.shape());
    JointSequence::from_array(&array)
}

// --- キャリブレーション ---

/// pickle のキャリブレーションデータ（確認用）
#[derive(Debug, Clone)]
pub struct CalibrationDump {
    pub path: PathBuf,
    pub value: Value,
}

impl CalibrationDump {
    /// トップレベルの型とキー
    pub fn summary(&self) -> String {
        match &self.value {
            Value::Dict(map) => {
                let keys: Vec<String> = map.keys().map(describe_key).collect();
                format!("dict with {} keys: [{}]", map.len(), keys.join(", "))
            }
            Value::List(items) | Value::Tuple(items) => {
                format!("{} with {} items", type_name(&self.value), items.len())
            }
            other => type_name(other).to_string(),
        }
    }
}

fn describe_key(key: &HashableValue) -> String {
    match key {
        HashableValue::String(s) => s.clone(),
        HashableValue::I64(i) => i.to_string(),
        HashableValue::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        other => format!("{:?}", other),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::None => "None",
        Value::Bool(_) => "bool",
        Value::I64(_) | Value::Int(_) => "int",
        Value::F64(_) => "float",
        Value::Bytes(_) => "bytes",
        Value::String(_) => "str",
        Value::List(_) => "list",
        Value::Tuple(_) => "tuple",
        Value::Set(_) => "set",
        Value::FrozenSet(_) => "frozenset",
        Value::Dict(_) => "dict",
    }
}

/// pickle を読み込む
///
/// numpy 配列などの未解決グローバルは None に置き換える。
/// 複数の配列が memo 上の `_reconstruct` / dtype を共有すると serde-pickle は
/// 再帰構造とみなすので、その参照も None に置き換える。
pub fn load_calibration<P: AsRef<Path>>(path: P) -> Result<CalibrationDump> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    let options = DeOptions::new()
        .replace_unresolved_globals()
        .replace_recursive_structures();
    let value = serde_pickle::value_from_reader(BufReader::new(file), options)
        .map_err(|source| Error::Pickle { path: path.to_path_buf(), source })?;
    log::info!("Loaded calibration {}", path.display());
    Ok(CalibrationDump { path: path.to_path_buf(), value })
}
