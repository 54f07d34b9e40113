use std::fmt::Display;

use crate::hand::{HandJoint, HAND_EDGES};
use crate::rig::CameraView;

fn format_points<T: Display>(points: &[[T; 3]], fmt: impl Fn(&T) -> String) -> String {
    let items: Vec<String> = points
        .iter()
        .map(|[x, y, z]| format!("[{}, {}, {}]", fmt(x), fmt(y), fmt(z)))
        .collect();
    format!("[{}]", items.join(", "))
}

/// `<serial> [[x, y, z], ...]`
pub fn format_view_line(serial: &str, points: &[[i64; 3]]) -> String {
    format!("{} {}", serial, format_points(points, |v| v.to_string()))
}

/// 小数4桁で表示
pub fn format_view_line_precise(serial: &str, points: &[[f64; 3]]) -> String {
    format!("{} {}", serial, format_points(points, |v| format!("{:.4}", v)))
}

/// ピクセル座標の1行表示。画像外は `*`、カメラの後ろは `-`
pub fn format_pixel_line(
    serial: &str,
    pixels: &[Option<(f64, f64)>],
    inside: impl Fn(f64, f64) -> bool,
) -> String {
    let items: Vec<String> = pixels
        .iter()
        .map(|p| match p {
            Some((u, v)) if inside(*u, *v) => format!("({:.1}, {:.1})", u, v),
            Some((u, v)) => format!("({:.1}, {:.1})*", u, v),
            None => "-".to_string(),
        })
        .collect();
    format!("{} px [{}]", serial, items.join(", "))
}

/// Python のタプル表記: (2, 21, 4) / (5,)
pub fn format_shape(shape: &[usize]) -> String {
    let items: Vec<String> = shape.iter().map(usize::to_string).collect();
    if items.len() == 1 {
        format!("({},)", items[0])
    } else {
        format!("({})", items.join(", "))
    }
}

/// 入力と出力の配列形状を並べた見出し行
pub fn format_shape_header(source: &[usize], output: &[usize]) -> String {
    format!("{} {}", format_shape(source), format_shape(output))
}

/// 骨の長さ（子関節名で表示）
pub fn format_bone_line(lengths: &[f64; HAND_EDGES.len()]) -> String {
    let items: Vec<String> = HAND_EDGES
        .iter()
        .zip(lengths)
        .map(|([_, child], len)| match HandJoint::from_index(*child) {
            Some(joint) => format!("{:?} {:.1}", joint, len),
            None => format!("{} {:.1}", child, len),
        })
        .collect();
    format!("bones [{}]", items.join(", "))
}

/// カメラ中心とオイラー角（度）
pub fn format_camera_line(camera: &CameraView) -> String {
    let c = camera.center();
    let [rx, ry, rz] = camera.euler_xyz().map(f64::to_degrees);
    format!(
        "  {}  center=({:.2}, {:.2}, {:.2})  rot=({:.1}, {:.1}, {:.1})deg",
        camera.serial, c.x, c.y, c.z, rx, ry, rz
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RigConfig;
    use crate::hand::HandFrame;
    use crate::rig::Rig;

    #[test]
    fn test_format_view_line() {
        let line = format_view_line("840412062035", &[[1, -2, 3], [40, 50, 600]]);
        assert_eq!(line, "840412062035 [[1, -2, 3], [40, 50, 600]]");
    }

    #[test]
    fn test_format_view_line_empty() {
        assert_eq!(format_view_line("cam", &[]), "cam []");
    }

    #[test]
    fn test_format_view_line_precise() {
        let line = format_view_line_precise("cam", &[[0.5, -1.25, 100.0]]);
        assert_eq!(line, "cam [[0.5000, -1.2500, 100.0000]]");
    }

    #[test]
    fn test_format_pixel_line() {
        let pixels = [Some((10.0, 20.0)), Some((700.0, 20.0)), None];
        let line = format_pixel_line("cam", &pixels, |u, v| u < 640.0 && v < 480.0);
        assert_eq!(line, "cam px [(10.0, 20.0), (700.0, 20.0)*, -]");
    }

    #[test]
    fn test_format_shape() {
        assert_eq!(format_shape(&[2, 21, 3]), "(2, 21, 3)");
        assert_eq!(format_shape(&[5]), "(5,)");
        assert_eq!(format_shape(&[]), "()");
    }

    #[test]
    fn test_format_shape_header() {
        assert_eq!(
            format_shape_header(&[2, 21, 4, 1], &[4, 2, 21, 4, 1]),
            "(2, 21, 4, 1) (4, 2, 21, 4, 1)"
        );
        assert_eq!(
            format_shape_header(&[2, 21, 3], &[4, 2, 21, 4]),
            "(2, 21, 3) (4, 2, 21, 4)"
        );
    }

    #[test]
    fn test_format_bone_line() {
        let mut points = [[0.0; 3]; HandJoint::COUNT];
        points[1] = [3.0, 4.0, 0.0];
        let line = format_bone_line(&HandFrame::from_xyz(&points).bone_lengths());
        assert!(line.starts_with("bones [ThumbCmc 5.0, ThumbMcp 5.0, ThumbIp 0.0, "));
        assert!(line.ends_with("PinkyTip 0.0]"));
    }

    #[test]
    fn test_format_camera_line() {
        let rig = Rig::from_config(&RigConfig::default());
        let line = format_camera_line(rig.view("840412062035").unwrap());
        assert_eq!(
            line,
            "  840412062035  center=(175.24, -535.20, 573.36)  rot=(-82.6, -37.9, -45.8)deg"
        );
    }
}
