use nalgebra::Vector4;

/// 手の 21 キーポイントインデックス（手首 → 親指 → 人差し指 → 中指 → 薬指 → 小指）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandJoint {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandJoint {
    pub const COUNT: usize = 21;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Wrist),
            1 => Some(Self::ThumbCmc),
            2 => Some(Self::ThumbMcp),
            3 => Some(Self::ThumbIp),
            4 => Some(Self::ThumbTip),
            5 => Some(Self::IndexMcp),
            6 => Some(Self::IndexPip),
            7 => Some(Self::IndexDip),
            8 => Some(Self::IndexTip),
            9 => Some(Self::MiddleMcp),
            10 => Some(Self::MiddlePip),
            11 => Some(Self::MiddleDip),
            12 => Some(Self::MiddleTip),
            13 => Some(Self::RingMcp),
            14 => Some(Self::RingPip),
            15 => Some(Self::RingDip),
            16 => Some(Self::RingTip),
            17 => Some(Self::PinkyMcp),
            18 => Some(Self::PinkyPip),
            19 => Some(Self::PinkyDip),
            20 => Some(Self::PinkyTip),
            _ => None,
        }
    }
}

/// 骨格の辺（手首から各指先まで 4 本ずつ）
pub const HAND_EDGES: [[usize; 2]; 20] = [
    [0, 1], [1, 2], [2, 3], [3, 4],
    [0, 5], [5, 6], [6, 7], [7, 8],
    [0, 9], [9, 10], [10, 11], [11, 12],
    [0, 13], [13, 14], [14, 15], [15, 16],
    [0, 17], [17, 18], [18, 19], [19, 20],
];

/// 1フレーム分の手の関節（同次座標）
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    pub joints: [Vector4<f64>; HandJoint::COUNT],
}

impl HandFrame {
    pub fn new(joints: [Vector4<f64>; HandJoint::COUNT]) -> Self {
        Self { joints }
    }

    /// w=1 の3D点から作成
    pub fn from_xyz(points: &[[f64; 3]; HandJoint::COUNT]) -> Self {
        Self {
            joints: std::array::from_fn(|i| {
                let [x, y, z] = points[i];
                Vector4::new(x, y, z, 1.0)
            }),
        }
    }

    /// 各関節の xyz 成分
    pub fn xyz(&self) -> Vec<[f64; 3]> {
        self.joints.iter().map(|p| [p.x, p.y, p.z]).collect()
    }

    /// 骨の長さ（HAND_EDGES 順）
    pub fn bone_lengths(&self) -> [f64; HAND_EDGES.len()] {
        std::array::from_fn(|i| {
            let [a, b] = HAND_EDGES[i];
            (self.joints[a].xyz() - self.joints[b].xyz()).norm()
        })
    }
}

impl Default for HandFrame {
    fn default() -> Self {
        Self {
            joints: [Vector4::new(0.0, 0.0, 0.0, 1.0); HandJoint::COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_joint_count() {
        assert_eq!(HandJoint::COUNT, 21);
    }

    #[test]
    fn test_hand_joint_from_index() {
        assert_eq!(HandJoint::from_index(0), Some(HandJoint::Wrist));
        assert_eq!(HandJoint::from_index(20), Some(HandJoint::PinkyTip));
        assert_eq!(HandJoint::from_index(21), None);
    }

    #[test]
    fn test_edges_cover_every_joint() {
        let mut seen = [false; HandJoint::COUNT];
        for [a, b] in HAND_EDGES {
            seen[a] = true;
            seen[b] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_tips_are_edge_leaves() {
        let tips = [
            HandJoint::ThumbTip,
            HandJoint::IndexTip,
            HandJoint::MiddleTip,
            HandJoint::RingTip,
            HandJoint::PinkyTip,
        ];
        for joint in tips {
            let i = joint as usize;
            let degree = HAND_EDGES.iter().filter(|e| e.contains(&i)).count();
            assert_eq!(degree, 1, "{:?}", joint);
        }
    }

    #[test]
    fn test_bone_lengths() {
        let mut points = [[0.0; 3]; HandJoint::COUNT];
        points[1] = [3.0, 4.0, 0.0];
        let frame = HandFrame::from_xyz(&points);
        let lengths = frame.bone_lengths();
        // [0,1] = 5, [1,2] = 5 (joint 2 は原点)
        assert!((lengths[0] - 5.0).abs() < 1e-12);
        assert!((lengths[1] - 5.0).abs() < 1e-12);
        assert_eq!(lengths[2], 0.0);
    }

    #[test]
    fn test_from_xyz_sets_w() {
        let frame = HandFrame::from_xyz(&[[1.0, 2.0, 3.0]; HandJoint::COUNT]);
        assert_eq!(frame.joints[HandJoint::Wrist as usize].w, 1.0);
        assert_eq!(frame.xyz()[5], [1.0, 2.0, 3.0]);
    }
}
