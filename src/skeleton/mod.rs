pub mod bone;
pub mod frame;
pub mod joint;

pub use bone::{BoneDef, BoneName, BoneSegment, BONE_CATALOG};
pub use frame::{HeightMethod, SkeletonFrame, TorsoMethod};
pub use joint::{JointName, PosePoint};
