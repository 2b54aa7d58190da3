use super::declaration::SharedDeclarations;

/// One `offsets { declarations }` block of a `@keyframes` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeBlock {
    /// Offsets in `[0, 1]`; `from` is 0 and `to` is 1.
    pub offsets: Vec<f64>,
    /// Declarations applied at these offsets.
    pub declarations: SharedDeclarations,
}

/// A named `@keyframes` animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    /// Animation name.
    pub name: String,
    /// Blocks in source order.
    pub blocks: Vec<KeyframeBlock>,
}

impl Keyframe {
    /// Blocks sorted by their first offset.
    #[must_use]
    pub fn sorted_blocks(&self) -> Vec<&KeyframeBlock> {
        let mut blocks: Vec<&KeyframeBlock> = self.blocks.iter().collect();
        blocks.sort_by(|a, b| {
            let first = |block: &KeyframeBlock| block.offsets.first().copied().unwrap_or(0.0);
            first(a).total_cmp(&first(b))
        });
        blocks
    }
}
