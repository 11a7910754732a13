use bitmask_enum::bitmask;

use super::node::Side;

#[bitmask(u8)]
pub enum DeletionResultFlags {
    Ok = 0,
    NotFound = 1,
    Leaf = 2,
    OneChild = 4,
    Swapped = 8,
    Adjacent = 16,
    RootChanged = 32,
}

/// What a single erase did to the tree.
pub struct DeletionResult {
    pub flags: DeletionResultFlags,
}

impl DeletionResult {
    pub fn new(flags: DeletionResultFlags) -> Self {
        Self { flags }
    }

    pub fn has(&self, flag: DeletionResultFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn found(&self) -> bool {
        !self.has(DeletionResultFlags::NotFound)
    }
}

impl std::ops::BitOrAssign<DeletionResultFlags> for DeletionResult {
    fn bitor_assign(&mut self, rhs: DeletionResultFlags) {
        self.flags = self.flags | rhs;
    }
}

/// Where the successor sat relative to the node being erased.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapShape {
    /// The successor is the target's right child.
    Adjacent,
    /// The successor is deeper in the right subtree; it is the left child of
    /// its parent.
    Distant,
}

/// Parent and child links of one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Linkage<N> {
    pub parent: Option<N>,
    pub left: Option<N>,
    pub right: Option<N>,
}

/// Links around a two-children node and its in-order successor, read before
/// any rewiring.
#[derive(Clone, Copy, Debug)]
pub struct SwapInput<N> {
    pub target: N,
    /// `None` when the target is the root.
    pub target_parent: Option<(N, Side)>,
    pub target_left: N,
    pub target_right: N,
    pub successor: N,
    pub successor_parent: N,
    pub successor_right: Option<N>,
}

/// New linkage after the target and its successor trade places.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapPlan<N> {
    pub shape: SwapShape,
    pub target: Linkage<N>,
    pub successor: Linkage<N>,
    /// Slot that held the target and now holds the successor; `None` is the
    /// tree root.
    pub upper_slot: Option<(N, Side)>,
    /// Successor's former parent whose left slot now holds the target.
    /// Only set for [`SwapShape::Distant`].
    pub lower_slot: Option<N>,
    /// `(child, new parent)` pairs for nodes outside the swapped pair.
    pub reparent: [Option<(N, N)>; 3],
}

/// Computes how to exchange the positions of `target` and its successor.
///
/// Nothing is mutated here. The relocated target always ends up with no left
/// child and at most a right child, so it can then be removed as a leaf or a
/// one-child node.
pub fn plan_successor_swap<N: Copy + Eq>(input: SwapInput<N>) -> SwapPlan<N> {
    let SwapInput {
        target,
        target_parent,
        target_left,
        target_right,
        successor,
        successor_parent,
        successor_right,
    } = input;

    let shape = if target_right == successor {
        debug_assert!(successor_parent == target);
        SwapShape::Adjacent
    } else {
        SwapShape::Distant
    };

    let reparent_right = successor_right.map(|r| (r, target));

    match shape {
        SwapShape::Adjacent => SwapPlan {
            shape,
            target: Linkage {
                parent: Some(successor),
                left: None,
                right: successor_right,
            },
            successor: Linkage {
                parent: target_parent.map(|(p, _)| p),
                left: Some(target_left),
                right: Some(target),
            },
            upper_slot: target_parent,
            lower_slot: None,
            reparent: [Some((target_left, successor)), reparent_right, None],
        },
        SwapShape::Distant => SwapPlan {
            shape,
            target: Linkage {
                parent: Some(successor_parent),
                left: None,
                right: successor_right,
            },
            successor: Linkage {
                parent: target_parent.map(|(p, _)| p),
                left: Some(target_left),
                right: Some(target_right),
            },
            upper_slot: target_parent,
            lower_slot: Some(successor_parent),
            reparent: [
                Some((target_left, successor)),
                Some((target_right, successor)),
                reparent_right,
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Node ids stand in for pointers:
    //
    //        10                10
    //       /  \              /  \
    //      5    20    or     5    20
    //            \               /  \
    //             25           15    25
    //                            \
    //                             17

    #[test]
    fn test_adjacent_successor_plan() {
        let plan = plan_successor_swap(SwapInput {
            target: 10u32,
            target_parent: None,
            target_left: 5,
            target_right: 20,
            successor: 20,
            successor_parent: 10,
            successor_right: Some(25),
        });

        assert_eq!(plan.shape, SwapShape::Adjacent);
        assert_eq!(
            plan.successor,
            Linkage {
                parent: None,
                left: Some(5),
                right: Some(10),
            }
        );
        assert_eq!(
            plan.target,
            Linkage {
                parent: Some(20),
                left: None,
                right: Some(25),
            }
        );
        assert_eq!(plan.upper_slot, None);
        assert_eq!(plan.lower_slot, None);
        assert_eq!(plan.reparent, [Some((5, 20)), Some((25, 10)), None]);
    }

    #[test]
    fn test_distant_successor_plan() {
        let plan = plan_successor_swap(SwapInput {
            target: 10u32,
            target_parent: Some((40, Side::Left)),
            target_left: 5,
            target_right: 20,
            successor: 15,
            successor_parent: 20,
            successor_right: Some(17),
        });

        assert_eq!(plan.shape, SwapShape::Distant);
        assert_eq!(
            plan.successor,
            Linkage {
                parent: Some(40),
                left: Some(5),
                right: Some(20),
            }
        );
        assert_eq!(
            plan.target,
            Linkage {
                parent: Some(20),
                left: None,
                right: Some(17),
            }
        );
        assert_eq!(plan.upper_slot, Some((40, Side::Left)));
        assert_eq!(plan.lower_slot, Some(20));
        assert_eq!(plan.reparent, [Some((5, 15)), Some((20, 15)), Some((17, 10))]);
    }

    #[test]
    fn test_leaf_successor_has_no_right_reparent() {
        let plan = plan_successor_swap(SwapInput {
            target: 1u8,
            target_parent: Some((0, Side::Right)),
            target_left: 2,
            target_right: 3,
            successor: 3,
            successor_parent: 1,
            successor_right: None,
        });

        assert_eq!(plan.shape, SwapShape::Adjacent);
        assert_eq!(plan.target.right, None);
        assert_eq!(plan.reparent, [Some((2, 3)), None, None]);
    }

    #[test]
    fn test_deletion_result_flags() {
        let mut result = DeletionResult::new(DeletionResultFlags::Ok);
        assert!(result.found());
        result |= DeletionResultFlags::Swapped | DeletionResultFlags::Leaf;
        assert!(result.has(DeletionResultFlags::Swapped));
        assert!(result.has(DeletionResultFlags::Leaf));
        assert!(!result.has(DeletionResultFlags::OneChild));
        assert!(!DeletionResult::new(DeletionResultFlags::NotFound).found());
    }
}
