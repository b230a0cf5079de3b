use super::handle::Handle;
use super::size::Size;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child link a descent follows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

// Red-black node links and annotations. The key is held by the tree, at
// `handle.key_index()`, so the reserved sentinel and anchor need none.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Node {
    color: Color,
    // Number of nodes in the left subtree, excluding this node.
    left_size: Size,
    left: Handle,
    right: Handle,
}

impl Node {
    /// The terminal node: black, empty, and linked to itself.
    pub(crate) const SENTINEL: Self = Self::leaf(Color::Black);
    /// The super-root: black, with an empty tree hanging to its right.
    pub(crate) const ANCHOR: Self = Self::leaf(Color::Black);

    /// Creates a node with no children.
    pub(crate) const fn leaf(color: Color) -> Self {
        Self {
            color,
            left_size: Size::ZERO,
            left: Handle::SENTINEL,
            right: Handle::SENTINEL,
        }
    }

    #[cfg(test)]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) const fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) const fn left_size(&self) -> Size {
        self.left_size
    }

    #[inline]
    pub(crate) fn set_left_size(&mut self, size: Size) {
        self.left_size = size;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Handle {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Handle {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Handle {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Handle) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}
